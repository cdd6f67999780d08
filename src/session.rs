use tracing::debug;

use crate::errors::ClientError;
use crate::response::{AnalysisOutcome, AnalysisResponse, StructuredReport};
use crate::upload::SelectedFile;

pub trait Analyzer {
    fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResponse, ClientError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Loading,
    // never holds AnalysisOutcome::Failed
    Success(AnalysisOutcome),
    Error(String),
}

#[derive(Debug)]
pub struct Session {
    file: Option<SelectedFile>,
    state: RequestState,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Session {
        Session {
            file: None,
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(SelectedFile::name)
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state == RequestState::Loading
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.has_file() && !self.is_loading()
    }

    // the picker is disabled while a request is outstanding
    pub fn select_file(&mut self, file: SelectedFile) -> bool {
        if self.is_loading() {
            return false;
        }
        debug!(file = file.name(), "file selected");
        self.file = Some(file);
        true
    }

    // the selection stays so the user can resubmit
    pub fn begin_submit(&mut self) -> Option<SelectedFile> {
        if !self.is_submit_enabled() {
            return None;
        }
        let file = self.file.clone()?;
        self.state = RequestState::Loading;
        Some(file)
    }

    pub fn settle(&mut self, result: Result<AnalysisResponse, ClientError>) {
        if !self.is_loading() {
            return;
        }
        self.state = match result.map(AnalysisResponse::into_outcome) {
            Ok(AnalysisOutcome::Failed(message)) => RequestState::Error(message),
            Ok(outcome) => RequestState::Success(outcome),
            Err(err) => RequestState::Error(err.to_string()),
        };
        debug!(state = ?self.state, "request settled");
    }

    pub fn submit<A: Analyzer + ?Sized>(&mut self, analyzer: &A) -> &RequestState {
        if let Some(file) = self.begin_submit() {
            let result = analyzer.analyze(&file);
            self.settle(result);
        }
        &self.state
    }

    pub fn reset(&mut self) {
        if self.is_loading() {
            return;
        }
        *self = Session::new();
    }

    pub fn structured_report(&self) -> Option<&StructuredReport> {
        match &self.state {
            RequestState::Success(AnalysisOutcome::Structured(report)) => Some(report),
            _ => None,
        }
    }

    pub fn raw_report(&self) -> Option<&str> {
        match &self.state {
            RequestState::Success(AnalysisOutcome::Raw(text)) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            RequestState::Error(message) => Some(message),
            _ => None,
        }
    }
}
