use serde::Deserialize;
use tracing::{debug, info, warn};

pub const DEFAULT_SERVER_ADDR: &str = "http://localhost:8000";
pub const ANALYZE_PATH: &str = "/api/analyze";

pub mod errors;
pub mod render;
pub mod response;
pub mod session;
pub mod upload;

pub use errors::ClientError;
pub use response::{AnalysisOutcome, AnalysisResponse, ReportPayload, StructuredReport, Verdict};
pub use session::{Analyzer, RequestState, Session};
pub use upload::SelectedFile;

#[derive(Debug)]
pub struct SaludGuardClient {
    server_addr: url::Url,
    http_client: reqwest::blocking::Client,
}

impl SaludGuardClient {
    pub fn new() -> Result<SaludGuardClient, ClientError> {
        SaludGuardClient::new_for_server(DEFAULT_SERVER_ADDR)
    }

    pub fn new_for_server(server_addr: &str) -> Result<SaludGuardClient, ClientError> {
        let server_addr_parsed = url::Url::parse(server_addr)?;
        match server_addr_parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ClientError::BadScheme {
                    scheme: other.to_string(),
                })
            }
        }

        // analyses routinely take minutes; the blocking client's 30s default
        // would cut them off
        let http_client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()?;

        Ok(SaludGuardClient {
            server_addr: server_addr_parsed,
            http_client,
        })
    }

    pub fn server_addr(&self) -> &url::Url {
        &self.server_addr
    }

    // one request per call; any non-2xx status is a transport error whatever the body
    pub fn send_analysis_request_raw(&self, file: &SelectedFile) -> Result<Vec<u8>, ClientError> {
        let endpoint_url = self.server_addr.join(ANALYZE_PATH)?;
        info!(
            file = file.name(),
            mime = file.mime(),
            bytes = file.len(),
            endpoint = %endpoint_url,
            "submitting certificate for analysis"
        );

        let form = reqwest::blocking::multipart::Form::new().part("file", file.to_part()?);
        let resp = self
            .http_client
            .post(endpoint_url.clone())
            .multipart(form)
            .send()?;

        let resp_status = resp.status();
        if !resp_status.is_success() {
            warn!(status = resp_status.as_u16(), "analysis endpoint rejected the upload");
            return Err(ClientError::Transport {
                endpoint_url: endpoint_url.into(),
                status: resp_status.as_u16(),
            });
        }

        let resp_body_bytes = resp.bytes()?;
        debug!(bytes = resp_body_bytes.len(), "analysis response received");
        Ok(resp_body_bytes.to_vec())
    }

    pub fn send_analysis_request(
        &self,
        file: &SelectedFile,
    ) -> Result<AnalysisResponse, ClientError> {
        let body = self.send_analysis_request_raw(file)?;
        let data: AnalysisResponse = serde_json::from_slice(&body)?;
        debug!(status = %data.status, "analysis settled");
        Ok(data)
    }

    pub fn analyze_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<AnalysisOutcome, ClientError> {
        let file = SelectedFile::open(path)?;
        Ok(self.send_analysis_request(&file)?.into_outcome())
    }

    pub fn health(&self) -> Result<String, ClientError> {
        #[derive(Deserialize)]
        struct RootMessage {
            message: Option<String>,
        }

        let endpoint_url = self.server_addr.join("/")?;
        let resp = self.http_client.get(endpoint_url.clone()).send()?;
        let resp_status = resp.status();
        if !resp_status.is_success() {
            return Err(ClientError::Transport {
                endpoint_url: endpoint_url.into(),
                status: resp_status.as_u16(),
            });
        }
        let body = resp.bytes()?;
        let data: RootMessage = serde_json::from_slice(&body)?;
        Ok(data.message.unwrap_or_default())
    }
}

impl Analyzer for SaludGuardClient {
    fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResponse, ClientError> {
        self.send_analysis_request(file)
    }
}
