use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub const STATUS_SUCCESS: &str = "success";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Error desconocido en el análisis.";

// a missing status counts as a failure, like any other non-"success" value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_report")]
    pub report: Option<ReportPayload>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub raw_report: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportPayload {
    Structured(StructuredReport),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Structured(StructuredReport),
    Raw(String),
    Failed(String),
}

impl AnalysisResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    pub fn into_outcome(self) -> AnalysisOutcome {
        if !self.is_success() {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
            return AnalysisOutcome::Failed(message);
        }

        // object, then text holding a report, then plain text, then raw_report
        match self.report {
            Some(ReportPayload::Structured(report)) => return AnalysisOutcome::Structured(report),
            Some(ReportPayload::Text(text)) => {
                if let Some(report) = StructuredReport::from_text(&text) {
                    return AnalysisOutcome::Structured(report);
                }
                if !text.trim().is_empty() {
                    return AnalysisOutcome::Raw(text);
                }
            }
            None => {}
        }

        AnalysisOutcome::Raw(self.raw_report.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StructuredReport {
    #[serde(default, deserialize_with = "lenient_score")]
    pub puntaje_veracidad: Option<f64>,
    #[serde(default, deserialize_with = "lenient_verdict")]
    pub veredicto: Option<Verdict>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hallazgos_medicos: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub analisis_forense: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub verificacion_entidades: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub alertas: Vec<String>,
}

impl StructuredReport {
    pub fn from_text(text: &str) -> Option<StructuredReport> {
        let body = strip_code_fence(text.trim());
        if !body.starts_with('{') {
            return None;
        }
        let value: Value = serde_json::from_str(body).ok()?;
        let object = value.as_object()?;
        if !object.contains_key("puntaje_veracidad") && !object.contains_key("veredicto") {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    pub fn score(&self) -> Option<u8> {
        self.puntaje_veracidad
            .filter(|s| s.is_finite())
            .map(|s| s.round().clamp(0.0, 100.0) as u8)
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string ("json") up to the first newline
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

// Report fields come from an LLM and drift in shape. Anything that cannot be
// read as the expected type is dropped instead of failing the whole response.

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let lines: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect();
            Some(lines.join("\n"))
        }
        _ => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_text))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.into_iter().filter_map(value_to_text).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    })
}

fn lenient_verdict<'de, D>(deserializer: D) -> Result<Option<Verdict>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(Verdict::from(s)),
        _ => None,
    })
}

fn lenient_report<'de, D>(deserializer: D) -> Result<Option<ReportPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .ok()
            .map(ReportPayload::Structured),
        Some(Value::String(s)) => Some(ReportPayload::Text(s)),
        _ => None,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Suspicious,
    Fraudulent,
    Other(String),
}

impl Verdict {
    pub fn as_str(&self) -> &str {
        match self {
            Verdict::Valid => "Válida",
            Verdict::Suspicious => "Sospechosa",
            Verdict::Fraudulent => "Fraudulenta",
            Verdict::Other(s) => s,
        }
    }
}

impl From<String> for Verdict {
    fn from(value: String) -> Self {
        let folded: String = value
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' => 'a',
                'é' => 'e',
                'í' => 'i',
                'ó' => 'o',
                'ú' => 'u',
                other => other,
            })
            .collect();
        match folded.as_str() {
            "valida" | "valido" => Verdict::Valid,
            "sospechosa" | "sospechoso" => Verdict::Suspicious,
            "fraudulenta" | "fraudulento" => Verdict::Fraudulent,
            _ => Verdict::Other(value),
        }
    }
}
