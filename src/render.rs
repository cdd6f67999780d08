use console::{style, Color, Style};

use crate::response::{AnalysisOutcome, StructuredReport, Verdict};
use crate::session::{RequestState, Session};

pub const PLACEHOLDER: &str = "No disponible";
const GAUGE_WIDTH: usize = 24;

pub const LOADING_HINT: &str = "3 agentes especializados verifican el documento secuencialmente: \
extracción forense, verificación RETHUS/ADRES/OSINT y generación del informe. \
El proceso tarda entre 30 y 120 segundos.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerdictStyle {
    pub icon: &'static str,
    pub label: &'static str,
    pub color: Color,
}

const VALID: VerdictStyle = VerdictStyle {
    icon: "✓",
    label: "DOCUMENTO VÁLIDO",
    color: Color::Green,
};
const SUSPICIOUS: VerdictStyle = VerdictStyle {
    icon: "⚠",
    label: "DOCUMENTO SOSPECHOSO",
    color: Color::Yellow,
};
const FRAUDULENT: VerdictStyle = VerdictStyle {
    icon: "✕",
    label: "DOCUMENTO FRAUDULENTO",
    color: Color::Red,
};

// missing or unknown verdicts look suspicious
pub fn verdict_style(verdict: Option<&Verdict>) -> VerdictStyle {
    match verdict {
        Some(Verdict::Valid) => VALID,
        Some(Verdict::Fraudulent) => FRAUDULENT,
        Some(Verdict::Suspicious) | Some(Verdict::Other(_)) | None => SUSPICIOUS,
    }
}

pub fn score_color(score: u8) -> Color {
    if score >= 80 {
        Color::Green
    } else if score >= 40 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn render_session(session: &Session) -> String {
    match (session.state(), session.file_name()) {
        (RequestState::Idle, Some(name)) => format!(
            "{} {}\n  {}",
            style("✓").green().bold(),
            style(name).white().bold(),
            style("Documento listo para auditoría").green(),
        ),
        (state, _) => render_state(state),
    }
}

pub fn render_state(state: &RequestState) -> String {
    match state {
        RequestState::Idle => format!(
            "{}\n  {}",
            style("Arrastra tu certificado médico").bold(),
            style("PDF, JPG o PNG").dim(),
        ),
        RequestState::Loading => render_loading(),
        RequestState::Success(outcome) => render_outcome(outcome),
        RequestState::Error(message) => render_error(message),
    }
}

pub fn render_loading() -> String {
    format!(
        "{} {}\n  {}",
        style("⏳").yellow(),
        style("Agentes IA Analizando...").yellow().bold(),
        style(LOADING_HINT).dim(),
    )
}

pub fn render_outcome(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Structured(report) => render_structured(report),
        AnalysisOutcome::Raw(text) => render_raw(text),
        AnalysisOutcome::Failed(message) => render_error(message),
    }
}

pub fn render_error(message: &str) -> String {
    format!(
        "{} {}\n  {}\n",
        style("✗").red().bold(),
        style("Error en el análisis").red().bold(),
        message,
    )
}

fn heading(first: &str, accent: &str) -> String {
    format!(
        "\n{} {} {}\n",
        style("▌").magenta().bold(),
        style(first).white().bold(),
        style(accent).magenta().bold(),
    )
}

pub fn render_raw(text: &str) -> String {
    let body = if text.trim().is_empty() {
        style(PLACEHOLDER).dim().to_string()
    } else {
        text.to_string()
    };
    format!("{}\n{}\n", heading("Veredicto", "Forense"), body)
}

pub fn render_score_gauge(score: Option<u8>) -> String {
    let Some(score) = score else {
        return format!("{} {}", style("Veracidad").dim(), style(PLACEHOLDER).dim());
    };
    let filled = usize::from(score) * GAUGE_WIDTH / 100;
    let painter = Style::new().fg(score_color(score));
    format!(
        "{}{} {} {}",
        painter.apply_to("█".repeat(filled)),
        style("░".repeat(GAUGE_WIDTH - filled)).dim(),
        painter.apply_to(format!("{score}/100")).bold(),
        style("Veracidad").dim(),
    )
}

pub fn render_verdict_badge(verdict: Option<&Verdict>) -> String {
    let cfg = verdict_style(verdict);
    let painter = Style::new().fg(cfg.color).bold();
    format!(
        "{} {}",
        painter.apply_to(format!("[{}]", cfg.icon)),
        painter.apply_to(cfg.label),
    )
}

fn render_section(icon: &str, title: &str, body: Option<&str>) -> String {
    let body = body
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|b| b.replace('\n', "\n  "))
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    format!("\n{} {}\n  {}\n", icon, style(title).bold(), body)
}

fn render_alerts(alerts: &[String]) -> String {
    let mut out = format!(
        "\n{} {}\n",
        "🚨",
        style(format!("Alertas de Riesgo ({})", alerts.len())).red().bold(),
    );
    for alert in alerts {
        out.push_str(&format!("  {} {}\n", style("⚠").red(), alert));
    }
    out
}

pub fn render_structured(report: &StructuredReport) -> String {
    let mut out = heading("Informe", "Forense");
    out.push_str(&format!(
        "\n  {}\n  {}\n",
        render_score_gauge(report.score()),
        render_verdict_badge(report.veredicto.as_ref()),
    ));
    out.push_str(&render_section(
        "🏥",
        "Hallazgos Médicos",
        report.hallazgos_medicos.as_deref(),
    ));
    out.push_str(&render_section(
        "🔬",
        "Análisis Forense Digital",
        report.analisis_forense.as_deref(),
    ));
    out.push_str(&render_section(
        "🔍",
        "Verificación de Entidades",
        report.verificacion_entidades.as_deref(),
    ));
    if !report.alertas.is_empty() {
        out.push_str(&render_alerts(&report.alertas));
    }
    out
}
