mod common;

use common::{FakeBackend, Reply};
use saludguard_client::{
    AnalysisOutcome, ClientError, RequestState, SaludGuardClient, SelectedFile, Session, Verdict,
};
use serde_json::json;
use std::io::Cursor;

fn certificate() -> SelectedFile {
    SelectedFile::from_reader("incapacidad.pdf", Cursor::new(b"%PDF-1.4 certificado".to_vec()))
        .unwrap()
}

#[test]
fn uploads_file_field_and_parses_structured_report() {
    let backend = FakeBackend::start(Reply::Json(json!({
        "status": "success",
        "report": {
            "puntaje_veracidad": 42,
            "veredicto": "Sospechosa",
            "hallazgos_medicos": "Diagnóstico J06.9",
            "analisis_forense": "Metadatos editados con un editor en línea",
            "verificacion_entidades": "IPS registrada en REPS",
            "alertas": ["Fecha de expedición posterior al inicio"]
        }
    })));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();

    let response = client.send_analysis_request(&certificate()).unwrap();
    let AnalysisOutcome::Structured(report) = response.into_outcome() else {
        panic!("expected a structured report");
    };
    assert_eq!(report.score(), Some(42));
    assert_eq!(report.veredicto, Some(Verdict::Suspicious));
    assert_eq!(report.alertas.len(), 1);

    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 1);
    let fields = &uploads[0];
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "file");
    assert_eq!(fields[0].file_name.as_deref(), Some("incapacidad.pdf"));
    assert_eq!(fields[0].content_type.as_deref(), Some("application/pdf"));
    assert_eq!(fields[0].bytes, b"%PDF-1.4 certificado");
}

#[test]
fn text_report_renders_as_raw() {
    let backend = FakeBackend::start(Reply::Json(json!({
        "status": "success",
        "report": "DICTAMEN: el certificado presenta inconsistencias.",
        "error": null
    })));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();

    let mut session = Session::new();
    session.select_file(certificate());
    session.submit(&client);
    assert_eq!(
        session.raw_report(),
        Some("DICTAMEN: el certificado presenta inconsistencias.")
    );
}

#[test]
fn non_success_status_is_a_transport_error() {
    let backend = FakeBackend::start(Reply::Status(500));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();

    let err = client.send_analysis_request(&certificate()).unwrap_err();
    assert!(matches!(err, ClientError::Transport { status: 500, .. }));

    let mut session = Session::new();
    session.select_file(certificate());
    session.submit(&client);
    assert_eq!(session.error(), Some("Error del servidor: 500"));
}

#[test]
fn application_failure_shows_server_message() {
    let backend = FakeBackend::start(Reply::Json(json!({
        "status": "error",
        "report": "",
        "error": "No se pudo leer el PDF"
    })));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();

    let mut session = Session::new();
    session.select_file(certificate());
    let state = session.submit(&client).clone();
    assert_eq!(state, RequestState::Error("No se pudo leer el PDF".into()));
}

#[test]
fn undecodable_body_is_reported() {
    let backend = FakeBackend::start(Reply::Text("<html>proxy error</html>"));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();

    let err = client.send_analysis_request(&certificate()).unwrap_err();
    assert!(matches!(err, ClientError::Json(_)));
}

#[test]
fn no_file_means_no_request() {
    let backend = FakeBackend::start(Reply::Json(json!({"status": "success"})));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();

    let mut session = Session::new();
    session.submit(&client);
    assert_eq!(session.state(), &RequestState::Idle);
    assert!(backend.uploads().is_empty());
}

#[test]
fn health_returns_root_message() {
    let backend = FakeBackend::start(Reply::Json(json!({"status": "success"})));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();
    assert!(client.health().unwrap().contains("POST /api/analyze"));
}

#[test]
fn unreachable_server_is_an_http_error() {
    // bind then drop to get a port nobody listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = SaludGuardClient::new_for_server(&format!("http://127.0.0.1:{port}")).unwrap();
    let err = client.send_analysis_request(&certificate()).unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}

#[test]
fn rejects_non_http_server_address() {
    let err = SaludGuardClient::new_for_server("ftp://localhost:8000").unwrap_err();
    assert!(matches!(err, ClientError::BadScheme { ref scheme } if scheme == "ftp"));
}

#[test]
fn analyze_file_opens_and_submits() {
    let backend = FakeBackend::start(Reply::Json(json!({
        "status": "success",
        "raw_report": "Sin inconsistencias"
    })));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("escaneo.JPG");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();

    let outcome = client.analyze_file(&path).unwrap();
    assert_eq!(outcome, AnalysisOutcome::Raw("Sin inconsistencias".into()));
    let uploads = backend.uploads();
    assert_eq!(uploads[0][0].content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(uploads[0][0].bytes, vec![0xFF, 0xD8, 0xFF]);
}

#[test]
fn resubmitting_after_error_uploads_same_file_again() {
    let backend = FakeBackend::start(Reply::Status(503));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();

    let mut session = Session::new();
    session.select_file(certificate());
    session.submit(&client);
    assert_eq!(session.error(), Some("Error del servidor: 503"));
    assert!(session.is_submit_enabled());

    session.submit(&client);
    let uploads = backend.uploads();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0][0].bytes, uploads[1][0].bytes);
    assert_eq!(uploads[1][0].bytes, b"%PDF-1.4 certificado");
}

#[test]
fn dropped_file_of_unknown_type_is_sent_as_octet_stream() {
    let backend = FakeBackend::start(Reply::Json(json!({"status": "success", "report": "ok"})));
    let client = SaludGuardClient::new_for_server(&backend.base_url).unwrap();

    let file = SelectedFile::from_reader("certificado.docx", Cursor::new(b"PK".to_vec())).unwrap();
    client.send_analysis_request(&file).unwrap();
    let uploads = backend.uploads();
    assert_eq!(uploads[0][0].file_name.as_deref(), Some("certificado.docx"));
    assert_eq!(
        uploads[0][0].content_type.as_deref(),
        Some("application/octet-stream")
    );
}
