#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// One multipart field as the fake backend received it.
#[derive(Debug, Clone)]
pub struct ReceivedField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Text(&'static str),
}

#[derive(Clone)]
struct BackendState {
    reply: Reply,
    uploads: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
}

/// In-process stand-in for the analysis API, served on its own runtime.
pub struct FakeBackend {
    pub base_url: String,
    uploads: Arc<Mutex<Vec<Vec<ReceivedField>>>>,
}

impl FakeBackend {
    pub fn start(reply: Reply) -> FakeBackend {
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let state = BackendState {
            reply,
            uploads: uploads.clone(),
        };

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind fake backend");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let addr = listener.local_addr().expect("local addr");

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
            rt.block_on(async move {
                let app = Router::new()
                    .route("/", get(root))
                    .route("/api/analyze", post(analyze))
                    .with_state(state);
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("fake backend failed");
            });
        });

        FakeBackend {
            base_url: format!("http://{addr}"),
            uploads,
        }
    }

    pub fn uploads(&self) -> Vec<Vec<ReceivedField>> {
        self.uploads.lock().unwrap().clone()
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "API de Fraude Incapacidades funcionando correctamente. Endpoint: POST /api/analyze"
    }))
}

async fn analyze(State(state): State<BackendState>, mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    state.uploads.lock().unwrap().push(fields);

    match state.reply {
        Reply::Json(body) => Json(body).into_response(),
        Reply::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({"status": "error", "error": "should not be shown"})),
        )
            .into_response(),
        Reply::Text(body) => body.into_response(),
    }
}
