use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Bad scheme: {scheme}")]
    BadScheme { scheme: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unsupported file {name}: only PDF and image files are accepted")]
    UnsupportedFile { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error del servidor: {status}")]
    Transport { endpoint_url: String, status: u16 },

    #[error("Respuesta no válida del servidor: {0}")]
    Json(#[from] serde_json::Error),
}
