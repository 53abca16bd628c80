#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Share token decode failed: {0}")]
    Decode(String),

    #[error("Invalid import payload: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[cfg(feature = "async")]
    #[error("Async runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
