use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Invalid ticket number '{number}': expected exactly 6 digits")]
    Validation { number: String },

    #[error("Malformed draw result: {0}")]
    Schema(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CheckError>;

impl CheckError {
    pub fn schema(message: impl Into<String>) -> Self {
        CheckError::Schema(message.into())
    }
}
