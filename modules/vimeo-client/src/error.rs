use thiserror::Error;

pub type Result<T> = std::result::Result<T, VimeoError>;

#[derive(Debug, Error)]
pub enum VimeoError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for VimeoError {
    fn from(err: reqwest::Error) -> Self {
        VimeoError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for VimeoError {
    fn from(err: serde_json::Error) -> Self {
        VimeoError::Parse(err.to_string())
    }
}
