use thiserror::Error;

pub type Result<T> = std::result::Result<T, NetsightError>;

#[derive(Debug, Error)]
pub enum NetsightError {
    #[error("completion request failed: {0}")]
    Completion(String),

    #[error("malformed completion reply: {0}")]
    MalformedReply(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
