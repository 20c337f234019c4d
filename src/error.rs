use thiserror::Error;

/// Failures talking to the Ollama HTTP API.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {}", .0.as_u16())]
    Status(reqwest::StatusCode),
}

pub type ChatResult<T> = std::result::Result<T, ChatError>;
