use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream request failed: {0}")]
    Request(String),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode upstream response: {0}")]
    Decode(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Request(err.to_string())
        }
    }
}
