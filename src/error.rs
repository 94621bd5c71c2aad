use thiserror::Error;

/// Failure taxonomy for the externally-facing operations. Every operation
/// either fully succeeds or surfaces exactly one of these; nothing is
/// retried and no partial result is ever applied.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before any network call is made.
    #[error("{0}")]
    InvalidInput(String),

    /// The AI provider errored, timed out, or returned an unusable payload.
    #[error("AI service error: {0}")]
    AiService(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl AppError {
    /// True for errors the caller can fix by changing the form input.
    pub fn is_input_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
