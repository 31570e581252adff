//! Mosaic client error types.

use thiserror::Error;

pub type MosaicResult<T> = Result<T, MosaicError>;

#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("MOSAIC_API_KEY is not set")]
    MissingApiKey,

    #[error("Mosaic API returned {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("Upload rejected: {0}")]
    UploadFailed(String),

    #[error("File too small: {size} bytes (minimum {min})")]
    FileTooSmall { size: u64, min: u64 },

    #[error("File too large: {size} bytes (maximum {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Run did not finish within {0} seconds")]
    PollDeadline(u64),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MosaicError {
    /// Build an error from a non-success API response.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        MosaicError::ApiStatus {
            status,
            body: body.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            MosaicError::Network(e) => !e.is_builder() && !e.is_body(),
            MosaicError::ApiStatus { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            _ => false,
        }
    }
}
