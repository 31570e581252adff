//! Watch relay error types.

use thiserror::Error;

/// Result type for watch operations.
pub type WatchResult<T> = Result<T, WatchError>;

/// Errors that can occur in the watch relays.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Mosaic API error: {0}")]
    Mosaic(#[from] mosaic_client::MosaicError),

    #[error("Bucket error: {0}")]
    Bucket(#[from] mosaic_bucket::BucketError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WatchError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
