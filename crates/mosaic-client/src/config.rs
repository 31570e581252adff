//! Mosaic client configuration.

use std::time::Duration;

use crate::error::{MosaicError, MosaicResult};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.usemosaic.ai/api";

/// Smallest upload the API accepts, 1 KiB.
pub const MIN_FILE_BYTES: u64 = 1024;

/// Default upload ceiling, 5 GiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Configuration for the Mosaic API client.
#[derive(Debug, Clone)]
pub struct MosaicConfig {
    /// Bearer token for the API
    pub api_key: String,
    /// Base URL of the API, without trailing slash
    pub base_url: String,
    /// Request timeout for JSON calls
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Timeout for upload and download transfers
    pub transfer_timeout: Duration,
    /// Max retries for transient failures
    pub max_retries: u32,
    /// Upload size ceiling in bytes
    pub max_file_bytes: u64,
}

impl MosaicConfig {
    /// Create a config with the given API key and stock settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            transfer_timeout: Duration::from_secs(3600),
            max_retries: 2,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    /// Create config from environment variables.
    ///
    /// `MOSAIC_API_KEY` is required. `MOSAIC_BASE_URL` overrides the endpoint,
    /// with `MOSAIC_API_BASE` accepted as an older spelling.
    pub fn from_env() -> MosaicResult<Self> {
        let api_key = std::env::var("MOSAIC_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(MosaicError::MissingApiKey)?;

        let base_url = std::env::var("MOSAIC_BASE_URL")
            .or_else(|_| std::env::var("MOSAIC_API_BASE"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(
                std::env::var("MOSAIC_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            connect_timeout: Duration::from_secs(10),
            transfer_timeout: Duration::from_secs(
                std::env::var("MOSAIC_TRANSFER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            max_retries: std::env::var("MOSAIC_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            max_file_bytes: std::env::var("MAX_FILE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_FILE_BYTES),
        })
    }

    /// Override the base URL, trimming any trailing slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MosaicConfig::new("mk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = MosaicConfig::new("mk-test").with_base_url("http://localhost:9000/api/");
        assert_eq!(config.base_url, "http://localhost:9000/api");
    }
}
