//! Gateway error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use mosaic_client::MosaicError;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Mosaic error: {0}")]
    Mosaic(#[from] MosaicError),
}

impl GatewayError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Mosaic(e) => upstream_status(e),
        }
    }
}

/// Map a Mosaic client failure onto the status the page should see.
fn upstream_status(e: &MosaicError) -> StatusCode {
    match e {
        MosaicError::FileTooSmall { .. }
        | MosaicError::FileTooLarge { .. }
        | MosaicError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        // Pass the upstream status through so the page sees what Mosaic said
        MosaicError::ApiStatus { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        MosaicError::Network(_) | MosaicError::UploadFailed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            GatewayError::Internal(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse { detail };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test that upstream API failures keep their status code.
    #[test]
    fn test_upstream_status_passthrough() {
        let err = GatewayError::from(MosaicError::from_status(404, "no such run"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = GatewayError::from(MosaicError::from_status(1000, "bogus"));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    /// Test that size rejections surface as client errors.
    #[test]
    fn test_size_rejection_is_bad_request() {
        let err = GatewayError::from(MosaicError::FileTooSmall { size: 10, min: 1024 });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
