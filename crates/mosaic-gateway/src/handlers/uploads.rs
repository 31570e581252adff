//! Upload handlers.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use mosaic_models::FileId;

use crate::error::{GatewayError, GatewayResult};
use crate::state::AppState;

/// Response for both upload endpoints.
#[derive(Serialize)]
pub struct UploadResponse {
    pub file_id: FileId,
}

/// Accept one multipart `file` field and push it to Mosaic.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> GatewayResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.mp4".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| GatewayError::bad_request(format!("Failed to read upload: {}", e)))?;

        info!("Gateway upload: {} ({} bytes)", filename, bytes.len());
        let file_id = state.mosaic.upload_bytes(&filename, bytes.to_vec()).await?;
        return Ok(Json(UploadResponse { file_id }));
    }

    Err(GatewayError::bad_request(
        "Multipart body is missing a 'file' field",
    ))
}

/// Request body for URL ingestion.
#[derive(Deserialize)]
pub struct UploadFromUrlRequest {
    pub url: String,
}

/// Pull a video down from a URL and push it to Mosaic.
pub async fn upload_from_url(
    State(state): State<AppState>,
    Json(body): Json<UploadFromUrlRequest>,
) -> GatewayResult<Json<UploadResponse>> {
    let file_id = state.mosaic.upload_from_url(&body.url).await?;
    Ok(Json(UploadResponse { file_id }))
}
