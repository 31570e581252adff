//! Mosaic API request/response types.

use serde::{Deserialize, Serialize};

use mosaic_models::{AgentId, FileId, RunId, RunOutput};

/// Request for a pre-signed upload slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadUrlRequest {
    /// Name the asset is stored under
    pub filename: String,
    /// Exact size of the bytes that will be PUT
    pub file_size: u64,
    /// MIME type of the upload
    pub content_type: String,
}

/// Response carrying the upload slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadUrlResponse {
    /// Where to PUT the raw bytes
    pub upload_url: String,
    /// Provisional id of the asset being uploaded
    pub video_id: String,
}

/// Response from finalizing an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeUploadResponse {
    /// Durable asset id, the handle every later call uses
    pub file_uuid: FileId,
}

/// Request to start an agent run.
///
/// `agent_id` is always present on the wire, explicitly `null` for
/// prompt-driven runs. The server treats a missing key differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAgentRequest {
    /// Agent to run, or null when a prompt drives the run
    pub agent_id: Option<AgentId>,
    /// Asset to process
    pub file_id: FileId,
    /// Let the server pick parameters automatically
    pub auto: bool,
    /// Free-text prompt for a generated agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Extra agent parameters, passed through verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// Response from starting a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAgentResponse {
    /// Id of the run that was created
    pub agent_run_id: RunId,
}

/// Response listing a run's outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutputsResponse {
    /// Downloadable products, empty until the run succeeds
    #[serde(default)]
    pub outputs: Vec<RunOutput>,
}
