//! Run handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use mosaic_models::{FileId, RunId, RunSnapshot, RunSpec};

use crate::error::{GatewayError, GatewayResult};
use crate::state::AppState;

/// Request body for starting a run.
#[derive(Deserialize)]
pub struct StartRunRequest {
    pub file_id: String,
    /// Catalog name or raw agent id
    pub agent: Option<String>,
    /// Free-text prompt for a generated agent
    pub prompt: Option<String>,
    pub parameters: Option<Value>,
}

#[derive(Serialize)]
pub struct StartRunResponse {
    pub run_id: RunId,
}

/// Start an agent run for an uploaded file.
pub async fn start_run(
    State(state): State<AppState>,
    Json(body): Json<StartRunRequest>,
) -> GatewayResult<Json<StartRunResponse>> {
    // Empty strings count as absent, same as the tool surface
    let agent = body.agent.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let prompt = body.prompt.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let spec = match (agent, prompt) {
        (Some(agent), None) => RunSpec::agent(
            FileId::from_string(body.file_id),
            state.catalog.resolve(agent),
        ),
        (None, Some(prompt)) => RunSpec::prompt(FileId::from_string(body.file_id), prompt),
        _ => {
            return Err(GatewayError::bad_request(
                "Provide exactly one of 'agent' (existing) or 'prompt' (generated)",
            ))
        }
    };

    let spec = match body.parameters {
        Some(parameters) => spec.with_parameters(parameters),
        None => spec,
    };

    let run_id = state.mosaic.run_agent(&spec).await?;
    info!("Gateway started run {}", run_id);
    Ok(Json(StartRunResponse { run_id }))
}

/// Fetch a run's status snapshot (the page's poll target).
pub async fn get_run_status(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> GatewayResult<Json<RunSnapshot>> {
    let snapshot = state.mosaic.get_run(&RunId::from_string(run_id)).await?;
    Ok(Json(snapshot))
}

#[derive(Serialize)]
pub struct RunOutputsResponse {
    pub outputs: Vec<String>,
}

/// Fetch a finished run's signed download URLs.
pub async fn get_run_outputs(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> GatewayResult<Json<RunOutputsResponse>> {
    let outputs = state
        .mosaic
        .get_run_outputs(&RunId::from_string(run_id))
        .await?;
    Ok(Json(RunOutputsResponse {
        outputs: outputs.into_iter().map(|o| o.download_url).collect(),
    }))
}
