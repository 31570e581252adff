//! Agent catalog handler.

use axum::extract::State;
use axum::Json;

use mosaic_models::AgentEntry;

use crate::state::AppState;

/// List the agents the page can offer.
pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentEntry>> {
    Json(state.catalog.entries().to_vec())
}
