//! Application state.

use std::sync::Arc;

use mosaic_client::MosaicClient;
use mosaic_models::AgentCatalog;

use crate::config::GatewayConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub mosaic: Arc<MosaicClient>,
    pub catalog: Arc<AgentCatalog>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: GatewayConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let mosaic = MosaicClient::from_env()?;
        let catalog = AgentCatalog::from_env()?;

        Ok(Self {
            config,
            mosaic: Arc::new(mosaic),
            catalog: Arc::new(catalog),
        })
    }
}
