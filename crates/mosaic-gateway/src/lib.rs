//! Axum web gateway.
//!
//! This crate provides:
//! - The pick-and-run page at `/`
//! - A JSON API over the Mosaic client: uploads, runs, outputs
//! - CORS, request ids, and request logging

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod ui;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use routes::create_router;
pub use state::AppState;
