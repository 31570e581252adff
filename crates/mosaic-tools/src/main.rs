//! Tool server binary.
//!
//! Speaks line-delimited JSON on stdin/stdout. All logs go to stderr so
//! stdout carries nothing but response frames.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mosaic_client::MosaicClient;
use mosaic_models::AgentCatalog;
use mosaic_tools::{server, ToolRouter};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production.
    // stdout is the response channel, so every log line lands on stderr.
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("mosaic=info".parse().unwrap())
        .add_directive("hyper=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting mosaic-tools");

    let catalog = match AgentCatalog::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load agent catalog: {}", e);
            std::process::exit(1);
        }
    };

    let client = match MosaicClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create Mosaic client: {}", e);
            std::process::exit(1);
        }
    };

    let router = ToolRouter::new(client, catalog);

    if let Err(e) = server::serve_stdio(router).await {
        error!("Tool server error: {}", e);
        std::process::exit(1);
    }

    info!("Tool server shutdown complete");
}
