//! Client for the Mosaic video editing API.
//!
//! Covers the two-phase upload flow (reserve a pre-signed slot, PUT the
//! raw bytes, finalize), starting agent runs, polling run status, and
//! fetching run outputs. Every integration surface goes through this crate
//! so the wire contract lives in exactly one place.

pub mod client;
pub mod config;
pub mod error;
pub mod poll;
pub mod types;

pub use client::MosaicClient;
pub use config::{MosaicConfig, DEFAULT_MAX_FILE_BYTES, MIN_FILE_BYTES};
pub use error::{MosaicError, MosaicResult};
pub use poll::{wait_for_run, PollConfig};
pub use types::{RunAgentRequest, UploadUrlRequest, UploadUrlResponse};
