//! Shared data models for the Mosaic integrations.
//!
//! This crate provides Serde-serializable types for:
//! - Uploaded asset and run identifiers
//! - Run status polling (terminal-state detection)
//! - Run outputs and their download URLs
//! - The named-agent catalog
//! - Video filename and content-type helpers

pub mod agent;
pub mod asset;
pub mod media;
pub mod output;
pub mod run;

// Re-export common types
pub use agent::{AgentCatalog, AgentEntry, AgentId};
pub use asset::FileId;
pub use media::{guess_content_type, is_relay_output, is_video_filename, OUTPUT_MARKER};
pub use output::RunOutput;
pub use run::{RunId, RunSnapshot, RunSpec, RunStatus, RunTarget};
