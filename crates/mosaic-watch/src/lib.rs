//! Folder-watching relay daemons.
//!
//! This crate provides:
//! - Watch sources (local directory, S3-compatible bucket prefix)
//! - Output sinks (local output directory, marker-suffixed bucket keys)
//! - A persisted seen-set so restarts never reprocess a file
//! - The per-file relay pipeline and the fixed-interval watch loop

pub mod config;
pub mod error;
pub mod relay;
pub mod seen;
pub mod sink;
pub mod source;
pub mod watcher;

pub use config::WatchConfig;
pub use error::{WatchError, WatchResult};
pub use relay::{Relay, RelayOutcome};
pub use seen::SeenStore;
pub use sink::{delivery_names, BucketSink, LocalSink, OutputSink, StagedOutput};
pub use source::{BucketSource, LocalSource, RemoteFile, WatchSource};
pub use watcher::Watcher;
