//! Output sinks.
//!
//! A sink is where a relay delivers the rendered files after a successful
//! run: a local output directory, or back into the watched bucket under a
//! marker-suffixed name.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use mosaic_bucket::BucketClient;
use mosaic_models::OUTPUT_MARKER;

use crate::error::WatchResult;
use crate::source::RemoteFile;

/// One run output already downloaded into the staging directory.
#[derive(Debug, Clone)]
pub struct StagedOutput {
    /// Local path of the downloaded bytes
    pub path: PathBuf,
    /// Short stem derived from the producing node id
    pub node_stem: String,
}

/// Where delivered outputs go.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Human-readable name for logs.
    fn describe(&self) -> String;

    /// Deliver staged outputs for one source file, returning how many landed.
    async fn deliver(&self, source: &RemoteFile, staged: &[StagedOutput]) -> WatchResult<usize>;
}

/// Filenames for a delivery next to the source: the first output takes the
/// bare marker name, later ones get `_2`, `_3` and so on.
pub fn delivery_names(stem: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|idx| {
            if idx == 0 {
                format!("{}{}.mp4", stem, OUTPUT_MARKER)
            } else {
                format!("{}{}_{}.mp4", stem, OUTPUT_MARKER, idx + 1)
            }
        })
        .collect()
}

/// Delivers into `<out_dir>/<source stem>/`, one file per output named by
/// the producing node.
pub struct LocalSink {
    out_dir: PathBuf,
}

impl LocalSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }
}

#[async_trait]
impl OutputSink for LocalSink {
    fn describe(&self) -> String {
        format!("dir {}", self.out_dir.display())
    }

    async fn deliver(&self, source: &RemoteFile, staged: &[StagedOutput]) -> WatchResult<usize> {
        let dest_dir = self.out_dir.join(source.stem());
        tokio::fs::create_dir_all(&dest_dir).await?;

        let mut delivered = 0;
        for output in staged {
            let dest = dest_dir.join(format!("{}.mp4", output.node_stem));
            tokio::fs::copy(&output.path, &dest).await?;
            info!("Delivered {}", dest.display());
            delivered += 1;
        }
        Ok(delivered)
    }
}

/// Uploads outputs back into the watched bucket, next to the source key,
/// with the marker suffix so the relay never re-consumes them.
pub struct BucketSink {
    client: BucketClient,
}

impl BucketSink {
    pub fn new(client: BucketClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OutputSink for BucketSink {
    fn describe(&self) -> String {
        format!("bucket {}", self.client.bucket())
    }

    async fn deliver(&self, source: &RemoteFile, staged: &[StagedOutput]) -> WatchResult<usize> {
        let parent = match source.id.rsplit_once('/') {
            Some((parent, _)) => format!("{}/", parent),
            None => String::new(),
        };
        let names = delivery_names(source.stem(), staged.len());

        let mut delivered = 0;
        for (output, name) in staged.iter().zip(names) {
            let key = format!("{}{}", parent, name);
            let bytes = tokio::fs::read(&output.path).await?;
            self.client.upload_bytes(bytes, &key, "video/mp4").await?;
            info!("Delivered {}", key);
            delivered += 1;
        }
        Ok(delivered)
    }
}
