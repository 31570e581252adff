//! Watch sources.
//!
//! A source is the folder being watched: something that can list its files
//! and fetch one into a local staging directory for upload.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use mosaic_bucket::BucketClient;

use crate::error::{WatchError, WatchResult};

/// One file visible in the watched folder.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    /// Stable identifier: the path or object key. This is what the
    /// seen-set records.
    pub id: String,
    /// Bare filename, extension included
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl RemoteFile {
    /// Filename without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }
}

/// A folder the relay watches.
#[async_trait]
pub trait WatchSource: Send + Sync {
    /// Human-readable name for logs.
    fn describe(&self) -> String;

    /// List every file currently in the folder, non-recursively.
    async fn list(&self) -> WatchResult<Vec<RemoteFile>>;

    /// Fetch one file into the staging directory, returning the local path.
    async fn fetch(&self, file: &RemoteFile, staging: &Path) -> WatchResult<PathBuf>;
}

/// A local directory.
pub struct LocalSource {
    dir: PathBuf,
}

impl LocalSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl WatchSource for LocalSource {
    fn describe(&self) -> String {
        format!("dir {}", self.dir.display())
    }

    async fn list(&self) -> WatchResult<Vec<RemoteFile>> {
        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!("Skipping non-UTF-8 filename: {:?}", raw);
                    continue;
                }
            };
            files.push(RemoteFile {
                id: entry.path().to_string_lossy().into_owned(),
                name,
                size: metadata.len(),
            });
        }

        Ok(files)
    }

    async fn fetch(&self, file: &RemoteFile, staging: &Path) -> WatchResult<PathBuf> {
        let dest = staging.join(&file.name);
        tokio::fs::copy(self.dir.join(&file.name), &dest).await?;
        debug!("Staged {} at {}", file.name, dest.display());
        Ok(dest)
    }
}

/// An S3-compatible bucket under a key prefix.
pub struct BucketSource {
    client: BucketClient,
    prefix: String,
}

impl BucketSource {
    pub fn new(client: BucketClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }
}

#[async_trait]
impl WatchSource for BucketSource {
    fn describe(&self) -> String {
        format!("bucket {}/{}", self.client.bucket(), self.prefix)
    }

    async fn list(&self) -> WatchResult<Vec<RemoteFile>> {
        let objects = self.client.list_objects(&self.prefix).await?;
        let files = objects
            .into_iter()
            .filter(|obj| !obj.key.ends_with('/'))
            .map(|obj| {
                let name = obj
                    .key
                    .rsplit('/')
                    .next()
                    .unwrap_or(obj.key.as_str())
                    .to_string();
                RemoteFile {
                    id: obj.key,
                    name,
                    size: obj.size,
                }
            })
            .collect();
        Ok(files)
    }

    async fn fetch(&self, file: &RemoteFile, staging: &Path) -> WatchResult<PathBuf> {
        let bytes = self.client.download_bytes(&file.id).await?;
        if bytes.len() as u64 != file.size {
            warn!(
                "Size changed for {} between list and fetch ({} -> {})",
                file.id,
                file.size,
                bytes.len()
            );
        }
        let dest = staging.join(&file.name);
        tokio::fs::write(&dest, bytes).await?;
        debug!("Staged {} at {}", file.id, dest.display());
        Ok(dest)
    }
}

/// Reject sources that cannot exist before the loop starts.
pub async fn validate_local_dir(dir: &Path) -> WatchResult<()> {
    let metadata = tokio::fs::metadata(dir)
        .await
        .map_err(|_| WatchError::config_error(format!("watch dir not found: {}", dir.display())))?;
    if !metadata.is_dir() {
        return Err(WatchError::config_error(format!(
            "watch path is not a directory: {}",
            dir.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_source_lists_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp4"), vec![0u8; 64]).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let source = LocalSource::new(dir.path());
        let mut files = source.list().await.unwrap();
        files.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "a.mp4");
        assert_eq!(files[0].size, 64);
        assert_eq!(files[1].name, "notes.txt");
    }

    #[tokio::test]
    async fn test_local_source_fetch_copies_into_staging() {
        let dir = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"content").unwrap();

        let source = LocalSource::new(dir.path());
        let files = source.list().await.unwrap();
        let staged = source.fetch(&files[0], staging.path()).await.unwrap();

        assert_eq!(std::fs::read(&staged).unwrap(), b"content");
    }

    #[tokio::test]
    async fn test_validate_local_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_local_dir(dir.path()).await.is_ok());
        assert!(validate_local_dir(&dir.path().join("missing")).await.is_err());
    }

    #[test]
    fn test_remote_file_stem() {
        let file = RemoteFile {
            id: "videos/long take.mp4".to_string(),
            name: "long take.mp4".to_string(),
            size: 1,
        };
        assert_eq!(file.stem(), "long take");
    }
}
