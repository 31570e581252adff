//! Persisted seen-set.
//!
//! A JSON file mapping processed file ids to when they were recorded. Loaded
//! at startup and flushed after every mark, so a restarted relay picks up
//! where it left off instead of re-running the whole folder.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::WatchResult;

/// On-disk set of already-processed file ids.
#[derive(Debug)]
pub struct SeenStore {
    path: PathBuf,
    entries: HashMap<String, DateTime<Utc>>,
}

impl SeenStore {
    /// Load the store from disk, starting empty when the file is missing.
    pub async fn load(path: impl Into<PathBuf>) -> WatchResult<Self> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(
            "Loaded seen-set from {} ({} entries)",
            path.display(),
            entries.len()
        );
        Ok(Self { path, entries })
    }

    /// Check whether a file id has already been processed.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Record one id and flush to disk.
    pub async fn mark(&mut self, id: impl Into<String>) -> WatchResult<()> {
        self.entries.insert(id.into(), Utc::now());
        self.flush().await
    }

    /// Record many ids and flush once.
    pub async fn mark_all<I, S>(&mut self, ids: I) -> WatchResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        let mut added = 0;
        for id in ids {
            self.entries.insert(id.into(), now);
            added += 1;
        }
        if added > 0 {
            self.flush().await?;
        }
        Ok(added)
    }

    /// Number of recorded ids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the whole set out, via a temp file so a crash mid-write
    /// cannot leave a truncated store behind.
    async fn flush(&self) -> WatchResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let raw = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeenStore::load(dir.path().join("seen.json")).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mark_persists_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let mut store = SeenStore::load(&path).await.unwrap();
        store.mark("bucket/a.mp4").await.unwrap();
        store.mark("bucket/b.mp4").await.unwrap();
        assert_eq!(store.len(), 2);

        let reloaded = SeenStore::load(&path).await.unwrap();
        assert!(reloaded.contains("bucket/a.mp4"));
        assert!(reloaded.contains("bucket/b.mp4"));
        assert!(!reloaded.contains("bucket/c.mp4"));
    }

    #[tokio::test]
    async fn test_mark_all_flushes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("seen.json");

        let mut store = SeenStore::load(&path).await.unwrap();
        let added = store
            .mark_all(vec!["x.mp4".to_string(), "y.mp4".to_string()])
            .await
            .unwrap();
        assert_eq!(added, 2);

        let reloaded = SeenStore::load(&path).await.unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[tokio::test]
    async fn test_remark_updates_without_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let mut store = SeenStore::load(&path).await.unwrap();
        store.mark("a").await.unwrap();
        store.mark("a").await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
