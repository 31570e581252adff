//! The watch loop.

use tracing::{debug, error, info, warn};

use mosaic_models::{is_relay_output, is_video_filename};

use crate::config::WatchConfig;
use crate::error::WatchResult;
use crate::relay::{Relay, RelayOutcome};
use crate::seen::SeenStore;
use crate::sink::OutputSink;
use crate::source::{RemoteFile, WatchSource};

/// Scans a source on a fixed interval and relays every new video.
pub struct Watcher {
    source: Box<dyn WatchSource>,
    sink: Box<dyn OutputSink>,
    relay: Relay,
    seen: SeenStore,
    config: WatchConfig,
}

impl Watcher {
    pub fn new(
        source: Box<dyn WatchSource>,
        sink: Box<dyn OutputSink>,
        relay: Relay,
        seen: SeenStore,
        config: WatchConfig,
    ) -> Self {
        Self {
            source,
            sink,
            relay,
            seen,
            config,
        }
    }

    /// The seen-set, mostly for inspection in tests.
    pub fn seen(&self) -> &SeenStore {
        &self.seen
    }

    /// Run the watch loop until ctrl-c, or once when configured so.
    pub async fn run(&mut self) -> WatchResult<()> {
        info!(
            "Watching {} every {:?}, delivering to {}",
            self.source.describe(),
            self.config.scan_interval,
            self.sink.describe()
        );

        self.preload_existing().await?;

        loop {
            match self.scan_once().await {
                Ok(0) => debug!("No new videos"),
                Ok(n) => info!("Processed {} file(s)", n),
                Err(e) => error!("Scan failed: {}", e),
            }

            if self.config.once {
                break;
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(self.config.scan_interval) => {}
            }
        }

        Ok(())
    }

    /// On a fresh seen-set, record whatever is already in the folder so the
    /// relay only ever touches files that arrive from now on.
    async fn preload_existing(&mut self) -> WatchResult<()> {
        if self.config.process_existing || !self.seen.is_empty() {
            return Ok(());
        }

        let existing = self.list_candidates().await?;
        if !existing.is_empty() {
            info!(
                "Ignoring {} existing video(s) already in the folder",
                existing.len()
            );
            self.seen
                .mark_all(existing.into_iter().map(|f| f.id))
                .await?;
        }
        Ok(())
    }

    async fn list_candidates(&self) -> WatchResult<Vec<RemoteFile>> {
        let files = self.source.list().await?;
        Ok(files
            .into_iter()
            .filter(|f| is_video_filename(&f.name) && !is_relay_output(&f.name))
            .collect())
    }

    /// One pass: list, filter to unseen videos, relay each, mark seen.
    ///
    /// A file is marked seen whatever the outcome; nothing retries across
    /// scans. A crash between upload and mark can duplicate one run.
    pub async fn scan_once(&mut self) -> WatchResult<usize> {
        let candidates = self.list_candidates().await?;
        let fresh: Vec<RemoteFile> = candidates
            .into_iter()
            .filter(|f| !self.seen.contains(&f.id))
            .collect();

        let mut processed = 0;
        for file in fresh {
            info!("New video: {} ({} bytes)", file.name, file.size);

            match self
                .relay
                .process(self.source.as_ref(), self.sink.as_ref(), &file)
                .await
            {
                Ok(RelayOutcome::Delivered { run_id, outputs }) => {
                    info!(
                        "Done: {} -> run {} ({} output(s))",
                        file.name, run_id, outputs
                    );
                }
                Ok(RelayOutcome::RunFailed { run_id, message }) => {
                    warn!(
                        "Run {} failed for {}: {}",
                        run_id,
                        file.name,
                        message.unwrap_or_else(|| "no status message".to_string())
                    );
                }
                Ok(RelayOutcome::TimedOut { run_id }) => {
                    warn!("Run {} timed out for {}", run_id, file.name);
                }
                Err(e) => {
                    error!("Failed to relay {}: {}", file.name, e);
                }
            }

            self.seen.mark(file.id).await?;
            processed += 1;
        }

        Ok(processed)
    }
}
