//! Run polling.
//!
//! Status-only polling against the simple run endpoint until the run
//! reaches a terminal state or the deadline passes.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use mosaic_models::{RunId, RunSnapshot};

use crate::client::MosaicClient;
use crate::error::{MosaicError, MosaicResult};

/// How often to poll and how long to keep at it.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between polls
    pub interval: Duration,
    /// Give up after this long
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            deadline: Duration::from_secs(30 * 60),
        }
    }
}

impl PollConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            interval: Duration::from_secs(
                std::env::var("MOSAIC_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            deadline: Duration::from_secs(
                std::env::var("MOSAIC_POLL_DEADLINE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30 * 60),
            ),
        }
    }

    /// Override the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Override the deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Poll a run until it reaches a terminal state.
///
/// Logs on every status change and on every fifth poll so long runs stay
/// visible without flooding. Returns the terminal snapshot, failed runs
/// included; callers decide what failure means for them.
pub async fn wait_for_run(
    client: &MosaicClient,
    run_id: &RunId,
    config: &PollConfig,
) -> MosaicResult<RunSnapshot> {
    let started = Instant::now();
    let mut last_status = None;
    let mut polls: u64 = 0;

    loop {
        if started.elapsed() > config.deadline {
            return Err(MosaicError::PollDeadline(config.deadline.as_secs()));
        }

        let snapshot = client.get_run(run_id).await?;
        polls += 1;

        let changed = last_status != Some(snapshot.status);
        if changed || polls % 5 == 0 {
            info!(
                "Run {} after {} polls: {}",
                run_id,
                polls,
                snapshot.summary()
            );
        } else {
            debug!("Run {}: {}", run_id, snapshot.summary());
        }
        last_status = Some(snapshot.status);

        if snapshot.is_terminal() {
            return Ok(snapshot);
        }

        tokio::time::sleep(config.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_config_defaults() {
        let config = PollConfig::default();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.deadline, Duration::from_secs(1800));
    }

    #[test]
    fn test_poll_config_builders() {
        let config = PollConfig::default()
            .with_interval(Duration::from_millis(10))
            .with_deadline(Duration::from_secs(1));
        assert_eq!(config.interval, Duration::from_millis(10));
        assert_eq!(config.deadline, Duration::from_secs(1));
    }
}
