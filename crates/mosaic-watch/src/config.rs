//! Watch relay configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Settings for the watch loop itself. Client and poll settings live in
/// their own configs.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Delay between folder scans
    pub scan_interval: Duration,
    /// Run one scan and exit
    pub once: bool,
    /// Process files already present at first start instead of
    /// recording them as seen
    pub process_existing: bool,
    /// Where the seen-set lives
    pub seen_path: PathBuf,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(60),
            once: false,
            process_existing: false,
            seen_path: PathBuf::from(".mosaic-seen.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = WatchConfig::default();
        assert_eq!(config.scan_interval, Duration::from_secs(60));
        assert!(!config.once);
        assert!(!config.process_existing);
    }
}
