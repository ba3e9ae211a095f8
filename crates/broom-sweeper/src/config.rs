//! Run-time configuration for the orchestrator and worker
//!
//! Job policy comes from config sections; these knobs govern how a run
//! behaves as a whole.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a run over all jobs
///
/// # Examples
///
/// ```
/// use broom_sweeper::SweeperConfig;
///
/// let config = SweeperConfig::default();
/// assert!(!config.dry_run);
/// assert!(!config.strict);
///
/// let config = SweeperConfig::dry_run();
/// assert!(config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweeperConfig {
    /// Dry-run mode: report what would be disposed of without touching anything
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Fail the run when no section yields a runnable job
    /// Default: false
    #[serde(default)]
    pub strict: bool,

    /// How often the periodic worker re-runs all jobs (in minutes)
    /// Default: every 60 minutes
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

fn default_interval_minutes() -> u64 {
    60
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            strict: false,
            interval_minutes: default_interval_minutes(),
        }
    }
}

impl SweeperConfig {
    /// Default configuration with dry-run enabled
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Get the worker interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SweeperConfig::default();
        assert!(!config.dry_run);
        assert!(!config.strict);
        assert_eq!(config.interval_minutes, 60);
        assert_eq!(config.interval(), Duration::from_secs(3600));
    }

    #[test]
    fn test_serde_defaults() {
        let config: SweeperConfig = serde_json::from_str(r#"{"dry_run": true}"#).unwrap();
        assert!(config.dry_run);
        assert!(!config.strict);
        assert_eq!(config.interval_minutes, 60);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = SweeperConfig {
            dry_run: true,
            strict: true,
            interval_minutes: 5,
        };
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: SweeperConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
