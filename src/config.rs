//! Settings loading.
//!
//! Layered configuration: built-in defaults, then an optional TOML
//! file, then `SYSDOCK_`-prefixed environment variables. CLI flags
//! override the result in `main`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::AlertThresholds;
use crate::poll::PollingIntervals;

/// Resolved settings for one run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Full-snapshot poll cadence in milliseconds.
    pub snapshot_interval_ms: u64,
    /// Network-interface poll cadence in milliseconds.
    pub network_interval_ms: u64,
    /// CPU usage percentage above which the CPU alert fires.
    pub cpu_threshold: f64,
    /// Memory percentage above which the memory alert fires.
    pub memory_threshold: f64,
    /// Per-disk percentage above which the disk alert fires.
    pub disk_threshold: f64,
    /// Where the view-state file lives.
    pub state_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_interval_ms: 2000,
            network_interval_ms: 5000,
            cpu_threshold: 90.0,
            memory_threshold: 90.0,
            disk_threshold: 95.0,
            state_file: PathBuf::from("sysdock_state.json"),
        }
    }
}

impl Settings {
    /// Load settings, layering an optional config file and the
    /// environment over the defaults.
    ///
    /// With no explicit path, a `sysdock.toml` next to the working
    /// directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        builder = match path {
            Some(p) => builder.add_source(File::from(p)),
            None => builder.add_source(File::with_name("sysdock").required(false)),
        };
        builder = builder.add_source(Environment::with_prefix("SYSDOCK"));

        builder
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")
    }

    pub fn intervals(&self) -> PollingIntervals {
        PollingIntervals {
            snapshot: Duration::from_millis(self.snapshot_interval_ms),
            network: Duration::from_millis(self.network_interval_ms),
        }
    }

    pub fn thresholds(&self) -> AlertThresholds {
        AlertThresholds {
            cpu: self.cpu_threshold,
            memory: self.memory_threshold,
            disk: self.disk_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.intervals().snapshot, Duration::from_secs(2));
        assert_eq!(settings.intervals().network, Duration::from_secs(5));
        assert_eq!(settings.thresholds().cpu, 90.0);
        assert_eq!(settings.thresholds().disk, 95.0);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "snapshot_interval_ms = 1000").unwrap();
        writeln!(file, "cpu_threshold = 80.0").unwrap();
        file.flush().unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.snapshot_interval_ms, 1000);
        assert_eq!(settings.cpu_threshold, 80.0);
        // Untouched keys keep their defaults.
        assert_eq!(settings.network_interval_ms, 5000);
    }

    #[test]
    fn test_missing_default_file_is_fine() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.memory_threshold, 90.0);
    }
}
