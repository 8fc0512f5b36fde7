//! # Application Configuration
//!
//! Loaded from a YAML file, looked up in this order:
//!
//! 1. the path in `BABY_TRACKER_CONFIG`
//! 2. `config.yaml` in the default data directory
//! 3. built-in defaults
//!
//! ```yaml
//! data_directory: "/home/me/Documents/Baby Tracker"
//! bind_address: "127.0.0.1:3000"
//! cors_origin: "http://localhost:8080"
//! log_level: "info"
//! seed_default_milestones: true
//! analysis:
//!   daily_limit: 10
//!   monthly_limit: 100
//!   min_latency_ms: 2000
//!   max_latency_ms: 5000
//!   failure_rate: 0.1
//! ```
//!
//! Missing fields take their default.

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{AnalysisLimits, SimulatedAnalysisProvider};
use crate::storage::JsonFileStore;

pub const CONFIG_ENV_VAR: &str = "BABY_TRACKER_CONFIG";
pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the JSON files live; `~/Documents/Baby Tracker` when unset
    pub data_directory: Option<PathBuf>,
    pub bind_address: String,
    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
    /// Default filter when `RUST_LOG` is not set
    pub log_level: String,
    /// Add the default milestone checklist when no milestones are stored
    pub seed_default_milestones: bool,
    pub analysis: AnalysisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            bind_address: "127.0.0.1:3000".to_string(),
            cors_origin: "http://localhost:8080".to_string(),
            log_level: "info".to_string(),
            seed_default_milestones: true,
            analysis: AnalysisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub daily_limit: u32,
    pub monthly_limit: u32,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    /// Probability in `[0, 1]` that a simulated analysis fails
    pub failure_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            daily_limit: 10,
            monthly_limit: 100,
            min_latency_ms: 2000,
            max_latency_ms: 5000,
            failure_rate: 0.1,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.failure_rate.is_finite() || !(0.0..=1.0).contains(&self.failure_rate) {
            bail!(
                "analysis.failure_rate must be a number between 0 and 1, got {}",
                self.failure_rate
            );
        }
        if self.min_latency_ms > self.max_latency_ms {
            bail!(
                "analysis.min_latency_ms ({}) exceeds analysis.max_latency_ms ({})",
                self.min_latency_ms,
                self.max_latency_ms
            );
        }
        Ok(())
    }

    pub fn limits(&self) -> AnalysisLimits {
        AnalysisLimits {
            daily_limit: self.daily_limit,
            monthly_limit: self.monthly_limit,
        }
    }

    pub fn simulated_provider(&self) -> SimulatedAnalysisProvider {
        SimulatedAnalysisProvider::new(
            Duration::from_millis(self.min_latency_ms),
            Duration::from_millis(self.max_latency_ms),
            self.failure_rate,
        )
    }
}

impl AppConfig {
    /// Load from the environment-selected file, the default location, or defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_from(&path);
        }

        let default_path = JsonFileStore::default_directory()?.join(CONFIG_FILE_NAME);
        if default_path.exists() {
            return Self::load_from(&default_path);
        }

        Ok(Self::default())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .analysis
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn data_directory(&self) -> Result<PathBuf> {
        match &self.data_directory {
            Some(dir) => Ok(dir.clone()),
            None => JsonFileStore::default_directory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "bind_address: \"0.0.0.0:4000\"\nanalysis:\n  daily_limit: 3\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:4000");
        assert_eq!(config.cors_origin, "http://localhost:8080");
        assert_eq!(config.analysis.daily_limit, 3);
        assert_eq!(config.analysis.monthly_limit, 100);
        assert_eq!(config.analysis.limits().daily_limit, 3);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "analysis: [not, a, map]").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
        assert!(AppConfig::load_from(temp_dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_out_of_range_failure_rate_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");

        for rate in [".nan", ".inf", "1.5", "-0.1"] {
            std::fs::write(&path, format!("analysis:\n  failure_rate: {}\n", rate)).unwrap();
            assert!(AppConfig::load_from(&path).is_err(), "failure_rate {} accepted", rate);
        }

        std::fs::write(&path, "analysis:\n  failure_rate: 0.25\n").unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap().analysis.failure_rate, 0.25);
    }

    #[test]
    fn test_inverted_latency_range_is_rejected() {
        let config = AnalysisConfig {
            min_latency_ms: 500,
            max_latency_ms: 100,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_explicit_data_directory() {
        let config = AppConfig {
            data_directory: Some(PathBuf::from("/tmp/baby")),
            ..AppConfig::default()
        };
        assert_eq!(config.data_directory().unwrap(), PathBuf::from("/tmp/baby"));
    }
}
