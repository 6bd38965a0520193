//! Engine configuration and athlete baseline.
//!
//! Configuration is loaded from TOML. The engine itself never reads it: callers
//! load it once and pass the values down, so every computation stays a pure
//! function of its arguments.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::units::{Pace, Units};
use crate::workouts::targets::ToleranceConfig;

/// Athlete reference numbers used to resolve relative targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AthleteBaseline {
    /// Functional Threshold Power in watts
    #[serde(default)]
    pub ftp_watts: Option<f64>,
    /// Threshold running pace
    #[serde(default)]
    pub threshold_pace: Option<Pace>,
}

impl AthleteBaseline {
    /// FTP if it is a usable positive number.
    pub fn valid_ftp(&self) -> Option<f64> {
        self.ftp_watts.filter(|f| f.is_finite() && *f > 0.0)
    }

    /// Threshold pace if it is a usable positive number.
    pub fn valid_threshold_pace(&self) -> Option<Pace> {
        self.threshold_pace.filter(|p| p.is_valid())
    }

    /// Validate FTP value (30-800 watts).
    pub fn validate_ftp(ftp: f64) -> bool {
        (30.0..=800.0).contains(&ftp)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Configuration version
    pub version: String,
    /// Unit preference for rendering
    #[serde(default)]
    pub units: Units,
    /// Target tolerance policy
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    /// Athlete reference numbers
    #[serde(default)]
    pub athlete: AthleteBaseline,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            units: Units::Metric,
            tolerance: ToleranceConfig::default(),
            athlete: AthleteBaseline::default(),
        }
    }
}

impl EngineConfig {
    /// Check tolerance bounds and athlete numbers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ToleranceConfig { quality, easy } = self.tolerance;
        for (name, value) in [("quality", quality), ("easy", easy)] {
            if !(0.0..0.5).contains(&value) {
                return Err(ConfigError::InvalidValue(format!(
                    "tolerance.{} must be in [0, 0.5), got {}",
                    name, value
                )));
            }
        }
        if easy < quality {
            return Err(ConfigError::InvalidValue(format!(
                "tolerance.easy ({}) must not be below tolerance.quality ({})",
                easy, quality
            )));
        }
        if let Some(ftp) = self.athlete.ftp_watts {
            if !AthleteBaseline::validate_ftp(ftp) {
                return Err(ConfigError::InvalidValue(format!(
                    "athlete.ftp_watts must be between 30 and 800, got {}",
                    ftp
                )));
            }
        }
        Ok(())
    }
}

/// Get the application configuration directory.
pub fn get_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "trainspec", "TrainSpec")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Load configuration from the default location, or defaults if there is none.
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from a file, or defaults if the file does not exist.
pub fn load_config_from(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: EngineConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Save configuration to a file.
pub fn save_config_to(config: &EngineConfig, path: &Path) -> Result<(), ConfigError> {
    config.validate()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
