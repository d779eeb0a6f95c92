//! Engine tunables.
//!
//! Every field has a default, so an empty TOML document is a valid config.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_PREDECESSOR_DELIMITER: char = ',';
pub const DEFAULT_TARGET_RATIO: f64 = 0.7;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Separator between ids in an activity's predecessor field.
    #[serde(default = "default_delimiter")]
    pub predecessor_delimiter: char,
    /// Crash target as a fraction of the uncrashed duration when the caller
    /// gives none.
    #[serde(default = "default_target_ratio")]
    pub default_target_ratio: f64,
}

fn default_delimiter() -> char {
    DEFAULT_PREDECESSOR_DELIMITER
}

fn default_target_ratio() -> f64 {
    DEFAULT_TARGET_RATIO
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            predecessor_delimiter: default_delimiter(),
            default_target_ratio: default_target_ratio(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.predecessor_delimiter.is_whitespace() {
            return Err(ConfigError::Invalid(
                "predecessorDelimiter must not be whitespace".into(),
            ));
        }
        let ratio = self.default_target_ratio;
        if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "defaultTargetRatio must be in (0, 1], got {ratio}"
            )));
        }
        Ok(())
    }
}
