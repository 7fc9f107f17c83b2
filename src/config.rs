//! TOML configuration for policy, style and page decoration
//!
//! Every section and field is optional; missing values take the built-in
//! defaults. Example:
//!
//! ```toml
//! [policy]
//! mode = "sparse"
//! sparse_share = 0.02
//!
//! [style]
//! max_penwidth = 8.0
//!
//! [graph]
//! caption = "my git habits"
//! ```

use crate::dot_output::GraphDecoration;
use crate::encoder::EncoderStyle;
use crate::transition::SignificancePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors for configuration loading and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Complete cmdflow configuration
///
/// # Example
/// ```
/// use cmdflow::config::Config;
///
/// let config = Config::from_toml_str("[policy]\ndense_high_floor = 3\n").unwrap();
/// assert_eq!(config.policy.dense_high_floor, 3);
/// assert_eq!(config.policy.dense_volume_cutoff, 1000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub policy: SignificancePolicy,
    pub style: EncoderStyle,
    pub graph: GraphDecoration,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.policy
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("policy: {}", e)))?;
        self.style
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("style: {}", e)))?;
        Ok(())
    }
}
