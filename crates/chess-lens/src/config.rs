//! Configuration file loading for chess-lens.
//!
//! Settings live in `chess-lens.toml`; every key is optional.
//!
//! ```toml
//! [engine]
//! engine_path = "/usr/local/bin/stockfish"
//! think_time_ms = 3000
//! ```

use chess_analysis::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Main configuration structure.
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct LensConfig {
    /// Engine process and search settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl LensConfig {
    /// Loads the configuration from the default location.
    ///
    /// Returns the default configuration when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads the configuration from `path`, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns `chess-lens.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("chess-lens.toml")
    }
}
