//! Configuration module for PetSpace.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::{PetspaceError, Result};

/// Chat configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Rooms created when the directory is built from configuration.
    #[serde(default = "default_rooms")]
    pub default_rooms: Vec<String>,
    /// Notify subscribers when users join or leave a room.
    #[serde(default = "default_announce_membership")]
    pub announce_membership: bool,
}

fn default_rooms() -> Vec<String> {
    vec!["CtrlCat".to_string(), "Dogorithm".to_string()]
}

fn default_announce_membership() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_rooms: default_rooms(),
            announce_membership: default_announce_membership(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/petspace.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Chat configuration.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PetspaceError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PetspaceError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PETSPACE_LOG_LEVEL`: Override the log level
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("PETSPACE_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if a default room name is blank or listed twice.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in &self.chat.default_rooms {
            if name.trim().is_empty() {
                return Err(PetspaceError::Validation(
                    "default_rooms contains an empty room name".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(PetspaceError::Validation(format!(
                    "default_rooms lists \"{name}\" more than once"
                )));
            }
        }
        Ok(())
    }
}
