//! Core configuration.
//!
//! # Responsibility
//! - Carry logging, storage and editor settings handed in by the host app.
//! - Parse them from JSON and reject values the core cannot honour.
//!
//! # Invariants
//! - Every field has a default; an empty JSON object is a valid config.
//! - The core never reads environment variables or CLI flags itself.

use crate::editor::structural::EditorSettings;
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Error raised while loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Settings for one core instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<String>,
    /// JSON notes document location.
    pub notes_path: Option<PathBuf>,
    pub editor: EditorSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            notes_path: None,
            editor: EditorSettings::default(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the JSON config at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.indent_width == 0 {
            return Err(ConfigError::Invalid(
                "editor.indent_width must be at least 1".to_string(),
            ));
        }
        if self.editor.max_heading_level == Some(0) {
            return Err(ConfigError::Invalid(
                "editor.max_heading_level must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}
