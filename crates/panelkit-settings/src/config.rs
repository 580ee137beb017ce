//! Configuration and settings management for PanelKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats, by file extension.
//!
//! Configuration is organized into logical sections:
//! - Tolerances (point equality, parallel detection, minimum segment length)
//! - Logging (level filter, JSON output)
//! - Output (pretty-printed operation lists)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use panelkit_core::Tolerances;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Logging preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter, a level or `RUST_LOG`-style directives, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Output preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Indent the emitted operation list
    pub pretty: bool,
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sequencing tolerances
    pub tolerances: Tolerances,
    /// Logging preferences
    pub logging: LoggingSettings,
    /// Output preferences
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` when given, else the default config file when it exists,
    /// else the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match default_config_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tolerances = [
            ("tolerances.point_tolerance", self.tolerances.point_tolerance),
            ("tolerances.parallel_tolerance", self.tolerances.parallel_tolerance),
            ("tolerances.length_tolerance", self.tolerances.length_tolerance),
        ];
        for (key, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValueOutOfRange {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }

        // Every pair of directions would count as parallel.
        if self.tolerances.parallel_tolerance >= 1.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "tolerances.parallel_tolerance".to_string(),
                value: self.tolerances.parallel_tolerance.to_string(),
            });
        }

        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            return Err(ConfigError::InvalidLogFilter(self.logging.level.clone()));
        }

        Ok(())
    }

    /// Merge another config into this one (sections left at their defaults
    /// in `other` keep their current values)
    pub fn merge(&mut self, other: &Config) {
        if other.tolerances != Tolerances::default() {
            self.tolerances = other.tolerances;
        }
        if other.logging != LoggingSettings::default() {
            self.logging = other.logging.clone();
        }
        if other.output != OutputSettings::default() {
            self.output = other.output.clone();
        }
    }
}

/// `<config dir>/panelkit/config.toml` for the current platform.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("panelkit").join("config.toml"))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("platform has no configuration directory".to_string())
        })
}
