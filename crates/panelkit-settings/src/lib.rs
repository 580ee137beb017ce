//! PanelKit Settings Crate
//!
//! Handles configuration files: numeric tolerances for sequencing, logging
//! and output preferences.

pub mod config;
pub mod error;

pub use config::{default_config_path, Config, LoggingSettings, OutputSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
