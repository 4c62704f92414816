//! Engine Configuration
//!
//! # Configuration Priority
//!
//! Values are layered with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! The default file lives at `$XDG_CONFIG_HOME/a2ui/engine.toml`
//! (typically `~/.config/a2ui/engine.toml`).
//!
//! # Example Configuration
//!
//! ```toml
//! attach_data_model = true
//!
//! [local_actions.swap-route]
//! kind = "swap"
//! first = "/flight/departure"
//! second = "/flight/arrival"
//!
//! [local_actions.swap-dates]
//! kind = "swap"
//! first = "/flight/departureDate"
//! second = "/flight/returnDate"
//! ```
//!
//! Local actions from the file are layered over the built-in table, so the
//! file only needs to list additions or replacements.
//!
//! # Environment Variables
//!
//! - `A2UI_CONFIG`: path of the TOML file to load
//! - `A2UI_ATTACH_DATA_MODEL`: `0`/`false` to stop attaching the data model
//!   to forwarded actions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::ActionTable;

/// Environment variable naming the config file
pub const ENV_CONFIG_PATH: &str = "A2UI_CONFIG";
/// Environment variable toggling data-model attachment
pub const ENV_ATTACH_DATA_MODEL: &str = "A2UI_ATTACH_DATA_MODEL";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Structure
// =============================================================================

/// On-disk configuration; every field optional
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineToml {
    /// Attach the data model to forwarded actions
    pub attach_data_model: Option<bool>,

    /// Additional or replacement local actions
    pub local_actions: Option<ActionTable>,
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Resolved engine configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Attach the surface's data model to forwarded actions without payload
    pub attach_data_model: bool,

    /// Actions resolved without a round trip
    pub local_actions: ActionTable,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    source: ConfigSource,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attach_data_model: true,
            local_actions: ActionTable::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with environment overrides applied
    ///
    /// Does not read a config file; see [`load_config`] for that.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        apply_env_config(&mut config, |key| std::env::var(key).ok());
        config
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("a2ui").join("engine.toml"))
}

/// Load configuration from all sources with proper priority
///
/// The file is `$A2UI_CONFIG` if set, otherwise [`default_config_path`].
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<EngineConfig, ConfigError> {
    let path = std::env::var(ENV_CONFIG_PATH)
        .ok()
        .map(PathBuf::from)
        .or_else(default_config_path);
    load_config_from_path(path)
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<EngineConfig, ConfigError> {
    load_with_env(path.as_deref(), |key| std::env::var(key).ok())
}

fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<EngineConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = EngineConfig::default();

    if let Some(config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.to_path_buf(),
                    source: e,
                })?;

            let toml_config: EngineToml = toml::from_str(&toml_content)?;
            validate(&toml_config)?;
            apply_toml_config(&mut config, toml_config);
            config.config_file_path = Some(config_path.to_path_buf());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                local_actions = config.local_actions.len(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);

    Ok(config)
}

fn validate(toml: &EngineToml) -> Result<(), ConfigError> {
    let Some(actions) = &toml.local_actions else {
        return Ok(());
    };
    for name in actions.names() {
        if name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "local action names must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn apply_toml_config(config: &mut EngineConfig, toml: EngineToml) {
    if let Some(attach) = toml.attach_data_model {
        config.attach_data_model = attach;
    }
    if let Some(actions) = toml.local_actions {
        config.local_actions.merge(actions);
    }
}

fn apply_env_config<F>(config: &mut EngineConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(attach) = env(ENV_ATTACH_DATA_MODEL) {
        config.attach_data_model = attach != "0" && attach.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Attach data model override
    pub attach_data_model: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set attach data model override
    #[must_use]
    pub fn with_attach_data_model(mut self, attach: bool) -> Self {
        self.attach_data_model = Some(attach);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(attach) = self.attach_data_model {
            config.attach_data_model = attach;
            config.source = ConfigSource::Cli;
        }
    }
}
