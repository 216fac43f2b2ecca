//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path → defaults.

use crate::config::HbuConfig;
use crate::validate::{validate_config, ValidationError, ValidationResult};
use std::path::{Path, PathBuf};

/// Where the configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Discovered configuration file path.
#[derive(Debug, Clone, Default)]
pub struct ConfigPath {
    /// Path to config.toml (or None if not found).
    pub path: Option<PathBuf>,

    /// Source of the config (for diagnostics).
    pub source: ConfigSource,
}

/// A loaded and validated configuration together with its origin.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: HbuConfig,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "HBU_CONFIG";
pub const ENV_CONFIG_DIR: &str = "HBU_CONFIG_DIR";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.toml";

/// Application name for XDG directories.
const APP_NAME: &str = "hbu";

/// Resolve the configuration file path.
///
/// Resolution order:
/// 1. Explicit CLI path (if it exists)
/// 2. HBU_CONFIG environment variable
/// 3. HBU_CONFIG_DIR environment variable + config.toml
/// 4. XDG config directory (~/.config/hbu/config.toml)
/// 5. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPath {
    // 1. CLI argument
    if let Some(path) = cli_path {
        if path.exists() {
            return ConfigPath {
                path: Some(path.to_path_buf()),
                source: ConfigSource::CliArgument,
            };
        }
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return ConfigPath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return ConfigPath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    // 4. XDG config directory
    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return ConfigPath {
                path: Some(path),
                source: ConfigSource::XdgConfig,
            };
        }
    }

    // 5. Built-in default
    ConfigPath::default()
}

/// Resolve, parse and validate the configuration.
///
/// An explicit CLI path that does not exist is an error rather than a silent
/// fallback to defaults.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<ResolvedConfig> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(ValidationError::IoError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
    }

    let found = resolve_config(cli_path);
    let config = match &found.path {
        Some(path) => HbuConfig::from_file(path)?,
        None => HbuConfig::default(),
    };
    validate_config(&config)?;

    tracing::debug!(
        source = %found.source,
        path = ?found.path,
        provider = %config.analysis.provider,
        "configuration resolved"
    );

    Ok(ResolvedConfig {
        config,
        path: found.path,
        source: found.source,
    })
}

/// Get the XDG config directory for hbu.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
