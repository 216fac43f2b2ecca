//! HBU configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for `config.toml`
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod config;
pub mod resolve;
pub mod validate;

pub use config::{AnalysisSettings, ExportSettings, HbuConfig, Provider, ServerSettings};
pub use resolve::{load_config, resolve_config, ConfigPath, ConfigSource, ResolvedConfig};
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
