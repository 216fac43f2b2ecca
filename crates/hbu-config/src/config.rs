//! Configuration file types.
//!
//! These types match the `config.toml` layout:
//!
//! ```toml
//! [analysis]
//! provider = "openai"
//! model = "gpt-4o"
//!
//! [server]
//! bind = "127.0.0.1:5000"
//!
//! [export]
//! output_dir = "reports"
//! ```
//!
//! Every section and every key is optional; missing values fall back to the
//! built-in defaults.

use crate::validate::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HbuConfig {
    pub analysis: AnalysisSettings,
    pub server: ServerSettings,
    pub export: ExportSettings,
}

/// Which analyzer produces studies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Deterministic offline analysis.
    #[default]
    Static,
    /// OpenAI-compatible chat completions.
    Openai,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Static => write!(f, "static"),
            Provider::Openai => write!(f, "openai"),
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "static" | "offline" => Ok(Provider::Static),
            "openai" => Ok(Provider::Openai),
            _ => Err(format!("unknown analysis provider: {s}")),
        }
    }
}

/// `[analysis]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub provider: Provider,
    pub model: String,
    pub api_base: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            provider: Provider::Static,
            model: "gpt-4o".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 4096,
            timeout_secs: 120,
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory receiving exported PDFs. Current directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub title: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            title: "Highest & Best Use Study".to_string(),
        }
    }
}

impl HbuConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> ValidationResult<Self> {
        toml::from_str(content)
            .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> ValidationResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Cannot serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = HbuConfig::parse_toml("").unwrap();
        assert_eq!(config, HbuConfig::default());
        assert_eq!(config.analysis.model, "gpt-4o");
        assert_eq!(config.analysis.max_tokens, 4096);
        assert_eq!(config.export.title, "Highest & Best Use Study");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = HbuConfig::parse_toml(
            r#"
            [analysis]
            provider = "openai"
            max_tokens = 2048

            [export]
            output_dir = "/tmp/reports"
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.provider, Provider::Openai);
        assert_eq!(config.analysis.max_tokens, 2048);
        assert_eq!(config.analysis.model, "gpt-4o");
        assert_eq!(config.server.bind, "127.0.0.1:5000");
        assert_eq!(config.export.output_dir, Some(PathBuf::from("/tmp/reports")));
    }

    #[test]
    fn test_unknown_provider_is_parse_error() {
        let err = HbuConfig::parse_toml("[analysis]\nprovider = \"bard\"\n").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::Openai);
        assert_eq!("static".parse::<Provider>().unwrap(), Provider::Static);
        assert!("gemini".parse::<Provider>().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = HbuConfig::default();
        config.server.bind = "0.0.0.0:8080".to_string();
        let text = config.to_toml_string().unwrap();
        assert_eq!(HbuConfig::parse_toml(&text).unwrap(), config);
    }
}
