//! Configuration validation errors and semantic validation.

use crate::config::HbuConfig;
use std::net::SocketAddr;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
        }
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a parsed configuration semantically.
pub fn validate_config(config: &HbuConfig) -> ValidationResult<()> {
    let analysis = &config.analysis;

    if analysis.model.trim().is_empty() {
        return Err(invalid("analysis.model", "Must not be empty"));
    }

    if analysis.max_tokens == 0 {
        return Err(invalid("analysis.max_tokens", "Must be positive, got 0"));
    }

    if analysis.timeout_secs == 0 {
        return Err(invalid("analysis.timeout_secs", "Must be positive, got 0"));
    }

    if !(analysis.api_base.starts_with("http://") || analysis.api_base.starts_with("https://")) {
        return Err(invalid(
            "analysis.api_base",
            format!("Must be an http(s) URL, got {:?}", analysis.api_base),
        ));
    }

    if analysis.api_key_env.trim().is_empty() {
        return Err(invalid("analysis.api_key_env", "Must not be empty"));
    }

    if config.server.bind.parse::<SocketAddr>().is_err() {
        return Err(invalid(
            "server.bind",
            format!("Not a socket address: {:?}", config.server.bind),
        ));
    }

    if config.export.title.trim().is_empty() {
        return Err(invalid("export.title", "Must not be empty"));
    }

    if let Some(dir) = &config.export.output_dir {
        if dir.is_file() {
            return Err(ValidationError::SemanticError(format!(
                "export.output_dir points at a file: {}",
                dir.display()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&HbuConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let mut config = HbuConfig::default();
        config.analysis.max_tokens = 0;
        match validate_config(&config) {
            Err(ValidationError::InvalidValue { field, .. }) => {
                assert_eq!(field, "analysis.max_tokens")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bad_bind_rejected() {
        let mut config = HbuConfig::default();
        config.server.bind = "localhost".to_string();
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.code(), 65);
        assert!(err.to_string().contains("server.bind"));
    }

    #[test]
    fn test_blank_model_rejected() {
        let mut config = HbuConfig::default();
        config.analysis.model = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_non_http_api_base_rejected() {
        let mut config = HbuConfig::default();
        config.analysis.api_base = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }
}
