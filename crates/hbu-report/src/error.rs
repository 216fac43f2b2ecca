//! Error types for report generation.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur during report generation and delivery.
#[derive(Error, Debug)]
pub enum ReportError {
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// PDF assembly error.
    #[error("PDF error: {0}")]
    PdfError(String),

    /// The sink refused or failed to deliver the artifact.
    #[error("failed to deliver '{target}': {reason}")]
    DeliveryError { target: String, reason: String },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ReportError> for hbu_common::Error {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::IoError(e) => hbu_common::Error::Io(e),
            ReportError::JsonError(e) => hbu_common::Error::Json(e),
            ReportError::DeliveryError { .. } => hbu_common::Error::Export(err.to_string()),
            ReportError::PdfError(_) | ReportError::InvalidConfig(_) => {
                hbu_common::Error::Render(err.to_string())
            }
        }
    }
}
