//! Error types for the HBU toolkit.
//!
//! Every error carries a stable numeric code, a category and a
//! recoverability hint so the CLI and the REST layer can report failures in
//! a machine-parseable way:
//!
//! ```json
//! {
//!   "code": 20,
//!   "category": "lookup",
//!   "message": "plot not found: plot-404",
//!   "recoverable": false,
//!   "context": { "plot_id": "plot-404" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for HBU operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors.
    Config,
    /// Plot or study lookups and plot validation.
    Lookup,
    /// AI-analysis step failures.
    Analysis,
    /// Report rendering and export delivery.
    Report,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Lookup => write!(f, "lookup"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Report => write!(f, "report"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the HBU toolkit.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // Lookup errors (20-29)
    #[error("plot not found: {plot_id}")]
    PlotNotFound { plot_id: String },

    #[error("study not found: {study_id}")]
    StudyNotFound { study_id: String },

    #[error("invalid plot: {0}")]
    InvalidPlot(String),

    // Analysis errors (30-39)
    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("incomplete analysis response: {0}")]
    IncompleteAnalysis(String),

    // Report errors (40-49)
    #[error("report rendering failed: {0}")]
    Render(String),

    #[error("report export failed: {0}")]
    Export(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Lookup errors
    /// - 30-39: Analysis errors
    /// - 40-49: Report errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig(_) => 11,
            Error::PlotNotFound { .. } => 20,
            Error::StudyNotFound { .. } => 21,
            Error::InvalidPlot(_) => 22,
            Error::Analysis(_) => 30,
            Error::IncompleteAnalysis(_) => 31,
            Error::Render(_) => 40,
            Error::Export(_) => 41,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) => ErrorCategory::Config,

            Error::PlotNotFound { .. } | Error::StudyNotFound { .. } | Error::InvalidPlot(_) => {
                ErrorCategory::Lookup
            }

            Error::Analysis(_) | Error::IncompleteAnalysis(_) => ErrorCategory::Analysis,

            Error::Render(_) | Error::Export(_) => ErrorCategory::Report,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::InvalidConfig(_) => true,

            Error::PlotNotFound { .. } => false,
            Error::StudyNotFound { .. } => false,
            Error::InvalidPlot(_) => false,

            // Upstream model output varies between calls
            Error::Analysis(_) => true,
            Error::IncompleteAnalysis(_) => true,

            Error::Render(_) => false,
            Error::Export(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidConfig(_) => "Invalid Configuration",
            Error::PlotNotFound { .. } => "Plot Not Found",
            Error::StudyNotFound { .. } => "Study Not Found",
            Error::InvalidPlot(_) => "Invalid Plot",
            Error::Analysis(_) => "Analysis Failed",
            Error::IncompleteAnalysis(_) => "Incomplete Analysis",
            Error::Render(_) => "Rendering Failed",
            Error::Export(_) => "Export Failed",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (plot id, study id).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::PlotNotFound { plot_id } => {
                context.insert("plot_id".to_string(), serde_json::json!(plot_id));
            }
            Error::StudyNotFound { study_id } => {
                context.insert("study_id".to_string(), serde_json::json!(study_id));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
