//! The analysis step: turn a plot into an HBU analysis.
//!
//! Two analyzers are available:
//! - [`StaticAnalyzer`]: deterministic figures derived from plot size and zoning
//! - [`OpenAiAnalyzer`]: chat-completions request returning JSON
//!
//! Both return [`AnalysisResult`], in either the enhanced or the simple shape.

pub mod openai;
pub mod prompt;
pub mod static_analyzer;

pub use openai::OpenAiAnalyzer;
pub use static_analyzer::StaticAnalyzer;

use hbu_common::{AnalysisResult, Plot, ShapeError};
use hbu_config::{AnalysisSettings, Provider};
use thiserror::Error;

/// Errors from the analysis step.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("API key not set: environment variable {env} is empty or missing")]
    MissingApiKey { env: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No response from AI model")]
    EmptyContent,

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl From<AnalysisError> for hbu_common::Error {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Shape(ShapeError::Incomplete { .. }) => {
                hbu_common::Error::IncompleteAnalysis(format!(
                    "Incomplete analysis response from AI ({err})"
                ))
            }
            other => hbu_common::Error::Analysis(format!(
                "Failed to generate HBU analysis: {other}"
            )),
        }
    }
}

/// Produces an analysis for one plot.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, plot: &Plot) -> Result<AnalysisResult, AnalysisError>;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}

/// Build the analyzer selected by `settings.provider`.
///
/// The OpenAI analyzer reads its API key here so a missing key fails before
/// any plot is looked up.
pub fn analyzer_from_settings(
    settings: &AnalysisSettings,
) -> Result<Box<dyn Analyzer>, AnalysisError> {
    match settings.provider {
        Provider::Static => Ok(Box::new(StaticAnalyzer::new())),
        Provider::Openai => Ok(Box::new(OpenAiAnalyzer::from_settings(settings)?)),
    }
}
