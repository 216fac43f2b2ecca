//! HBU Core - study generation, REST layer and CLI plumbing.
//!
//! This crate wires the pieces together:
//! - Plot and study repository
//! - Analyzers (offline and chat-completions)
//! - The study service that turns a plot into a stored study
//! - A small REST server exposing plots, studies and rendered reports
//! - Logging setup and stable exit codes for the `hbu` binary

pub mod analysis;
pub mod exit_codes;
pub mod logging;
pub mod server;
pub mod service;
pub mod store;

pub use analysis::{analyzer_from_settings, AnalysisError, Analyzer, OpenAiAnalyzer, StaticAnalyzer};
pub use exit_codes::ExitCode;
pub use server::{ApiResponse, ApiServer, ApiState, ServerError};
pub use service::StudyService;
pub use store::{sample_plots, MemoryRepository, Repository, StoreError};

use hbu_config::{ExportSettings, ValidationError};
use hbu_report::ReportConfig;

/// Report settings derived from the `[export]` config section.
pub fn report_config(export: &ExportSettings) -> ReportConfig {
    ReportConfig::new().with_title(export.title.clone())
}

/// Map a configuration failure onto the shared error type.
pub fn config_error(err: ValidationError) -> hbu_common::Error {
    match err {
        ValidationError::IoError(msg) => hbu_common::Error::Config(msg),
        other => hbu_common::Error::InvalidConfig(other.to_string()),
    }
}
