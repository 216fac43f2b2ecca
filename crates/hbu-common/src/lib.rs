//! HBU common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - Plot and study identity types
//! - The study data model consumed by the report renderers
//! - The two analysis result shapes returned by the AI-analysis step
//! - Common error types with stable codes

pub mod analysis;
pub mod error;
pub mod id;
pub mod model;

pub use analysis::{AnalysisResult, EnhancedAnalysis, ShapeError, SimpleAnalysis};
pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use id::{PlotId, StudyId};
pub use model::{
    ComponentArea, DevelopmentScenario, FinancialSummary, MarketData, NewPlot, Plot,
    ReportSection, Setbacks, SpaceProgram, Study, ZoningDetails,
};

/// Schema version for serialized studies and plots.
pub const SCHEMA_VERSION: &str = "1.0.0";
