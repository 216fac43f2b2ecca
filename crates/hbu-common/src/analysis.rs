//! Analysis result shapes returned by the AI-analysis step.
//!
//! Two response shapes exist in the wild. The enhanced shape carries the
//! structured sections (scenarios, zoning, market data, ...) and maps onto a
//! [`Study`] one-to-one. The simple shape carries five narrative paragraphs
//! only. Raw JSON is feature-detected: the presence of any enhanced key
//! selects the enhanced shape.

use crate::error::Error;
use crate::id::{PlotId, StudyId};
use crate::model::{
    null_as_empty, DevelopmentScenario, FinancialSummary, MarketData, SpaceProgram, Study,
    ZoningDetails,
};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Keys whose presence marks a response as enhanced.
pub const ENHANCED_KEYS: [&str; 6] = [
    "scenarios",
    "zoningDetails",
    "marketData",
    "spaceProgram",
    "financialSummary",
    "riskFactors",
];

/// Required narrative fields of the simple shape.
pub const SIMPLE_KEYS: [&str; 5] = [
    "executiveSummary",
    "zoningAnalysis",
    "marketDemand",
    "financialFeasibility",
    "developmentRecommendations",
];

/// Structured analysis with every report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedAnalysis {
    pub executive_summary: String,
    #[serde(default)]
    pub zoning_details: Option<ZoningDetails>,
    #[serde(default)]
    pub market_data: Option<MarketData>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<DevelopmentScenario>")]
    pub scenarios: Vec<DevelopmentScenario>,
    /// Should contain the name of one of the scenarios.
    #[serde(default)]
    pub recommended_scenario: Option<String>,
    #[serde(default)]
    pub space_program: Option<SpaceProgram>,
    #[serde(default)]
    pub financial_summary: Option<FinancialSummary>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
}

/// Narrative-only analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimpleAnalysis {
    pub executive_summary: String,
    pub zoning_analysis: String,
    pub market_demand: String,
    pub financial_feasibility: String,
    pub development_recommendations: String,
}

/// Why a raw analysis response could not be accepted.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("analysis response is not a JSON object")]
    NotAnObject,

    #[error("missing or empty fields: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },

    #[error("malformed analysis response: {0}")]
    Malformed(String),
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        match err {
            ShapeError::Incomplete { .. } => Error::IncompleteAnalysis(err.to_string()),
            other => Error::Analysis(other.to_string()),
        }
    }
}

/// Either analysis shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Enhanced(EnhancedAnalysis),
    Simple(SimpleAnalysis),
}

fn non_empty_str(obj: &serde_json::Map<String, serde_json::Value>, key: &str) -> bool {
    obj.get(key)
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.trim().is_empty())
}

impl AnalysisResult {
    /// Parse raw model output.
    pub fn from_json(content: &str) -> Result<Self, ShapeError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ShapeError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Feature-detect the shape of an already parsed response.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ShapeError> {
        let Some(obj) = value.as_object() else {
            return Err(ShapeError::NotAnObject);
        };

        if ENHANCED_KEYS.iter().any(|k| obj.contains_key(*k)) {
            if !non_empty_str(obj, "executiveSummary") {
                return Err(ShapeError::Incomplete {
                    missing: vec!["executiveSummary".to_string()],
                });
            }
            let enhanced: EnhancedAnalysis = serde_json::from_value(value)
                .map_err(|e| ShapeError::Malformed(e.to_string()))?;
            return Ok(AnalysisResult::Enhanced(enhanced));
        }

        let missing: Vec<String> = SIMPLE_KEYS
            .iter()
            .filter(|k| !non_empty_str(obj, k))
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ShapeError::Incomplete { missing });
        }

        let simple: SimpleAnalysis =
            serde_json::from_value(value).map_err(|e| ShapeError::Malformed(e.to_string()))?;
        Ok(AnalysisResult::Simple(simple))
    }

    pub fn is_enhanced(&self) -> bool {
        matches!(self, AnalysisResult::Enhanced(_))
    }

    /// Turn the analysis into a new study for `plot_id`.
    ///
    /// A simple analysis keeps its executive summary and appends the zoning,
    /// market and financial narratives as labelled paragraphs; the
    /// development recommendations become the conclusion.
    pub fn into_study(self, plot_id: PlotId, now: DateTime<Utc>) -> Study {
        match self {
            AnalysisResult::Enhanced(a) => Study {
                id: StudyId::generate(),
                plot_id,
                created_at: now,
                executive_summary: a.executive_summary,
                zoning_details: a.zoning_details,
                market_data: a.market_data,
                scenarios: a.scenarios,
                recommended_scenario: a.recommended_scenario,
                space_program: a.space_program,
                financial_summary: a.financial_summary,
                risk_factors: a.risk_factors,
                conclusion: a.conclusion,
            },
            AnalysisResult::Simple(a) => {
                let executive_summary = format!(
                    "{}\n\nZoning Analysis:\n{}\n\nMarket Demand:\n{}\n\nFinancial Feasibility:\n{}",
                    a.executive_summary.trim(),
                    a.zoning_analysis.trim(),
                    a.market_demand.trim(),
                    a.financial_feasibility.trim()
                );
                Study {
                    id: StudyId::generate(),
                    plot_id,
                    created_at: now,
                    executive_summary,
                    zoning_details: None,
                    market_data: None,
                    scenarios: Vec::new(),
                    recommended_scenario: None,
                    space_program: None,
                    financial_summary: None,
                    risk_factors: Vec::new(),
                    conclusion: Some(a.development_recommendations),
                }
            }
        }
    }
}

/// JSON schema of the enhanced analysis shape.
pub fn enhanced_schema() -> serde_json::Value {
    schemars::schema_for!(EnhancedAnalysis).to_value()
}
