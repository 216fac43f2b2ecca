//! Study data model.
//!
//! Value objects produced by the AI-analysis step and consumed by the report
//! renderers. Wire names follow the camelCase JSON contract of the analysis
//! API, including its upper-case acronyms (`maxFAR`, `totalGFA`,
//! `projectedNOI`).
//!
//! Nothing in here is mutated by rendering. Optional sections are genuinely
//! optional: a missing section is omitted from reports, never rendered as a
//! placeholder.

use crate::error::{Error, Result};
use crate::id::{PlotId, StudyId};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Accept `null` wherever a list is expected.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A land plot as returned by the plot source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub id: PlotId,
    pub address: String,
    pub parcel_number: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Lot area.
    pub size: f64,
    pub zoning: String,
    pub current_use: String,
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub owner_name: Option<String>,
    /// Closed polygon ring of `[lon, lat]` pairs.
    #[serde(default)]
    pub boundaries: Option<Vec<[f64; 2]>>,
}

impl Plot {
    /// Check the plot invariants: positive area and in-range coordinates.
    pub fn validate(&self) -> Result<()> {
        if !(self.size > 0.0) {
            return Err(Error::InvalidPlot(format!(
                "lot area must be positive, got {}",
                self.size
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::InvalidPlot(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::InvalidPlot(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Insert shape for a plot (no id yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPlot {
    pub address: String,
    pub parcel_number: String,
    pub latitude: f64,
    pub longitude: f64,
    pub size: f64,
    pub zoning: String,
    pub current_use: String,
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub boundaries: Option<Vec<[f64; 2]>>,
}

impl NewPlot {
    pub fn into_plot(self, id: PlotId) -> Plot {
        Plot {
            id,
            address: self.address,
            parcel_number: self.parcel_number,
            latitude: self.latitude,
            longitude: self.longitude,
            size: self.size,
            zoning: self.zoning,
            current_use: self.current_use,
            market_value: self.market_value,
            owner_name: self.owner_name,
            boundaries: self.boundaries,
        }
    }
}

/// One candidate development program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentScenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub land_use: String,
    /// Gross floor area in sqm.
    pub gfa: f64,
    #[serde(default)]
    pub units: Option<f64>,
    pub estimated_cost: f64,
    pub projected_revenue: f64,
    /// Internal rate of return, percent.
    pub irr: f64,
    pub npv: f64,
    /// Payback period in years.
    pub payback_period: f64,
    /// One of Low / Medium / High in any case; anything else is displayed as-is.
    pub risk_level: String,
}

impl DevelopmentScenario {
    /// Unit count for display. Zero counts as "not applicable".
    pub fn unit_count(&self) -> Option<f64> {
        self.units.filter(|u| *u != 0.0)
    }
}

/// Required setback distances in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Setbacks {
    pub front: f64,
    pub rear: f64,
    pub side: f64,
}

/// Zoning regulation summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZoningDetails {
    pub zoning_code: String,
    pub land_use_category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub permitted_uses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub conditional_uses: Vec<String>,
    #[serde(rename = "maxFAR")]
    pub max_far: f64,
    /// Meters.
    pub max_height: f64,
    /// Percent of lot area.
    pub max_coverage: f64,
    #[serde(default)]
    pub setbacks: Setbacks,
    #[serde(default)]
    pub parking_requirements: String,
    #[serde(default)]
    pub building_code_notes: String,
}

/// Market conditions.
///
/// Every metric is a display string; values such as
/// `"Office: 12%. Retail: 8%."` are common and must not be parsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub demand_drivers: Vec<String>,
    #[serde(default)]
    pub comparable_transactions: String,
    #[serde(default)]
    pub absorption_rate: String,
    #[serde(default)]
    pub vacancy_rate: String,
    #[serde(default)]
    pub average_rent: String,
    #[serde(default)]
    pub cap_rate: String,
    #[serde(default)]
    pub market_trends: String,
}

/// One use within the space program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComponentArea {
    #[serde(rename = "use")]
    pub use_label: String,
    pub area: f64,
    pub percentage: f64,
}

/// Building program breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpaceProgram {
    #[serde(rename = "totalGFA")]
    pub total_gfa: f64,
    pub buildable_area: f64,
    /// Percent.
    pub efficiency: f64,
    pub floors: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<ComponentArea>")]
    pub components: Vec<ComponentArea>,
}

impl SpaceProgram {
    /// Sum of component percentages. Expected to be close to 100 but never
    /// enforced.
    pub fn percentage_total(&self) -> f64 {
        self.components.iter().map(|c| c.percentage).sum()
    }
}

/// Development budget, capital stack and returns.
///
/// Totals are AI-sourced and may not add up; no invariant is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub land_value: f64,
    pub hard_costs: f64,
    pub soft_costs: f64,
    pub total_development_cost: f64,
    pub debt_financing: f64,
    pub equity_required: f64,
    #[serde(rename = "projectedNOI")]
    pub projected_noi: f64,
    pub stabilized_value: f64,
    /// Percent.
    pub development_margin: f64,
    /// Percent.
    pub return_on_cost: f64,
}

/// Optional report sections in their fixed emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    Scenarios,
    Zoning,
    Market,
    SpaceProgram,
    Financial,
    RiskFactors,
    Conclusion,
}

impl ReportSection {
    /// All sections, in report order.
    pub const ORDER: [ReportSection; 7] = [
        ReportSection::Scenarios,
        ReportSection::Zoning,
        ReportSection::Market,
        ReportSection::SpaceProgram,
        ReportSection::Financial,
        ReportSection::RiskFactors,
        ReportSection::Conclusion,
    ];

    /// Banner title used by both renderers.
    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::Scenarios => "DEVELOPMENT SCENARIOS",
            ReportSection::Zoning => "ZONING DETAILS",
            ReportSection::Market => "MARKET ANALYSIS",
            ReportSection::SpaceProgram => "SPACE PROGRAM",
            ReportSection::Financial => "FINANCIAL SUMMARY",
            ReportSection::RiskFactors => "RISK FACTORS",
            ReportSection::Conclusion => "CONCLUSION & NEXT STEPS",
        }
    }
}

impl std::fmt::Display for ReportSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportSection::Scenarios => write!(f, "scenarios"),
            ReportSection::Zoning => write!(f, "zoning"),
            ReportSection::Market => write!(f, "market"),
            ReportSection::SpaceProgram => write!(f, "space_program"),
            ReportSection::Financial => write!(f, "financial"),
            ReportSection::RiskFactors => write!(f, "risk_factors"),
            ReportSection::Conclusion => write!(f, "conclusion"),
        }
    }
}

/// A generated Highest & Best Use study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub id: StudyId,
    pub plot_id: PlotId,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
    pub executive_summary: String,
    #[serde(default)]
    pub zoning_details: Option<ZoningDetails>,
    #[serde(default)]
    pub market_data: Option<MarketData>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<DevelopmentScenario>")]
    pub scenarios: Vec<DevelopmentScenario>,
    /// Free text expected to mention a scenario name.
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

impl Study {
    /// Whether the optional section carries content worth a report section.
    pub fn is_populated(&self, section: ReportSection) -> bool {
        match section {
            ReportSection::Scenarios => !self.scenarios.is_empty(),
            ReportSection::Zoning => self.zoning_details.is_some(),
            ReportSection::Market => self.market_data.is_some(),
            ReportSection::SpaceProgram => self.space_program.is_some(),
            ReportSection::Financial => self.financial_summary.is_some(),
            ReportSection::RiskFactors => !self.risk_factors.is_empty(),
            ReportSection::Conclusion => self.conclusion.as_deref().is_some_and(|c| !c.is_empty()),
        }
    }

    /// Populated optional sections in report order.
    ///
    /// Section numbers in rendered reports are positions in this list
    /// (1-based), so numbering stays contiguous when sections are missing.
    pub fn populated_sections(&self) -> Vec<ReportSection> {
        ReportSection::ORDER
            .into_iter()
            .filter(|s| self.is_populated(*s))
            .collect()
    }

    /// Whether the study carries the structured (enhanced) analysis.
    pub fn has_enhanced_data(&self) -> bool {
        !self.scenarios.is_empty()
    }

    /// A scenario is recommended when its name occurs inside the
    /// recommendation text.
    pub fn is_recommended(&self, scenario: &DevelopmentScenario) -> bool {
        self.recommended_scenario
            .as_deref()
            .is_some_and(|rec| rec.contains(scenario.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> Plot {
        Plot {
            id: PlotId::from("plot-001"),
            address: "King Fahd Road, Al Olaya District".to_string(),
            parcel_number: "RY-2024-00123".to_string(),
            latitude: 24.7136,
            longitude: 46.6753,
            size: 10117.0,
            zoning: "C-1 Commercial".to_string(),
            current_use: "Mixed Use Development".to_string(),
            market_value: Some(45_000_000.0),
            owner_name: None,
            boundaries: None,
        }
    }

    fn scenario(name: &str) -> DevelopmentScenario {
        DevelopmentScenario {
            name: name.to_string(),
            description: String::new(),
            land_use: "Mixed-Use".to_string(),
            gfa: 1000.0,
            units: None,
            estimated_cost: 1.0,
            projected_revenue: 2.0,
            irr: 10.0,
            npv: 1.0,
            payback_period: 5.0,
            risk_level: "Low".to_string(),
        }
    }

    fn bare_study() -> Study {
        Study {
            id: StudyId::from("study-1"),
            plot_id: PlotId::from("plot-001"),
            created_at: Utc::now(),
            executive_summary: "Summary".to_string(),
            zoning_details: None,
            market_data: None,
            scenarios: vec![],
            recommended_scenario: None,
            space_program: None,
            financial_summary: None,
            risk_factors: vec![],
            conclusion: None,
        }
    }

    #[test]
    fn test_plot_validation() {
        assert!(plot().validate().is_ok());

        let mut p = plot();
        p.size = 0.0;
        assert!(matches!(p.validate(), Err(Error::InvalidPlot(_))));

        let mut p = plot();
        p.size = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = plot();
        p.latitude = 91.0;
        assert!(p.validate().is_err());

        let mut p = plot();
        p.longitude = -180.5;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_populated_sections_order_and_rules() {
        let mut study = bare_study();
        assert!(study.populated_sections().is_empty());
        assert!(!study.has_enhanced_data());

        study.conclusion = Some(String::new());
        assert!(study.populated_sections().is_empty());

        study.conclusion = Some("Proceed.".to_string());
        study.risk_factors = vec!["Rates".to_string()];
        study.scenarios = vec![scenario("A")];
        assert_eq!(
            study.populated_sections(),
            vec![
                ReportSection::Scenarios,
                ReportSection::RiskFactors,
                ReportSection::Conclusion
            ]
        );
        assert!(study.has_enhanced_data());
    }

    #[test]
    fn test_recommendation_is_substring_containment() {
        let mut study = bare_study();
        study.recommended_scenario =
            Some("Scenario 2: Balanced Development - best returns".to_string());

        assert!(study.is_recommended(&scenario("Scenario 2: Balanced Development")));
        assert!(!study.is_recommended(&scenario("Scenario 3: Premium Tower")));
        // Direction matters: a longer name containing the text is not a match.
        assert!(!study.is_recommended(&scenario(
            "Scenario 2: Balanced Development - best returns (phase II)"
        )));

        study.recommended_scenario = None;
        assert!(!study.is_recommended(&scenario("Scenario 2: Balanced Development")));
    }

    #[test]
    fn test_study_deserializes_nulls_and_missing_timestamp() {
        let json = r#"{
            "id": "study-9",
            "plotId": "plot-001",
            "executiveSummary": "x",
            "scenarios": null,
            "riskFactors": null,
            "zoningDetails": null
        }"#;
        let study: Study = serde_json::from_str(json).unwrap();
        assert!(study.scenarios.is_empty());
        assert!(study.risk_factors.is_empty());
        assert!(study.zoning_details.is_none());
        assert!(study.created_at <= Utc::now());
    }

    #[test]
    fn test_wire_names_keep_acronyms() {
        let program = SpaceProgram {
            total_gfa: 100.0,
            buildable_area: 50.0,
            efficiency: 78.0,
            floors: 2.0,
            components: vec![ComponentArea {
                use_label: "Retail".to_string(),
                area: 100.0,
                percentage: 100.0,
            }],
        };
        let json = serde_json::to_value(&program).unwrap();
        assert!(json.get("totalGFA").is_some());
        assert_eq!(json["components"][0]["use"], "Retail");
        assert_eq!(program.percentage_total(), 100.0);
    }

    #[test]
    fn test_zero_units_count_as_missing() {
        let mut s = scenario("A");
        s.units = Some(0.0);
        assert_eq!(s.unit_count(), None);
        s.units = Some(42.0);
        assert_eq!(s.unit_count(), Some(42.0));
    }
}
