//! Offline analyzer producing deterministic figures.
//!
//! Everything scales from the maximum gross floor area, `size × FAR`, with the
//! FAR picked from the zoning label. Market commentary, rates and risks are
//! fixed Riyadh figures.

use super::{AnalysisError, Analyzer};
use hbu_common::{
    AnalysisResult, ComponentArea, DevelopmentScenario, EnhancedAnalysis, FinancialSummary,
    MarketData, Plot, Setbacks, SpaceProgram, ZoningDetails,
};
use hbu_report::format::{format_number, format_plain};

/// Land cost per sqm when the plot carries no market value.
const LAND_RATE_SQM: f64 = 4500.0;

/// Share of the maximum GFA used by the balanced program.
const BALANCED_SHARE: f64 = 0.8;

const RECOMMENDED: &str =
    "Scenario 2: Balanced Development - Optimal risk-adjusted returns with diversified income streams";

const CONCLUSION: &str = "Based on this analysis, we recommend proceeding with Scenario 2: Balanced Development. \
Next steps include: 1) Engage municipal authorities for preliminary planning consultation, \
2) Commission detailed geotechnical and environmental studies, \
3) Develop schematic design with certified architects, \
4) Secure financing commitments from institutional lenders, \
5) Prepare detailed financial model for investor presentation.";

const RISKS: [&str; 6] = [
    "Market absorption risk if economic growth slows below projected rates",
    "Construction cost escalation due to material price volatility",
    "Regulatory changes affecting development approvals or building codes",
    "Competition from new supply entering the market",
    "Interest rate fluctuations affecting financing costs",
    "Tenant concentration risk in commercial components",
];

/// Deterministic analyzer that needs no network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAnalyzer;

impl StaticAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// The full enhanced analysis for `plot`.
    pub fn enhanced(&self, plot: &Plot) -> EnhancedAnalysis {
        let max_far = max_far(&plot.zoning);
        let max_gfa = (plot.size * max_far).round();

        EnhancedAnalysis {
            executive_summary: executive_summary(plot, max_far, max_gfa),
            zoning_details: Some(zoning_details(plot, max_far)),
            market_data: Some(market_data()),
            scenarios: scenarios(max_gfa),
            recommended_scenario: Some(RECOMMENDED.to_string()),
            space_program: Some(space_program(plot, max_gfa)),
            financial_summary: Some(financial_summary(plot, max_gfa)),
            risk_factors: RISKS.iter().map(|r| r.to_string()).collect(),
            conclusion: Some(CONCLUSION.to_string()),
        }
    }
}

impl Analyzer for StaticAnalyzer {
    fn analyze(&self, plot: &Plot) -> Result<AnalysisResult, AnalysisError> {
        Ok(AnalysisResult::Enhanced(self.enhanced(plot)))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Floor-area ratio allowed by the zoning label.
pub fn max_far(zoning: &str) -> f64 {
    if zoning.contains("Commercial") {
        4.0
    } else if zoning.contains("Mixed") {
        3.5
    } else {
        2.5
    }
}

fn land_use_category(zoning: &str) -> &'static str {
    if zoning.contains("Commercial") {
        "Commercial"
    } else if zoning.contains("Mixed") {
        "Mixed-Use"
    } else if zoning.contains("Residential") {
        "Residential"
    } else {
        "Special"
    }
}

fn executive_summary(plot: &Plot, max_far: f64, max_gfa: f64) -> String {
    format!(
        "This Highest and Best Use analysis evaluates the development potential of the {size} sqm site \
located at {address}. Current zoning ({zoning}) permits mixed-use development with a maximum FAR of \
{far}, enabling up to {gfa} sqm of gross floor area.\n\n\
Based on comprehensive market analysis and financial modeling, the recommended development approach \
is Scenario 2: Balanced Development, which optimizes risk-adjusted returns while aligning with \
Riyadh's Vision 2030 urban growth objectives. This scenario projects an IRR of 21.2% with a \
development margin of 48.5%.\n\n\
The site benefits from excellent accessibility, strong demographic fundamentals, and growing \
institutional demand. Subject to detailed feasibility and regulatory approvals, development should \
commence within 18-24 months to capitalize on current market momentum.",
        size = format_number(plot.size),
        address = plot.address,
        zoning = plot.zoning,
        far = format_plain(max_far),
        gfa = format_number(max_gfa),
    )
}

fn scenarios(max_gfa: f64) -> Vec<DevelopmentScenario> {
    let conservative = max_gfa * 0.6;
    let balanced = max_gfa * BALANCED_SHARE;

    vec![
        DevelopmentScenario {
            name: "Scenario 1: Conservative Mixed-Use".to_string(),
            description: "A prudent development approach focusing on retail at ground level with \
Grade A office space above. This scenario minimizes risk while providing steady returns aligned \
with current market absorption rates."
                .to_string(),
            land_use: "Mixed-Use (Retail/Office)".to_string(),
            gfa: conservative.round(),
            units: None,
            estimated_cost: (conservative * 4500.0).round(),
            projected_revenue: (conservative * 7200.0).round(),
            irr: 16.5,
            npv: (conservative * 1200.0).round(),
            payback_period: 5.8,
            risk_level: "Low".to_string(),
        },
        DevelopmentScenario {
            name: "Scenario 2: Balanced Development".to_string(),
            description: "Optimized mixed-use development combining retail, office, and \
residential components to capture multiple revenue streams. Aligned with Vision 2030 urban \
densification goals."
                .to_string(),
            land_use: "Mixed-Use (Retail/Office/Residential)".to_string(),
            gfa: balanced.round(),
            units: Some((balanced * 0.3 / 120.0).round()),
            estimated_cost: (balanced * 5200.0).round(),
            projected_revenue: (balanced * 8500.0).round(),
            irr: 21.2,
            npv: (balanced * 1800.0).round(),
            payback_period: 4.5,
            risk_level: "Medium".to_string(),
        },
        DevelopmentScenario {
            name: "Scenario 3: Premium Tower Development".to_string(),
            description: "Maximizing FAR with a landmark tower featuring premium office space, \
luxury residential units, and high-end retail. Higher risk but significant upside potential \
given Riyadh's growth trajectory."
                .to_string(),
            land_use: "Premium Mixed-Use Tower".to_string(),
            gfa: max_gfa,
            units: Some((max_gfa * 0.35 / 150.0).round()),
            estimated_cost: (max_gfa * 6800.0).round(),
            projected_revenue: (max_gfa * 11500.0).round(),
            irr: 26.8,
            npv: (max_gfa * 2800.0).round(),
            payback_period: 3.8,
            risk_level: "High".to_string(),
        },
    ]
}

fn zoning_details(plot: &Plot, max_far: f64) -> ZoningDetails {
    let commercial = plot.zoning.contains("Commercial");
    ZoningDetails {
        zoning_code: plot.zoning.clone(),
        land_use_category: land_use_category(&plot.zoning).to_string(),
        permitted_uses: ["Office", "Retail", "Restaurant", "Hotel", "Residential (upper floors)"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        conditional_uses: ["Entertainment", "Healthcare", "Educational"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        max_far,
        max_height: if commercial { 60.0 } else { 45.0 },
        max_coverage: 70.0,
        setbacks: Setbacks {
            front: 6.0,
            rear: 5.0,
            side: 4.0,
        },
        parking_requirements: "1 space per 35 sqm GFA for commercial, 1.5 per residential unit"
            .to_string(),
        building_code_notes:
            "Saudi Building Code 2024 compliance required. Seismic Zone 2B design standards apply."
                .to_string(),
    }
}

fn market_data() -> MarketData {
    MarketData {
        demand_drivers: [
            "Vision 2030 economic diversification",
            "Population growth 2.5% annually",
            "Foreign investment incentives",
            "Entertainment sector expansion",
            "Tourism development",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        comparable_transactions: "Recent Grade A office transactions in the area range from SAR \
18,000-24,000/sqm. Retail spaces achieving SAR 2,800-3,500/sqm annually."
            .to_string(),
        absorption_rate:
            "Office: 85,000 sqm/quarter. Retail: 45,000 sqm/quarter. Residential: 2,500 units/quarter."
                .to_string(),
        vacancy_rate: "Office: 12%. Retail: 8%. Residential: 6%.".to_string(),
        average_rent:
            "Office: SAR 1,800/sqm/year. Retail: SAR 3,200/sqm/year. Residential: SAR 850/sqm/year."
                .to_string(),
        cap_rate: "Office: 7.5%. Retail: 8.2%. Residential: 6.8%.".to_string(),
        market_trends: "Strong demand driven by corporate relocations to Riyadh. Premium \
developments outperforming market averages by 15-20%."
            .to_string(),
    }
}

fn space_program(plot: &Plot, max_gfa: f64) -> SpaceProgram {
    let program_gfa = max_gfa * BALANCED_SHARE;
    let footprint = plot.size * 0.7;
    let floors = if footprint > 0.0 {
        (program_gfa / footprint).round().min(20.0)
    } else {
        0.0
    };

    let components = [
        ("Retail (Ground & Podium)", 15.0),
        ("Office Space", 45.0),
        ("Residential Units", 30.0),
        ("Parking & Services", 10.0),
    ]
    .iter()
    .map(|(label, pct)| ComponentArea {
        use_label: label.to_string(),
        area: (program_gfa * (*pct / 100.0)).round(),
        percentage: *pct,
    })
    .collect();

    SpaceProgram {
        total_gfa: program_gfa.round(),
        buildable_area: footprint.round(),
        efficiency: 78.0,
        floors,
        components,
    }
}

fn financial_summary(plot: &Plot, max_gfa: f64) -> FinancialSummary {
    let program_gfa = max_gfa * BALANCED_SHARE;
    let land_value = plot
        .market_value
        .filter(|v| *v != 0.0)
        .unwrap_or(plot.size * LAND_RATE_SQM);
    let total = land_value + (program_gfa * 4850.0).round();
    let noi = program_gfa * 1450.0;

    FinancialSummary {
        land_value,
        hard_costs: (program_gfa * 4200.0).round(),
        soft_costs: (program_gfa * 650.0).round(),
        total_development_cost: total,
        debt_financing: (total * 0.65).round(),
        equity_required: (total * 0.35).round(),
        projected_noi: noi.round(),
        stabilized_value: (noi / 0.075).round(),
        development_margin: 48.5,
        return_on_cost: 11.8,
    }
}
