//! Cross-renderer invariants for HBU reports.
//!
//! Covers:
//! - Contiguous section numbering for every subset of optional sections
//! - Identical plain text across repeated renders
//! - Page-break placement over arbitrary study sizes
//! - Recommendation highlighting by name containment

use chrono::{NaiveDate, TimeZone, Utc};
use hbu_common::{
    ComponentArea, DevelopmentScenario, FinancialSummary, MarketData, Plot, PlotId, Setbacks,
    SpaceProgram, Study, StudyId, ZoningDetails,
};
use hbu_report::{render_text, DocumentRenderer, ReportConfig};
use proptest::prelude::*;
use regex::Regex;

const TITLE: &str = "Highest & Best Use Study";

fn plot() -> Plot {
    Plot {
        id: PlotId::from("plot-002"),
        address: "Prince Mohammed Bin Salman Road, KAFD".to_string(),
        parcel_number: "RY-2024-00456".to_string(),
        latitude: 24.7648,
        longitude: 46.6426,
        size: 16997.0,
        zoning: "MU-2 Mixed Use".to_string(),
        current_use: "Financial District".to_string(),
        market_value: Some(120_000_000.0),
        owner_name: Some("KAFD Development Corp".to_string()),
        boundaries: None,
    }
}

fn scenario(name: &str, risk: &str) -> DevelopmentScenario {
    DevelopmentScenario {
        name: name.to_string(),
        description: "Podium retail with office floors above.".to_string(),
        land_use: "Mixed-Use".to_string(),
        gfa: 47592.0,
        units: Some(119.0),
        estimated_cost: 247_478_400.0,
        projected_revenue: 404_532_000.0,
        irr: 21.2,
        npv: 85_665_600.0,
        payback_period: 4.5,
        risk_level: risk.to_string(),
    }
}

fn full_study() -> Study {
    Study {
        id: StudyId::from("study-full"),
        plot_id: PlotId::from("plot-002"),
        created_at: Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap(),
        executive_summary: "The KAFD parcel supports a high-density mixed-use scheme.".to_string(),
        zoning_details: Some(ZoningDetails {
            zoning_code: "MU-2 Mixed Use".to_string(),
            land_use_category: "Mixed-Use".to_string(),
            permitted_uses: vec!["Office".to_string(), "Retail".to_string(), "Hotel".to_string()],
            conditional_uses: vec!["Healthcare".to_string()],
            max_far: 3.5,
            max_height: 45.0,
            max_coverage: 70.0,
            setbacks: Setbacks {
                front: 6.0,
                rear: 5.0,
                side: 4.0,
            },
            parking_requirements: "1 space per 50 sqm of office space".to_string(),
            building_code_notes: "Saudi Building Code (SBC) applies".to_string(),
        }),
        market_data: Some(MarketData {
            demand_drivers: vec!["Vision 2030".to_string(), "Regional HQ program".to_string()],
            comparable_transactions: "Grade A towers traded at SAR 14,000/sqm.".to_string(),
            absorption_rate: "Strong, 85% pre-leasing".to_string(),
            vacancy_rate: "6-8%".to_string(),
            average_rent: "SAR 1,800/sqm/year".to_string(),
            cap_rate: "7.0-7.5%".to_string(),
            market_trends: "Rents rising on limited Grade A supply.".to_string(),
        }),
        scenarios: vec![
            scenario("Scenario 1: Conservative Mixed-Use", "Low"),
            scenario("Scenario 2: Balanced Development", "Medium"),
            scenario("Scenario 3: Premium Tower Development", "High"),
        ],
        recommended_scenario: Some(
            "Scenario 2: Balanced Development - Optimal risk-adjusted returns".to_string(),
        ),
        space_program: Some(SpaceProgram {
            total_gfa: 47592.0,
            buildable_area: 11898.0,
            efficiency: 78.0,
            floors: 4.0,
            components: vec![
                ComponentArea {
                    use_label: "Retail".to_string(),
                    area: 7138.8,
                    percentage: 15.0,
                },
                ComponentArea {
                    use_label: "Office".to_string(),
                    area: 21416.4,
                    percentage: 45.0,
                },
            ],
        }),
        financial_summary: Some(FinancialSummary {
            land_value: 120_000_000.0,
            hard_costs: 159_909_120.0,
            soft_costs: 24_747_840.0,
            total_development_cost: 304_656_960.0,
            debt_financing: 198_027_024.0,
            equity_required: 106_629_936.0,
            projected_noi: 55_206_720.0,
            stabilized_value: 736_089_600.0,
            development_margin: 48.5,
            return_on_cost: 11.8,
        }),
        risk_factors: vec![
            "Interest rate exposure".to_string(),
            "Construction cost inflation".to_string(),
        ],
        conclusion: Some("Proceed with Scenario 2.".to_string()),
    }
}

/// Full study with optional sections dropped according to `mask` (bit set
/// means the section is kept), in report order.
fn study_with_sections(mask: u8) -> Study {
    let mut s = full_study();
    if mask & 1 == 0 {
        s.scenarios.clear();
        s.recommended_scenario = None;
    }
    if mask & 2 == 0 {
        s.zoning_details = None;
    }
    if mask & 4 == 0 {
        s.market_data = None;
    }
    if mask & 8 == 0 {
        s.space_program = None;
    }
    if mask & 16 == 0 {
        s.financial_summary = None;
    }
    if mask & 32 == 0 {
        s.risk_factors.clear();
    }
    if mask & 64 == 0 {
        s.conclusion = None;
    }
    s
}

fn header_regex() -> Regex {
    Regex::new(
        r"^(\d+)\. (DEVELOPMENT SCENARIOS|ZONING DETAILS|MARKET ANALYSIS|SPACE PROGRAM|FINANCIAL SUMMARY|RISK FACTORS|CONCLUSION & NEXT STEPS)$",
    )
    .unwrap()
}

fn numbers<'a>(re: &Regex, lines: impl Iterator<Item = &'a str>) -> Vec<usize> {
    lines
        .filter_map(|l| re.captures(l))
        .map(|c| c[1].parse().unwrap())
        .collect()
}

#[test]
fn test_numbering_contiguous_for_every_section_subset() {
    let re = header_regex();
    let renderer = DocumentRenderer::default();
    let p = plot();

    for mask in 0u8..128 {
        let study = study_with_sections(mask);
        let expected: Vec<usize> = (1..=mask.count_ones() as usize).collect();

        let text = render_text(TITLE, &study, &p);
        assert_eq!(numbers(&re, text.lines()), expected, "text, mask {mask:#09b}");

        let doc = renderer.render(&study, &p);
        assert_eq!(numbers(&re, doc.text_runs()), expected, "document, mask {mask:#09b}");
    }
}

#[test]
fn test_minimal_study_renders_only_conclusion() {
    let study = study_with_sections(64);
    let text = render_text(TITLE, &study, &plot());

    assert!(text.starts_with("HIGHEST & BEST USE STUDY\n"));
    assert!(text.contains("Property: Prince Mohammed Bin Salman Road, KAFD"));
    assert!(text.contains("EXECUTIVE SUMMARY"));
    assert!(text.contains("1. CONCLUSION & NEXT STEPS"));
    assert_eq!(numbers(&header_regex(), text.lines()), vec![1]);
}

#[test]
fn test_plain_text_is_deterministic() {
    let study = full_study();
    let p = plot();
    let first = render_text(TITLE, &study, &p);
    let second = render_text(TITLE, &study, &p);
    assert_eq!(first, second);
    assert_eq!(first, first.trim());
}

#[test]
fn test_currency_conventions_per_call_site() {
    let text = render_text(TITLE, &full_study(), &plot());
    // Scenario amounts in flat millions
    assert!(text.contains("  Est. Cost: SAR 247.5M | Revenue: SAR 404.5M\n"));
    // Financial summary amounts suffix-scaled
    assert!(text.contains("  Land Value: SAR 120.00M\n"));
    assert!(text.contains("  Total Development Cost: SAR 304.66M\n"));
}

#[test]
fn test_recommendation_matches_by_containment() {
    let mut study = full_study();
    study.scenarios.push(scenario("Scenario 2: Balanced Development Phase II", "Medium"));

    let text = render_text(TITLE, &study, &plot());
    assert!(text.contains("\nScenario 2: Balanced Development [RECOMMENDED]\n"));
    assert!(text.contains("\nScenario 2: Balanced Development Phase II\n"));
    assert!(!text.contains("Phase II [RECOMMENDED]"));
    assert_eq!(text.matches("[RECOMMENDED]").count(), 1);

    let doc = DocumentRenderer::default().render(&study, &plot());
    let flagged: Vec<&str> = doc
        .text_runs()
        .filter(|r| r.ends_with("[RECOMMENDED]"))
        .collect();
    assert_eq!(flagged, vec!["Scenario 2: Balanced Development [RECOMMENDED]"]);
}

#[test]
fn test_export_date_names_the_document() {
    let config = ReportConfig::new().with_export_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    let doc = DocumentRenderer::new(config).render(&full_study(), &plot());
    assert_eq!(doc.filename, "HBU-Study-RY-2024-00456-2025-02-01.pdf");
}

proptest! {
    #[test]
    fn prop_placed_blocks_fit_above_bottom(
        risks in 0usize..60,
        summary_words in 0usize..600,
        scenarios in 0usize..12,
        rent_words in 0usize..400,
        cap_words in 0usize..200,
        parking_words in 0usize..400,
        permitted in 0usize..80,
        components in 0usize..60,
    ) {
        let mut study = full_study();
        study.risk_factors = (0..risks).map(|i| format!("Risk factor number {i} with some detail")).collect();
        study.executive_summary = "market ".repeat(summary_words);
        study.scenarios = (0..scenarios)
            .map(|i| scenario(&format!("Scenario {i}"), "Medium"))
            .collect();

        if let Some(market) = study.market_data.as_mut() {
            market.average_rent = "SAR 1,800/sqm/year ".repeat(rent_words);
            market.cap_rate = "7.0-7.5% ".repeat(cap_words);
        }
        if let Some(zoning) = study.zoning_details.as_mut() {
            zoning.parking_requirements = "one space per fifty sqm ".repeat(parking_words);
            zoning.permitted_uses = (0..permitted).map(|i| format!("Permitted use {i}")).collect();
        }
        if let Some(program) = study.space_program.as_mut() {
            program.components = (0..components)
                .map(|i| ComponentArea {
                    use_label: format!("Component {i}"),
                    area: 500.0 + i as f64,
                    percentage: 1.5,
                })
                .collect();
        }

        let config = ReportConfig::default();
        let doc = DocumentRenderer::new(config.clone()).render(&study, &plot());
        let bottom = config.page.bottom;

        for placed in &doc.layout.placed {
            prop_assert!(placed.top <= bottom - placed.height, "{:?}", placed);
            prop_assert!(placed.page < doc.page_count());
        }
        let pages: Vec<usize> = doc.layout.placed.iter().map(|p| p.page).collect();
        prop_assert!(pages.windows(2).all(|w| w[0] <= w[1]));
    }
}
