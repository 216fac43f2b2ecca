//! Development scenarios.
//!
//! A scenario is highlighted when its name occurs in the recommendation text
//! (see [`Study::is_recommended`]). The document shows amounts with the
//! suffix-scaled currency format; the plain-text report uses the flat
//! millions format for cost, revenue and NPV.

use super::{metric_cell, BlockWriter, BODY_SIZE, CALLOUT_GREEN};
use crate::format::{
    format_currency, format_millions, format_number, format_percent, format_plain, format_years,
    RiskCategory,
};
use crate::layout::{Block, BlockKind, DrawOp, FontStyle};
use crate::metrics::split_text_to_size;
use hbu_common::{DevelopmentScenario, Study};

const RECOMMENDED_FILL: (u8, u8, u8) = (220, 252, 231);
const CARD_FILL: (u8, u8, u8) = (248, 248, 248);
const RECOMMENDED_SUFFIX: &str = " [RECOMMENDED]";

/// Description lines shown per card.
const MAX_DESCRIPTION_LINES: usize = 2;

fn units_label(scenario: &DevelopmentScenario) -> String {
    scenario
        .unit_count()
        .map(format_plain)
        .unwrap_or_else(|| "N/A".to_string())
}

fn heading(study: &Study, scenario: &DevelopmentScenario) -> String {
    if study.is_recommended(scenario) {
        format!("{}{}", scenario.name, RECOMMENDED_SUFFIX)
    } else {
        scenario.name.clone()
    }
}

fn recommendation(study: &Study) -> Option<&str> {
    study
        .recommended_scenario
        .as_deref()
        .filter(|r| !r.is_empty())
}

/// Layout block for one scenario card. The reserved height is the card's
/// full height so a card never straddles a page break.
pub fn card(w: &BlockWriter<'_>, study: &Study, scenario: &DevelopmentScenario) -> Block {
    let g = w.geometry();
    let [col1, col2, col3, col4] = g.columns();
    let fill = if study.is_recommended(scenario) {
        RECOMMENDED_FILL
    } else {
        CARD_FILL
    };

    let mut ops = vec![
        DrawOp::Rect {
            x: g.margin,
            y: -4.0,
            w: g.content_width(),
            h: 8.0,
            fill,
        },
        DrawOp::text(
            g.margin + 2.0,
            1.0,
            heading(study, scenario),
            FontStyle::Bold,
            10.0,
        ),
        DrawOp::text(
            g.margin,
            10.0,
            format!("Land Use: {}", scenario.land_use),
            FontStyle::Regular,
            BODY_SIZE,
        ),
    ];

    let mut y = 15.0;
    for line in split_text_to_size(&scenario.description, g.content_width(), BODY_SIZE)
        .into_iter()
        .take(MAX_DESCRIPTION_LINES)
    {
        if !line.is_empty() {
            ops.push(DrawOp::text(g.margin, y, line, FontStyle::Regular, BODY_SIZE));
        }
        y += 4.0;
    }
    y += 2.0;

    let row_a = [
        (col1, "GFA", format!("{} sqm", format_number(scenario.gfa))),
        (col2, "Units", units_label(scenario)),
        (col3, "Est. Cost", format_currency(scenario.estimated_cost)),
        (col4, "Revenue", format_currency(scenario.projected_revenue)),
    ];
    for (x, label, value) in &row_a {
        ops.extend(metric_cell(*x, y, label, value));
    }
    y += 12.0;

    let row_b = [
        (col1, "IRR", format_percent(scenario.irr)),
        (col2, "NPV", format_currency(scenario.npv)),
        (col3, "Payback", format_years(scenario.payback_period)),
        (col4, "Risk", scenario.risk_level.clone()),
    ];
    for (x, label, value) in &row_b {
        ops.extend(metric_cell(*x, y, label, value));
    }
    ops.push(DrawOp::Rect {
        x: col4 - 3.0,
        y: y + 2.0,
        w: 2.0,
        h: 2.0,
        fill: RiskCategory::classify(&scenario.risk_level).color(),
    });
    y += 14.0;

    Block::new(BlockKind::ScenarioCard, y, y, ops)
}

pub fn write(w: &mut BlockWriter<'_>, study: &Study) {
    if let Some(rec) = recommendation(study) {
        w.wrapped(
            BlockKind::Callout,
            &format!("Recommendation: {}", rec),
            FontStyle::Oblique,
            CALLOUT_GREEN,
        );
        w.spacer(4.0);
    }

    for scenario in &study.scenarios {
        let block = card(w, study, scenario);
        w.push(block);
    }
    w.spacer(4.0);
}

pub fn text(study: &Study) -> String {
    let mut out = String::new();
    if let Some(rec) = recommendation(study) {
        out.push_str(&format!("Recommendation: {}\n", rec));
    }

    for scenario in &study.scenarios {
        out.push_str(&format!(
            "\n{}\n  Land Use: {}\n  Description: {}\n\n  GFA: {} sqm | Units: {}\n  Est. Cost: {} | Revenue: {}\n  IRR: {} | NPV: {}\n  Payback: {} | Risk: {}\n",
            heading(study, scenario),
            scenario.land_use,
            scenario.description,
            format_number(scenario.gfa),
            units_label(scenario),
            format_millions(scenario.estimated_cost),
            format_millions(scenario.projected_revenue),
            format_percent(scenario.irr),
            format_millions(scenario.npv),
            format_years(scenario.payback_period),
            scenario.risk_level,
        ));
    }
    out
}
