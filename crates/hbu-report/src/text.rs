//! Plain-text rendering.
//!
//! Mirrors the document's section order and numbering. The result is
//! trimmed and depends only on its inputs, so rendering the same study twice
//! gives identical strings.

use crate::sections::{self, banner};
use hbu_common::{Plot, ReportSection, Study};

/// Body of one populated section, or `None` when the study has no data for it.
pub(crate) fn section_body(section: ReportSection, study: &Study) -> Option<String> {
    match section {
        ReportSection::Scenarios => Some(sections::scenarios::text(study)),
        ReportSection::Zoning => study.zoning_details.as_ref().map(sections::zoning::text),
        ReportSection::Market => study.market_data.as_ref().map(sections::market::text),
        ReportSection::SpaceProgram => study.space_program.as_ref().map(sections::program::text),
        ReportSection::Financial => study.financial_summary.as_ref().map(sections::financial::text),
        ReportSection::RiskFactors => Some(sections::risks::text(&study.risk_factors)),
        ReportSection::Conclusion => study.conclusion.as_deref().map(sections::conclusion::text),
    }
}

/// Numbered section title, `1. ZONING DETAILS`.
pub fn numbered_title(n: usize, section: ReportSection) -> String {
    format!("{}. {}", n, section.title())
}

/// Render `study` for `plot` as plain text under `title`.
pub fn render_text(title: &str, study: &Study, plot: &Plot) -> String {
    let mut out = sections::property::text(title, study, plot);

    let numbered = study
        .populated_sections()
        .into_iter()
        .filter_map(|s| section_body(s, study).map(|body| (s, body)))
        .enumerate();
    for (i, (section, body)) in numbered {
        out.push_str("\n\n");
        out.push_str(&banner(&numbered_title(i + 1, section), '-'));
        out.push('\n');
        out.push_str(&body);
    }

    out.trim().to_string()
}
