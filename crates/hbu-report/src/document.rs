//! Paginated document rendering.
//!
//! [`DocumentRenderer`] turns a study and its plot into laid-out pages. PDF
//! serialization lives in [`crate::pdf`].

use crate::config::ReportConfig;
use crate::layout::{layout, Block, DrawOp, Layout};
use crate::sections::{self, BlockWriter};
use crate::text::numbered_title;
use chrono::NaiveDate;
use hbu_common::{Plot, ReportSection, Study};
use tracing::debug;

/// A rendered, not yet serialized, document.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    /// Suggested download name.
    pub filename: String,
    pub layout: Layout,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.layout.page_count()
    }

    /// Text runs in drawing order across all pages.
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.layout
            .pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Rect { .. } => None,
            })
    }
}

/// `HBU-Study-<parcel>-<YYYY-MM-DD>.pdf`.
pub fn document_filename(plot: &Plot, date: NaiveDate) -> String {
    format!("HBU-Study-{}-{}.pdf", plot.parcel_number, date.format("%Y-%m-%d"))
}

/// Renders studies into paginated documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    config: ReportConfig,
}

impl DocumentRenderer {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Block list for `study`, before layout.
    pub fn blocks(&self, study: &Study, plot: &Plot) -> Vec<Block> {
        let mut w = BlockWriter::new(&self.config.page);
        sections::property::write(&mut w, &self.config.title, study, plot);

        let mut n = 0;
        for section in study.populated_sections() {
            n += 1;
            w.section_header(&numbered_title(n, section));
            match section {
                ReportSection::Scenarios => sections::scenarios::write(&mut w, study),
                ReportSection::Zoning => {
                    if let Some(z) = &study.zoning_details {
                        sections::zoning::write(&mut w, z);
                    }
                }
                ReportSection::Market => {
                    if let Some(m) = &study.market_data {
                        sections::market::write(&mut w, m);
                    }
                }
                ReportSection::SpaceProgram => {
                    if let Some(p) = &study.space_program {
                        sections::program::write(&mut w, p);
                    }
                }
                ReportSection::Financial => {
                    if let Some(f) = &study.financial_summary {
                        sections::financial::write(&mut w, f);
                    }
                }
                ReportSection::RiskFactors => sections::risks::write(&mut w, &study.risk_factors),
                ReportSection::Conclusion => {
                    if let Some(c) = &study.conclusion {
                        sections::conclusion::write(&mut w, c);
                    }
                }
            }
        }

        w.finish()
    }

    pub fn render(&self, study: &Study, plot: &Plot) -> Document {
        let blocks = self.blocks(study, plot);
        let layout = layout(&blocks, &self.config.page);
        let filename = document_filename(plot, self.config.effective_export_date());

        debug!(
            study_id = %study.id,
            blocks = blocks.len(),
            pages = layout.page_count(),
            filename = %filename,
            "document rendered"
        );

        Document {
            title: self.config.title.clone(),
            filename,
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BlockKind;
    use hbu_common::{PlotId, StudyId};

    fn plot() -> Plot {
        Plot {
            id: PlotId::from("plot-001"),
            address: "King Fahd Road".to_string(),
            parcel_number: "RY-2024-00123".to_string(),
            latitude: 24.7136,
            longitude: 46.6753,
            size: 10117.0,
            zoning: "C-1 Commercial".to_string(),
            current_use: "Mixed Use Development".to_string(),
            market_value: None,
            owner_name: None,
            boundaries: None,
        }
    }

    fn study() -> Study {
        Study {
            id: StudyId::from("study-1"),
            plot_id: PlotId::from("plot-001"),
            created_at: chrono::Utc::now(),
            executive_summary: "Summary.".to_string(),
            zoning_details: None,
            market_data: None,
            scenarios: vec![],
            recommended_scenario: None,
            space_program: None,
            financial_summary: None,
            risk_factors: vec![],
            conclusion: Some("Next steps.".to_string()),
        }
    }

    #[test]
    fn test_filename_uses_export_date() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 2).unwrap();
        let renderer = DocumentRenderer::new(ReportConfig::new().with_export_date(date));
        let doc = renderer.render(&study(), &plot());
        assert_eq!(doc.filename, "HBU-Study-RY-2024-00123-2024-11-02.pdf");
    }

    #[test]
    fn test_minimal_study_headers() {
        let doc = DocumentRenderer::default().render(&study(), &plot());
        let runs: Vec<&str> = doc.text_runs().collect();

        assert_eq!(runs[0], "Highest & Best Use Study");
        assert_eq!(runs[1], "Property: King Fahd Road");
        assert!(runs.contains(&"EXECUTIVE SUMMARY"));
        assert!(runs.contains(&"1. CONCLUSION & NEXT STEPS"));
        assert_eq!(runs.last(), Some(&"Next steps."));
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_one_header_per_populated_section() {
        let mut s = study();
        s.risk_factors = vec!["Oversupply".to_string()];
        let blocks = DocumentRenderer::default().blocks(&s, &plot());
        let headers = blocks
            .iter()
            .filter(|b| b.kind == BlockKind::SectionHeader)
            .count();
        // Executive summary plus two numbered sections
        assert_eq!(headers, 3);
    }
}
