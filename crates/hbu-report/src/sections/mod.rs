//! Report sections.
//!
//! Every section module provides two renderings of the same content: `write`
//! appends layout blocks for the paginated document and `text` returns the
//! plain-text body (without the banner, which [`crate::text`] adds).

pub mod conclusion;
pub mod financial;
pub mod market;
pub mod program;
pub mod property;
pub mod risks;
pub mod scenarios;
pub mod zoning;

use crate::config::PageGeometry;
use crate::format::Rgb;
use crate::layout::{Block, BlockKind, DrawOp, FontStyle};
use crate::metrics::split_text_to_size;

/// Body text size in points.
pub const BODY_SIZE: f32 = 9.0;

pub const LABEL_GRAY: Rgb = (100, 100, 100);
pub const HEADER_FILL: Rgb = (240, 240, 240);
pub const TABLE_FILL: Rgb = (230, 230, 230);
pub const POSITIVE_GREEN: Rgb = (0, 128, 0);
pub const CALLOUT_GREEN: Rgb = (0, 100, 0);

/// Accumulates layout blocks for one document.
pub struct BlockWriter<'g> {
    geometry: &'g PageGeometry,
    blocks: Vec<Block>,
}

impl<'g> BlockWriter<'g> {
    pub fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            blocks: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        self.geometry
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn finish(self) -> Vec<Block> {
        self.blocks
    }

    pub fn spacer(&mut self, advance: f32) {
        self.push(Block::spacer(advance));
    }

    /// Shaded full-width banner.
    pub fn section_header(&mut self, title: &str) {
        let g = self.geometry;
        self.push(Block::new(
            BlockKind::SectionHeader,
            30.0,
            12.0,
            vec![
                DrawOp::Rect {
                    x: g.margin,
                    y: -4.0,
                    w: g.content_width(),
                    h: 10.0,
                    fill: HEADER_FILL,
                },
                DrawOp::text(g.margin + 2.0, 2.0, title, FontStyle::Bold, 12.0),
            ],
        ));
    }

    pub fn subheader(&mut self, title: &str) {
        let x = self.geometry.margin;
        self.push(Block::new(
            BlockKind::SubHeader,
            15.0,
            6.0,
            vec![DrawOp::text(x, 0.0, title, FontStyle::Bold, 10.0)],
        ));
    }

    /// Wrap `text` to the content width, one checked block per line.
    pub fn wrapped(&mut self, kind: BlockKind, text: &str, font: FontStyle, color: Rgb) {
        let g = self.geometry;
        for line in split_text_to_size(text, g.content_width(), BODY_SIZE) {
            let ops = if line.is_empty() {
                Vec::new()
            } else {
                vec![DrawOp::text(g.margin, 0.0, line, font, BODY_SIZE).colored(color)]
            };
            self.push(Block::new(kind, 5.0, 4.0, ops));
        }
    }

    /// Body paragraph.
    pub fn paragraph(&mut self, text: &str) {
        self.wrapped(BlockKind::TextLine, text, FontStyle::Regular, crate::layout::BLACK);
    }

    /// Up to four label/value cells on the column anchors.
    pub fn metric_row(&mut self, cells: &[(&str, String)], advance: f32) {
        let columns = self.geometry.columns();
        let ops = cells
            .iter()
            .zip(columns)
            .flat_map(|((label, value), x)| metric_cell(x, 0.0, label, value))
            .collect();
        self.push(Block::new(BlockKind::MetricRow, 12.0, advance, ops));
    }

    /// Two-column key/value line on the first two anchors.
    pub fn pair_row(&mut self, label: &str, value: String, font: FontStyle, value_color: Rgb, advance: f32) {
        let [col1, col2, ..] = self.geometry.columns();
        self.push(Block::new(
            BlockKind::TableRow,
            6.0,
            advance,
            vec![
                DrawOp::text(col1, 0.0, label, font, BODY_SIZE),
                DrawOp::text(col2, 0.0, value, font, BODY_SIZE).colored(value_color),
            ],
        ));
    }

    /// Shaded table header of `width` with bold labels at the given anchors.
    pub fn table_header(&mut self, labels: &[(f32, &str)], width: f32, fill: Rgb, reserve: f32, advance: f32) {
        let x = self.geometry.margin;
        let mut ops = vec![DrawOp::Rect {
            x,
            y: -3.0,
            w: width,
            h: 6.0,
            fill,
        }];
        ops.extend(
            labels
                .iter()
                .map(|(lx, label)| DrawOp::text(*lx, 0.0, *label, FontStyle::Bold, BODY_SIZE)),
        );
        self.push(Block::new(BlockKind::TableHeader, reserve, advance, ops));
    }
}

/// Gray label over a bold value, relative to `y`.
pub fn metric_cell(x: f32, y: f32, label: &str, value: &str) -> Vec<DrawOp> {
    vec![
        DrawOp::text(x, y, label, FontStyle::Regular, BODY_SIZE).colored(LABEL_GRAY),
        DrawOp::text(x, y + 4.0, value, FontStyle::Bold, BODY_SIZE),
    ]
}

/// Title line underlined with `ch` to the same length.
pub fn banner(title: &str, ch: char) -> String {
    let underline: String = std::iter::repeat(ch).take(title.chars().count()).collect();
    format!("{}\n{}", title, underline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_underline_matches_length() {
        assert_eq!(banner("1. ZONING DETAILS", '-'), "1. ZONING DETAILS\n-----------------");
        assert_eq!(banner("A & B", '='), "A & B\n=====");
    }

    #[test]
    fn test_paragraph_emits_one_block_per_line() {
        let g = PageGeometry::default();
        let mut w = BlockWriter::new(&g);
        w.paragraph("one\ntwo\nthree");
        let blocks = w.finish();
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| b.kind == BlockKind::TextLine && b.reserve == Some(5.0)));
    }

    #[test]
    fn test_metric_row_uses_column_anchors() {
        let g = PageGeometry::default();
        let mut w = BlockWriter::new(&g);
        w.metric_row(&[("GFA", "1,000 sqm".into()), ("Units", "N/A".into())], 12.0);
        let blocks = w.finish();
        let xs: Vec<f32> = blocks[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![20.0, 20.0, 65.0, 65.0]);
    }
}
