//! Space program.

use super::{BlockWriter, BODY_SIZE, TABLE_FILL};
use crate::format::{format_number, format_plain};
use crate::layout::{Block, BlockKind, DrawOp, FontStyle};
use hbu_common::SpaceProgram;

fn sqm(value: f64) -> String {
    format!("{} sqm", format_number(value))
}

pub fn write(w: &mut BlockWriter<'_>, p: &SpaceProgram) {
    w.metric_row(
        &[
            ("Total GFA", sqm(p.total_gfa)),
            ("Buildable Area", sqm(p.buildable_area)),
            ("Efficiency", format!("{}%", format_plain(p.efficiency))),
            ("Floors", format_plain(p.floors)),
        ],
        14.0,
    );

    w.subheader("Component Breakdown:");
    w.spacer(2.0);

    let g = *w.geometry();
    let [col1, col2, col3, _] = g.columns();
    w.table_header(
        &[(col1 + 2.0, "Use"), (col2, "Area (sqm)"), (col3, "Percentage")],
        g.content_width(),
        TABLE_FILL,
        14.0,
        8.0,
    );

    for c in &p.components {
        w.push(Block::new(
            BlockKind::TableRow,
            6.0,
            5.0,
            vec![
                DrawOp::text(col1 + 2.0, 0.0, c.use_label.as_str(), FontStyle::Regular, BODY_SIZE),
                DrawOp::text(col2, 0.0, format_number(c.area), FontStyle::Regular, BODY_SIZE),
                DrawOp::text(
                    col3,
                    0.0,
                    format!("{}%", format_plain(c.percentage)),
                    FontStyle::Regular,
                    BODY_SIZE,
                ),
            ],
        ));
    }
    w.spacer(6.0);
}

pub fn text(p: &SpaceProgram) -> String {
    let mut out = format!(
        "Total GFA: {} | Buildable Area: {}\nEfficiency: {}% | Floors: {}\n\nComponent Breakdown:\n",
        sqm(p.total_gfa),
        sqm(p.buildable_area),
        format_plain(p.efficiency),
        format_plain(p.floors),
    );
    for c in &p.components {
        out.push_str(&format!(
            "  - {}: {} ({}%)\n",
            c.use_label,
            sqm(c.area),
            format_plain(c.percentage)
        ));
    }
    out
}
