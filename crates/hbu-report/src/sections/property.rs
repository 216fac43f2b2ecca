//! Title, property block and executive summary.

use super::{banner, BlockWriter};
use crate::format::{format_date, format_fixed, format_time};
use crate::layout::{Block, BlockKind, DrawOp, FontStyle};
use hbu_common::{Plot, Study};

fn parcel_line(plot: &Plot) -> String {
    format!(
        "Parcel: {} | Size: {} acres | Zoning: {}",
        plot.parcel_number,
        format_fixed(plot.size, 2),
        plot.zoning
    )
}

pub fn write(w: &mut BlockWriter<'_>, title: &str, study: &Study, plot: &Plot) {
    let x = w.geometry().margin;

    w.push(Block::new(
        BlockKind::Title,
        12.0,
        12.0,
        vec![DrawOp::text(x, 0.0, title, FontStyle::Bold, 20.0)],
    ));

    let generated = format!(
        "Generated: {} at {}",
        format_date(&study.created_at),
        format_time(&study.created_at)
    );
    let lines = [
        (format!("Property: {}", plot.address), 5.0),
        (parcel_line(plot), 5.0),
        (generated, 12.0),
    ];
    for (text, advance) in lines {
        w.push(Block::new(
            BlockKind::PropertyLine,
            5.0,
            advance,
            vec![DrawOp::text(x, 0.0, text, FontStyle::Regular, 11.0)],
        ));
    }

    w.section_header("EXECUTIVE SUMMARY");
    w.paragraph(&study.executive_summary);
    w.spacer(8.0);
}

pub fn text(title: &str, study: &Study, plot: &Plot) -> String {
    format!(
        "{}\n\nProperty: {}\n{}\nDate: {}\n\n{}\n{}\n",
        banner(&title.to_uppercase(), '='),
        plot.address,
        parcel_line(plot),
        format_date(&study.created_at),
        banner("EXECUTIVE SUMMARY", '-'),
        study.executive_summary
    )
}
