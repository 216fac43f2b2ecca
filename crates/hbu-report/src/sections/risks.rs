//! Numbered risk factors.

use super::{BlockWriter, BODY_SIZE};
use crate::layout::{Block, BlockKind, DrawOp, FontStyle};
use crate::metrics::split_text_to_size;

pub fn write(w: &mut BlockWriter<'_>, risks: &[String]) {
    let g = *w.geometry();
    for (i, risk) in risks.iter().enumerate() {
        let item = format!("{}. {}", i + 1, risk);
        for (n, line) in split_text_to_size(&item, g.content_width(), BODY_SIZE)
            .into_iter()
            .enumerate()
        {
            let reserve = if n == 0 { 8.0 } else { 5.0 };
            w.push(Block::new(
                BlockKind::RiskItem,
                reserve,
                4.0,
                vec![DrawOp::text(g.margin, 0.0, line, FontStyle::Regular, BODY_SIZE)],
            ));
        }
        w.spacer(1.0);
    }
    w.spacer(4.0);
}

pub fn text(risks: &[String]) -> String {
    risks
        .iter()
        .enumerate()
        .map(|(i, risk)| format!("{}. {}\n", i + 1, risk))
        .collect()
}
