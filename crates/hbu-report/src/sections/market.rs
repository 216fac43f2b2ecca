//! Market conditions.

use super::{BlockWriter, BODY_SIZE, HEADER_FILL};
use crate::layout::{Block, BlockKind, DrawOp, FontStyle};
use crate::metrics::split_text_to_size;
use hbu_common::MarketData;

/// Horizontal offset of the value column from the margin.
const VALUE_OFFSET: f32 = 55.0;

fn metrics(m: &MarketData) -> [(&'static str, &str); 4] {
    [
        ("Vacancy Rate", m.vacancy_rate.as_str()),
        ("Average Rent", m.average_rent.as_str()),
        ("Cap Rate", m.cap_rate.as_str()),
        ("Absorption Rate", m.absorption_rate.as_str()),
    ]
}

/// One metric row. The value column wraps; continuation lines are their own
/// checked blocks.
fn metric_rows(w: &mut BlockWriter<'_>, label: &str, value: &str) {
    let g = *w.geometry();
    let value_x = g.margin + VALUE_OFFSET;
    let mut lines = split_text_to_size(value, g.content_width() - 60.0, BODY_SIZE).into_iter();

    let mut ops = vec![DrawOp::text(g.margin + 2.0, 0.0, label, FontStyle::Regular, BODY_SIZE)];
    if let Some(first) = lines.next() {
        ops.push(DrawOp::text(value_x, 0.0, first, FontStyle::Regular, BODY_SIZE));
    }
    w.push(Block::new(BlockKind::TableRow, 6.0, 0.0, ops));

    for line in lines {
        w.push(Block::new(
            BlockKind::TableRow,
            4.0,
            4.0,
            vec![DrawOp::text(value_x, 4.0, line, FontStyle::Regular, BODY_SIZE)],
        ));
    }
    w.spacer(5.0);
}

pub fn write(w: &mut BlockWriter<'_>, m: &MarketData) {
    w.subheader("Demand Drivers:");
    w.paragraph(&m.demand_drivers.join(", "));
    w.spacer(4.0);

    let g = *w.geometry();
    w.table_header(
        &[(g.margin + 2.0, "Metric"), (g.margin + VALUE_OFFSET, "Value")],
        g.content_width(),
        HEADER_FILL,
        13.0,
        7.0,
    );
    for (label, value) in metrics(m) {
        metric_rows(w, label, value);
    }
    w.spacer(4.0);

    w.subheader("Comparable Transactions:");
    w.paragraph(&m.comparable_transactions);
    w.spacer(2.0);

    w.subheader("Market Trends:");
    w.paragraph(&m.market_trends);
    w.spacer(6.0);
}

pub fn text(m: &MarketData) -> String {
    format!(
        "Demand Drivers: {}\n\nVacancy Rate: {} | Average Rent: {}\nCap Rate: {} | Absorption: {}\n\nComparables: {}\nMarket Trends: {}\n",
        m.demand_drivers.join(", "),
        m.vacancy_rate,
        m.average_rent,
        m.cap_rate,
        m.absorption_rate,
        m.comparable_transactions,
        m.market_trends,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageGeometry;

    fn market() -> MarketData {
        MarketData {
            demand_drivers: vec!["Vision 2030".to_string(), "Population growth".to_string()],
            vacancy_rate: "8-12%".to_string(),
            average_rent: "SAR 1,200-1,800/sqm/year".to_string(),
            cap_rate: "7.0-8.0%".to_string(),
            absorption_rate: "Strong".to_string(),
            comparable_transactions: "Recent sales near SAR 10,000/sqm.".to_string(),
            market_trends: "Upward.".to_string(),
        }
    }

    #[test]
    fn test_short_values_take_one_row() {
        let g = PageGeometry::default();
        let mut w = BlockWriter::new(&g);
        metric_rows(&mut w, "Cap Rate", "7.0-8.0%");
        let blocks = w.finish();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].reserve, Some(6.0));
        assert_eq!(blocks[0].advance, 0.0);
        assert_eq!(blocks[1].kind, BlockKind::Spacer);
        assert_eq!(blocks[1].advance, 5.0);
    }

    #[test]
    fn test_long_values_wrap_into_continuation_rows() {
        let g = PageGeometry::default();
        let mut w = BlockWriter::new(&g);
        let long = "steady absorption across the northern corridor ".repeat(6);
        metric_rows(&mut w, "Absorption Rate", &long);
        let blocks = w.finish();

        let continuation: Vec<_> = blocks[1..blocks.len() - 1].iter().collect();
        assert!(!continuation.is_empty());
        assert!(continuation
            .iter()
            .all(|b| b.reserve == Some(4.0) && b.advance == 4.0));
        for b in continuation {
            for op in &b.ops {
                if let DrawOp::Text { x, .. } = op {
                    assert_eq!(*x, g.margin + VALUE_OFFSET);
                }
            }
        }
    }

    #[test]
    fn test_write_emits_all_metric_labels() {
        let g = PageGeometry::default();
        let mut w = BlockWriter::new(&g);
        write(&mut w, &market());
        let texts: Vec<String> = w
            .finish()
            .into_iter()
            .flat_map(|b| b.ops)
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        for label in ["Vacancy Rate", "Average Rent", "Cap Rate", "Absorption Rate", "Metric", "Value"] {
            assert!(texts.iter().any(|t| t == label), "missing {label}");
        }
        assert!(texts.iter().any(|t| t == "Vision 2030, Population growth"));
    }

    #[test]
    fn test_text_layout() {
        let out = text(&market());
        assert_eq!(
            out,
            "Demand Drivers: Vision 2030, Population growth\n\n\
             Vacancy Rate: 8-12% | Average Rent: SAR 1,200-1,800/sqm/year\n\
             Cap Rate: 7.0-8.0% | Absorption: Strong\n\n\
             Comparables: Recent sales near SAR 10,000/sqm.\n\
             Market Trends: Upward.\n"
        );
    }
}
