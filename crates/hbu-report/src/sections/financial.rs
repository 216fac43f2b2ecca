//! Financial summary.
//!
//! Amounts use the suffix-scaled currency format in both renderings.

use super::{BlockWriter, POSITIVE_GREEN, TABLE_FILL};
use crate::format::{format_currency, format_percent};
use crate::layout::{FontStyle, BLACK};
use hbu_common::FinancialSummary;

pub fn write(w: &mut BlockWriter<'_>, f: &FinancialSummary) {
    let [col1, col2, ..] = w.geometry().columns();

    w.subheader("Development Costs:");
    w.spacer(2.0);
    w.table_header(
        &[(col1 + 2.0, "Cost Item"), (col2, "Amount (SAR)")],
        80.0,
        TABLE_FILL,
        13.0,
        7.0,
    );
    w.pair_row("Land Value", format_currency(f.land_value), FontStyle::Regular, BLACK, 5.0);
    w.pair_row("Hard Costs", format_currency(f.hard_costs), FontStyle::Regular, BLACK, 5.0);
    w.pair_row("Soft Costs", format_currency(f.soft_costs), FontStyle::Regular, BLACK, 5.0);
    w.pair_row(
        "Total Development Cost",
        format_currency(f.total_development_cost),
        FontStyle::Bold,
        BLACK,
        10.0,
    );

    w.subheader("Capital Structure:");
    w.pair_row("Debt Financing", format_currency(f.debt_financing), FontStyle::Regular, BLACK, 5.0);
    w.pair_row("Equity Required", format_currency(f.equity_required), FontStyle::Regular, BLACK, 10.0);

    w.subheader("Returns:");
    w.pair_row(
        "Projected NOI",
        format_currency(f.projected_noi),
        FontStyle::Regular,
        POSITIVE_GREEN,
        5.0,
    );
    w.pair_row("Stabilized Value", format_currency(f.stabilized_value), FontStyle::Regular, BLACK, 10.0);

    w.subheader("Key Metrics:");
    w.pair_row(
        "Development Margin",
        format_percent(f.development_margin),
        FontStyle::Bold,
        POSITIVE_GREEN,
        5.0,
    );
    w.pair_row(
        "Return on Cost",
        format_percent(f.return_on_cost),
        FontStyle::Bold,
        POSITIVE_GREEN,
        10.0,
    );
}

pub fn text(f: &FinancialSummary) -> String {
    format!(
        "Development Costs:\n  Land Value: {}\n  Hard Costs: {}\n  Soft Costs: {}\n  Total Development Cost: {}\n\n\
         Capital Structure:\n  Debt Financing: {}\n  Equity Required: {}\n\n\
         Returns:\n  Projected NOI: {}\n  Stabilized Value: {}\n\n\
         Key Metrics:\n  Development Margin: {}\n  Return on Cost: {}\n",
        format_currency(f.land_value),
        format_currency(f.hard_costs),
        format_currency(f.soft_costs),
        format_currency(f.total_development_cost),
        format_currency(f.debt_financing),
        format_currency(f.equity_required),
        format_currency(f.projected_noi),
        format_currency(f.stabilized_value),
        format_percent(f.development_margin),
        format_percent(f.return_on_cost),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageGeometry;
    use crate::layout::{BlockKind, DrawOp};

    fn summary() -> FinancialSummary {
        FinancialSummary {
            land_value: 45_000_000.0,
            hard_costs: 108_776_640.0,
            soft_costs: 16_834_480.0,
            total_development_cost: 170_611_120.0,
            debt_financing: 110_897_228.0,
            equity_required: 59_713_892.0,
            projected_noi: 37_553_840.0,
            stabilized_value: 500_717_866.0,
            development_margin: 48.5,
            return_on_cost: 11.8,
        }
    }

    #[test]
    fn test_returns_are_green() {
        let g = PageGeometry::default();
        let mut w = BlockWriter::new(&g);
        write(&mut w, &summary());
        let green: Vec<String> = w
            .finish()
            .into_iter()
            .flat_map(|b| b.ops)
            .filter_map(|op| match op {
                DrawOp::Text { text, color, .. } if color == POSITIVE_GREEN => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(green, vec!["SAR 37.55M", "48.5%", "11.8%"]);
    }

    #[test]
    fn test_cost_table_is_narrow() {
        let g = PageGeometry::default();
        let mut w = BlockWriter::new(&g);
        write(&mut w, &summary());
        let blocks = w.finish();
        let header = blocks
            .iter()
            .find(|b| b.kind == BlockKind::TableHeader)
            .and_then(|b| b.ops.first().cloned());
        assert!(matches!(header, Some(DrawOp::Rect { w, .. }) if w == 80.0));
        assert_eq!(blocks.iter().filter(|b| b.kind == BlockKind::TableRow).count(), 10);
    }

    #[test]
    fn test_text_layout() {
        let out = text(&summary());
        assert!(out.starts_with("Development Costs:\n  Land Value: SAR 45.00M\n"));
        assert!(out.contains("  Total Development Cost: SAR 170.61M\n\nCapital Structure:\n"));
        assert!(out.contains("  Stabilized Value: SAR 500.72M\n"));
        assert!(out.ends_with("Key Metrics:\n  Development Margin: 48.5%\n  Return on Cost: 11.8%\n"));
    }
}
