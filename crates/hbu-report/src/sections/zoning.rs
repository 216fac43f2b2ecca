//! Zoning regulation summary.

use super::BlockWriter;
use crate::format::format_plain;
use crate::layout::{BlockKind, FontStyle, BLACK};
use hbu_common::ZoningDetails;

fn meters(value: f64) -> String {
    format!("{}m", format_plain(value))
}

pub fn write(w: &mut BlockWriter<'_>, z: &ZoningDetails) {
    w.metric_row(
        &[
            ("Zoning Code", z.zoning_code.clone()),
            ("Land Use Category", z.land_use_category.clone()),
            ("Max FAR", format_plain(z.max_far)),
            ("Max Height", meters(z.max_height)),
        ],
        12.0,
    );
    w.metric_row(
        &[
            ("Max Coverage", format!("{}%", format_plain(z.max_coverage))),
            ("Front Setback", meters(z.setbacks.front)),
            ("Rear Setback", meters(z.setbacks.rear)),
            ("Side Setback", meters(z.setbacks.side)),
        ],
        12.0,
    );

    w.subheader("Permitted Uses:");
    w.wrapped(BlockKind::TextLine, &z.permitted_uses.join(", "), FontStyle::Regular, BLACK);
    w.spacer(2.0);

    if !z.conditional_uses.is_empty() {
        w.subheader("Conditional Uses:");
        w.wrapped(BlockKind::TextLine, &z.conditional_uses.join(", "), FontStyle::Regular, BLACK);
        w.spacer(2.0);
    }

    w.subheader("Parking Requirements:");
    w.paragraph(&z.parking_requirements);
    w.spacer(2.0);

    w.subheader("Building Code Notes:");
    w.paragraph(&z.building_code_notes);
    w.spacer(6.0);
}

pub fn text(z: &ZoningDetails) -> String {
    let mut out = format!(
        "Zoning Code: {} | Land Use Category: {}\nMax FAR: {} | Max Height: {} | Max Coverage: {}%\nSetbacks: Front {} | Rear {} | Side {}\n\nPermitted Uses: {}\n",
        z.zoning_code,
        z.land_use_category,
        format_plain(z.max_far),
        meters(z.max_height),
        format_plain(z.max_coverage),
        meters(z.setbacks.front),
        meters(z.setbacks.rear),
        meters(z.setbacks.side),
        z.permitted_uses.join(", "),
    );
    if !z.conditional_uses.is_empty() {
        out.push_str(&format!("Conditional Uses: {}\n", z.conditional_uses.join(", ")));
    }
    out.push_str(&format!(
        "\nParking: {}\nBuilding Code: {}\n",
        z.parking_requirements, z.building_code_notes
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageGeometry;
    use crate::layout::DrawOp;
    use hbu_common::Setbacks;

    fn zoning(conditional: Vec<&str>) -> ZoningDetails {
        ZoningDetails {
            zoning_code: "C-1 Commercial".to_string(),
            land_use_category: "Commercial".to_string(),
            permitted_uses: vec!["Office".to_string(), "Retail".to_string()],
            conditional_uses: conditional.into_iter().map(str::to_string).collect(),
            max_far: 4.0,
            max_height: 60.0,
            max_coverage: 70.0,
            setbacks: Setbacks {
                front: 6.0,
                rear: 5.0,
                side: 4.0,
            },
            parking_requirements: "1 space per 50 sqm".to_string(),
            building_code_notes: "SBC 2018".to_string(),
        }
    }

    fn texts(z: &ZoningDetails) -> Vec<String> {
        let g = PageGeometry::default();
        let mut w = BlockWriter::new(&g);
        write(&mut w, z);
        w.finish()
            .into_iter()
            .flat_map(|b| b.ops)
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_conditional_uses_omitted_when_empty() {
        let without = texts(&zoning(vec![]));
        assert!(!without.iter().any(|t| t == "Conditional Uses:"));

        let with = texts(&zoning(vec!["Healthcare"]));
        assert!(with.iter().any(|t| t == "Conditional Uses:"));
        assert!(with.iter().any(|t| t == "Healthcare"));
    }

    #[test]
    fn test_values_formatted_plainly() {
        let all = texts(&zoning(vec![]));
        for expected in ["4", "60m", "70%", "6m", "5m", "4m", "Office, Retail"] {
            assert!(all.iter().any(|t| t == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_text_layout() {
        let out = text(&zoning(vec![]));
        assert!(out.starts_with("Zoning Code: C-1 Commercial | Land Use Category: Commercial\n"));
        assert!(out.contains("Max FAR: 4 | Max Height: 60m | Max Coverage: 70%\n"));
        assert!(out.contains("Setbacks: Front 6m | Rear 5m | Side 4m\n"));
        assert!(!out.contains("Conditional Uses"));
        assert!(out.ends_with("Parking: 1 space per 50 sqm\nBuilding Code: SBC 2018\n"));
    }
}
