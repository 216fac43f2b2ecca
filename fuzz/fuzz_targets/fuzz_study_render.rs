//! Fuzz target for rendering stored studies.
//!
//! Any study that deserializes must render to text and PDF without panicking,
//! whatever its strings and numbers look like.

#![no_main]

use hbu_common::{Plot, PlotId, Study};
use hbu_report::{render_text, write_pdf, DocumentRenderer, ReportConfig};
use libfuzzer_sys::fuzz_target;

fn plot() -> Plot {
    Plot {
        id: PlotId::from("plot-fuzz"),
        address: "Fuzz Street".to_string(),
        parcel_number: "RY-0000-00000".to_string(),
        latitude: 24.7,
        longitude: 46.7,
        size: 1000.0,
        zoning: "C-1 Commercial".to_string(),
        current_use: "Vacant Land".to_string(),
        market_value: None,
        owner_name: None,
        boundaries: None,
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(study) = serde_json::from_slice::<Study>(data) else {
        return;
    };
    let plot = plot();
    let _ = render_text("Highest & Best Use Study", &study, &plot);

    let config = ReportConfig::default().with_compression(false);
    let document = DocumentRenderer::new(config.clone()).render(&study, &plot);
    let _ = write_pdf(&document, &config);
});
