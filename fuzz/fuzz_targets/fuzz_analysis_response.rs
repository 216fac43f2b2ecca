//! Fuzz target for analysis response detection.
//!
//! Model output is untrusted; shape detection must reject garbage with an
//! error and never panic.

#![no_main]

use hbu_common::{AnalysisResult, PlotId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(result) = AnalysisResult::from_json(data) {
        let _ = result.into_study(PlotId::from("plot-fuzz"), chrono::Utc::now());
    }
});
