//! Fuzz target for report number formatting.
//!
//! Study figures come from model output and are never validated, so every
//! formatter must accept any f64, including NaN and infinities.

#![no_main]

use hbu_report::format::{
    format_currency, format_millions, format_number, format_percent, format_plain, format_years,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|value: f64| {
    let _ = format_number(value);
    let _ = format_plain(value);
    let _ = format_currency(value);
    let _ = format_millions(value);
    let _ = format_percent(value);
    let _ = format_years(value);
});
