//! Fuzz target for config.toml parsing.
//!
//! Tests that TOML configuration parsing and validation handle arbitrary
//! input without panicking.

#![no_main]

use hbu_config::{validate_config, HbuConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(config) = HbuConfig::parse_toml(data) {
        let _ = validate_config(&config);
    }
});
