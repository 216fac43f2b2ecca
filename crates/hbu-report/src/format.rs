//! Value formatting shared by both renderers.
//!
//! Output follows the `en-US` conventions the reports have always used:
//! comma thousands grouping, fixed-point rounding half away from zero, and
//! `NaN`/`Infinity` passed through unguarded.

use chrono::{DateTime, Utc};

/// Currency code prefixed to every amount.
pub const CURRENCY: &str = "SAR";

/// Fixed-point rendering with `digits` decimals.
///
/// Exact ties round away from zero (`2.5` → `3`); everything else rounds on
/// the exact binary value, so `1.005` stays `1.00`.
pub fn format_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // Negative zero prints without a sign
    let value = if value == 0.0 { 0.0 } else { value };

    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    // A tie only counts when the scaling itself was exact
    if (scaled - scaled.trunc()).abs() == 0.5 && value.mul_add(scale, -scaled) == 0.0 {
        format!("{:.*}", digits, scaled.round() / scale)
    } else {
        format!("{:.*}", digits, value)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Thousands-grouped number with at most three fraction digits.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format_fixed(value, 3);
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = format!("{}{}", sign, group_thousands(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Number as written by a plain string conversion (`4`, `3.5`, `0.1`).
pub fn format_plain(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

/// Suffix-scaled currency: `SAR 1.20B`, `SAR 2.50M`, `SAR 3K`, `SAR 999`.
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("{} {}B", CURRENCY, format_fixed(value / 1_000_000_000.0, 2))
    } else if value >= 1_000_000.0 {
        format!("{} {}M", CURRENCY, format_fixed(value / 1_000_000.0, 2))
    } else if value >= 1_000.0 {
        format!("{} {}K", CURRENCY, format_fixed(value / 1_000.0, 0))
    } else {
        format!("{} {}", CURRENCY, format_number(value))
    }
}

/// Millions with one decimal regardless of magnitude: `SAR 12.5M`.
pub fn format_millions(value: f64) -> String {
    format!("{} {}M", CURRENCY, format_fixed(value / 1_000_000.0, 1))
}

/// One decimal and a percent sign.
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_fixed(value, 1))
}

/// One decimal and ` years`.
pub fn format_years(value: f64) -> String {
    format!("{} years", format_fixed(value, 1))
}

/// `M/D/YYYY`.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// `h:mm:ss AM`.
pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%-I:%M:%S %p").to_string()
}

/// RGB color, 0-255 per channel.
pub type Rgb = (u8, u8, u8);

/// Display classification of a scenario risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    Neutral,
}

impl RiskCategory {
    /// Case-insensitive classification; unknown labels are neutral.
    pub fn classify(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "low" => RiskCategory::Low,
            "medium" => RiskCategory::Medium,
            "high" => RiskCategory::High,
            _ => RiskCategory::Neutral,
        }
    }

    /// Indicator fill color.
    pub fn color(&self) -> Rgb {
        match self {
            RiskCategory::Low => (34, 197, 94),
            RiskCategory::Medium => (234, 179, 8),
            RiskCategory::High => (239, 68, 68),
            RiskCategory::Neutral => (156, 163, 175),
        }
    }
}
