// Parsing, rounding and pt-BR formatting helpers.
//
// Everything that turns loosely-typed UI text into typed values, or typed
// values back into display text, lives here so the aggregators only ever see
// clean numbers.
use crate::types::Period;
use num_format::{Locale, ToFormattedString};

/// Parse optional text into `i32`, treating empty or unparseable input as
/// absent.
pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u32>().ok()
}

/// Round to two decimals, half away from zero (`f64::round` semantics).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Cases per 100 000 inhabitants, unrounded. A zero population yields 0.
pub fn rate_per_100k(cases: u64, population: u64) -> f64 {
    if population == 0 {
        return 0.0;
    }
    cases as f64 / population as f64 * 100_000.0
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // pt-BR groups thousands with `.` (e.g. `1.653.461`).
    n.to_formatted_string(&Locale::pt)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Same approach as `format_int`, but the fractional part is appended
    // with the locale's decimal separator (`1.234,56`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::pt);
    if let Some(frac) = parts.next() {
        res.push_str(Locale::pt.decimal());
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Rate as shown on map popups and compact cells: one decimal, plain `.`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}", rate)
}

/// Chart tick label for a period: `MM/YY`.
pub fn period_label(period: Period) -> String {
    format!("{:02}/{:02}", period.month, period.year.rem_euclid(100))
}
