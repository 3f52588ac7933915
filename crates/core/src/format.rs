//! Display formatting for optional text and monetary amounts.
//!
//! These are pure helpers shared by the layout engine and the JSON mapping:
//! blank fields render as a dash, money renders with a fixed two-decimal
//! rounding applied at format time only.

/// Returns `fallback` when `s` is empty, otherwise `s`.
pub fn blank_or<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.is_empty() { fallback } else { s }
}

/// Rounds to two decimal places, half away from zero.
///
/// `f64::round` ties away from zero, matching the source semantics
/// (2.005 rounds to 2.01, -2.005 to -2.01).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Formats a monetary amount as `"<currency> <amount>"` with exactly two
/// decimal places. A blank currency code renders as a dash.
pub fn format_money(currency: &str, amount: f64) -> String {
    format!("{} {:.2}", blank_or(currency, "-"), round2(amount))
}
