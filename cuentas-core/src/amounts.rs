//! Amount Normalizer: locale-formatted strings and numbers into magnitudes.
//!
//! Parsing never fails. A malformed cell becomes 0.0 so one bad value does not
//! abort a batch; zero-amount rows are dropped later by the import rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::is_blank;

static DOT_THOUSANDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d{1,3}(\.\d{3})+$").expect("valid regex"));
static COMMA_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+,\d{1,2}$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawAmount {
    Text(String),
    Number(f64),
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        RawAmount::Text(s.to_string())
    }
}

impl From<f64> for RawAmount {
    fn from(n: f64) -> Self {
        RawAmount::Number(n)
    }
}

/// Non-negative magnitude of the amount.
pub fn parse_amount(raw: &RawAmount) -> f64 {
    parse_signed_amount(raw).abs()
}

/// Amount with its sign as written; used to infer a kind at import time.
pub fn parse_signed_amount(raw: &RawAmount) -> f64 {
    match raw {
        RawAmount::Number(n) if n.is_finite() => *n,
        RawAmount::Number(_) => 0.0,
        RawAmount::Text(s) => parse_text(s),
    }
}

fn parse_text(raw: &str) -> f64 {
    if is_blank(raw) {
        return 0.0;
    }

    let mut s: String = raw
        .replace("COP", "")
        .replace("USD", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != '\u{a0}')
        .collect();

    let mut negative = false;
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        s = inner.to_string();
        negative = true;
    }
    if let Some(rest) = s.strip_prefix('+') {
        s = rest.to_string();
    }

    let normalized = normalize_separators(&s);
    let value: f64 = normalized.parse().unwrap_or(0.0);
    if !value.is_finite() {
        return 0.0;
    }
    if negative { -value.abs() } else { value }
}

/// Rewrite "1.800.000,50" / "1,800,000.50" / "1.800" into dot-decimal form.
fn normalize_separators(s: &str) -> String {
    let last_dot = s.rfind('.');
    let last_comma = s.rfind(',');

    match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(_), None) if DOT_THOUSANDS.is_match(s) => s.replace('.', ""),
        (None, Some(_)) if COMMA_DECIMAL.is_match(s) => s.replace(',', "."),
        (None, Some(_)) => s.replace(',', ""),
        _ => s.to_string(),
    }
}
