//! Locale-aware value normalization for sheet cells.
//!
//! Amounts arrive Indonesian style (`Rp 12.500,50`: dot thousands, comma
//! decimals). Dates arrive as `DD/MM/YYYY`, `DD-MM-YYYY` or `YYYY-MM-DD`.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

/// Accepted date layouts, tried in order.
pub const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

fn currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)rp").expect("invalid currency regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

// Longest leading float literal, e.g. "12500.75" out of "12500.75IDR"
fn leading_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("invalid number regex")
    })
}

/// Parse a currency cell into a number. Unreadable input yields `0.0`.
pub fn normalize_amount(raw: &str) -> f64 {
    if raw.trim().is_empty() {
        return 0.0;
    }

    let without_marker = currency_re().replace_all(raw, "");
    let compact = whitespace_re().replace_all(&without_marker, "");
    let canonical = compact.replace('.', "").replace(',', ".");

    leading_number_re()
        .find(&canonical)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a date cell, trying each accepted layout in order.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
