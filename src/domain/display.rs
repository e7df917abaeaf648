//! Formatting helpers for values rendered on dashboard pages.

use chrono::{DateTime, NaiveDateTime};

/// Format a backend timestamp for display.
///
/// The backend emits naive ISO-8601 (`2025-01-02T09:30:00.123456`); some
/// proxies add an offset. Anything unparseable is shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    const OUT: &str = "%Y/%m/%d %H:%M:%S";
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(OUT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_local().format(OUT).to_string();
    }
    raw.to_string()
}

pub fn format_optional_timestamp(raw: Option<&str>) -> String {
    raw.map(format_timestamp).unwrap_or_default()
}

/// Prices are shown without trailing zeros; market orders carry price 0.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) if p != 0.0 => {
            let s = format!("{p:.4}");
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        Some(_) => "市價".to_string(),
        None => "-".to_string(),
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set, for use
/// in a single path segment or query value.
pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}
