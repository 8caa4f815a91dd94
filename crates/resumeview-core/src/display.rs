//! Text helpers shared by every front end.

use chrono::{DateTime, NaiveDateTime};

/// Render an optional extracted field, substituting `placeholder` when the
/// service sent nothing or an empty (or whitespace-only) string.
pub fn display_or<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder,
    }
}

/// How much of an upload timestamp to spell out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Mar 14, 2025, 09:26 AM`
    Short,
    /// `March 14, 2025 at 09:26 AM`
    Long,
}

/// Format an ISO 8601 upload timestamp for display.
///
/// Accepts RFC 3339 (with offset) and naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// timestamps. The wall-clock time carried by the string is rendered as is.
/// Anything unparseable is returned unchanged.
pub fn format_upload_date(raw: &str, style: DateStyle) -> String {
    let naive = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| raw.parse::<NaiveDateTime>());
    let Ok(naive) = naive else {
        return raw.to_string();
    };
    let pattern = match style {
        DateStyle::Short => "%b %-d, %Y, %I:%M %p",
        DateStyle::Long => "%B %-d, %Y at %I:%M %p",
    };
    naive.format(pattern).to_string()
}
