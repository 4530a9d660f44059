//! Display formatting for raw API values.
//!
//! Everything here is pure: timestamps, status labels and long text go in,
//! display strings come out.

use std::borrow::Cow;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::sdk::{MemoryStatus, Timestamp};

/// Shown for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown for values that cannot be interpreted as a time.
pub const INVALID_DATE: &str = "Invalid Date";

/// Previews longer than this many characters are truncated.
pub const PREVIEW_MAX_CHARS: usize = 100;

const ELLIPSIS: &str = "...";

/// Display tone of a status badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusTone {
    /// Available / active.
    Success,
    /// Creating / updating.
    Warning,
    /// Deleting / failed.
    Danger,
    /// Anything else.
    #[default]
    Neutral,
}

impl StatusTone {
    /// Tone for a raw status label, ignoring case.
    #[must_use]
    pub fn for_status(status: &str) -> Self {
        match MemoryStatus::from_label(status) {
            Some(MemoryStatus::Available | MemoryStatus::Active) => Self::Success,
            Some(MemoryStatus::Creating | MemoryStatus::Updating) => Self::Warning,
            Some(MemoryStatus::Deleting | MemoryStatus::Failed) => Self::Danger,
            None => Self::Neutral,
        }
    }

    /// CSS class for this tone.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Success => "bg-success",
            Self::Warning => "bg-warning",
            Self::Danger => "bg-danger",
            Self::Neutral => "bg-secondary",
        }
    }
}

/// Format a timestamp in the local time zone.
#[must_use]
pub fn format_timestamp(value: Option<&Timestamp>) -> String {
    format_timestamp_in(value, &Local)
}

/// Format a timestamp in the given time zone as `M/D/YYYY, h:mm:ss AM`.
///
/// Missing values, zero epochs and empty strings read as [`NOT_AVAILABLE`].
/// Strings without an offset are interpreted in `tz`.
#[must_use]
pub fn format_timestamp_in<Tz>(value: Option<&Timestamp>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };

    let parsed = match value {
        Timestamp::Epoch(number) => {
            let Some(seconds) = number.as_f64() else {
                return INVALID_DATE.to_string();
            };
            if seconds == 0.0 {
                return NOT_AVAILABLE.to_string();
            }
            from_epoch_seconds(seconds, tz)
        }
        Timestamp::Text(text) => {
            if text.is_empty() {
                return NOT_AVAILABLE.to_string();
            }
            parse_text(text, tz)
        }
    };

    parsed.map_or_else(
        || INVALID_DATE.to_string(),
        |dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
    )
}

#[allow(clippy::cast_possible_truncation)]
fn from_epoch_seconds<Tz: TimeZone>(seconds: f64, tz: &Tz) -> Option<DateTime<Tz>> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(tz))
}

fn parse_text<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(tz));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

/// Cut `text` to [`PREVIEW_MAX_CHARS`] characters plus an ellipsis.
///
/// Borrows when no truncation is needed.
#[must_use]
pub fn truncate_preview(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(PREVIEW_MAX_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Escape text for interpolation into HTML bodies and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Value or [`NOT_AVAILABLE`] when missing or empty.
#[must_use]
pub fn or_not_available(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn epoch(n: i64) -> Timestamp {
        Timestamp::Epoch(n.into())
    }

    #[test]
    fn test_status_tone() {
        assert_eq!(StatusTone::for_status("ACTIVE"), StatusTone::Success);
        assert_eq!(StatusTone::for_status("available"), StatusTone::Success);
        assert_eq!(StatusTone::for_status("Creating"), StatusTone::Warning);
        assert_eq!(StatusTone::for_status("updating"), StatusTone::Warning);
        assert_eq!(StatusTone::for_status("FAILED"), StatusTone::Danger);
        assert_eq!(StatusTone::for_status("deleting"), StatusTone::Danger);
        assert_eq!(StatusTone::for_status("mystery"), StatusTone::Neutral);
        assert_eq!(StatusTone::for_status(""), StatusTone::Neutral);
    }

    #[test]
    fn test_format_epoch_seconds() {
        let ts = epoch(1_700_000_000);
        assert_eq!(format_timestamp_in(Some(&ts), &Utc), "11/14/2023, 10:13:20 PM");
    }

    #[test]
    fn test_format_fractional_epoch() {
        let ts = Timestamp::Epoch(serde_json::Number::from_f64(1_700_000_000.5).unwrap());
        assert_eq!(format_timestamp_in(Some(&ts), &Utc), "11/14/2023, 10:13:20 PM");
    }

    #[test]
    fn test_format_rfc3339_text() {
        let ts = Timestamp::Text("2025-01-02T03:04:05+00:00".to_string());
        assert_eq!(format_timestamp_in(Some(&ts), &Utc), "1/2/2025, 3:04:05 AM");
    }

    #[test]
    fn test_format_naive_text_uses_zone() {
        let ts = Timestamp::Text("2025-01-02T15:04:05.123456".to_string());
        assert_eq!(format_timestamp_in(Some(&ts), &Utc), "1/2/2025, 3:04:05 PM");
    }

    #[test]
    fn test_format_missing_and_invalid() {
        assert_eq!(format_timestamp_in(None, &Utc), NOT_AVAILABLE);
        assert_eq!(format_timestamp_in(Some(&epoch(0)), &Utc), NOT_AVAILABLE);
        let empty = Timestamp::Text(String::new());
        assert_eq!(format_timestamp_in(Some(&empty), &Utc), NOT_AVAILABLE);
        let junk = Timestamp::Text("yesterday-ish".to_string());
        assert_eq!(format_timestamp_in(Some(&junk), &Utc), INVALID_DATE);
    }

    #[test]
    fn test_truncate_preview() {
        let short = "a".repeat(100);
        assert_eq!(truncate_preview(&short), short.as_str());
        assert!(matches!(truncate_preview(&short), Cow::Borrowed(_)));

        let long = "b".repeat(101);
        let cut = truncate_preview(&long);
        assert_eq!(cut.len(), 103);
        assert!(cut.ends_with("b..."));
    }

    #[test]
    fn test_truncate_counts_characters() {
        let long = "é".repeat(150);
        let cut = truncate_preview(&long);
        assert_eq!(cut.chars().count(), 103);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html(r#"<b class="x">Tom & 'Jerry'</b>"#),
            "&lt;b class=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_or_not_available() {
        assert_eq!(or_not_available(Some("x")), "x");
        assert_eq!(or_not_available(Some("")), NOT_AVAILABLE);
        assert_eq!(or_not_available(None), NOT_AVAILABLE);
    }
}
