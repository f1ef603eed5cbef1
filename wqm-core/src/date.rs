//! Lenient timestamp parsing for backend date columns.
//!
//! The views return either plain dates (`2024-06-01`) or full timestamps
//! (`2024-06-01T10:15:00+00:00`, `2024-06-01T10:15:00`). Only the calendar
//! date matters for filtering and display.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Date format used by the backend for `date` columns: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Short month names indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parse a backend timestamp into its calendar date.
///
/// Returns `None` for empty or unrecognised input; callers treat that the
/// same as a missing timestamp.
pub fn parse_sample_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, NAIVE_TIMESTAMP_FORMAT) {
        return Some(dt.date());
    }
    // Postgres `timestamp` text form uses a space separator
    s.get(..10)
        .filter(|_| s.as_bytes().get(10) == Some(&b' '))
        .and_then(|head| NaiveDate::parse_from_str(head, DATE_FORMAT).ok())
}

/// Short name for a 1-indexed month, or `"?"` when out of range.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// Format a date the way popups show it, e.g. "Jun 1, 2024".
pub fn display_date(date: &NaiveDate) -> String {
    format!("{} {}, {}", month_name(date.month()), date.day(), date.year())
}

/// A record carrying an optional raw timestamp.
pub trait Dated {
    /// The raw timestamp text as returned by the backend.
    fn raw_date(&self) -> Option<&str>;

    /// The parsed calendar date, if the timestamp is present and parseable.
    fn date(&self) -> Option<NaiveDate> {
        self.raw_date().and_then(parse_sample_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_date() {
        let d = parse_sample_date("2024-06-01").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn parses_rfc3339_and_naive_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2023, 9, 30).unwrap();
        assert_eq!(parse_sample_date("2023-09-30T14:05:00+00:00"), Some(expected));
        assert_eq!(parse_sample_date("2023-09-30T14:05:00"), Some(expected));
        assert_eq!(parse_sample_date("2023-09-30T14:05:00.123"), Some(expected));
        assert_eq!(parse_sample_date("2023-09-30 14:05:00"), Some(expected));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_sample_date(""), None);
        assert_eq!(parse_sample_date("   "), None);
        assert_eq!(parse_sample_date("not a date"), None);
        assert_eq!(parse_sample_date("2024-13-01"), None);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
        assert_eq!(month_name(0), "?");
        assert_eq!(month_name(13), "?");
    }

    #[test]
    fn display_format() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(display_date(&d), "Jun 1, 2024");
    }
}
