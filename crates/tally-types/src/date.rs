//! Calendar dates and timestamps.
//!
//! Daily completions and bounty deadlines are keyed by the user's local
//! calendar date (`YYYY-MM-DD`), never by UTC date. Event timestamps are UTC.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};

use crate::error::TypeError;

/// A local calendar date, serialized as `YYYY-MM-DD`.
pub type LocalDate = NaiveDate;

/// A point in time, serialized as RFC 3339 in UTC.
pub type Timestamp = DateTime<Utc>;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's date in the local time zone.
pub fn today_local() -> LocalDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` string.
pub fn parse_date(s: &str) -> Result<LocalDate, TypeError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| TypeError::InvalidDate(s.to_string()))
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: LocalDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Render a timestamp as RFC 3339 with millisecond precision and a `Z` suffix.
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_roundtrip() {
        let d = parse_date("2024-02-29").unwrap();
        assert_eq!(format_date(d), "2024-02-29");
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn dates_order_chronologically() {
        assert!(parse_date("2024-01-09").unwrap() < parse_date("2024-01-10").unwrap());
    }

    #[test]
    fn timestamp_format_matches_iso_millis() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2024-05-01T08:30:00.000Z");
    }
}
