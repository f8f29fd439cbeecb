//! Permissive date recognition for column type inference.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Date-time layouts, tried in order. Month-first before day-first so that
// ambiguous values like 03/04/2024 read as March 4th.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%a, %d %b %Y",
    "%A, %B %d, %Y",
];

// Layouts for numeric dates whose year has exactly two digits. `%Y` would
// read "24" as year 24, so these values never reach the lists above.
const SHORT_YEAR_FORMATS: &[&str] = &["%m/%d/%y %H:%M:%S", "%m/%d/%y %H:%M", "%m/%d/%y"];

static NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}[/.-]\d{1,2}[/.-](\d+)(?:[ T]|$)").expect("Invalid regex: numeric date")
});

static YEAR_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}$").expect("Invalid regex: YYYY"));

static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})$").expect("Invalid regex: YYYY-MM"));

static MONTH_NAME_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{3,9}\.? \d{4}$").expect("Invalid regex: Month YYYY"));

/// Parse a calendar date or date-time in any of the supported layouts.
///
/// Date-only values resolve to midnight. Offsets are normalized to UTC.
pub(crate) fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.naive_utc());
    }

    if let Some(caps) = NUMERIC_DATE.captures(value) {
        match caps[1].len() {
            4 => {}
            2 => return parse_short_year(value),
            _ => return None,
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    parse_date(value).map(|d| d.and_time(NaiveTime::MIN))
}

fn parse_short_year(value: &str) -> Option<NaiveDateTime> {
    SHORT_YEAR_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(value, fmt)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(value, fmt)
                    .ok()
                    .map(|d| d.and_time(NaiveTime::MIN))
            })
    })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    if YEAR_ONLY.is_match(value) {
        let year: i32 = value.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    if let Some(caps) = YEAR_MONTH.captures(value) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }

    if MONTH_NAME_YEAR.is_match(value) {
        let normalized = format!("1 {}", value.replace('.', ""));
        return NaiveDate::parse_from_str(&normalized, "%d %B %Y")
            .or_else(|_| NaiveDate::parse_from_str(&normalized, "%d %b %Y"))
            .ok();
    }

    None
}

/// Check if a value looks like a calendar date or date-time.
#[inline]
pub(crate) fn is_date_string(value: &str) -> bool {
    parse_datetime(value).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_datetime("2024-01-15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_datetime("2024/01/15"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn test_iso_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-15 10:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-15T10:30"), Some(expected));
        assert_eq!(parse_datetime("2024-01-15T10:30:00Z"), Some(expected));
        assert_eq!(parse_datetime("2024-01-15T12:30:00+02:00"), Some(expected));
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(
            parse_datetime("Mon, 15 Jan 2024 00:00:00 +0000"),
            Some(ymd(2024, 1, 15))
        );
    }

    #[test]
    fn test_month_first_before_day_first() {
        assert_eq!(parse_datetime("03/04/2024"), Some(ymd(2024, 3, 4)));
        assert_eq!(parse_datetime("01/15/2024"), Some(ymd(2024, 1, 15)));
        // Only a day-first reading is valid here.
        assert_eq!(parse_datetime("15/01/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_datetime("15.01.2024"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn test_two_digit_years() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("01/15/24"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_datetime("01/15/24 10:30"), Some(expected));
        assert_eq!(parse_datetime("01/15/24 10:30:00"), Some(expected));
        // No four-digit layout may read a two-digit year.
        assert_eq!(parse_datetime("15/01/24"), None);
        assert_eq!(parse_datetime("15.01.24"), None);
        assert_eq!(parse_datetime("01-15-24"), None);
        assert_eq!(parse_datetime("01/15/024"), None);
    }

    #[test]
    fn test_dashed_month_first_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("01-15-2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_datetime("01-15-2024 10:30"), Some(expected));
        assert_eq!(parse_datetime("01-15-2024 10:30:00"), Some(expected));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parse_datetime("March 5, 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_datetime("Mar 5, 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_datetime("5 Mar 2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_datetime("March 2024"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_datetime("Sep. 2024"), Some(ymd(2024, 9, 1)));
    }

    #[test]
    fn test_partial_dates() {
        assert_eq!(parse_datetime("2024-03"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_datetime("2024"), Some(ymd(2024, 1, 1)));
    }

    #[test]
    fn test_rejects_non_dates() {
        assert!(!is_date_string(""));
        assert!(!is_date_string("NYC"));
        assert!(!is_date_string("12345"));
        assert!(!is_date_string("2024-13-01"));
        assert!(!is_date_string("not a date"));
        assert!(!is_date_string("2024-13"));
        assert!(!is_date_string("Hello 2024"));
    }
}
