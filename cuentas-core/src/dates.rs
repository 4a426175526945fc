//! Date Normalizer: ISO strings, timestamps, regional D/M/Y text and
//! spreadsheet serials into a calendar date.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Largest spreadsheet serial we accept (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

/// A date as it arrives from an import source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawDate {
    Text(String),
    Serial(f64),
    Date(NaiveDate),
}

impl From<&str> for RawDate {
    fn from(s: &str) -> Self {
        RawDate::Text(s.to_string())
    }
}

impl From<NaiveDate> for RawDate {
    fn from(d: NaiveDate) -> Self {
        RawDate::Date(d)
    }
}

pub fn parse_date(raw: &RawDate) -> Result<NaiveDate> {
    match raw {
        RawDate::Date(d) => Ok(*d),
        RawDate::Serial(n) => serial_to_date(*n).ok_or_else(|| CoreError::InvalidDate(n.to_string())),
        RawDate::Text(s) => parse_date_str(s),
    }
}

/// Parse a date string using the import heuristics.
///
/// Ambiguous `a/b/yyyy` input where both `a` and `b` are <= 12 is read as
/// day/month/year.
pub fn parse_date_str(raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();
    let invalid = || CoreError::InvalidDate(raw.to_string());

    if s.len() == 10 {
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(d);
        }
    }

    if s.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            // Written date, not the date after shifting to UTC or local.
            return Ok(dt.date_naive());
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(ndt.date());
            }
        }
        return Err(invalid());
    }

    // "2025-03-04 10:22:00" style exports: keep the date token.
    let s = s.split_whitespace().next().ok_or_else(invalid)?;

    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) && s.len() <= 7 {
        let n: f64 = s.parse().map_err(|_| invalid())?;
        return serial_to_date(n).ok_or_else(invalid);
    }

    let parts: Vec<&str> = s.split(['/', '-']).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid());
    }

    let nums: Vec<u32> = parts
        .iter()
        .map(|p| p.parse::<u32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| invalid())?;

    let (year, month, day) = if parts[0].len() == 4 {
        (nums[0], nums[1], nums[2])
    } else if nums[0] > 12 {
        (nums[2], nums[1], nums[0])
    } else if nums[1] > 12 {
        (nums[2], nums[0], nums[1])
    } else {
        (nums[2], nums[1], nums[0])
    };

    let year = if parts[0].len() != 4 && parts[2].len() == 2 {
        2000 + year
    } else {
        year
    };

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

/// Spreadsheet serial day count (day 0 = 1899-12-30, time fraction dropped).
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 || serial > MAX_SERIAL {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_days(Days::new(serial.floor() as u64))
}

/// Canonical stored form.
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's calendar date in an IANA zone like "America/Bogota".
pub fn today_in_zone(tz: &str) -> Result<NaiveDate> {
    let zone: Tz = tz
        .parse()
        .map_err(|_| CoreError::InvalidRecord(format!("invalid timezone: {tz}")))?;
    Ok(Utc::now().with_timezone(&zone).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_round_trip() {
        for s in ["2026-01-01", "2025-12-31", "2024-02-29", "1999-07-04"] {
            let d = parse_date(&RawDate::from(s)).unwrap();
            assert_eq!(format_iso(d), s);
        }
    }

    #[test]
    fn test_timestamp_keeps_written_date() {
        assert_eq!(
            parse_date_str("2026-01-15T23:30:00-05:00").unwrap(),
            ymd(2026, 1, 15)
        );
        assert_eq!(parse_date_str("2026-01-15T08:00:00").unwrap(), ymd(2026, 1, 15));
        assert_eq!(parse_date_str("2025-03-04 10:22:00").unwrap(), ymd(2025, 3, 4));
    }

    #[test]
    fn test_positional_heuristics() {
        assert_eq!(parse_date_str("2026/02/03").unwrap(), ymd(2026, 2, 3));
        assert_eq!(parse_date_str("25/12/2025").unwrap(), ymd(2025, 12, 25));
        assert_eq!(parse_date_str("12/25/2025").unwrap(), ymd(2025, 12, 25));
        // Ambiguous: regional day/month default
        assert_eq!(parse_date_str("03/04/2025").unwrap(), ymd(2025, 4, 3));
        assert_eq!(parse_date_str("3-4-25").unwrap(), ymd(2025, 4, 3));
    }

    #[test]
    fn test_serials() {
        assert_eq!(parse_date(&RawDate::Serial(45658.0)).unwrap(), ymd(2025, 1, 1));
        assert_eq!(parse_date(&RawDate::Serial(45658.75)).unwrap(), ymd(2025, 1, 1));
        assert_eq!(parse_date_str("45658").unwrap(), ymd(2025, 1, 1));
        assert!(parse_date(&RawDate::Serial(-1.0)).is_err());
        assert!(parse_date(&RawDate::Serial(f64::NAN)).is_err());
    }

    #[test]
    fn test_invalid_inputs() {
        for s in ["", "ayer", "31/31/2025", "2025-13-01", "1/2", "2025-02-30"] {
            assert!(
                matches!(parse_date_str(s), Err(CoreError::InvalidDate(_))),
                "expected InvalidDate for {s:?}"
            );
        }
    }

    #[test]
    fn test_today_in_zone() {
        assert!(today_in_zone("America/Bogota").is_ok());
        assert!(today_in_zone("Mars/Olympus").is_err());
    }
}
