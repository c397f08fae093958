// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lenient timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parses a timestamp, returning `None` for anything unrecognized.
///
/// Accepted shapes: `YYYY-MM-DD HH:MM[:SS[.frac]]`, the same with a `T` separator or `/` date
/// separators, a bare date (midnight), and RFC 3339 with an offset (converted to UTC).
pub fn parse_datetime_lenient(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn accepts_common_shapes() {
        for s in [
            "2024-04-08 09:15:00",
            "2024-04-08 09:15",
            "2024-04-08T09:15:00.250",
            "2024/04/08 09:15",
            "2024-04-08T00:15:00-09:00",
        ] {
            let dt = parse_datetime_lenient(s).unwrap_or_else(|| panic!("failed to parse {s}"));
            assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 4, 8), "{s}");
            assert_eq!(dt.hour(), 9, "{s}");
        }
    }

    #[test]
    fn date_only_is_midnight() {
        let dt = parse_datetime_lenient("2024-04-08").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_datetime_lenient("").is_none());
        assert!(parse_datetime_lenient("yesterday").is_none());
        assert!(parse_datetime_lenient("2024-13-40 10:00").is_none());
    }
}
