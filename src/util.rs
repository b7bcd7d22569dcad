// Utility helpers for parsing and basic statistics.
//
// This module centralizes the CSV/number/date handling so the loader and the
// pipelines can assume clean, typed values.
use crate::types::CallStatus;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a call timestamp.
///
/// Accepts RFC 3339 (the offset is dropped, wall-clock time is kept), the
/// common `YYYY-MM-DD HH:MM[:SS[.f]]` exports, day-first Brazilian dates and
/// a bare `YYYY-MM-DD`, which is read as midnight.
pub fn parse_timestamp(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    // Spreadsheet exports sometimes write integer columns as `21.0`.
    s.parse::<i32>()
        .ok()
        .or_else(|| s.strip_suffix(".0").and_then(|t| t.parse::<i32>().ok()))
}

pub fn parse_status(s: Option<&str>) -> Option<CallStatus> {
    match s?.trim().to_ascii_lowercase().as_str() {
        "0" | "0.0" | "false" => Some(CallStatus::NotAnswered),
        "1" | "1.0" | "true" => Some(CallStatus::Answered),
        _ => None,
    }
}

pub fn average(v: &[u64]) -> f64 {
    // Arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: u64 = v.iter().sum();
    sum as f64 / v.len() as f64
}

/// `(value - reference) / reference`, or `None` when the reference is zero.
pub fn relative_delta(value: f64, reference: f64) -> Option<f64> {
    if reference.abs() < f64::EPSILON {
        return None;
    }
    let delta = (value - reference) / reference;
    delta.is_finite().then_some(delta)
}

/// Signed percentage with one decimal place: `+12.5%`, `-3.0%`, `0.0%`.
pub fn format_percent(ratio: f64) -> String {
    let pct = ratio * 100.0;
    let rounded = format!("{:.1}", pct.abs());
    if rounded == "0.0" {
        return "0.0%".to_string();
    }
    if pct.is_sign_negative() {
        format!("-{}%", rounded)
    } else {
        format!("+{}%", rounded)
    }
}

pub fn display_ratio(v: &f64) -> String {
    format!("{:.1}%", v * 100.0)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `12,345 calls loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_common_timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        for s in [
            "2024-03-07 09:15:00",
            "2024-03-07T09:15:00",
            "2024-03-07 09:15",
            "07/03/2024 09:15:00",
            "2024-03-07T09:15:00-03:00",
        ] {
            assert_eq!(parse_timestamp(Some(s)), Some(expected), "{s}");
        }
        let midnight = parse_timestamp(Some("2024-03-07")).unwrap();
        assert_eq!(midnight.hour(), 0);
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert_eq!(parse_timestamp(None), None);
        assert_eq!(parse_timestamp(Some("  ")), None);
        assert_eq!(parse_timestamp(Some("yesterday")), None);
    }

    #[test]
    fn parses_status_and_codes() {
        assert_eq!(parse_status(Some("1")), Some(CallStatus::Answered));
        assert_eq!(parse_status(Some(" 0 ")), Some(CallStatus::NotAnswered));
        assert_eq!(parse_status(Some("1.0")), Some(CallStatus::Answered));
        assert_eq!(parse_status(Some("2")), None);
        assert_eq!(parse_i32_safe(Some("21")), Some(21));
        assert_eq!(parse_i32_safe(Some("21.0")), Some(21));
        assert_eq!(parse_i32_safe(Some("COB")), None);
    }

    #[test]
    fn delta_is_guarded_against_zero_mean() {
        assert_eq!(relative_delta(5.0, 0.0), None);
        assert_eq!(relative_delta(3.0, 2.0), Some(0.5));
        assert_eq!(relative_delta(2.0, 2.0), Some(0.0));
    }

    #[test]
    fn percent_formatting_has_one_decimal() {
        assert_eq!(format_percent(0.5), "+50.0%");
        assert_eq!(format_percent(-0.25), "-25.0%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(-0.00001), "0.0%");
        assert_eq!(format_percent(1.0 / 3.0), "+33.3%");
    }

    #[test]
    fn mean_of_counts() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[1, 2, 3, 4]), 2.5);
        assert_eq!(format_int(12345u64), "12,345");
    }
}
