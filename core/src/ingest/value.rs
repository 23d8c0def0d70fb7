//! Lenient conversion of raw cell text into plottable numbers.

use chrono::{DateTime, NaiveDateTime};

const NAIVE_LAYOUTS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Parses a numeric cell. A trailing `%` is accepted; non-finite results are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a timestamp cell into Unix epoch seconds. Naive layouts are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.timestamp_millis() as f64 / 1000.0);
    }
    NAIVE_LAYOUTS.iter().find_map(|layout| {
        NaiveDateTime::parse_from_str(trimmed, layout)
            .ok()
            .map(|naive| naive.and_utc().timestamp_millis() as f64 / 1000.0)
    })
}

/// Formats epoch seconds back into a wall-clock label.
pub fn format_timestamp(seconds: f64, layout: &str) -> String {
    if !seconds.is_finite() {
        return String::new();
    }
    match DateTime::from_timestamp(seconds.floor() as i64, 0) {
        Some(dt) => dt.format(layout).to_string(),
        None => format!("{seconds:.0}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_reject_garbage_and_non_finite() {
        assert_eq!(parse_number(" 0.25 "), Some(0.25));
        assert_eq!(parse_number("12.5%"), Some(12.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("1e400"), None);
    }

    #[test]
    fn timestamps_accept_common_layouts() {
        let expected = 1_700_000_000.0;
        assert_eq!(parse_timestamp("2023-11-14T22:13:20Z"), Some(expected));
        assert_eq!(parse_timestamp("2023-11-14 22:13:20"), Some(expected));
        assert_eq!(parse_timestamp("14-11-2023 22:13:20"), Some(expected));
        assert_eq!(parse_timestamp("11/14/2023 22:13:20"), Some(expected));
        assert_eq!(parse_timestamp("2023-11-14 22:13:20.500"), Some(expected + 0.5));
        assert_eq!(parse_timestamp("t1"), None);
    }

    #[test]
    fn timestamp_formatting_round_trips_wall_clock() {
        assert_eq!(format_timestamp(1_700_000_000.0, "%H:%M:%S"), "22:13:20");
        assert_eq!(format_timestamp(f64::NAN, "%H:%M:%S"), "");
    }
}
