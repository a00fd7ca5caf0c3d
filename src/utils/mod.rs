//! Parsing and formatting helpers shared by the CLI and the TUI.

use jiff::civil::Date;
use jiff::{SignedDuration, Timestamp};

use crate::error::{BuzzError, Result};

// ============================================================================
// Values
// ============================================================================

/// Parse a datapoint value.
///
/// Accepts plain decimals (`2`, `-1.5`, `.25`) and clock durations
/// `H:MM` / `H:MM:SS`, which are converted to hours (`1:30` -> `1.5`).
pub fn parse_value(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if input.contains(':') {
        return parse_clock(input);
    }
    input.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_clock(input: &str) -> Option<f64> {
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let parts: Vec<&str> = body.split(':').collect();
    if !(2..=3).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let hours: f64 = parts[0].parse::<u32>().ok()?.into();
    let minutes = parts[1].parse::<u32>().ok().filter(|m| *m < 60)?;
    let seconds = match parts.get(2) {
        Some(s) => s.parse::<u32>().ok().filter(|s| *s < 60)?,
        None => 0,
    };

    let total = hours + f64::from(minutes) / 60.0 + f64::from(seconds) / 3600.0;
    Some(if negative { -total } else { total })
}

// ============================================================================
// Dates and durations
// ============================================================================

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<Date> {
    let input = input.trim();
    let well_formed = input.len() == 10
        && input
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(BuzzError::InvalidDate(input.to_string()));
    }
    input
        .parse::<Date>()
        .map_err(|_| BuzzError::InvalidDate(input.to_string()))
}

/// Parse a short duration such as `45m`, `4h`, `2d` or `1w`.
pub fn parse_duration(input: &str) -> Result<SignedDuration> {
    let input = input.trim();
    let invalid = || BuzzError::InvalidDuration(input.to_string());

    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (amount, unit) = input.split_at(split);
    let amount: i64 = amount.parse().map_err(|_| invalid())?;

    let unit_secs = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        "d" => 86_400,
        "w" => 7 * 86_400,
        _ => return Err(invalid()),
    };
    amount
        .checked_mul(unit_secs)
        .map(SignedDuration::from_secs)
        .ok_or_else(invalid)
}

/// Human-readable time until `due`: `in 2d 3h`, `in 45m`, or `overdue`.
pub fn format_due(due: Timestamp, now: Timestamp) -> String {
    let remaining = now.duration_until(due);
    if remaining.is_negative() {
        return "overdue".to_string();
    }

    let total_minutes = remaining.as_secs() / 60;
    let days = total_minutes / (24 * 60);
    let hours = (total_minutes / 60) % 24;
    let minutes = total_minutes % 60;

    match (days, hours) {
        (0, 0) => format!("in {minutes}m"),
        (0, h) => format!("in {h}h {minutes}m"),
        (d, 0) => format!("in {d}d"),
        (d, h) => format!("in {d}d {h}h"),
    }
}

/// Format a pledge amount in dollars.
pub fn format_pledge(pledge: f64) -> String {
    if pledge.fract() == 0.0 {
        format!("${}", pledge as i64)
    } else {
        format!("${pledge:.2}")
    }
}

/// Truncate `text` to at most `max` characters, ending with `…` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_decimal() {
        assert_eq!(parse_value("2"), Some(2.0));
        assert_eq!(parse_value(" -1.5 "), Some(-1.5));
        assert_eq!(parse_value(".25"), Some(0.25));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn test_parse_value_clock() {
        assert_eq!(parse_value("1:30"), Some(1.5));
        assert_eq!(parse_value("0:45:00"), Some(0.75));
        assert_eq!(parse_value("-0:30"), Some(-0.5));
        assert_eq!(parse_value("1:60"), None);
        assert_eq!(parse_value("1:"), None);
        assert_eq!(parse_value("1:2:3:4"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-03-07").unwrap(),
            jiff::civil::date(2026, 3, 7)
        );
        assert!(parse_date("2026-3-7").is_err());
        assert!(parse_date("2026-02-30").is_err());
        assert!(parse_date("tomorrow").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("45m").unwrap(), SignedDuration::from_mins(45));
        assert_eq!(parse_duration("4h").unwrap(), SignedDuration::from_hours(4));
        assert_eq!(
            parse_duration("2d").unwrap(),
            SignedDuration::from_hours(48)
        );
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("3").is_err());
        assert!(parse_duration("3y").is_err());
    }

    #[test]
    fn test_format_due() {
        let now = Timestamp::from_second(1_000_000).unwrap();
        let at = |secs: i64| Timestamp::from_second(1_000_000 + secs).unwrap();

        assert_eq!(format_due(at(-1), now), "overdue");
        assert_eq!(format_due(at(45 * 60), now), "in 45m");
        assert_eq!(format_due(at(2 * 3600 + 5 * 60), now), "in 2h 5m");
        assert_eq!(format_due(at(3 * 86_400), now), "in 3d");
        assert_eq!(format_due(at(3 * 86_400 + 4 * 3600), now), "in 3d 4h");
    }

    #[test]
    fn test_format_pledge() {
        assert_eq!(format_pledge(5.0), "$5");
        assert_eq!(format_pledge(2.5), "$2.50");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long title", 6), "a lon…");
        assert_eq!(truncate("abc", 0), "");
    }
}
