//! Free-text duration parsing.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;

/// Day count assumed when a duration cannot be read at all.
pub const DEFAULT_DAYS: u32 = 30;

static NUMBER_AND_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*([a-z]+)").expect("duration pattern is valid"));

/// Approximate a free-text duration ("3 weeks", "2 Months", "45") as a day count.
///
/// Units are matched by substring, so "days", "weekly" and "months" all work.
/// An unknown unit returns the number unscaled, a bare number is read as days,
/// and anything else falls back to [`DEFAULT_DAYS`]. Numbers too large for
/// `u32` saturate, as does scaling by the unit.
pub fn parse_duration_days(input: &str) -> u32 {
    let text = input.trim().to_lowercase();

    if let Some(caps) = NUMBER_AND_UNIT.captures(&text) {
        let Some(value) = parse_count(&caps[1]) else {
            return DEFAULT_DAYS;
        };
        let unit = &caps[2];
        let factor = if unit.contains("day") {
            1
        } else if unit.contains("week") {
            7
        } else if unit.contains("month") {
            30
        } else if unit.contains("year") {
            365
        } else {
            1
        };
        return value.saturating_mul(factor);
    }

    parse_count(&text).unwrap_or(DEFAULT_DAYS)
}

fn parse_count(digits: &str) -> Option<u32> {
    match digits.parse::<u32>() {
        Ok(value) => Some(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(u32::MAX),
        Err(_) => None,
    }
}
