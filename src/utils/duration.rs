//! Duration parsing for command-line flags.
//!
//! Accepts a whole number with an optional unit suffix, e.g. "250ms",
//! "3s", "2min" or "1h". A bare number is taken as seconds.

use std::time::Duration;

/// Unit suffixes, longest first within each unit so "ms" wins over "s"
/// and "min" over "m".
const UNITS: &[(&[&str], u64)] = &[
    (&["milliseconds", "millisecond", "millis", "ms"], 1),
    (&["hours", "hour", "hrs", "hr", "h"], 3_600_000),
    (&["minutes", "minute", "mins", "min", "m"], 60_000),
    (&["seconds", "second", "secs", "sec", "s"], 1_000),
];

/// Parse a duration string such as "500ms", "3s", "2m" or "1h".
///
/// ```
/// use std::time::Duration;
/// use topo_sim::utils::duration::parse_duration;
///
/// assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
/// assert_eq!(parse_duration("3"), Ok(Duration::from_secs(3)));
/// assert!(parse_duration("soon").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let (number, suffix) = split_number(input);
    if number.is_empty() {
        return Err(format!("Invalid duration format: {:?}", input));
    }
    let value: u64 = number
        .parse()
        .map_err(|_| format!("Invalid duration format: {:?}", input))?;

    if suffix.is_empty() {
        return Ok(Duration::from_secs(value));
    }

    let millis_per_unit = UNITS
        .iter()
        .find(|(names, _)| names.contains(&suffix))
        .map(|(_, millis)| *millis)
        .ok_or_else(|| format!("Unknown duration unit {:?} in {:?}", suffix, input))?;

    value
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| format!("Duration {:?} is too large", input))
}

/// Split at the first non-digit character.
fn split_number(input: &str) -> (&str, &str) {
    let end = input
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    (&input[..end], input[end..].trim_start())
}
