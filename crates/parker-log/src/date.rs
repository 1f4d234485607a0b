//! Date normalisation for spiral log timestamps
//!
//! The log stores frame dates as `DD-Mon-YYYY HH:MM UT`. Observation start
//! times are entered as `YYYY-MON-DD HH:MM:SS`.

use crate::error::FormatError;
use hifitime::Epoch;
use std::str::FromStr;

/// Three-letter month abbreviations, January first
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Month number (1-12) for a three-letter abbreviation, any case
pub fn month_from_abbrev(abbrev: &str) -> Option<u8> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbrev))
        .map(|idx| idx as u8 + 1)
}

/// Abbreviation for a month number (1-12)
pub fn month_abbrev(month: u8) -> Option<&'static str> {
    MONTHS.get(usize::from(month).checked_sub(1)?).copied()
}

fn parse_field(input: &str, field: &str, name: &str, min: u32, max: u32) -> Result<u32, FormatError> {
    let value: u32 = field
        .trim()
        .parse()
        .map_err(|_| FormatError::new(input, format!("{} '{}' is not an integer", name, field)))?;
    if value < min || value > max {
        return Err(FormatError::new(
            input,
            format!("{} {} outside {}..={}", name, value, min, max),
        ));
    }
    Ok(value)
}

fn parse_year(input: &str, field: &str) -> Result<i32, FormatError> {
    field
        .trim()
        .parse()
        .map_err(|_| FormatError::new(input, format!("year '{}' is not an integer", field)))
}

fn parse_month(input: &str, field: &str) -> Result<u8, FormatError> {
    month_from_abbrev(field.trim())
        .ok_or_else(|| FormatError::new(input, format!("unknown month abbreviation '{}'", field)))
}

/// Split "HH:MM" or "HH:MM:SS" into (hour, minute, second)
fn parse_clock(input: &str, clock: &str) -> Result<(u8, u8, u8), FormatError> {
    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return Err(FormatError::new(input, "time must be HH:MM or HH:MM:SS"));
    }
    let hour = parse_field(input, parts[0], "hour", 0, 23)?;
    let minute = parse_field(input, parts[1], "minute", 0, 59)?;
    let second = match parts.get(2) {
        Some(s) => parse_field(input, s, "second", 0, 59)?,
        None => 0,
    };
    Ok((hour as u8, minute as u8, second as u8))
}

fn build_epoch(
    input: &str,
    (year, month, day): (i32, u8, u8),
    (hour, minute, second): (u8, u8, u8),
) -> Result<Epoch, FormatError> {
    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0)
        .map_err(|e| FormatError::new(input, e.to_string()))
}

/// Normalize a log timestamp such as `23-Jan-2008 16:39 UT` into an epoch.
///
/// The trailing `UT` marker is optional. Day must be 1-31, hour 0-23 and
/// minute 0-59; the month must be one of the twelve English abbreviations.
pub fn normalize(text: &str) -> Result<Epoch, FormatError> {
    let trimmed = text.trim();
    let body = trimmed.strip_suffix("UT").unwrap_or(trimmed).trim_end();

    let mut fields = body.split_whitespace();
    let (date, clock) = match (fields.next(), fields.next(), fields.next()) {
        (Some(date), Some(clock), None) => (date, clock),
        _ => return Err(FormatError::new(text, "expected '<day>-<Mon>-<year> <HH>:<MM>'")),
    };

    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() != 3 {
        return Err(FormatError::new(text, "date must be <day>-<Mon>-<year>"));
    }
    let day = parse_field(text, parts[0], "day", 1, 31)? as u8;
    let month = parse_month(text, parts[1])?;
    let year = parse_year(text, parts[2])?;
    if clock.split(':').count() != 2 {
        return Err(FormatError::new(text, "time must be HH:MM"));
    }
    let (hour, minute, _) = parse_clock(text, clock)?;

    build_epoch(text, (year, month, day), (hour, minute, 0))
}

/// Render an epoch the way frame sentinels carry it: `DD-Mon-YYYY HH:MM UT`.
///
/// Seconds are truncated, not rounded.
pub fn format_log_timestamp(epoch: Epoch) -> String {
    let (year, month, day, hour, minute, _, _) = epoch.to_gregorian_utc();
    let mon = month_abbrev(month).unwrap_or("???");
    format!("{:02}-{}-{} {:02}:{:02} UT", day, mon, year, hour, minute)
}

/// Parse an observation start time.
///
/// Accepts `YYYY-MON-DD HH:MM:SS` (e.g. `2008-JAN-23 16:39:33`) and falls back
/// to any representation `hifitime` understands.
pub fn parse_observation_time(text: &str) -> Result<Epoch, FormatError> {
    match parse_year_first(text) {
        Ok(epoch) => Ok(epoch),
        Err(err) => Epoch::from_str(text.trim()).map_err(|_| err),
    }
}

fn parse_year_first(text: &str) -> Result<Epoch, FormatError> {
    let mut fields = text.split_whitespace();
    let (date, clock) = match (fields.next(), fields.next(), fields.next()) {
        (Some(date), Some(clock), None) => (date, clock),
        (Some(date), None, None) => (date, "00:00:00"),
        _ => return Err(FormatError::new(text, "expected '<year>-<MON>-<day> <HH>:<MM>:<SS>'")),
    };

    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() != 3 {
        return Err(FormatError::new(text, "date must be <year>-<MON>-<day>"));
    }
    let year = parse_year(text, parts[0])?;
    let month = parse_month(text, parts[1])?;
    let day = parse_field(text, parts[2], "day", 1, 31)? as u8;
    let hms = parse_clock(text, clock)?;

    build_epoch(text, (year, month, day), hms)
}
