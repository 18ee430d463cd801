//! Flexible date normalization
//!
//! Calendar and schedule records reach us from several sources that do not
//! agree on a date layout. [`parse_date`] accepts:
//!
//! 1. ISO `YYYY-MM-DD` (exactly 10 characters, containing `-`)
//! 2. Slash-delimited `D/M/Y` or `M/D/Y`, disambiguated by magnitude
//! 3. Anything else is retried as strict ISO, which normally fails
//!
//! When both slash components are `<= 12` the layout is genuinely
//! ambiguous and month/day/year is assumed. Existing displays rely on
//! that interpretation, so results for such inputs are best-effort.

use chrono::NaiveDate;
use thiserror::Error;

/// Largest value a month component can take
const MAX_MONTH: u32 = 12;

/// Date string rejected by [`parse_date`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateFormatError {
    /// No parsing rule matched the input
    #[error("Unrecognized date format: {0:?}")]
    Unrecognized(String),

    /// A rule matched but the components do not name a calendar day
    #[error("Date out of range: {0:?}")]
    OutOfRange(String),
}

/// Parse a date string using the layout heuristics described in the module docs.
///
/// Surrounding whitespace is ignored.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use companion_common::parse_date;
///
/// let d = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
/// assert_eq!(parse_date("2025-11-18").unwrap(), d(2025, 11, 18));
/// assert_eq!(parse_date("18/11/2025").unwrap(), d(2025, 11, 18));
/// assert_eq!(parse_date("11/05/2025").unwrap(), d(2025, 11, 5));
/// ```
pub fn parse_date(raw: &str) -> Result<NaiveDate, DateFormatError> {
    let input = raw.trim();

    if input.contains('-') && input.chars().count() == 10 {
        return parse_iso(input);
    }

    if input.contains('/') {
        return parse_slashed(input);
    }

    parse_iso(input)
}

/// Strict `YYYY-MM-DD`: four digits, dash, two digits, dash, two digits
fn parse_iso(input: &str) -> Result<NaiveDate, DateFormatError> {
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(DateFormatError::Unrecognized(input.to_string()));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| DateFormatError::OutOfRange(input.to_string()))
}

/// `a/b/year` where the larger-than-12 component decides which one is the day
fn parse_slashed(input: &str) -> Result<NaiveDate, DateFormatError> {
    let parts: Vec<&str> = input.split('/').collect();
    if parts.len() != 3 {
        return Err(DateFormatError::Unrecognized(input.to_string()));
    }

    let numeric = |part: &str| -> Result<u32, DateFormatError> {
        part.trim()
            .parse::<u32>()
            .map_err(|_| DateFormatError::Unrecognized(input.to_string()))
    };
    let part_a = numeric(parts[0])?;
    let part_b = numeric(parts[1])?;
    let year = i32::try_from(numeric(parts[2])?)
        .map_err(|_| DateFormatError::OutOfRange(input.to_string()))?;

    let (month, day) = if part_a > MAX_MONTH {
        // day/month/year
        (part_b, part_a)
    } else {
        // month/day/year, including the ambiguous case where both are <= 12
        (part_a, part_b)
    };

    build_date(input, year, month, day)
}

fn build_date(input: &str, year: i32, month: u32, day: u32) -> Result<NaiveDate, DateFormatError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateFormatError::OutOfRange(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso() {
        assert_eq!(parse_date("2025-11-18").unwrap(), date(2025, 11, 18));
        assert_eq!(parse_date("  2026-02-01 ").unwrap(), date(2026, 2, 1));
    }

    #[test]
    fn test_iso_is_strict() {
        assert!(matches!(
            parse_date("2025-1-018"),
            Err(DateFormatError::Unrecognized(_))
        ));
        assert!(matches!(
            parse_date("2025-11-1"),
            Err(DateFormatError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_iso_out_of_range() {
        assert!(matches!(
            parse_date("2025-02-30"),
            Err(DateFormatError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_date("2025-13-01"),
            Err(DateFormatError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_iso_leap_days_and_zero_components() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert_eq!(parse_date("2000-02-29").unwrap(), date(2000, 2, 29));
        for input in ["2023-02-29", "1900-02-29", "2025-00-10", "2025-04-00", "2025-04-31"] {
            assert_eq!(
                parse_date(input),
                Err(DateFormatError::OutOfRange(input.to_string())),
                "{input}"
            );
        }
    }

    #[test]
    fn test_day_first_when_first_component_exceeds_twelve() {
        assert_eq!(parse_date("18/11/2025").unwrap(), date(2025, 11, 18));
        assert_eq!(parse_date("31/1/2026").unwrap(), date(2026, 1, 31));
    }

    #[test]
    fn test_month_first_when_second_component_exceeds_twelve() {
        assert_eq!(parse_date("11/18/2025").unwrap(), date(2025, 11, 18));
    }

    #[test]
    fn test_ambiguous_assumes_month_first() {
        assert_eq!(parse_date("11/05/2025").unwrap(), date(2025, 11, 5));
        assert_eq!(parse_date("5/11/2025").unwrap(), date(2025, 5, 11));
    }

    #[test]
    fn test_slashed_out_of_range() {
        // 31st of month 31 cannot exist in either layout
        assert!(matches!(
            parse_date("31/31/2025"),
            Err(DateFormatError::OutOfRange(_))
        ));
        assert!(matches!(
            parse_date("2/30/2025"),
            Err(DateFormatError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_slashed_requires_three_numeric_parts() {
        assert!(matches!(
            parse_date("11/2025"),
            Err(DateFormatError::Unrecognized(_))
        ));
        assert!(matches!(
            parse_date("a/b/2025"),
            Err(DateFormatError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_unrecognized_falls_through_iso() {
        assert!(matches!(
            parse_date("18.11.2025"),
            Err(DateFormatError::Unrecognized(_))
        ));
        assert!(matches!(parse_date(""), Err(DateFormatError::Unrecognized(_))));
    }
}
