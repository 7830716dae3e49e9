//! Lenient conversions from legacy values to typed cells.
//!
//! Every function here maps unparseable input to [`Cell::Null`] and never
//! fails.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::input::Cell;

/// Date-only formats accepted for date-of-birth values.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Datetime formats whose date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a numeric string, accepting only finite values.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Coerce to a nullable integer.
///
/// Integral floats (`"3.0"`, `3.0`) are accepted; fractional values are not
/// valid integers and become null.
pub fn to_integer(cell: Cell) -> Cell {
    match cell {
        Cell::Integer(_) => cell,
        Cell::Real(f) => integral(f),
        Cell::Text(ref s) => {
            if let Ok(i) = s.trim().parse::<i64>() {
                return Cell::Integer(i);
            }
            parse_number(s).map_or(Cell::Null, integral)
        }
        Cell::Null | Cell::Date(_) => Cell::Null,
    }
}

fn integral(f: f64) -> Cell {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Cell::Integer(f as i64)
    } else {
        Cell::Null
    }
}

/// Coerce to a nullable float.
pub fn to_float(cell: Cell) -> Cell {
    match cell {
        Cell::Real(f) if f.is_finite() => cell,
        Cell::Integer(i) => Cell::Real(i as f64),
        Cell::Text(ref s) => parse_number(s).map_or(Cell::Null, Cell::Real),
        _ => Cell::Null,
    }
}

/// Parse a date string in any of the accepted formats.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Coerce to a nullable date.
pub fn to_date(cell: Cell) -> Cell {
    match cell {
        Cell::Date(_) => cell,
        Cell::Text(ref s) => parse_date(s).map_or(Cell::Null, Cell::Date),
        _ => Cell::Null,
    }
}
