//! Date normalization
//!
//! Ledger exports carry dates in several shapes; everything is normalized to
//! a `NaiveDate` before any period filtering happens.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{BalanceError, BalanceResult};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a date from the formats found in ledger files
///
/// Accepts ISO dates ("2024-01-31"), day-first dates ("31/01/2024"),
/// RFC 3339 timestamps ("2024-01-31T10:00:00.000Z") and naive timestamps.
/// Timestamps keep their own calendar date; no timezone conversion is applied.
pub fn parse_date(value: &str) -> BalanceResult<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Ok(datetime.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(datetime.date());
        }
    }

    Err(BalanceError::InvalidArgument(format!(
        "cannot parse date '{}'",
        value
    )))
}
