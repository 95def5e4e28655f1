use chrono::{DateTime, NaiveDateTime, Utc};

use crate::constants::{ERR_INVALID_DATETIME, ERR_INVALID_PAGE};
use crate::error::{AppError, Result};

/// Offset-less layouts accepted for meeting times, read as UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 meeting time.
///
/// RFC 3339 values keep their offset; values without one are taken as UTC.
pub fn parse_meeting_datetime(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            tracing::debug!("Rejected meeting datetime: {}", raw);
            AppError::Validation(ERR_INVALID_DATETIME.to_string())
        })
}

/// Parse a 1-based page number from the path
pub fn parse_page(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(AppError::Validation(ERR_INVALID_PAGE.to_string())),
    }
}
