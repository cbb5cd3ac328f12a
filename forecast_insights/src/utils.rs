//! Utility functions for the forecast_insights crate

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Formats carrying an explicit UTC offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

/// Naive date-time formats
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

/// A timestamp parsed from text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    /// Wall-clock time with any offset removed
    pub naive: NaiveDateTime,
    /// Whether the text carried a UTC offset
    pub had_offset: bool,
}

/// Parse a timestamp from text.
///
/// Offset-aware inputs keep their local wall-clock time and drop the offset.
pub fn parse_timestamp(raw: &str) -> Result<ParsedTimestamp> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ForecastError::DateParseFailure(
            "empty timestamp".to_string(),
        ));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(ParsedTimestamp {
            naive: dt.naive_local(),
            had_offset: true,
        });
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Ok(ParsedTimestamp {
                naive: dt.naive_local(),
                had_offset: true,
            });
        }
    }
    if let Some(stripped) = text.strip_suffix('Z') {
        if let Some(naive) = parse_naive(stripped) {
            return Ok(ParsedTimestamp {
                naive,
                had_offset: true,
            });
        }
    }

    parse_naive(text)
        .map(|naive| ParsedTimestamp {
            naive,
            had_offset: false,
        })
        .ok_or_else(|| ForecastError::DateParseFailure(format!("unrecognized timestamp '{}'", text)))
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Create `horizon` timestamps following `last`, spaced `step` apart
pub fn future_timestamps(
    last: NaiveDateTime,
    horizon: usize,
    step: Duration,
) -> Result<Vec<NaiveDateTime>> {
    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last;

    for _ in 0..horizon {
        current = current.checked_add_signed(step).ok_or_else(|| {
            ForecastError::InvalidParameter(format!(
                "Forecast horizon of {} steps overflows the calendar",
                horizon
            ))
        })?;
        timestamps.push(current);
    }

    Ok(timestamps)
}

/// Seconds between two timestamps as a float
pub fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let delta = to - from;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1e6,
        None => delta.num_seconds() as f64,
    }
}

/// Days since the Unix epoch as a float
pub fn epoch_days(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64 / 86_400.0
        + ts.and_utc().timestamp_subsec_nanos() as f64 / 86_400e9
}
