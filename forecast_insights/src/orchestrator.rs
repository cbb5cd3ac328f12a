//! Forecast orchestration: validate timestamps, fit, and predict history
//! plus horizon

use crate::config::ModelConfig;
use crate::data::{TimeSeries, TimeSeriesPoint};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastPoint, TrainedForecastModel};
use crate::normalize::{normalize_columns, DATE_COLUMN, VALUE_COLUMN};
use crate::utils::{future_timestamps, parse_timestamp};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Days between 0001-01-01 and 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Output of one orchestrated fit/predict
#[derive(Debug, Clone)]
pub struct ForecastRun {
    /// Validated historical series
    pub history: TimeSeries,
    /// Predictions for every historical timestamp plus the horizon,
    /// ascending by timestamp
    pub forecast: Vec<ForecastPoint>,
    /// Name of the trained model
    pub model_name: String,
}

impl ForecastRun {
    /// Forecast points strictly after the last observation
    pub fn future(&self) -> Vec<ForecastPoint> {
        match self.history.last() {
            Some(last) => self
                .forecast
                .iter()
                .filter(|p| p.timestamp > last.timestamp)
                .copied()
                .collect(),
            None => self.forecast.clone(),
        }
    }
}

/// Drives a [`ForecastModel`] over a normalized table
#[derive(Debug, Clone)]
pub struct ForecastOrchestrator<M: ForecastModel> {
    model: M,
    config: ModelConfig,
}

impl<M: ForecastModel> ForecastOrchestrator<M> {
    pub fn new(model: M, config: ModelConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Turn a `ds`/`y` table into a validated series.
    ///
    /// Tables without the canonical columns are normalized first.
    pub fn prepare_series(&self, table: &DataFrame) -> Result<TimeSeries> {
        let names = table.get_column_names();
        let table = if names.contains(&DATE_COLUMN) && names.contains(&VALUE_COLUMN) {
            table.clone()
        } else {
            debug!("Table lacks canonical columns, normalizing");
            normalize_columns(table)?
        };

        let timestamps = parse_timestamp_column(table.column(DATE_COLUMN)?)?;
        let values = value_column(table.column(VALUE_COLUMN)?)?;

        let points = timestamps
            .into_iter()
            .zip(values)
            .map(|(timestamp, value)| TimeSeriesPoint::new(timestamp, value))
            .collect();
        Ok(TimeSeries::new(points))
    }

    /// Fit on the table and predict every historical timestamp plus
    /// `horizon_days` daily steps past the last observation
    pub fn run(&self, table: &DataFrame, horizon_days: usize) -> Result<ForecastRun> {
        self.config.validate()?;
        let history = self.prepare_series(table)?;
        info!(
            "Forecasting {} observations {} days ahead with {}",
            history.len(),
            horizon_days,
            self.model.name()
        );

        let trained = self
            .model
            .fit(&history, &self.config)
            .map_err(|e| with_model_context("fit", e))?;

        let last = history
            .last()
            .ok_or_else(|| ForecastError::ModelError("Cannot forecast an empty series".to_string()))?
            .timestamp;
        let mut requested = history.unique_timestamps();
        requested.extend(future_timestamps(last, horizon_days, Duration::days(1))?);

        let mut forecast = trained
            .predict(&requested)
            .map_err(|e| with_model_context("predict", e))?;
        if forecast.len() != requested.len() {
            return Err(ForecastError::ModelError(format!(
                "Model returned {} predictions for {} timestamps",
                forecast.len(),
                requested.len()
            )));
        }
        forecast.sort_by_key(|p| p.timestamp);

        Ok(ForecastRun {
            history,
            forecast,
            model_name: trained.name().to_string(),
        })
    }
}

fn with_model_context(stage: &str, err: ForecastError) -> ForecastError {
    match err {
        ForecastError::ModelError(msg) => {
            ForecastError::ModelError(format!("Model {} failed: {}", stage, msg))
        }
        ForecastError::Math(e) => ForecastError::ModelError(format!("Model {} failed: {}", stage, e)),
        other => other,
    }
}

/// Convert a timestamp column into timezone-naive instants.
///
/// Text columns must be uniformly offset-aware or uniformly naive. Offsets
/// and zones are dropped, keeping local wall-clock time, so the same instant
/// maps to the same value whether it arrives as text or as a zoned datetime.
pub fn parse_timestamp_column(column: &Series) -> Result<Vec<NaiveDateTime>> {
    match column.dtype() {
        DataType::Utf8 => parse_text_timestamps(column),
        DataType::Date => column
            .date()?
            .into_iter()
            .map(|days| {
                days.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + UNIX_EPOCH_DAYS_FROM_CE))
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .ok_or_else(|| ForecastError::DateParseFailure("missing or invalid date".to_string()))
            })
            .collect(),
        DataType::Datetime(unit, tz) => {
            if let Some(tz) = tz {
                warn!("Stripping timezone '{}' from timestamps", tz);
            }
            let per_second: i64 = match unit {
                TimeUnit::Nanoseconds => 1_000_000_000,
                TimeUnit::Microseconds => 1_000_000,
                TimeUnit::Milliseconds => 1_000,
            };
            column
                .datetime()?
                .into_iter()
                .map(|value| {
                    let utc = value
                        .and_then(|v| {
                            let secs = v.div_euclid(per_second);
                            let nanos = v.rem_euclid(per_second) * (1_000_000_000 / per_second);
                            DateTime::from_timestamp(secs, nanos as u32)
                        })
                        .map(|dt| dt.naive_utc())
                        .ok_or_else(|| {
                            ForecastError::DateParseFailure("missing or invalid datetime".to_string())
                        })?;
                    match tz {
                        Some(tz) => local_wall_clock(utc, tz),
                        None => Ok(utc),
                    }
                })
                .collect()
        }
        _ => parse_text_timestamps(&column.cast(&DataType::Utf8)?),
    }
}

/// Wall-clock time in `tz` for a UTC instant. Accepts IANA names and
/// fixed offsets such as `+09:00`.
fn local_wall_clock(utc: NaiveDateTime, tz: &str) -> Result<NaiveDateTime> {
    if let Ok(zone) = tz.parse::<chrono_tz::Tz>() {
        return Ok(zone.from_utc_datetime(&utc).naive_local());
    }
    if let Ok(offset) = tz.parse::<FixedOffset>() {
        return Ok(offset.from_utc_datetime(&utc).naive_local());
    }
    Err(ForecastError::DateParseFailure(format!(
        "unknown time zone '{}'",
        tz
    )))
}

fn parse_text_timestamps(column: &Series) -> Result<Vec<NaiveDateTime>> {
    let mut parsed = Vec::with_capacity(column.len());
    let mut with_offset = 0usize;

    for (row, raw) in column.utf8()?.into_iter().enumerate() {
        let raw = raw.ok_or_else(|| {
            ForecastError::DateParseFailure(format!("missing timestamp at row {}", row))
        })?;
        let ts = parse_timestamp(raw)?;
        if ts.had_offset {
            with_offset += 1;
        }
        parsed.push(ts.naive);
    }

    if with_offset > 0 && with_offset < parsed.len() {
        return Err(ForecastError::DateParseFailure(format!(
            "mixed timezone-aware ({}) and naive ({}) timestamps",
            with_offset,
            parsed.len() - with_offset
        )));
    }
    if with_offset > 0 {
        warn!("Stripping timezone offsets from {} timestamps", with_offset);
    }

    Ok(parsed)
}

fn value_column(column: &Series) -> Result<Vec<f64>> {
    let values = column.cast(&DataType::Float64)?;
    values
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.ok_or_else(|| ForecastError::InvalidTable(format!("missing value at row {}", row)))
        })
        .collect()
}
