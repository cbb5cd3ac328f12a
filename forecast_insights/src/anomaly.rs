//! Anomaly detection against forecast uncertainty intervals

use crate::data::TimeSeriesPoint;
use crate::models::ForecastPoint;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Percentage deviation above which an anomaly is High
pub const HIGH_SEVERITY_PCT: f64 = 20.0;
/// Percentage deviation above which an anomaly is Medium
pub const MEDIUM_SEVERITY_PCT: f64 = 10.0;

/// Ordinal severity of an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityLevel {
    Low,
    Medium,
    High,
}

impl SeverityLevel {
    /// Classify a percentage deviation. Both thresholds are strict.
    pub fn from_pct(pct: f64) -> Self {
        if pct > HIGH_SEVERITY_PCT {
            SeverityLevel::High
        } else if pct > MEDIUM_SEVERITY_PCT {
            SeverityLevel::Medium
        } else {
            SeverityLevel::Low
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityLevel::Low => write!(f, "Low"),
            SeverityLevel::Medium => write!(f, "Medium"),
            SeverityLevel::High => write!(f, "High"),
        }
    }
}

/// A historical observation outside its predicted interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub timestamp: NaiveDateTime,
    pub actual: f64,
    pub estimate: f64,
    pub lower: f64,
    pub upper: f64,
    /// `|actual - estimate|` in the series' own units
    pub severity_magnitude: f64,
    /// `|actual - estimate| / estimate * 100`; `None` when the estimate is zero
    pub severity_pct: Option<f64>,
    pub severity_level: SeverityLevel,
}

impl Anomaly {
    /// Build an anomaly from an observation and its forecast.
    ///
    /// A zero estimate has no percentage deviation and is classified High.
    pub fn from_observation(point: &TimeSeriesPoint, forecast: &ForecastPoint) -> Self {
        let magnitude = (point.value - forecast.estimate).abs();
        let (severity_pct, severity_level) = if forecast.estimate == 0.0 {
            (None, SeverityLevel::High)
        } else {
            let pct = magnitude / forecast.estimate * 100.0;
            (Some(pct), SeverityLevel::from_pct(pct))
        };

        Self {
            timestamp: point.timestamp,
            actual: point.value,
            estimate: forecast.estimate,
            lower: forecast.lower,
            upper: forecast.upper,
            severity_magnitude: magnitude,
            severity_pct,
            severity_level,
        }
    }
}

/// Flag observations that fall outside `[lower, upper]` of the forecast
/// with the same timestamp.
///
/// Observations without a forecast at their exact timestamp are skipped.
/// The result is ascending by timestamp.
pub fn detect_anomalies(forecast: &[ForecastPoint], actuals: &[TimeSeriesPoint]) -> Vec<Anomaly> {
    let by_timestamp: HashMap<NaiveDateTime, &ForecastPoint> =
        forecast.iter().map(|p| (p.timestamp, p)).collect();

    let mut anomalies: Vec<Anomaly> = actuals
        .iter()
        .filter_map(|point| {
            by_timestamp
                .get(&point.timestamp)
                .map(|predicted| (point, *predicted))
        })
        .filter(|(point, predicted)| !predicted.contains(point.value))
        .map(|(point, predicted)| Anomaly::from_observation(point, predicted))
        .collect();

    anomalies.sort_by_key(|a| a.timestamp);
    debug!(
        "Detected {} anomalies across {} observations",
        anomalies.len(),
        actuals.len()
    );
    anomalies
}

/// Number of anomalies at the given level
pub fn count_by_level(anomalies: &[Anomaly], level: SeverityLevel) -> usize {
    anomalies.iter().filter(|a| a.severity_level == level).count()
}
