//! Forecasting models for time series data
//!
//! The pipeline only sees the [`ForecastModel`] / [`TrainedForecastModel`]
//! pair, so alternative backends can be swapped in without touching the
//! downstream stages.

use crate::config::ModelConfig;
use crate::data::TimeSeries;
use crate::error::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A predicted value with its uncertainty interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDateTime,
    /// Point estimate
    pub estimate: f64,
    /// Lower interval bound
    pub lower: f64,
    /// Upper interval bound
    pub upper: f64,
}

impl ForecastPoint {
    pub fn new(timestamp: NaiveDateTime, estimate: f64, lower: f64, upper: f64) -> Self {
        Self {
            timestamp,
            estimate,
            lower,
            upper,
        }
    }

    /// Whether `value` lies inside `[lower, upper]`
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Interval width
    pub fn spread(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Predict estimate and interval for each requested timestamp, in the
    /// order requested
    fn predict(&self, timestamps: &[NaiveDateTime]) -> Result<Vec<ForecastPoint>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be fitted on a historical series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Fit the model on historical observations
    fn fit(&self, series: &TimeSeries, config: &ModelConfig) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod trend_seasonality;

pub use trend_seasonality::{TrainedTrendSeasonality, TrendSeasonalityModel};
