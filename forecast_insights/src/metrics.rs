//! Metrics for evaluating forecast fit over the history

use crate::data::TimeSeriesPoint;
use crate::error::{ForecastError, Result};
use crate::models::ForecastPoint;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use series_math::round_to;
use std::collections::HashMap;
use tracing::debug;

/// Aggregate accuracy of the historical fit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSet {
    /// Mean Absolute Error, 4 decimals
    #[serde(rename = "MAE")]
    pub mae: f64,
    /// Root Mean Squared Error, 4 decimals
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    /// Mean Absolute Percentage Error, 2 decimals; 0.0 when undefined
    #[serde(rename = "MAPE")]
    pub mape: f64,
}

impl std::fmt::Display for MetricsSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Model Performance Metrics:")?;
        writeln!(f, "  MAE:   {}", self.mae)?;
        writeln!(f, "  RMSE:  {}", self.rmse)?;
        writeln!(f, "  MAPE:  {}%", self.mape)?;
        Ok(())
    }
}

/// Compute MAE, RMSE and MAPE over aligned actual/predicted values.
///
/// Pairs where either side is non-finite are excluded. With no valid pairs
/// every metric is 0.0. A non-finite MAPE (e.g. an actual of zero) is
/// reported as 0.0.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<MetricsSet> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::Internal(format!(
            "Actual length ({}) doesn't match predicted length ({})",
            actual.len(),
            predicted.len()
        )));
    }

    let pairs: Vec<(f64, f64)> = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| a.is_finite() && p.is_finite())
        .map(|(&a, &p)| (a, p))
        .collect();

    if pairs.is_empty() {
        return Ok(MetricsSet::default());
    }

    let n = pairs.len() as f64;
    let mae = pairs.iter().map(|(a, p)| (a - p).abs()).sum::<f64>() / n;
    let mse = pairs.iter().map(|(a, p)| (a - p).powi(2)).sum::<f64>() / n;
    let rmse = mse.sqrt();

    let mape = pairs.iter().map(|(a, p)| ((a - p) / a).abs()).sum::<f64>() / n * 100.0;
    let mape = if mape.is_finite() { mape } else { 0.0 };

    let metrics = MetricsSet {
        mae: round_to(mae, 4),
        rmse: round_to(rmse, 4),
        mape: round_to(mape, 2),
    };
    debug!("Computed metrics over {} pairs: {:?}", pairs.len(), metrics);
    Ok(metrics)
}

/// Pair each observation with the forecast estimate at the same timestamp.
///
/// Observations without a matching forecast are skipped.
pub fn align_history(
    history: &[TimeSeriesPoint],
    forecast: &[ForecastPoint],
) -> (Vec<f64>, Vec<f64>) {
    let estimates: HashMap<NaiveDateTime, f64> =
        forecast.iter().map(|p| (p.timestamp, p.estimate)).collect();

    history
        .iter()
        .filter_map(|point| {
            estimates
                .get(&point.timestamp)
                .map(|estimate| (point.value, *estimate))
        })
        .unzip()
}
