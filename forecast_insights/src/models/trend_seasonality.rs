//! Trend plus Fourier seasonality regression model
//!
//! The series is decomposed into a linear (or flat) trend and optional
//! yearly/weekly/daily Fourier components, fitted jointly by ridge-regularized
//! least squares. Prediction intervals combine residual noise with the
//! standard error of the slope once a timestamp lies beyond the history.

use crate::config::{Growth, ModelConfig, SeasonalityMode, SeasonalityToggle};
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastPoint, TrainedForecastModel};
use crate::utils::{epoch_days, seconds_between};
use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use series_math::{quantile_sorted, ridge_least_squares, std_dev, FourierComponent};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, info};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Ridge penalty on seasonal coefficients (in scaled units)
const SEASONAL_PENALTY: f64 = 1e-4;

/// Residual noise never drops below this fraction of max |y|
const MIN_NOISE_FRACTION: f64 = 1e-6;

/// Trend plus seasonality model
#[derive(Debug, Clone)]
pub struct TrendSeasonalityModel {
    /// Name of the model
    name: String,
}

/// Fitted trend plus seasonality model
#[derive(Debug, Clone)]
pub struct TrainedTrendSeasonality {
    /// Name of the model
    name: String,
    /// Configuration used for the fit
    config: ModelConfig,
    /// First historical timestamp; scaled time 0
    start: NaiveDateTime,
    /// History span in seconds; scaled time 1 is the last observation
    span_seconds: f64,
    /// Divisor applied to observed values before fitting
    y_scale: f64,
    intercept: f64,
    slope: f64,
    components: Vec<FourierComponent>,
    seasonal_coefficients: Vec<f64>,
    /// Residual standard deviation (scaled units)
    sigma: f64,
    /// Standard error of the slope (scaled units per unit of scaled time)
    slope_std_error: f64,
}

impl TrendSeasonalityModel {
    /// Create a new trend plus seasonality model
    pub fn new() -> Self {
        Self {
            name: "Trend + Fourier Seasonality".to_string(),
        }
    }
}

impl Default for TrendSeasonalityModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the seasonal components to fit
fn select_components(
    config: &ModelConfig,
    span_days: f64,
    min_spacing_days: f64,
) -> Vec<FourierComponent> {
    let enabled = |toggle: SeasonalityToggle, auto: bool| match toggle {
        SeasonalityToggle::Auto => auto,
        SeasonalityToggle::Enabled => true,
        SeasonalityToggle::Disabled => false,
    };

    let mut components = Vec::new();
    if enabled(config.yearly_seasonality, span_days >= 730.0) {
        components.push(FourierComponent::new("yearly", 365.25, 10));
    }
    if enabled(
        config.weekly_seasonality,
        span_days >= 14.0 && min_spacing_days < 7.0,
    ) {
        components.push(FourierComponent::new("weekly", 7.0, 3));
    }
    if enabled(
        config.daily_seasonality,
        span_days >= 2.0 && min_spacing_days < 1.0,
    ) {
        components.push(FourierComponent::new("daily", 1.0, 4));
    }
    components
}

fn seasonal_features(components: &[FourierComponent], ts: NaiveDateTime) -> Vec<f64> {
    let days = epoch_days(ts);
    components
        .iter()
        .flat_map(|c| c.features(days))
        .collect()
}

impl ForecastModel for TrendSeasonalityModel {
    type Trained = TrainedTrendSeasonality;

    fn fit(&self, series: &TimeSeries, config: &ModelConfig) -> Result<Self::Trained> {
        config.validate()?;

        if series.len() < 2 {
            return Err(ForecastError::ModelError(format!(
                "Need at least 2 observations to fit, got {}",
                series.len()
            )));
        }
        let values = series.values();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelError(
                "Series contains non-finite values".to_string(),
            ));
        }

        let timestamps = series.timestamps();
        let start = timestamps[0];
        let end = timestamps[timestamps.len() - 1];
        let span_seconds = seconds_between(start, end);
        if span_seconds <= 0.0 {
            return Err(ForecastError::ModelError(
                "History spans zero time; need at least two distinct timestamps".to_string(),
            ));
        }

        let min_spacing_days = timestamps
            .windows(2)
            .map(|w| seconds_between(w[0], w[1]))
            .filter(|gap| *gap > 0.0)
            .fold(f64::INFINITY, f64::min)
            / SECONDS_PER_DAY;
        let span_days = span_seconds / SECONDS_PER_DAY;

        let components = select_components(config, span_days, min_spacing_days);
        info!(
            "Fitting {} on {} points spanning {:.1} days ({} growth, {} seasonality, components: {:?})",
            self.name,
            series.len(),
            span_days,
            config.growth,
            config.seasonality_mode,
            components.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        let y_scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };
        let scaled: Vec<f64> = values.iter().map(|v| v / y_scale).collect();
        let t: Vec<f64> = timestamps
            .iter()
            .map(|ts| seconds_between(start, *ts) / span_seconds)
            .collect();

        let trend_row = |ti: f64| match config.growth {
            Growth::Linear => vec![1.0, ti],
            Growth::Flat => vec![1.0],
        };
        let trend_width = trend_row(0.0).len();
        let seasonal_rows: Vec<Vec<f64>> = timestamps
            .iter()
            .map(|ts| seasonal_features(&components, *ts))
            .collect();
        let seasonal_width = seasonal_rows.first().map_or(0, |r| r.len());

        let (trend_coefficients, seasonal_coefficients, fitted) = match config.seasonality_mode {
            SeasonalityMode::Additive => {
                let design: Vec<Vec<f64>> = t
                    .iter()
                    .zip(seasonal_rows.iter())
                    .map(|(ti, season)| {
                        let mut row = trend_row(*ti);
                        row.extend_from_slice(season);
                        row
                    })
                    .collect();
                let mut penalties = vec![0.0; trend_width];
                penalties.extend(std::iter::repeat(SEASONAL_PENALTY).take(seasonal_width));

                let fit = ridge_least_squares(&design, &scaled, &penalties)?;
                let seasonal = fit.coefficients[trend_width..].to_vec();
                let trend = fit.coefficients[..trend_width].to_vec();
                (trend, seasonal, fit.fitted)
            }
            SeasonalityMode::Multiplicative => {
                // y = trend * (1 + seasonal): fit the trend, then regress the
                // remainder on trend-weighted seasonal features
                let design: Vec<Vec<f64>> = t.iter().map(|ti| trend_row(*ti)).collect();
                let trend_fit = ridge_least_squares(&design, &scaled, &vec![0.0; trend_width])?;

                if seasonal_width == 0 {
                    (trend_fit.coefficients, Vec::new(), trend_fit.fitted)
                } else {
                    let remainder = trend_fit.residuals(&scaled);
                    let weighted: Vec<Vec<f64>> = seasonal_rows
                        .iter()
                        .zip(trend_fit.fitted.iter())
                        .map(|(season, trend)| season.iter().map(|f| f * trend).collect())
                        .collect();
                    let season_fit = ridge_least_squares(
                        &weighted,
                        &remainder,
                        &vec![SEASONAL_PENALTY; seasonal_width],
                    )?;
                    let fitted: Vec<f64> = trend_fit
                        .fitted
                        .iter()
                        .zip(season_fit.fitted.iter())
                        .map(|(trend, season)| trend + season)
                        .collect();
                    (trend_fit.coefficients, season_fit.coefficients, fitted)
                }
            }
        };

        let residuals: Vec<f64> = scaled
            .iter()
            .zip(fitted.iter())
            .map(|(y, f)| y - f)
            .collect();
        let sigma = std_dev(&residuals)?.max(MIN_NOISE_FRACTION);

        let slope_std_error = match config.growth {
            Growth::Linear => {
                let t_mean = t.iter().sum::<f64>() / t.len() as f64;
                let sxx: f64 = t.iter().map(|ti| (ti - t_mean).powi(2)).sum();
                sigma / sxx.sqrt()
            }
            Growth::Flat => 0.0,
        };

        let intercept = trend_coefficients[0];
        let slope = trend_coefficients.get(1).copied().unwrap_or(0.0);
        debug!(
            "Fitted intercept={:.6} slope={:.6} sigma={:.6} (scaled by {})",
            intercept, slope, sigma, y_scale
        );

        Ok(TrainedTrendSeasonality {
            name: self.name.clone(),
            config: config.clone(),
            start,
            span_seconds,
            y_scale,
            intercept,
            slope,
            components,
            seasonal_coefficients,
            sigma,
            slope_std_error,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedTrendSeasonality {
    fn scaled_time(&self, ts: NaiveDateTime) -> f64 {
        seconds_between(self.start, ts) / self.span_seconds
    }

    /// Trend and seasonal parts in scaled units
    fn components_at(&self, ts: NaiveDateTime) -> (f64, f64) {
        let trend = self.intercept + self.slope * self.scaled_time(ts);
        let seasonal = seasonal_features(&self.components, ts)
            .iter()
            .zip(self.seasonal_coefficients.iter())
            .map(|(f, c)| f * c)
            .sum();
        (trend, seasonal)
    }

    /// Point estimate and the factor applied to trend deviations, scaled units
    fn estimate_at(&self, ts: NaiveDateTime) -> (f64, f64) {
        let (trend, seasonal) = self.components_at(ts);
        match self.config.seasonality_mode {
            SeasonalityMode::Additive => (trend + seasonal, 1.0),
            SeasonalityMode::Multiplicative => (trend * (1.0 + seasonal), 1.0 + seasonal),
        }
    }

    /// Standard deviation of the trend beyond the last observation
    fn trend_std_at(&self, ts: NaiveDateTime) -> f64 {
        let excess = (self.scaled_time(ts) - 1.0).max(0.0);
        self.slope_std_error * excess
    }

    /// Names of the fitted seasonal components
    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name.as_str()).collect()
    }

    fn analytic_intervals(&self, timestamps: &[NaiveDateTime]) -> Result<Vec<ForecastPoint>> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::ModelError(format!("Invalid normal distribution: {}", e)))?;
        let z = normal.inverse_cdf(0.5 + self.config.interval_width / 2.0);

        Ok(timestamps
            .iter()
            .map(|ts| {
                let (estimate, factor) = self.estimate_at(*ts);
                let trend_sd = self.trend_std_at(*ts) * factor;
                let sd = (self.sigma.powi(2) + trend_sd.powi(2)).sqrt();
                ForecastPoint::new(
                    *ts,
                    estimate * self.y_scale,
                    (estimate - z * sd) * self.y_scale,
                    (estimate + z * sd) * self.y_scale,
                )
            })
            .collect())
    }

    fn sampled_intervals(&self, timestamps: &[NaiveDateTime]) -> Result<Vec<ForecastPoint>> {
        let samples = self.config.uncertainty_samples;
        let lower_q = (1.0 - self.config.interval_width) / 2.0;
        let upper_q = (1.0 + self.config.interval_width) / 2.0;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut draws = Vec::with_capacity(samples);
        let mut points = Vec::with_capacity(timestamps.len());
        for ts in timestamps {
            let (estimate, factor) = self.estimate_at(*ts);
            let trend_sd = self.trend_std_at(*ts) * factor;

            draws.clear();
            for _ in 0..samples {
                let trend_noise: f64 = rng.sample(StandardNormal);
                let obs_noise: f64 = rng.sample(StandardNormal);
                draws.push(estimate + trend_sd * trend_noise + self.sigma * obs_noise);
            }
            draws.sort_by(|a, b| a.total_cmp(b));

            let lower = quantile_sorted(&draws, lower_q)?;
            let upper = quantile_sorted(&draws, upper_q)?;
            points.push(ForecastPoint::new(
                *ts,
                estimate * self.y_scale,
                lower * self.y_scale,
                upper * self.y_scale,
            ));
        }

        Ok(points)
    }
}

impl TrainedForecastModel for TrainedTrendSeasonality {
    fn predict(&self, timestamps: &[NaiveDateTime]) -> Result<Vec<ForecastPoint>> {
        debug!(
            "Predicting {} timestamps with {} uncertainty samples",
            timestamps.len(),
            self.config.uncertainty_samples
        );
        if self.config.uncertainty_samples == 0 {
            self.analytic_intervals(timestamps)
        } else {
            self.sampled_intervals(timestamps)
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
