//! Rule-based insights and recommendations
//!
//! Rules run in a fixed order and their output order is part of the result:
//! trend, forecast peak, anomaly summary, confidence.

use crate::anomaly::{count_by_level, Anomaly, SeverityLevel};
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::ForecastPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Trend change (in percent) above which the trend is Significant
pub const SIGNIFICANT_TREND_PCT: f64 = 10.0;
/// Trend change (in percent) above which the trend is Moderate
pub const MODERATE_TREND_PCT: f64 = 3.0;
/// Interval spread (in percent of the estimate) below which the forecast is
/// considered high-confidence
pub const HIGH_CONFIDENCE_SPREAD_PCT: f64 = 15.0;

/// Insight and recommendation strings, in rule order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InsightSet {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Growth,
    Decline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendIntensity {
    Significant,
    Moderate,
    Minimal,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Growth => write!(f, "growth"),
            TrendDirection::Decline => write!(f, "decline"),
        }
    }
}

impl fmt::Display for TrendIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendIntensity::Significant => write!(f, "Significant"),
            TrendIntensity::Moderate => write!(f, "Moderate"),
            TrendIntensity::Minimal => write!(f, "Minimal"),
        }
    }
}

/// Change from the last observation to the last forecast estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendAssessment {
    pub pct: f64,
    pub direction: TrendDirection,
    pub intensity: TrendIntensity,
}

impl TrendAssessment {
    /// Assess the trend between the last observed value and the last
    /// forecast estimate. When the last value is zero the percentage is
    /// infinite in the direction of the change, or 0.0 if nothing changed.
    pub fn assess(last_value: f64, last_estimate: f64) -> Self {
        let change = last_estimate - last_value;
        let pct = change / last_value * 100.0;
        let pct = if pct.is_finite() {
            pct
        } else if change > 0.0 {
            f64::INFINITY
        } else if change < 0.0 {
            f64::NEG_INFINITY
        } else {
            0.0
        };

        let direction = if pct > 0.0 {
            TrendDirection::Growth
        } else {
            TrendDirection::Decline
        };
        let intensity = if pct.abs() > SIGNIFICANT_TREND_PCT {
            TrendIntensity::Significant
        } else if pct.abs() > MODERATE_TREND_PCT {
            TrendIntensity::Moderate
        } else {
            TrendIntensity::Minimal
        };

        Self {
            pct,
            direction,
            intensity,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Run the insight rules over the history, forecast and anomalies
pub fn generate_insights(
    history: &TimeSeries,
    forecast: &[ForecastPoint],
    anomalies: &[Anomaly],
) -> Result<InsightSet> {
    let last_observation = history
        .last()
        .ok_or_else(|| ForecastError::Internal("Cannot derive insights from an empty history".to_string()))?;
    let last_forecast = forecast
        .iter()
        .max_by_key(|p| p.timestamp)
        .ok_or_else(|| ForecastError::Internal("Cannot derive insights from an empty forecast".to_string()))?;

    let mut set = InsightSet::default();

    // 1. Trend
    let trend = TrendAssessment::assess(last_observation.value, last_forecast.estimate);
    set.insights.push(format!(
        "{} {}: Expect a {:.1}% {} in values over the next forecast cycle.",
        trend.intensity,
        capitalize(&trend.direction.to_string()),
        trend.pct.abs(),
        trend.direction
    ));
    set.recommendations.push(match trend.direction {
        TrendDirection::Growth if trend.pct.abs() > SIGNIFICANT_TREND_PCT => {
            "Scale Operations: Increase capacity and inventory to meet projected high demand."
                .to_string()
        }
        TrendDirection::Growth => {
            "Monitor Steady Growth: Continue current growth strategies with regular performance checks."
                .to_string()
        }
        TrendDirection::Decline => {
            "Cost Optimization: Identify potential operational efficiencies to offset the projected decline."
                .to_string()
        }
    });

    // 2. Peak over the horizon; skipped when nothing lies past the history
    let peak = forecast
        .iter()
        .filter(|p| p.timestamp > last_observation.timestamp)
        .fold(None::<&ForecastPoint>, |best, p| match best {
            Some(b) if b.estimate >= p.estimate => Some(b),
            _ => Some(p),
        });
    if let Some(peak) = peak {
        let peak_date = peak.timestamp.format("%Y-%m-%d");
        set.insights.push(format!(
            "Forecast Peak: The model projects a high of {:.2} around {}.",
            peak.estimate, peak_date
        ));
        set.recommendations.push(format!(
            "Peak Readiness: Plan marketing or maintenance activities around the {} peak.",
            peak_date
        ));
    }

    // 3. Anomaly summary
    if anomalies.is_empty() {
        set.insights.push(
            "Operational Stability: No significant anomalies detected in recent historical data."
                .to_string(),
        );
    } else {
        let high = count_by_level(anomalies, SeverityLevel::High);
        if high > 0 {
            set.insights.push(format!(
                "Critical Volatility: Detected {} High Severity anomalies requiring immediate review.",
                high
            ));
            set.recommendations.push(
                "Risk Mitigation: Audit the high-severity data points to identify root causes and prevent recurrence."
                    .to_string(),
            );
        }
        set.insights.push(format!(
            "Statistical Stability: Over {} historical anomalies identified, helping refine model sensitivity.",
            anomalies.len()
        ));
    }

    // 4. Confidence at the furthest forecast point
    let spread_pct = last_forecast.spread() / last_forecast.estimate * 100.0;
    if spread_pct < HIGH_CONFIDENCE_SPREAD_PCT {
        set.insights.push(
            "High Confidence: The model shows high convergence with a narrow prediction interval."
                .to_string(),
        );
    } else {
        set.insights.push(
            "Variable Forecast: Noted a wider uncertainty margin, suggesting potential external market influence."
                .to_string(),
        );
        set.recommendations.push(
            "Data Refinement: Consider adding additional context columns (holidays, promos) to reduce forecast variance."
                .to_string(),
        );
    }

    debug!(
        "Generated {} insights and {} recommendations (trend {:.2}%)",
        set.insights.len(),
        set.recommendations.len(),
        trend.pct
    );
    Ok(set)
}
