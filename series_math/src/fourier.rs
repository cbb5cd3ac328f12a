//! Fourier series features for periodic components

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A periodic component expressed as a truncated Fourier series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FourierComponent {
    /// Component name (e.g. "weekly")
    pub name: String,
    /// Period in days
    pub period_days: f64,
    /// Number of sine/cosine pairs
    pub order: usize,
}

impl FourierComponent {
    /// Create a new Fourier component
    pub fn new(name: &str, period_days: f64, order: usize) -> Self {
        Self {
            name: name.to_string(),
            period_days,
            order,
        }
    }

    /// Number of design columns this component contributes
    pub fn width(&self) -> usize {
        2 * self.order
    }

    /// Feature values at time `t_days`
    pub fn features(&self, t_days: f64) -> Vec<f64> {
        fourier_features(t_days, self.period_days, self.order)
    }
}

/// Evaluate `[sin(2πkt/P), cos(2πkt/P)]` for `k = 1..=order`
pub fn fourier_features(t_days: f64, period_days: f64, order: usize) -> Vec<f64> {
    let mut features = Vec::with_capacity(2 * order);
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * t_days / period_days;
        features.push(angle.sin());
        features.push(angle.cos());
    }
    features
}
