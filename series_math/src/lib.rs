//! # Series Math
//!
//! Numeric building blocks for time series regression and forecast
//! evaluation. This crate provides least squares solvers, Fourier seasonal
//! features and the descriptive statistics used by the forecasting core.

use thiserror::Error;

pub mod fourier;
pub mod linalg;
pub mod stats;

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;

pub use fourier::{fourier_features, FourierComponent};
pub use linalg::{ridge_least_squares, LeastSquaresFit};
pub use stats::{mean, quantile_sorted, round_to, std_dev};
