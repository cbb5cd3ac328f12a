//! Error types for the forecast_insights crate

use series_math::MathError;
use thiserror::Error;

/// Custom error types for the forecast_insights crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// No column could be identified as the timestamp column
    #[error("Could not detect a date column (looking for 'ds', 'date', 'timestamp', 'time')")]
    NoDateColumn,

    /// No column could be identified as the numeric target column
    #[error("Could not detect a numeric target column. Please ensure one exists.")]
    NoTargetColumn,

    /// A timestamp value could not be parsed
    #[error("Could not parse 'ds' column as dates: {0}")]
    DateParseFailure(String),

    /// The input table itself could not be read
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The forecasting model failed to fit or predict
    #[error("Model error: {0}")]
    ModelError(String),

    /// Numerical failure inside the model backend
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Unexpected failure while aggregating results
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fine-grained error discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoDateColumn,
    NoTargetColumn,
    DateParseFailure,
    InvalidTable,
    InvalidParameter,
    Io,
    Model,
    Math,
    Polars,
    Internal,
}

/// Coarse error class used to decide how a caller should surface a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input, reported before any model invocation
    Input,
    /// The forecasting model rejected the data or configuration
    Model,
    /// Anything else
    Internal,
}

impl ForecastError {
    /// The fine-grained kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::NoDateColumn => ErrorKind::NoDateColumn,
            ForecastError::NoTargetColumn => ErrorKind::NoTargetColumn,
            ForecastError::DateParseFailure(_) => ErrorKind::DateParseFailure,
            ForecastError::InvalidTable(_) => ErrorKind::InvalidTable,
            ForecastError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            ForecastError::IoError(_) => ErrorKind::Io,
            ForecastError::ModelError(_) => ErrorKind::Model,
            ForecastError::Math(_) => ErrorKind::Math,
            ForecastError::PolarsError(_) => ErrorKind::Polars,
            ForecastError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The class of this error
    pub fn class(&self) -> ErrorClass {
        match self.kind() {
            ErrorKind::NoDateColumn
            | ErrorKind::NoTargetColumn
            | ErrorKind::DateParseFailure
            | ErrorKind::InvalidTable
            | ErrorKind::InvalidParameter
            | ErrorKind::Io => ErrorClass::Input,
            ErrorKind::Model | ErrorKind::Math => ErrorClass::Model,
            ErrorKind::Polars | ErrorKind::Internal => ErrorClass::Internal,
        }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<polars::prelude::PolarsError> for ForecastError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}
