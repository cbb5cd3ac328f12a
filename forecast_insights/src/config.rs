//! Analysis and model configuration

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default forecast horizon in days
pub const DEFAULT_HORIZON_DAYS: usize = 30;
/// Default prediction interval width
pub const DEFAULT_INTERVAL_WIDTH: f64 = 0.95;
/// Default number of simulated draws used for prediction intervals
pub const DEFAULT_UNCERTAINTY_SAMPLES: usize = 300;

/// How seasonal components combine with the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    #[default]
    Additive,
    Multiplicative,
}

/// Trend shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Growth {
    #[default]
    Linear,
    Flat,
}

/// Whether a seasonal component is fitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeasonalityToggle {
    /// Decide from the history span and spacing
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "true")]
    Enabled,
    #[serde(rename = "false")]
    Disabled,
}

impl fmt::Display for SeasonalityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonalityMode::Additive => write!(f, "additive"),
            SeasonalityMode::Multiplicative => write!(f, "multiplicative"),
        }
    }
}

impl FromStr for SeasonalityMode {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "additive" => Ok(SeasonalityMode::Additive),
            "multiplicative" => Ok(SeasonalityMode::Multiplicative),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown seasonality mode '{}', expected 'additive' or 'multiplicative'",
                other
            ))),
        }
    }
}

impl fmt::Display for Growth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Growth::Linear => write!(f, "linear"),
            Growth::Flat => write!(f, "flat"),
        }
    }
}

impl FromStr for Growth {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Growth::Linear),
            "flat" => Ok(Growth::Flat),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown growth '{}', expected 'linear' or 'flat'",
                other
            ))),
        }
    }
}

impl fmt::Display for SeasonalityToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonalityToggle::Auto => write!(f, "auto"),
            SeasonalityToggle::Enabled => write!(f, "true"),
            SeasonalityToggle::Disabled => write!(f, "false"),
        }
    }
}

impl FromStr for SeasonalityToggle {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(SeasonalityToggle::Auto),
            "true" => Ok(SeasonalityToggle::Enabled),
            "false" => Ok(SeasonalityToggle::Disabled),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown seasonality setting '{}', expected 'auto', 'true' or 'false'",
                other
            ))),
        }
    }
}

/// Configuration handed to the forecasting model on every fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub seasonality_mode: SeasonalityMode,
    pub growth: Growth,
    pub daily_seasonality: SeasonalityToggle,
    pub weekly_seasonality: SeasonalityToggle,
    pub yearly_seasonality: SeasonalityToggle,
    /// Coverage of the prediction interval, in (0, 1)
    pub interval_width: f64,
    /// Simulated draws per timestamp; 0 switches to analytic intervals
    pub uncertainty_samples: usize,
    /// Seed for the interval simulation
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seasonality_mode: SeasonalityMode::default(),
            growth: Growth::default(),
            daily_seasonality: SeasonalityToggle::default(),
            weekly_seasonality: SeasonalityToggle::default(),
            yearly_seasonality: SeasonalityToggle::default(),
            interval_width: DEFAULT_INTERVAL_WIDTH,
            uncertainty_samples: DEFAULT_UNCERTAINTY_SAMPLES,
            seed: None,
        }
    }
}

impl ModelConfig {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Interval width must be between 0 and 1, got {}",
                self.interval_width
            )));
        }
        Ok(())
    }
}

/// Where stored tables live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Full configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of days to forecast past the last observation
    pub horizon_days: usize,
    pub model: ModelConfig,
    pub storage: StorageConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            model: ModelConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_json::from_str(json).map_err(|e| {
            ForecastError::InvalidParameter(format!("Invalid configuration: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Set the forecast horizon
    pub fn with_horizon(mut self, horizon_days: usize) -> Self {
        self.horizon_days = horizon_days;
        self
    }

    /// Replace the model configuration
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()
    }
}
