//! # Forecast Insights
//!
//! Turn an arbitrary tabular time series into a forecast, flagged historical
//! anomalies, accuracy metrics and natural-language insights.
//!
//! ## Features
//!
//! - Column normalization of arbitrary tables onto `ds` / `y`
//! - Pluggable forecasting models behind [`ForecastModel`]
//! - Interval-based anomaly detection with Low / Medium / High severity
//! - MAE, RMSE and MAPE over the historical fit
//! - Ordered, rule-based insights and recommendations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use forecast_insights::{AnalysisConfig, AnalysisPipeline, DataLoader};
//!
//! let table = DataLoader::from_csv("sales.csv")?;
//! let config = AnalysisConfig::default().with_horizon(14);
//! let pipeline = AnalysisPipeline::with_default_model(&config);
//!
//! let result = pipeline.analyze(&table)?;
//! for insight in &result.insights {
//!     println!("{}", insight);
//! }
//! # Ok::<(), forecast_insights::ForecastError>(())
//! ```

pub mod anomaly;
pub mod config;
pub mod data;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod pipeline;
pub mod utils;

// Re-export commonly used types
pub use crate::anomaly::{detect_anomalies, Anomaly, SeverityLevel};
pub use crate::config::{
    AnalysisConfig, Growth, ModelConfig, SeasonalityMode, SeasonalityToggle, StorageConfig,
};
pub use crate::data::{DataLoader, DataSource, DataStore, TimeSeries, TimeSeriesPoint};
pub use crate::error::{ErrorClass, ErrorKind, ForecastError};
pub use crate::insights::{generate_insights, InsightSet};
pub use crate::metrics::{calculate_metrics, MetricsSet};
pub use crate::models::{ForecastModel, ForecastPoint, TrainedForecastModel, TrendSeasonalityModel};
pub use crate::normalize::normalize_columns;
pub use crate::orchestrator::{ForecastOrchestrator, ForecastRun};
pub use crate::pipeline::{AnalysisPipeline, PipelineResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
