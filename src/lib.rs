//! # Foresight
//!
//! `foresight` bundles the workspace crates behind a single dependency:
//! [`forecast_insights`] for the analysis pipeline and [`series_math`] for the
//! numeric building blocks it relies on.
//!
//! ## Example
//!
//! ```
//! use foresight::prelude::*;
//!
//! let config = AnalysisConfig::default().with_horizon(7);
//! let pipeline = AnalysisPipeline::with_default_model(&config);
//! assert_eq!(pipeline.horizon_days(), 7);
//! ```

pub use forecast_insights;
pub use series_math;

/// The types most callers need to run an analysis.
pub mod prelude {
    pub use forecast_insights::{
        AnalysisConfig, AnalysisPipeline, DataLoader, DataSource, DataStore, ForecastError,
        ForecastModel, ModelConfig, PipelineResult, SeverityLevel, TrendSeasonalityModel,
    };
}
