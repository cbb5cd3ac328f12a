//! End-to-end analysis pipeline
//!
//! normalize → fit/predict → {anomalies, metrics, insights}. A run either
//! yields a complete [`PipelineResult`] or a single error.

use crate::anomaly::{detect_anomalies, Anomaly};
use crate::config::{AnalysisConfig, Growth, SeasonalityMode};
use crate::data::{DataSource, DataStore};
use crate::error::{ForecastError, Result};
use crate::insights::generate_insights;
use crate::metrics::{align_history, calculate_metrics, MetricsSet};
use crate::models::{ForecastModel, ForecastPoint, TrendSeasonalityModel};
use crate::normalize::normalize_columns;
use crate::orchestrator::ForecastOrchestrator;
use polars::prelude::DataFrame;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Parameters echoed back with a result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParametersEcho {
    pub horizon_days: usize,
    pub seasonality_mode: SeasonalityMode,
    pub growth: Growth,
}

/// Everything one analysis run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub message: String,
    /// Rows remaining after normalization
    pub row_count: usize,
    pub parameters: ParametersEcho,
    pub forecast: Vec<ForecastPoint>,
    pub anomalies: Vec<Anomaly>,
    pub metrics: MetricsSet,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Runs the full analysis with a given forecasting model
#[derive(Debug, Clone)]
pub struct AnalysisPipeline<M: ForecastModel> {
    orchestrator: ForecastOrchestrator<M>,
    horizon_days: usize,
}

impl AnalysisPipeline<TrendSeasonalityModel> {
    /// Pipeline backed by the default trend plus seasonality model
    pub fn with_default_model(config: &AnalysisConfig) -> Self {
        Self::new(TrendSeasonalityModel::new(), config)
    }
}

impl<M: ForecastModel> AnalysisPipeline<M> {
    pub fn new(model: M, config: &AnalysisConfig) -> Self {
        Self {
            orchestrator: ForecastOrchestrator::new(model, config.model.clone()),
            horizon_days: config.horizon_days,
        }
    }

    pub fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    /// Analyze an in-memory table
    pub fn analyze(&self, table: &DataFrame) -> Result<PipelineResult> {
        let normalized = normalize_columns(table)?;
        let run = self.orchestrator.run(&normalized, self.horizon_days)?;

        let anomalies = detect_anomalies(&run.forecast, run.history.points());
        let (actual, predicted) = align_history(run.history.points(), &run.forecast);
        let metrics = calculate_metrics(&actual, &predicted)?;
        let insights = generate_insights(&run.history, &run.forecast, &anomalies)?;

        info!(
            "Analysis complete: {} rows, {} forecast points, {} anomalies, MAE={} RMSE={} MAPE={}",
            normalized.height(),
            run.forecast.len(),
            anomalies.len(),
            metrics.mae,
            metrics.rmse,
            metrics.mape
        );

        let config = self.orchestrator.config();
        Ok(PipelineResult {
            message: format!("Analysis complete. Forecasted {} days.", self.horizon_days),
            row_count: normalized.height(),
            parameters: ParametersEcho {
                horizon_days: self.horizon_days,
                seasonality_mode: config.seasonality_mode,
                growth: config.growth,
            },
            forecast: run.forecast,
            anomalies,
            metrics,
            insights: insights.insights,
            recommendations: insights.recommendations,
        })
    }

    /// Analyze a stored or in-memory table
    pub fn analyze_source(&self, source: DataSource, store: &DataStore) -> Result<PipelineResult> {
        let table = source.load(store)?;
        self.analyze(&table)
    }

    /// Persist the normalized table as `clean_<name>` and analyze the stored
    /// copy
    pub fn analyze_saved(
        &self,
        name: &str,
        table: &DataFrame,
        store: &DataStore,
    ) -> Result<PipelineResult> {
        let path = store.save_normalized(name, table)?;
        let stored = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ForecastError::Internal(format!("Unusable stored path {}", path.display()))
            })?;
        self.analyze_source(DataSource::Stored(stored.to_string()), store)
    }
}

impl fmt::Display for PipelineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Executive Forecast Report")?;
        writeln!(
            f,
            "{} rows analyzed, {} day horizon ({} growth, {} seasonality)",
            self.row_count,
            self.parameters.horizon_days,
            self.parameters.growth,
            self.parameters.seasonality_mode
        )?;
        writeln!(f)?;

        writeln!(f, "Executive Summary")?;
        if self.insights.is_empty() {
            writeln!(f, "  No specific insights generated.")?;
        }
        for insight in &self.insights {
            writeln!(f, "  • {}", insight)?;
        }
        writeln!(f)?;

        if !self.recommendations.is_empty() {
            writeln!(f, "Recommendations")?;
            for recommendation in &self.recommendations {
                writeln!(f, "  • {}", recommendation)?;
            }
            writeln!(f)?;
        }

        write!(f, "{}", self.metrics)?;
        writeln!(f)?;

        writeln!(f, "Detected Anomalies")?;
        if self.anomalies.is_empty() {
            writeln!(f, "  None")?;
        } else {
            writeln!(
                f,
                "  {:<12} {:>12} {:>12} {:>10}  {}",
                "Date", "Actual", "Expected", "Deviation", "Severity"
            )?;
            for anomaly in &self.anomalies {
                writeln!(
                    f,
                    "  {:<12} {:>12.2} {:>12.2} {:>10.2}  {}",
                    anomaly.timestamp.format("%Y-%m-%d").to_string(),
                    anomaly.actual,
                    anomaly.estimate,
                    anomaly.severity_magnitude,
                    anomaly.severity_level
                )?;
            }
        }
        Ok(())
    }
}
