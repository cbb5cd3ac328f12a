use chrono::NaiveDate;
use forecast_insights::{AnalysisConfig, AnalysisPipeline, SeasonalityMode};
use polars::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Build a synthetic daily sales table with a weekly cycle and a spike
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid start date")?;
    let days = 120;

    let dates: Vec<String> = (0..days)
        .map(|i| {
            (start + chrono::Duration::days(i))
                .format("%Y-%m-%d")
                .to_string()
        })
        .collect();
    let sales: Vec<f64> = (0..days)
        .map(|i| {
            let weekly = 8.0 * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin();
            let spike = if i == 60 { 90.0 } else { 0.0 };
            200.0 + 0.8 * i as f64 + weekly + spike
        })
        .collect();

    let df = df!("Date" => dates, "Sales" => sales)?;
    println!("Loaded {} rows", df.height());

    let mut config = AnalysisConfig::default().with_horizon(14);
    config.model.seasonality_mode = SeasonalityMode::Additive;
    config.model.seed = Some(42);

    let pipeline = AnalysisPipeline::with_default_model(&config);
    let result = pipeline.analyze(&df)?;

    println!("{}", result);

    println!("Next 14 days:");
    for point in result.forecast.iter().rev().take(14).rev() {
        println!(
            "  {}  {:>8.2}  [{:.2}, {:.2}]",
            point.timestamp.format("%Y-%m-%d"),
            point.estimate,
            point.lower,
            point.upper
        );
    }

    Ok(())
}
