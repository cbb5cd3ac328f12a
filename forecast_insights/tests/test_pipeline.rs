use chrono::NaiveDate;
use forecast_insights::{
    AnalysisConfig, AnalysisPipeline, DataLoader, DataSource, DataStore, ErrorClass,
    ForecastError, SeverityLevel,
};
use polars::prelude::*;
use std::fs;
use tempfile::tempdir;

const JITTER: [f64; 5] = [0.3, -0.2, 0.1, -0.4, 0.2];

fn trending_table(days: usize) -> DataFrame {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<String> = (0..days)
        .map(|i| (start + chrono::Duration::days(i as i64)).format("%Y-%m-%d").to_string())
        .collect();
    let sales: Vec<f64> = (0..days)
        .map(|i| 100.0 + i as f64 + JITTER[i % 5])
        .collect();
    df!("Date" => dates, "Sales" => sales).unwrap()
}

fn pipeline(horizon: usize) -> AnalysisPipeline<forecast_insights::TrendSeasonalityModel> {
    let mut config = AnalysisConfig::default().with_horizon(horizon);
    config.model.seed = Some(11);
    AnalysisPipeline::with_default_model(&config)
}

#[test]
fn test_end_to_end_trending_series() {
    let result = pipeline(10).analyze(&trending_table(100)).unwrap();

    assert_eq!(result.message, "Analysis complete. Forecasted 10 days.");
    assert_eq!(result.row_count, 100);
    assert_eq!(result.parameters.horizon_days, 10);
    assert_eq!(result.forecast.len(), 110);

    assert!(result.insights[0].starts_with("Moderate Growth:"));
    assert!(result.recommendations[0].starts_with("Monitor Steady Growth:"));
    assert!(result.insights[1].starts_with("Forecast Peak:"));
    assert!(result.insights[1].ends_with("around 2024-04-19."));

    assert!(result.metrics.mae < 1.0);
    assert!(result.anomalies.len() <= 10);
    assert!(result
        .anomalies
        .iter()
        .all(|a| a.severity_level == SeverityLevel::Low));
}

#[test]
fn test_end_to_end_noiseless_series() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<String> = (0..100)
        .map(|i| (start + chrono::Duration::days(i)).format("%Y-%m-%d").to_string())
        .collect();
    let values: Vec<f64> = (0..100).map(|i| 100.0 + 0.5 * i as f64).collect();
    let df = df!("date" => dates, "sales" => values).unwrap();

    let result = pipeline(10).analyze(&df).unwrap();

    assert!(result.insights[0].contains("Growth:"));
    assert_eq!(
        result.insights[1],
        format!(
            "Forecast Peak: The model projects a high of {:.2} around 2024-04-19.",
            result.forecast[109].estimate
        )
    );
    assert!(result.metrics.mae < 0.01);
    assert!(result.anomalies.len() <= 2);
    assert_eq!(
        result.insights.last().map(String::as_str),
        Some("High Confidence: The model shows high convergence with a narrow prediction interval.")
    );
}

#[test]
fn test_forecast_intervals_are_ordered() {
    let result = pipeline(7).analyze(&trending_table(40)).unwrap();

    assert!(result.forecast.iter().all(|p| p.lower <= p.upper));
    assert!(result
        .forecast
        .windows(2)
        .all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_result_serializes_to_json() {
    let result = pipeline(5).analyze(&trending_table(30)).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["row_count"], 30);
    assert_eq!(json["parameters"]["growth"], "linear");
    assert_eq!(json["parameters"]["seasonality_mode"], "additive");
    assert_eq!(json["forecast"].as_array().unwrap().len(), 35);
    assert!(json["metrics"]["MAE"].is_number());
    assert!(json["insights"].is_array());
}

#[test]
fn test_report_display() {
    let result = pipeline(5).analyze(&trending_table(30)).unwrap();
    let report = result.to_string();

    assert!(report.contains("Executive Forecast Report"));
    assert!(report.contains("Model Performance Metrics:"));
    assert!(report.contains("Detected Anomalies"));
}

#[test]
fn test_input_errors_surface_unchanged() {
    let df = df!("when" => &["2024-01-01"], "sales" => &[1.0]).unwrap();
    let err = pipeline(5).analyze(&df).unwrap_err();

    assert!(matches!(err, ForecastError::NoDateColumn));
    assert_eq!(err.class(), ErrorClass::Input);
}

#[test]
fn test_store_round_trip() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());

    let path = store.save_normalized("sales.csv", &trending_table(50)).unwrap();
    assert_eq!(path, dir.path().join("clean_sales.csv"));

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("ds,y"));

    let result = pipeline(5)
        .analyze_source(DataSource::Stored("clean_sales.csv".to_string()), &store)
        .unwrap();
    assert_eq!(result.row_count, 50);
    assert_eq!(result.forecast.len(), 55);
}

#[test]
fn test_analyze_saved_uses_stored_copy() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());
    let df = df!(
        "date" => &["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"],
        "sales" => &["10", "oops", "12", "13", "15"]
    )
    .unwrap();

    let result = pipeline(2).analyze_saved("upload.csv", &df, &store).unwrap();

    assert!(dir.path().join("clean_upload.csv").exists());
    assert_eq!(result.row_count, 4);
    assert_eq!(result.forecast.len(), 6);
}

#[test]
fn test_weekly_seasonal_demo_table() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<String> = (0..120)
        .map(|i| (start + chrono::Duration::days(i)).format("%Y-%m-%d").to_string())
        .collect();
    let sales: Vec<f64> = (0..120)
        .map(|i| {
            let weekly = 8.0 * (2.0 * std::f64::consts::PI * i as f64 / 7.0).sin();
            let spike = if i == 60 { 90.0 } else { 0.0 };
            200.0 + 0.8 * i as f64 + weekly + spike
        })
        .collect();
    let df = df!("Date" => dates, "Sales" => sales).unwrap();

    let result = pipeline(14).analyze(&df).unwrap();

    assert_eq!(result.row_count, 120);
    assert_eq!(result.forecast.len(), 134);
    assert!(result
        .anomalies
        .iter()
        .any(|a| a.timestamp.date() == NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
}

#[test]
fn test_loaded_source() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());

    let result = pipeline(3)
        .analyze_source(DataSource::Loaded(trending_table(20)), &store)
        .unwrap();
    assert_eq!(result.row_count, 20);
}

#[test]
fn test_missing_stored_file() {
    let dir = tempdir().unwrap();
    let store = DataStore::new(dir.path());

    let err = pipeline(5)
        .analyze_source(DataSource::Stored("absent.csv".to_string()), &store)
        .unwrap_err();

    assert!(matches!(err, ForecastError::IoError(_)));
    assert_eq!(err.class(), ErrorClass::Input);
}

#[test]
fn test_store_resolves_file_name_only() {
    let store = DataStore::new("/srv/data");
    assert_eq!(
        store.resolve("../../etc/sales.csv").unwrap(),
        std::path::PathBuf::from("/srv/data/sales.csv")
    );
}

#[test]
fn test_csv_bytes_with_invalid_utf8() {
    let mut bytes = b"date,region,sales\n".to_vec();
    for i in 1..=9 {
        bytes.extend_from_slice(format!("2024-01-0{},caf", i).as_bytes());
        bytes.push(0xE9);
        bytes.extend_from_slice(format!(",{}\n", 10 + i).as_bytes());
    }

    let df = DataLoader::from_csv_bytes(&bytes).unwrap();
    assert_eq!(df.height(), 9);

    let result = pipeline(2).analyze(&df).unwrap();
    assert_eq!(result.row_count, 9);
}

#[test]
fn test_csv_file_loading() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("upload.csv");
    fs::write(
        &path,
        "Timestamp,Close\n2024-05-01,10.5\n2024-05-02,11.0\n2024-05-03,11.25\n2024-05-04,12.0\n",
    )
    .unwrap();

    let df = DataLoader::from_csv(&path).unwrap();
    assert_eq!(df.get_column_names(), vec!["Timestamp", "Close"]);

    let result = pipeline(1).analyze(&df).unwrap();
    assert_eq!(result.forecast.len(), 5);
}
