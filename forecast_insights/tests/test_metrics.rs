use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use forecast_insights::metrics::{align_history, calculate_metrics};
use forecast_insights::{ForecastError, ForecastPoint, MetricsSet, TimeSeriesPoint};

fn day(offset: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::days(offset)
}

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    let metrics = calculate_metrics(&actual, &predicted).unwrap();

    assert_relative_eq!(metrics.mae, 2.4);
    assert_relative_eq!(metrics.rmse, 2.4495);
    assert_relative_eq!(metrics.mape, 10.3);
}

#[test]
fn test_perfect_fit() {
    let values = vec![5.0, 6.0, 7.0];
    assert_eq!(calculate_metrics(&values, &values).unwrap(), MetricsSet::default());
}

#[test]
fn test_zero_actual_reports_zero_mape() {
    let metrics = calculate_metrics(&[0.0, 10.0], &[1.0, 10.0]).unwrap();

    assert_relative_eq!(metrics.mae, 0.5);
    assert_relative_eq!(metrics.rmse, 0.7071);
    assert_eq!(metrics.mape, 0.0);
}

#[test]
fn test_empty_input() {
    let empty: Vec<f64> = vec![];
    assert_eq!(calculate_metrics(&empty, &empty).unwrap(), MetricsSet::default());
}

#[test]
fn test_non_finite_pairs_are_excluded() {
    let actual = vec![10.0, f64::NAN, 20.0, 30.0];
    let predicted = vec![11.0, 5.0, 22.0, f64::INFINITY];

    let metrics = calculate_metrics(&actual, &predicted).unwrap();

    assert_relative_eq!(metrics.mae, 1.5);
    assert_relative_eq!(metrics.rmse, 1.5811);
    assert_relative_eq!(metrics.mape, 10.0);
}

#[test]
fn test_length_mismatch() {
    let result = calculate_metrics(&[1.0, 2.0], &[1.0]);
    assert!(matches!(result, Err(ForecastError::Internal(_))));
}

#[test]
fn test_align_history_skips_unmatched() {
    let history = vec![
        TimeSeriesPoint::new(day(0), 1.0),
        TimeSeriesPoint::new(day(1), 2.0),
        TimeSeriesPoint::new(day(2), 3.0),
    ];
    let forecast = vec![
        ForecastPoint::new(day(0), 1.5, 1.0, 2.0),
        ForecastPoint::new(day(2), 2.5, 2.0, 3.0),
        ForecastPoint::new(day(3), 3.5, 3.0, 4.0),
    ];

    let (actual, predicted) = align_history(&history, &forecast);

    assert_eq!(actual, vec![1.0, 3.0]);
    assert_eq!(predicted, vec![1.5, 2.5]);
}

#[test]
fn test_serialized_names() {
    let metrics = MetricsSet {
        mae: 1.25,
        rmse: 2.5,
        mape: 3.75,
    };
    let json = serde_json::to_value(metrics).unwrap();

    assert_eq!(json["MAE"], 1.25);
    assert_eq!(json["RMSE"], 2.5);
    assert_eq!(json["MAPE"], 3.75);
}
