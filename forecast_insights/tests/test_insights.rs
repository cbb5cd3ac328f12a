use chrono::{NaiveDate, NaiveDateTime};
use forecast_insights::insights::{TrendAssessment, TrendDirection, TrendIntensity};
use forecast_insights::{generate_insights, Anomaly, ForecastError, ForecastPoint, TimeSeries, TimeSeriesPoint};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn day(offset: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::days(offset)
}

/// Ten flat days at 100, Jan 1 to Jan 10
fn flat_history() -> TimeSeries {
    TimeSeries::new((0..10).map(|i| TimeSeriesPoint::new(day(i), 100.0)).collect())
}

fn history_fit() -> Vec<ForecastPoint> {
    (0..10)
        .map(|i| ForecastPoint::new(day(i), 100.0, 95.0, 105.0))
        .collect()
}

#[test]
fn test_strong_growth_with_high_anomaly() {
    let history = flat_history();
    let mut forecast = history_fit();
    forecast.push(ForecastPoint::new(day(10), 110.0, 105.0, 115.0));
    forecast.push(ForecastPoint::new(day(11), 120.0, 115.0, 125.0));
    forecast.push(ForecastPoint::new(day(12), 130.0, 125.0, 135.0));

    let spike = TimeSeriesPoint::new(day(4), 150.0);
    let anomalies = vec![Anomaly::from_observation(&spike, &forecast[4])];

    let set = generate_insights(&history, &forecast, &anomalies).unwrap();

    assert_eq!(
        set.insights,
        vec![
            "Significant Growth: Expect a 30.0% growth in values over the next forecast cycle.".to_string(),
            "Forecast Peak: The model projects a high of 130.00 around 2024-01-13.".to_string(),
            "Critical Volatility: Detected 1 High Severity anomalies requiring immediate review.".to_string(),
            "Statistical Stability: Over 1 historical anomalies identified, helping refine model sensitivity.".to_string(),
            "High Confidence: The model shows high convergence with a narrow prediction interval.".to_string(),
        ]
    );
    assert_eq!(
        set.recommendations,
        vec![
            "Scale Operations: Increase capacity and inventory to meet projected high demand.".to_string(),
            "Peak Readiness: Plan marketing or maintenance activities around the 2024-01-13 peak.".to_string(),
            "Risk Mitigation: Audit the high-severity data points to identify root causes and prevent recurrence.".to_string(),
        ]
    );
}

#[test]
fn test_zero_horizon_skips_peak() {
    let set = generate_insights(&flat_history(), &history_fit(), &[]).unwrap();

    assert_eq!(
        set.insights,
        vec![
            "Minimal Decline: Expect a 0.0% decline in values over the next forecast cycle.".to_string(),
            "Operational Stability: No significant anomalies detected in recent historical data.".to_string(),
            "High Confidence: The model shows high convergence with a narrow prediction interval.".to_string(),
        ]
    );
    assert_eq!(
        set.recommendations,
        vec!["Cost Optimization: Identify potential operational efficiencies to offset the projected decline.".to_string()]
    );
}

#[test]
fn test_wide_interval_recommends_refinement() {
    let mut forecast = history_fit();
    forecast.push(ForecastPoint::new(day(10), 95.0, 60.0, 130.0));

    let set = generate_insights(&flat_history(), &forecast, &[]).unwrap();

    assert_eq!(
        set.insights.first().map(String::as_str),
        Some("Moderate Decline: Expect a 5.0% decline in values over the next forecast cycle.")
    );
    assert_eq!(
        set.insights.last().map(String::as_str),
        Some("Variable Forecast: Noted a wider uncertainty margin, suggesting potential external market influence.")
    );
    assert_eq!(
        set.recommendations.last().map(String::as_str),
        Some("Data Refinement: Consider adding additional context columns (holidays, promos) to reduce forecast variance.")
    );
}

#[test]
fn test_peak_is_first_maximum_after_history() {
    let mut forecast = history_fit();
    // A historical estimate higher than any future one is ignored
    forecast[3] = ForecastPoint::new(day(3), 500.0, 495.0, 505.0);
    forecast.push(ForecastPoint::new(day(10), 104.0, 100.0, 108.0));
    forecast.push(ForecastPoint::new(day(11), 104.0, 100.0, 108.0));
    forecast.push(ForecastPoint::new(day(12), 102.0, 98.0, 106.0));

    let set = generate_insights(&flat_history(), &forecast, &[]).unwrap();

    assert_eq!(
        set.insights[1],
        "Forecast Peak: The model projects a high of 104.00 around 2024-01-11."
    );
}

#[test]
fn test_low_anomalies_only_report_stability() {
    let forecast = history_fit();
    let point = TimeSeriesPoint::new(day(2), 107.0);
    let anomalies = vec![Anomaly::from_observation(&point, &forecast[2])];

    let set = generate_insights(&flat_history(), &forecast, &anomalies).unwrap();

    assert!(!set.insights.iter().any(|s| s.starts_with("Critical Volatility")));
    assert!(set
        .insights
        .contains(&"Statistical Stability: Over 1 historical anomalies identified, helping refine model sensitivity.".to_string()));
}

#[rstest]
#[case(100.0, 115.0, TrendDirection::Growth, TrendIntensity::Significant)]
#[case(100.0, 105.0, TrendDirection::Growth, TrendIntensity::Moderate)]
#[case(100.0, 102.0, TrendDirection::Growth, TrendIntensity::Minimal)]
#[case(100.0, 80.0, TrendDirection::Decline, TrendIntensity::Significant)]
#[case(100.0, 100.0, TrendDirection::Decline, TrendIntensity::Minimal)]
#[case(0.0, 10.0, TrendDirection::Growth, TrendIntensity::Significant)]
#[case(0.0, -10.0, TrendDirection::Decline, TrendIntensity::Significant)]
#[case(0.0, 0.0, TrendDirection::Decline, TrendIntensity::Minimal)]
fn test_trend_assessment(
    #[case] last_value: f64,
    #[case] last_estimate: f64,
    #[case] direction: TrendDirection,
    #[case] intensity: TrendIntensity,
) {
    let trend = TrendAssessment::assess(last_value, last_estimate);
    assert_eq!(trend.direction, direction);
    assert_eq!(trend.intensity, intensity);
}

#[test]
fn test_growth_from_zero_scales_operations() {
    let history = TimeSeries::new((0..5).map(|i| TimeSeriesPoint::new(day(i), 0.0)).collect());
    let mut forecast: Vec<ForecastPoint> = (0..5)
        .map(|i| ForecastPoint::new(day(i), 0.0, -1.0, 1.0))
        .collect();
    forecast.push(ForecastPoint::new(day(5), 50.0, 45.0, 55.0));

    let set = generate_insights(&history, &forecast, &[]).unwrap();

    assert!(set.insights[0].starts_with("Significant Growth:"));
    assert_eq!(
        set.recommendations[0],
        "Scale Operations: Increase capacity and inventory to meet projected high demand."
    );
}

#[test]
fn test_empty_inputs_are_internal_errors() {
    let result = generate_insights(&TimeSeries::default(), &history_fit(), &[]);
    assert!(matches!(result, Err(ForecastError::Internal(_))));

    let result = generate_insights(&flat_history(), &[], &[]);
    assert!(matches!(result, Err(ForecastError::Internal(_))));
}
