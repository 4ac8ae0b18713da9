use forecast_engine::{forecast_series, ForecastError, FORECAST_HORIZON};
use market_data::utils::generate_random_walk_seeded;
use market_data::PriceSeries;

#[test]
fn pipeline_produces_a_full_horizon_from_a_random_walk() {
    let series = generate_random_walk_seeded(90, 100.0, 0.015, 21);
    let points = forecast_series(&series, FORECAST_HORIZON).unwrap();

    assert_eq!(points.len(), FORECAST_HORIZON);

    let last_date = series.last_date().unwrap();
    for (i, point) in points.iter().enumerate() {
        assert_eq!(point.date, last_date + chrono::Duration::days(i as i64 + 1));
        assert!(point.price.is_finite());
    }
}

#[test]
fn pipeline_rejects_short_series() {
    let series = generate_random_walk_seeded(59, 100.0, 0.015, 3);
    let result = forecast_series(&series, FORECAST_HORIZON);
    assert!(matches!(
        result,
        Err(ForecastError::InsufficientHistory { .. })
    ));
}

#[test]
fn pipeline_rejects_empty_series() {
    let series = PriceSeries::new(Vec::new()).unwrap();
    let result = forecast_series(&series, FORECAST_HORIZON);
    assert!(matches!(
        result,
        Err(ForecastError::InsufficientHistory { actual: 0, .. })
    ));
}
