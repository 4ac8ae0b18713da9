use assert_approx_eq::assert_approx_eq;
use forecast_engine::{ForecastError, MinMaxScaler};
use pretty_assertions::assert_eq;

#[test]
fn transform_maps_extremes_to_unit_interval() {
    let scaler = MinMaxScaler::fit(&[50.0, 75.0, 100.0]).unwrap();

    assert_approx_eq!(scaler.transform(50.0), 0.0);
    assert_approx_eq!(scaler.transform(100.0), 1.0);
    assert_approx_eq!(scaler.transform(75.0), 0.5);
}

#[test]
fn inverse_round_trips_arbitrary_values() {
    let values = vec![12.5, 80.0, 33.3, 45.1, 19.9];
    let scaler = MinMaxScaler::fit(&values).unwrap();

    for &v in &values {
        assert_approx_eq!(scaler.inverse(scaler.transform(v)), v, 1e-9);
    }
}

#[test]
fn inverse_of_unit_bounds_returns_observed_extremes() {
    let scaler = MinMaxScaler::fit(&[3.0, 9.0, 6.0]).unwrap();
    assert_eq!(scaler.inverse(0.0), 3.0);
    assert_eq!(scaler.inverse(1.0), 9.0);
}

#[test]
fn transform_all_and_inverse_all_are_elementwise() {
    let scaler = MinMaxScaler::fit(&[0.0, 10.0]).unwrap();
    let normalized = scaler.transform_all(&[0.0, 2.5, 5.0, 10.0]);
    assert_eq!(normalized, vec![0.0, 0.25, 0.5, 1.0]);

    let restored = scaler.inverse_all(&normalized);
    assert_eq!(restored, vec![0.0, 2.5, 5.0, 10.0]);
}

#[test]
fn refuses_to_fit_empty_or_non_finite_input() {
    assert!(matches!(
        MinMaxScaler::fit(&[]),
        Err(ForecastError::DataError(_))
    ));
    assert!(matches!(
        MinMaxScaler::fit(&[1.0, f64::INFINITY]),
        Err(ForecastError::DataError(_))
    ));
}
