use assert_approx_eq::assert_approx_eq;
use chrono::NaiveDate;
use forecast_engine::{
    forecast, ForecastError, InputWindow, MinMaxScaler, Result, SequenceModel, WINDOW_SIZE,
};

/// Stub that echoes the newest window value plus a fixed drift.
///
/// Because its output depends on the window tail, the forecast only ramps if
/// each prediction actually re-enters the window on the next step.
#[derive(Debug)]
struct EchoDrift {
    drift: f64,
}

impl SequenceModel for EchoDrift {
    fn predict_next(&self, window: &[f64]) -> Result<f64> {
        Ok(window[window.len() - 1] + self.drift)
    }

    fn name(&self) -> &str {
        "echo-drift"
    }
}

/// Stub that always returns the same value.
#[derive(Debug)]
struct Constant(f64);

impl SequenceModel for Constant {
    fn predict_next(&self, _window: &[f64]) -> Result<f64> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "constant"
    }
}

/// Stub that fails after a number of good predictions.
#[derive(Debug)]
struct PoisonAfter {
    good_steps: usize,
    calls: std::cell::Cell<usize>,
}

impl SequenceModel for PoisonAfter {
    fn predict_next(&self, _window: &[f64]) -> Result<f64> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        if call < self.good_steps {
            Ok(0.5)
        } else {
            Ok(f64::NAN)
        }
    }

    fn name(&self) -> &str {
        "poison-after"
    }
}

fn unit_scaler() -> MinMaxScaler {
    MinMaxScaler::fit(&[0.0, 1.0]).unwrap()
}

fn seed_window(value: f64) -> InputWindow {
    InputWindow::from_values(vec![value; WINDOW_SIZE]).unwrap()
}

fn last_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 29).unwrap()
}

#[test]
fn returns_exactly_horizon_points() {
    let points = forecast(&Constant(0.5), &seed_window(0.5), &unit_scaler(), last_date(), 30)
        .unwrap();
    assert_eq!(points.len(), 30);
}

#[test]
fn dates_advance_one_calendar_day_from_last_date() {
    let points = forecast(&Constant(0.5), &seed_window(0.5), &unit_scaler(), last_date(), 30)
        .unwrap();

    // First point lands on the day after the last observation; the walk runs
    // straight through the weekend of 2024-03-30/31.
    assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 3, 30).unwrap());
    for pair in points.windows(2) {
        assert_eq!(pair[1].date, pair[0].date + chrono::Duration::days(1));
    }
    assert_eq!(
        points.last().unwrap().date,
        last_date() + chrono::Duration::days(30)
    );
}

#[test]
fn predictions_feed_back_into_the_window() {
    let model = EchoDrift { drift: 0.01 };
    let points = forecast(&model, &seed_window(0.5), &unit_scaler(), last_date(), 10).unwrap();

    // With feedback, each step compounds the drift on top of the previous
    // prediction. A loop that kept re-reading the seed window would return
    // 0.51 for every step instead.
    for (i, point) in points.iter().enumerate() {
        assert_approx_eq!(point.price, 0.5 + 0.01 * (i + 1) as f64, 1e-9);
    }
}

#[test]
fn forecast_is_deterministic_for_fixed_model_and_window() {
    let model = forecast_engine::LstmRegressor::with_seed(42);
    let window = seed_window(0.4);
    let scaler = MinMaxScaler::fit(&[90.0, 110.0]).unwrap();

    let a = forecast(&model, &window, &scaler, last_date(), 30).unwrap();
    let b = forecast(&model, &window, &scaler, last_date(), 30).unwrap();
    assert_eq!(a, b);
}

#[test]
fn non_finite_prediction_aborts_without_partial_output() {
    let model = PoisonAfter {
        good_steps: 7,
        calls: std::cell::Cell::new(0),
    };
    let result = forecast(&model, &seed_window(0.5), &unit_scaler(), last_date(), 30);
    assert!(matches!(result, Err(ForecastError::ForecastComputation(_))));
}

#[test]
fn zero_horizon_is_rejected() {
    let result = forecast(&Constant(0.5), &seed_window(0.5), &unit_scaler(), last_date(), 0);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn points_serialize_with_iso_dates_and_plain_prices() {
    let points = forecast(&Constant(0.5), &seed_window(0.5), &unit_scaler(), last_date(), 2)
        .unwrap();
    let json = serde_json::to_string(&points).unwrap();

    assert!(json.contains("\"date\":\"2024-03-30\""));
    assert!(json.contains("\"price\":0.5"));

    let restored: Vec<forecast_engine::ForecastPoint> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, points);
}

#[test]
fn prices_are_denormalized_and_rounded() {
    let scaler = MinMaxScaler::fit(&[100.0, 200.0]).unwrap();
    let points = forecast(
        &Constant(0.123456),
        &seed_window(0.5),
        &scaler,
        last_date(),
        3,
    )
    .unwrap();

    // 0.123456 inverts to 112.3456 exactly at 4 decimals
    for point in &points {
        assert_approx_eq!(point.price, 112.3456, 1e-9);
    }
}
