//! The end-to-end forecasting pipeline
//!
//! One call covers one request: fit the scaler and seed window from the raw
//! series, train a fresh model on that ticker's own history, then roll the
//! autoregressive loop forward. Nothing survives the call; scaler, training
//! set and weights are all request-local, so concurrent requests share no
//! state.

use crate::error::{ForecastError, Result};
use crate::forecast::{forecast, ForecastPoint};
use crate::models::training::{train_model, TrainingConfig};
use crate::window::prepare_window;
use market_data::PriceSeries;

/// Run the full pipeline over a price series.
pub fn forecast_series(series: &PriceSeries, horizon: usize) -> Result<Vec<ForecastPoint>> {
    forecast_series_with(series, horizon, &TrainingConfig::default())
}

/// [`forecast_series`] with explicit training hyperparameters.
pub fn forecast_series_with(
    series: &PriceSeries,
    horizon: usize,
    config: &TrainingConfig,
) -> Result<Vec<ForecastPoint>> {
    let closes = series.closes();
    let (window, scaler) = prepare_window(&closes)?;

    let last_date = series
        .last_date()
        .ok_or_else(|| ForecastError::DataError("series has no observations".to_string()))?;

    log::info!("training fresh model on {} closes", closes.len());
    let model = train_model(&closes, &scaler, config)?;

    forecast(&model, &window, &scaler, last_date, horizon)
}
