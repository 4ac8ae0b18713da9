//! Autoregressive multi-step forecasting
//!
//! Each predicted value is pushed back into the working window and becomes
//! part of the next step's input. Errors therefore compound over the horizon;
//! the loop has no mechanism to correct drift and is not meant to. A
//! non-finite prediction aborts the whole run: the caller gets either every
//! point or none.

use crate::error::{ForecastError, Result};
use crate::models::SequenceModel;
use crate::scaling::MinMaxScaler;
use crate::window::InputWindow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default number of days projected forward
pub const FORECAST_HORIZON: usize = 30;

/// One forecasted price on a calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecast date; advances by calendar day, weekends included
    pub date: NaiveDate,
    /// Predicted price, rounded to 4 decimal digits
    pub price: f64,
}

fn round_price(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Roll a trained model forward `horizon` steps from the seed window.
///
/// Point *i* (0-indexed) is dated `last_date + (i + 1)` calendar days and
/// carries the denormalized, 4-decimal-rounded prediction.
pub fn forecast<M: SequenceModel + ?Sized>(
    model: &M,
    window: &InputWindow,
    scaler: &MinMaxScaler,
    last_date: NaiveDate,
    horizon: usize,
) -> Result<Vec<ForecastPoint>> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "forecast horizon must be positive".to_string(),
        ));
    }

    let mut working: Vec<f64> = window.values().to_vec();
    let mut normalized = Vec::with_capacity(horizon);

    for step in 0..horizon {
        let prediction = model.predict_next(&working)?;
        if !prediction.is_finite() {
            return Err(ForecastError::ForecastComputation(format!(
                "model produced a non-finite value at step {} of {}",
                step + 1,
                horizon
            )));
        }

        normalized.push(prediction);

        // Slide: drop the oldest value, append the prediction
        working.remove(0);
        working.push(prediction);
    }

    let points = normalized
        .iter()
        .enumerate()
        .map(|(i, &value)| ForecastPoint {
            date: last_date + chrono::Duration::days(i as i64 + 1),
            price: round_price(scaler.inverse(value)),
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_keeps_four_decimals() {
        assert_eq!(round_price(123.456789), 123.4568);
        assert_eq!(round_price(100.0), 100.0);
    }
}
