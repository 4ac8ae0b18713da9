//! Input window preparation
//!
//! Turns a raw closing-price series into the fixed-length normalized window
//! the recurrent model consumes, along with the scaler fitted to the series.

use crate::error::{ForecastError, Result};
use crate::scaling::MinMaxScaler;

/// Number of normalized closes in one model input sequence
pub const WINDOW_SIZE: usize = 60;

/// The most recent `WINDOW_SIZE` normalized closes, oldest first
///
/// Immutable once built; the forecast loop copies it into its own working
/// buffer rather than mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct InputWindow {
    values: Vec<f64>,
}

impl InputWindow {
    /// Build a window from exactly `WINDOW_SIZE` normalized values.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.len() != WINDOW_SIZE {
            return Err(ForecastError::InvalidParameter(format!(
                "input window must hold exactly {} values, got {}",
                WINDOW_SIZE,
                values.len()
            )));
        }
        Ok(Self { values })
    }

    /// The normalized values, oldest first.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Prepare the model input for a forecast request.
///
/// Fits a [`MinMaxScaler`] over the whole of `closes`, normalizes the series
/// and returns the last [`WINDOW_SIZE`] values as the seed window. Pure
/// function of its input.
///
/// Fails with [`ForecastError::InsufficientHistory`] when fewer than
/// `WINDOW_SIZE` closes are available.
pub fn prepare_window(closes: &[f64]) -> Result<(InputWindow, MinMaxScaler)> {
    if closes.len() < WINDOW_SIZE {
        return Err(ForecastError::InsufficientHistory {
            required: WINDOW_SIZE,
            actual: closes.len(),
        });
    }

    let scaler = MinMaxScaler::fit(closes)?;
    let tail = &closes[closes.len() - WINDOW_SIZE..];
    let window = InputWindow::from_values(scaler.transform_all(tail))?;

    Ok((window, scaler))
}
