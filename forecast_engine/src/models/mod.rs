//! Recurrent regression models for on-demand forecasting
//!
//! One forecast request gets one freshly constructed, briefly trained model;
//! weights never outlive the request and are never shared across tickers.

use crate::error::Result;

/// A trained sequence regression model
///
/// Maps a full-length normalized input window to a single normalized
/// next-value prediction. The autoregressive forecast loop only depends on
/// this seam, which also makes it easy to drive with stub models in tests.
pub trait SequenceModel: std::fmt::Debug {
    /// Predict the next normalized value from an input window.
    fn predict_next(&self, window: &[f64]) -> Result<f64>;

    /// Name of the model
    fn name(&self) -> &str;
}

pub mod lstm;
pub mod training;

pub use lstm::{LstmRegressor, HIDDEN_SIZE, NUM_LAYERS};
pub use training::{train_model, train_model_seeded, TrainingConfig, TrainingSet};
