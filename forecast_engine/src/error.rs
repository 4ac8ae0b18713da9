//! Error types for the forecast_engine crate

use thiserror::Error;

/// Custom error types for the forecast_engine crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The series is too short to form a single input window
    #[error("insufficient history: need at least {required} closes, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Windowing the series produced zero training pairs
    #[error("training set is empty: no window/target pair fits the series")]
    EmptyTrainingSet,

    /// The model produced a non-finite or otherwise unusable prediction
    #[error("forecast computation failed: {0}")]
    ForecastComputation(String),

    /// Error from invalid parameters
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to data validation or processing
    #[error("data error: {0}")]
    DataError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;
