//! Error types for the prediction_service crate
//!
//! Every variant maps onto one distinct user-facing condition, so a transport
//! layer in front of the service can translate errors to messages and status
//! codes without parsing strings.

use crate::storage::StorageError;
use forecast_engine::ForecastError;
use thiserror::Error;

/// Custom error types for the prediction_service crate
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("ticker symbol is required")]
    TickerRequired,

    #[error("username and password are required")]
    CredentialsRequired,

    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    /// The symbol produced no usable data at all
    #[error("no data for symbol: {0}")]
    NoDataForSymbol(String),

    /// The symbol has data, but fewer closes than the forecast needs
    #[error("not enough history for {ticker}: need {required} closes, got {actual}")]
    NotEnoughData {
        ticker: String,
        required: usize,
        actual: usize,
    },

    /// The market data collaborator failed outright
    #[error("market data fetch failed: {0}")]
    Fetch(String),

    #[error("forecast failed: {0}")]
    Forecast(#[from] ForecastError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ServiceError>;
