//! # Prediction Service
//!
//! `prediction_service` wires the forecasting pipeline to its collaborators:
//! a market data source, a user store and a per-user prediction history.
//! Requests uppercase the ticker, fetch three years of daily closes, require
//! at least 80 of them, and append completed forecasts to the user's
//! history. There is no transport layer; callers invoke plain functions and
//! map errors to whatever wire format they serve.
//!
//! ## Usage Example
//!
//! ```no_run
//! use market_data::CsvDataSource;
//! use prediction_service::{ForecastService, MemoryHistoryStore, MemoryUserStore};
//!
//! let service = ForecastService::new(
//!     CsvDataSource::new("data"),
//!     MemoryUserStore::new(),
//!     MemoryHistoryStore::new(),
//! );
//!
//! service.register("alice", "secret").unwrap();
//! let response = service.predict("AAPL", Some("alice")).unwrap();
//! assert_eq!(response.predictions.len(), 30);
//! ```

pub mod error;
pub mod service;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use crate::error::{Result, ServiceError};
pub use crate::service::{ForecastService, MIN_HISTORY};
pub use crate::storage::{
    HistoryStore, JsonHistoryStore, JsonUserStore, MemoryHistoryStore, MemoryUserStore,
    StorageError, UserStore,
};
pub use crate::types::{ForecastResponse, PredictionRecord, UserRecord};
