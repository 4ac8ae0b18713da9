//! # Forecast Engine
//!
//! On-demand stock price forecasting. A caller hands over a ticker's raw
//! closing-price history; the engine normalizes it, trains a small stacked
//! LSTM regressor against that single series, and projects prices forward by
//! feeding each prediction back in as the next input step.
//!
//! ## Pipeline
//!
//! - **Window preparation**: fit a min-max scaler over the whole series and
//!   take the most recent 60 normalized closes as the seed window.
//! - **Training**: construct a fresh two-layer LSTM (width 50, single
//!   linear output) and run two mini-batch passes of Adam over sliding-window
//!   pairs from the same series. No model state survives the request.
//! - **Autoregressive forecast**: roll the trained model forward 30 steps,
//!   sliding each prediction into the window, then denormalize.
//!
//! ## Quick Start
//!
//! ```no_run
//! use forecast_engine::{forecast, prepare_window, train_model, TrainingConfig, FORECAST_HORIZON};
//!
//! let closes: Vec<f64> = (0..90).map(|i| 100.0 + i as f64 * 0.1).collect();
//!
//! let (window, scaler) = prepare_window(&closes).unwrap();
//! let model = train_model(&closes, &scaler, &TrainingConfig::default()).unwrap();
//!
//! let last_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! let points = forecast(&model, &window, &scaler, last_date, FORECAST_HORIZON).unwrap();
//! assert_eq!(points.len(), FORECAST_HORIZON);
//! ```

pub mod error;
pub mod forecast;
pub mod models;
pub mod pipeline;
pub mod scaling;
pub mod window;

// Re-export commonly used types
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{forecast, ForecastPoint, FORECAST_HORIZON};
pub use crate::models::{train_model, train_model_seeded, LstmRegressor, SequenceModel, TrainingConfig};
pub use crate::pipeline::{forecast_series, forecast_series_with};
pub use crate::scaling::MinMaxScaler;
pub use crate::window::{prepare_window, InputWindow, WINDOW_SIZE};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
