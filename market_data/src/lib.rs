//! # Market Data
//!
//! `market_data` provides the daily closing-price series types consumed by the
//! forecasting pipeline, along with CSV ingestion and a pluggable market data
//! source interface.
//!
//! A [`PriceSeries`] is an ordered run of daily closes, strictly increasing by
//! date with no duplicates. Non-finite closes are rejected at construction, so
//! downstream consumers never have to re-validate.
//!
//! ## Usage Example
//!
//! ```
//! use market_data::utils::generate_random_walk;
//!
//! let series = generate_random_walk(100, 100.0, 0.02);
//! assert_eq!(series.len(), 100);
//! let closes = series.closes();
//! assert!(closes.iter().all(|c| c.is_finite()));
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// CSV ingestion and the directory-backed data source
pub mod loader;
// Synthetic series generation
pub mod utils;

pub use loader::CsvDataSource;

/// Errors that can occur while obtaining or validating market data
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The upstream source failed outright (network, IO, malformed payload)
    #[error("market data fetch failed: {0}")]
    Fetch(String),

    /// The symbol resolved but produced no usable rows
    #[error("no data for symbol: {0}")]
    NoData(String),

    /// The series violates ordering or finiteness requirements
    #[error("invalid price series: {0}")]
    InvalidSeries(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("date parse error: {0}")]
    DateParse(String),
}

/// A single daily closing-price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    /// Trading date of the observation
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
}

/// An ordered series of daily closes
///
/// Invariants: dates are strictly increasing (which also rules out
/// duplicates) and every close is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    observations: Vec<DailyClose>,
}

impl PriceSeries {
    /// Build a series from observations, validating the invariants.
    pub fn new(observations: Vec<DailyClose>) -> Result<Self, MarketDataError> {
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(MarketDataError::InvalidSeries(format!(
                    "dates must be strictly increasing: {} follows {}",
                    pair[1].date, pair[0].date
                )));
            }
        }

        if let Some(bad) = observations.iter().find(|o| !o.close.is_finite()) {
            return Err(MarketDataError::InvalidSeries(format!(
                "non-finite close on {}",
                bad.date
            )));
        }

        Ok(Self { observations })
    }

    /// Build a series from parallel date and close vectors.
    pub fn from_parts(dates: Vec<NaiveDate>, closes: Vec<f64>) -> Result<Self, MarketDataError> {
        if dates.len() != closes.len() {
            return Err(MarketDataError::InvalidSeries(format!(
                "date and close vectors differ in length ({} vs {})",
                dates.len(),
                closes.len()
            )));
        }

        let observations = dates
            .into_iter()
            .zip(closes)
            .map(|(date, close)| DailyClose { date, close })
            .collect();

        Self::new(observations)
    }

    /// The underlying observations, oldest first.
    pub fn observations(&self) -> &[DailyClose] {
        &self.observations
    }

    /// The closing prices, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.close).collect()
    }

    /// The most recent observation date.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Number of observations in the series.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Keep only observations dated on or after `cutoff`.
    pub fn since(&self, cutoff: NaiveDate) -> Self {
        Self {
            observations: self
                .observations
                .iter()
                .copied()
                .filter(|o| o.date >= cutoff)
                .collect(),
        }
    }
}

/// How far back a market data fetch should reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackPeriod {
    OneYear,
    TwoYears,
    ThreeYears,
}

impl LookbackPeriod {
    /// Calendar-day approximation of the period.
    pub fn approx_days(&self) -> i64 {
        match self {
            LookbackPeriod::OneYear => 365,
            LookbackPeriod::TwoYears => 730,
            LookbackPeriod::ThreeYears => 1095,
        }
    }
}

impl Default for LookbackPeriod {
    fn default() -> Self {
        LookbackPeriod::ThreeYears
    }
}

/// Source of historical daily closes for a ticker symbol
///
/// Implementations wrap whatever actually supplies prices (a vendor API, a
/// file dump, a fixture). The forecasting service only depends on this trait.
pub trait MarketDataSource {
    /// Fetch daily closes for `ticker` covering `lookback`, oldest first.
    fn fetch_daily_closes(
        &self,
        ticker: &str,
        lookback: LookbackPeriod,
    ) -> Result<PriceSeries, MarketDataError>;
}
