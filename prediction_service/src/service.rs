//! Forecast request orchestration
//!
//! One `predict` call performs the whole request lifecycle: fetch three years
//! of daily closes, validate the history length, run the forecasting pipeline
//! and append the result to the requesting user's history. Every request
//! trains its own model; concurrent requests share no mutable state, so cost
//! scales linearly with request count and nothing needs locking here.

use crate::error::{Result, ServiceError};
use crate::storage::{HistoryStore, UserStore};
use crate::types::{ForecastResponse, PredictionRecord, UserRecord};
use chrono::Utc;
use forecast_engine::{forecast_series, FORECAST_HORIZON};
use market_data::{LookbackPeriod, MarketDataError, MarketDataSource};

/// Minimum closes required before a forecast is attempted; a 20-row safety
/// margin above the 60 needed to form one input window
pub const MIN_HISTORY: usize = 80;

/// The forecasting service with its injected collaborators
pub struct ForecastService<S, U, H> {
    source: S,
    users: U,
    history: H,
}

impl<S, U, H> ForecastService<S, U, H>
where
    S: MarketDataSource,
    U: UserStore,
    H: HistoryStore,
{
    pub fn new(source: S, users: U, history: H) -> Self {
        Self {
            source,
            users,
            history,
        }
    }

    /// Create a user account. Duplicate usernames are rejected.
    pub fn register(&self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ServiceError::CredentialsRequired);
        }

        if self.users.get(username)?.is_some() {
            return Err(ServiceError::UserExists(username.to_string()));
        }

        self.users.put(
            username,
            &UserRecord {
                password: password.to_string(),
            },
        )?;
        log::info!("user created: {}", username);
        Ok(())
    }

    /// Check a username/password pair against the user store.
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        let username = username.trim();
        match self.users.get(username)? {
            Some(record) if record.password == password.trim() => {
                log::info!("login success: {}", username);
                Ok(())
            }
            _ => Err(ServiceError::InvalidCredentials),
        }
    }

    /// Produce a 30-day forecast for `ticker`.
    ///
    /// When `username` is given, the completed forecast is appended to that
    /// user's history. A failed forecast appends nothing; there is no partial
    /// result and no retry.
    pub fn predict(&self, ticker: &str, username: Option<&str>) -> Result<ForecastResponse> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ServiceError::TickerRequired);
        }

        let series = self
            .source
            .fetch_daily_closes(&ticker, LookbackPeriod::ThreeYears)
            .map_err(|e| match e {
                MarketDataError::NoData(_) => ServiceError::NoDataForSymbol(ticker.clone()),
                other => ServiceError::Fetch(other.to_string()),
            })?;

        if series.is_empty() {
            return Err(ServiceError::NoDataForSymbol(ticker));
        }
        if series.len() < MIN_HISTORY {
            return Err(ServiceError::NotEnoughData {
                ticker,
                required: MIN_HISTORY,
                actual: series.len(),
            });
        }

        log::info!("forecasting {} from {} closes", ticker, series.len());
        let predictions = forecast_series(&series, FORECAST_HORIZON)?;

        if let Some(user) = username {
            self.history.append(
                user,
                PredictionRecord {
                    timestamp: Utc::now(),
                    ticker: ticker.clone(),
                    predictions: predictions.clone(),
                },
            )?;
        }

        Ok(ForecastResponse {
            ticker,
            predictions,
        })
    }

    /// A user's prediction history, oldest first.
    pub fn history(&self, username: &str) -> Result<Vec<PredictionRecord>> {
        Ok(self.history.read(username)?)
    }
}
