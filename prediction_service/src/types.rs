//! Wire-shaped types for forecast responses and persisted records

use chrono::{DateTime, Utc};
use forecast_engine::ForecastPoint;
use serde::{Deserialize, Serialize};

/// Response to one forecast request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// Uppercased ticker symbol the forecast was produced for
    pub ticker: String,
    /// Exactly one point per forecast day, ordered by date
    pub predictions: Vec<ForecastPoint>,
}

/// One entry in a user's prediction history
///
/// Appended when a forecast completes for a logged-in user; entries are never
/// mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// When the forecast was produced
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub predictions: Vec<ForecastPoint>,
}

/// Stored credential record for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub password: String,
}
