//! CSV ingestion for daily close series
//!
//! The loader accepts either a bare `date,close` layout or a full OHLCV dump,
//! locating the date and close columns by (case-insensitive) header name. Rows
//! with unparseable or non-finite closes are skipped, so a file that contains
//! gaps loads cleanly.

use crate::{DailyClose, LookbackPeriod, MarketDataError, MarketDataSource, PriceSeries};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Load a daily close series from a CSV file.
pub fn load_close_series<P: AsRef<Path>>(path: P) -> Result<PriceSeries, MarketDataError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let headers = reader.headers()?.clone();
    let date_idx = find_column(&headers, &["date", "time", "timestamp"]).ok_or_else(|| {
        MarketDataError::InvalidSeries("no date column found in CSV header".to_string())
    })?;
    let close_idx = find_column(&headers, &["close", "price"]).ok_or_else(|| {
        MarketDataError::InvalidSeries("no close column found in CSV header".to_string())
    })?;

    let mut observations = Vec::new();
    for record in reader.records() {
        let record = record?;

        let date_field = match record.get(date_idx) {
            Some(f) => f.trim(),
            None => continue,
        };
        let close_field = match record.get(close_idx) {
            Some(f) => f.trim(),
            None => continue,
        };

        let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d")
            .map_err(|e| MarketDataError::DateParse(format!("{}: {}", date_field, e)))?;

        // Skip rows whose close is missing or not a finite number
        let close: f64 = match close_field.parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        if !f64::is_finite(close) {
            continue;
        }

        observations.push(DailyClose { date, close });
    }

    observations.sort_by_key(|o| o.date);
    PriceSeries::new(observations)
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    for candidate in candidates {
        for (idx, name) in headers.iter().enumerate() {
            if name.to_lowercase().contains(candidate) {
                return Some(idx);
            }
        }
    }
    None
}

/// Market data source backed by a directory of per-ticker CSV files
///
/// `fetch_daily_closes("AAPL", ..)` reads `<dir>/AAPL.csv` and trims the
/// result to the requested lookback window, measured back from the last
/// observation in the file.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn ticker_path(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }
}

impl MarketDataSource for CsvDataSource {
    fn fetch_daily_closes(
        &self,
        ticker: &str,
        lookback: LookbackPeriod,
    ) -> Result<PriceSeries, MarketDataError> {
        let path = self.ticker_path(ticker);
        if !path.exists() {
            return Err(MarketDataError::NoData(ticker.to_string()));
        }

        let series = load_close_series(&path)?;
        let last = match series.last_date() {
            Some(date) => date,
            None => return Err(MarketDataError::NoData(ticker.to_string())),
        };

        let cutoff = last - chrono::Duration::days(lookback.approx_days());
        let trimmed = series.since(cutoff);
        if trimmed.is_empty() {
            return Err(MarketDataError::NoData(ticker.to_string()));
        }

        Ok(trimmed)
    }
}
