use market_data::{
    DailyClose, LookbackPeriod, MarketDataError, MarketDataSource, PriceSeries,
};
use prediction_service::{
    ForecastService, MemoryHistoryStore, MemoryUserStore, ServiceError, MIN_HISTORY,
};

/// Market data stub serving fixed series per ticker.
struct StubSource;

fn flat_series(days: usize) -> PriceSeries {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let observations = (0..days)
        .map(|i| DailyClose {
            date: start + chrono::Duration::days(i as i64),
            close: 100.0,
        })
        .collect();
    PriceSeries::new(observations).unwrap()
}

impl MarketDataSource for StubSource {
    fn fetch_daily_closes(
        &self,
        ticker: &str,
        _lookback: LookbackPeriod,
    ) -> Result<PriceSeries, MarketDataError> {
        match ticker {
            "GOOD" => Ok(flat_series(90)),
            "SHORT" => Ok(flat_series(MIN_HISTORY - 1)),
            "BROKEN" => Err(MarketDataError::Fetch("connection reset".to_string())),
            _ => Err(MarketDataError::NoData(ticker.to_string())),
        }
    }
}

fn service() -> ForecastService<StubSource, MemoryUserStore, MemoryHistoryStore> {
    ForecastService::new(StubSource, MemoryUserStore::new(), MemoryHistoryStore::new())
}

#[test]
fn predict_returns_full_horizon_and_uppercases_ticker() {
    let service = service();
    let response = service.predict("good", None).unwrap();

    assert_eq!(response.ticker, "GOOD");
    assert_eq!(response.predictions.len(), 30);
    for point in &response.predictions {
        assert!(point.price.is_finite());
    }
}

#[test]
fn predict_records_history_for_named_user() {
    let service = service();
    service.predict("GOOD", Some("alice")).unwrap();
    service.predict("GOOD", Some("alice")).unwrap();

    let history = service.history("alice").unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].timestamp <= history[1].timestamp);
    assert_eq!(history[0].predictions.len(), 30);
}

#[test]
fn predict_without_user_records_nothing() {
    let service = service();
    service.predict("GOOD", None).unwrap();
    assert!(service.history("alice").unwrap().is_empty());
}

#[test]
fn unknown_symbol_maps_to_no_data() {
    let service = service();
    let result = service.predict("NOPE", None);
    assert!(matches!(result, Err(ServiceError::NoDataForSymbol(t)) if t == "NOPE"));
}

#[test]
fn upstream_failure_maps_to_fetch_error() {
    let service = service();
    let result = service.predict("BROKEN", None);
    assert!(matches!(result, Err(ServiceError::Fetch(_))));
}

#[test]
fn short_history_is_rejected_below_the_safety_margin() {
    let service = service();
    let result = service.predict("SHORT", None);

    match result {
        Err(ServiceError::NotEnoughData {
            required, actual, ..
        }) => {
            assert_eq!(required, MIN_HISTORY);
            assert_eq!(actual, MIN_HISTORY - 1);
        }
        other => panic!("expected NotEnoughData, got {:?}", other),
    }
}

#[test]
fn failed_forecast_appends_no_history() {
    let service = service();
    let _ = service.predict("SHORT", Some("alice"));
    assert!(service.history("alice").unwrap().is_empty());
}

#[test]
fn blank_ticker_is_rejected() {
    let service = service();
    assert!(matches!(
        service.predict("   ", None),
        Err(ServiceError::TickerRequired)
    ));
}

#[test]
fn register_and_login_round_trip() {
    let service = service();
    service.register("alice", "secret").unwrap();

    assert!(service.login("alice", "secret").is_ok());
    assert!(matches!(
        service.login("alice", "wrong"),
        Err(ServiceError::InvalidCredentials)
    ));
    assert!(matches!(
        service.login("bob", "secret"),
        Err(ServiceError::InvalidCredentials)
    ));
}

#[test]
fn duplicate_registration_is_rejected() {
    let service = service();
    service.register("alice", "secret").unwrap();

    let result = service.register("alice", "other");
    assert!(matches!(result, Err(ServiceError::UserExists(u)) if u == "alice"));
}

#[test]
fn blank_credentials_are_rejected() {
    let service = service();
    assert!(matches!(
        service.register("", "secret"),
        Err(ServiceError::CredentialsRequired)
    ));
    assert!(matches!(
        service.register("alice", "   "),
        Err(ServiceError::CredentialsRequired)
    ));
}
