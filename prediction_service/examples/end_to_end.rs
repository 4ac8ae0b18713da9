use market_data::utils::generate_random_walk;
use market_data::CsvDataSource;
use prediction_service::{ForecastService, JsonHistoryStore, JsonUserStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Prediction Service: End-to-End Example");
    println!("======================================\n");

    // Stage a data directory with one synthetic ticker
    let data_dir = std::env::temp_dir().join("prediction_service_demo");
    std::fs::create_dir_all(&data_dir)?;

    let series = generate_random_walk(750, 150.0, 0.02);
    let mut csv = String::from("date,close\n");
    for obs in series.observations() {
        csv.push_str(&format!("{},{:.4}\n", obs.date.format("%Y-%m-%d"), obs.close));
    }
    std::fs::write(data_dir.join("DEMO.csv"), csv)?;

    let service = ForecastService::new(
        CsvDataSource::new(&data_dir),
        JsonUserStore::new(data_dir.join("users.json")),
        JsonHistoryStore::new(data_dir.join("history.json")),
    );

    service.register("demo_user", "demo_pass")?;
    service.login("demo_user", "demo_pass")?;

    println!("Forecasting DEMO (this trains a fresh model)...\n");
    let response = service.predict("DEMO", Some("demo_user"))?;

    println!("First five forecast points for {}:", response.ticker);
    for point in response.predictions.iter().take(5) {
        println!("  {}  {:.4}", point.date, point.price);
    }

    let history = service.history("demo_user")?;
    println!("\nHistory entries for demo_user: {}", history.len());

    Ok(())
}
