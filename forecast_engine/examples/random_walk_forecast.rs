use forecast_engine::{forecast_series, FORECAST_HORIZON};
use market_data::utils::generate_random_walk;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Forecast Engine: Random Walk Example");
    println!("====================================\n");

    // Two years of synthetic daily closes
    let series = generate_random_walk(500, 100.0, 0.02);
    println!(
        "Generated {} closes, last date {}",
        series.len(),
        series.last_date().unwrap()
    );

    println!("\nTraining and forecasting {} days ahead...", FORECAST_HORIZON);
    let points = forecast_series(&series, FORECAST_HORIZON)?;

    println!("\nForecast:");
    for point in &points {
        println!("  {}  {:.4}", point.date, point.price);
    }

    Ok(())
}
