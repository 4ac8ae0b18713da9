//! Synthetic series generation for tests and examples

use crate::{DailyClose, PriceSeries};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate a random-walk close series starting at `start_price`.
///
/// Each day the price moves by a uniform fraction in `[-volatility, +volatility]`
/// and is floored at 1.0 so it never goes non-positive. Dates advance by one
/// calendar day starting from 2022-01-03.
pub fn generate_random_walk(days: usize, start_price: f64, volatility: f64) -> PriceSeries {
    let mut rng = rand::thread_rng();
    random_walk_with_rng(&mut rng, days, start_price, volatility)
}

/// Seeded variant of [`generate_random_walk`] for deterministic tests.
pub fn generate_random_walk_seeded(
    days: usize,
    start_price: f64,
    volatility: f64,
    seed: u64,
) -> PriceSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    random_walk_with_rng(&mut rng, days, start_price, volatility)
}

fn random_walk_with_rng<R: Rng>(
    rng: &mut R,
    days: usize,
    start_price: f64,
    volatility: f64,
) -> PriceSeries {
    let start_date = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();

    let mut price = start_price;
    let mut observations = Vec::with_capacity(days);
    for i in 0..days {
        let change = (rng.gen::<f64>() - 0.5) * 2.0 * volatility;
        price = (price * (1.0 + change)).max(1.0);
        observations.push(DailyClose {
            date: start_date + chrono::Duration::days(i as i64),
            close: price,
        });
    }

    PriceSeries::new(observations).expect("generated dates are strictly increasing")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_walk_has_requested_length() {
        let series = generate_random_walk(120, 100.0, 0.02);
        assert_eq!(series.len(), 120);
        assert!(series.closes().iter().all(|c| c.is_finite() && *c >= 1.0));
    }

    #[test]
    fn seeded_walk_is_reproducible() {
        let a = generate_random_walk_seeded(50, 100.0, 0.02, 7);
        let b = generate_random_walk_seeded(50, 100.0, 0.02, 7);
        assert_eq!(a, b);
    }
}
