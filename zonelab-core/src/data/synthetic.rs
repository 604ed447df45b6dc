//! Seeded random-walk bars for demos, benches and property tests.
//!
//! Each bar opens at the previous close. The same seed always gives the same
//! series, and every generated bar passes `Bar::validate`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

#[derive(Debug, Clone, PartialEq)]
pub struct WalkParams {
    pub start_price: f64,
    /// Largest open→close move per bar.
    pub max_body: f64,
    /// Largest wick beyond the body on either side.
    pub max_wick: f64,
    /// Timestamp of the first bar; `None` leaves bars untimed.
    pub start_time: Option<i64>,
    pub interval_secs: i64,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            start_price: 2000.0,
            max_body: 4.0,
            max_wick: 1.5,
            start_time: None,
            interval_secs: 60,
        }
    }
}

pub fn random_walk(n: usize, seed: u64, start_price: f64) -> Vec<Bar> {
    generate(
        n,
        seed,
        &WalkParams {
            start_price,
            ..Default::default()
        },
    )
}

pub fn generate(n: usize, seed: u64, params: &WalkParams) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bars = Vec::with_capacity(n);
    let mut open = params.start_price;

    for i in 0..n {
        let close = open + rng.gen_range(-1.0..=1.0) * params.max_body;
        let high = open.max(close) + rng.gen_range(0.0..=1.0) * params.max_wick;
        let low = open.min(close) - rng.gen_range(0.0..=1.0) * params.max_wick;
        let mut bar = Bar::new(open, high, low, close);
        if let Some(start) = params.start_time {
            bar = bar.with_time(start + i as i64 * params.interval_secs);
        }
        bars.push(bar);
        open = close;
    }
    bars
}
