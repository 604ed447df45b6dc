//! Price-level arithmetic shared by both engines.

pub mod ladder;
pub mod psych;

pub use ladder::{base_level, process_levels, LevelSet};
pub use psych::{first_multiple_down, first_multiple_up, nearest_multiple};

pub fn pips_to_price(pips: f64, pip_size: f64) -> f64 {
    pips * pip_size
}

pub fn price_to_pips(price: f64, pip_size: f64) -> f64 {
    price / pip_size
}
