//! Level ladder — a uniform price grid anchored by floor division of the close.

use serde::{Deserialize, Serialize};

/// Per-bar ladder. `up[0]` is the nearest level above the anchor, `dn[0]` the
/// anchor itself (the nearest level at or below the price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    /// Ascending.
    pub up: Vec<f64>,
    /// Descending.
    pub dn: Vec<f64>,
    pub level_size: f64,
}

impl LevelSet {
    pub fn nearest_up(&self) -> Option<f64> {
        self.up.first().copied()
    }

    pub fn nearest_dn(&self) -> Option<f64> {
        self.dn.first().copied()
    }
}

/// Anchor = `floor(price / level_size) * level_size`.
///
/// Floors toward negative infinity, so -7.5 with size 5 anchors at -10, not -5.
pub fn base_level(price: f64, level_size: f64) -> f64 {
    (price / level_size).floor() * level_size
}

/// Build `n_levels` levels above and below the anchor for `price`.
///
/// Levels are computed as `base ± k * level_size` rather than by repeated
/// addition so rounding error does not accumulate across the ladder.
pub fn process_levels(price: f64, level_size: f64, n_levels: usize) -> LevelSet {
    let base = base_level(price, level_size);
    let up = (1..=n_levels).map(|k| base + k as f64 * level_size).collect();
    let dn = (0..n_levels).map(|k| base - k as f64 * level_size).collect();
    LevelSet {
        up,
        dn,
        level_size,
    }
}
