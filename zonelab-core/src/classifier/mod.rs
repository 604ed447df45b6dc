//! Zone classification — what a single bar's open→close body did relative to
//! the price levels around its close.
//!
//! Classifiers are stateless and see exactly one bar. Two strategies exist:
//! - `LevelCrossing`: crossing of the nearest ladder level above or below.
//! - `PsychBoxClassifier`: close inside / pierce of a box around a round number.

pub mod level_crossing;
pub mod psych_box;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::Bar;

pub use level_crossing::{Crossing, LevelCrossing};
pub use psych_box::PsychBoxClassifier;

/// The outcome of classifying one bar. At most one fact holds per bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneFact {
    None,
    /// The body crossed a ladder level; `level` becomes the bar's active level.
    Crossed { level: f64, crossing: Crossing },
    /// Close landed inside the box around the nearest psychological level.
    ClosedInBox { mid: f64 },
    /// Upward body crossed the top of the box below the close.
    PiercedUp { mid: f64 },
    /// Downward body crossed the bottom of the box above the close.
    PiercedDown { mid: f64 },
}

impl ZoneFact {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The ladder level crossed this bar, if any.
    pub fn active_level(&self) -> Option<f64> {
        match *self {
            Self::Crossed { level, .. } => Some(level),
            _ => None,
        }
    }
}

/// Trait for zone classifiers.
///
/// Implementations must only look at the bar they are given.
pub trait ZoneClassifier: Send + Sync {
    /// Human-readable name (e.g., "level_crossing").
    fn name(&self) -> &str;

    fn classify(&self, bar: &Bar) -> ZoneFact;
}

/// Build the classifier the configured engine uses.
pub fn classifier_for(config: &EngineConfig) -> Box<dyn ZoneClassifier> {
    match config {
        EngineConfig::LevelLadder(c) => Box::new(LevelCrossing::from_config(c)),
        EngineConfig::PsychBox(c) => Box::new(PsychBoxClassifier::from_config(c)),
    }
}
