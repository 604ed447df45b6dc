//! Level-crossing classifier.
//!
//! Uses only the nearest ladder level above (`top`) and below (`bot`) the close.
//! Full spans through both levels are tested first so the four outcomes stay
//! disjoint:
//! - open < bot and close > top: full span up, resolves to `top`
//! - open > top and close < bot: full span down, resolves to `bot`
//! - open > top and close < top: down through the upper level
//! - open < bot and close > bot: up through the lower level

use serde::{Deserialize, Serialize};

use crate::config::LadderConfig;
use crate::domain::Bar;
use crate::levels::{process_levels, LevelSet};

use super::{ZoneClassifier, ZoneFact};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossing {
    DownThroughUpper,
    UpThroughLower,
    FullSpanUp,
    FullSpanDown,
}

#[derive(Debug, Clone)]
pub struct LevelCrossing {
    pub level_size: f64,
    pub n_levels: usize,
}

impl LevelCrossing {
    pub fn new(level_size: f64, n_levels: usize) -> Self {
        Self {
            level_size,
            n_levels,
        }
    }

    pub fn from_config(config: &LadderConfig) -> Self {
        Self::new(config.level_size(), config.n_levels)
    }

    /// The ladder derived from `close`.
    pub fn ladder(&self, close: f64) -> LevelSet {
        process_levels(close, self.level_size, self.n_levels)
    }

    /// Classify `bar` against an already computed ladder.
    pub fn classify_against(&self, levels: &LevelSet, bar: &Bar) -> ZoneFact {
        let (Some(top), Some(bot)) = (levels.nearest_up(), levels.nearest_dn()) else {
            return ZoneFact::None;
        };
        let (open, close) = (bar.open, bar.close);

        let hit = if open < bot && close > top {
            Some((top, Crossing::FullSpanUp))
        } else if open > top && close < bot {
            Some((bot, Crossing::FullSpanDown))
        } else if open > top && close < top {
            Some((top, Crossing::DownThroughUpper))
        } else if open < bot && close > bot {
            Some((bot, Crossing::UpThroughLower))
        } else {
            None
        };

        match hit {
            Some((level, crossing)) => ZoneFact::Crossed { level, crossing },
            None => ZoneFact::None,
        }
    }
}

impl ZoneClassifier for LevelCrossing {
    fn name(&self) -> &str {
        "level_crossing"
    }

    fn classify(&self, bar: &Bar) -> ZoneFact {
        let levels = self.ladder(bar.close);
        self.classify_against(&levels, bar)
    }
}
