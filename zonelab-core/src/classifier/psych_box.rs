//! Psychological-box classifier.
//!
//! The box around a round number `m` is `[m - box_step, m + box_step]`. A close
//! inside the box around the nearest multiple wins; otherwise the body direction
//! picks one pierce test against the first multiple below (upward body) or
//! above (downward body) the close.

use crate::config::BoxConfig;
use crate::domain::Bar;
use crate::levels::{first_multiple_down, first_multiple_up, nearest_multiple};

use super::{ZoneClassifier, ZoneFact};

#[derive(Debug, Clone)]
pub struct PsychBoxClassifier {
    pub psych_step: f64,
    pub box_step: f64,
}

impl PsychBoxClassifier {
    pub fn new(psych_step: f64, box_step: f64) -> Self {
        Self {
            psych_step,
            box_step,
        }
    }

    pub fn from_config(config: &BoxConfig) -> Self {
        Self::new(config.psych_step, config.box_step)
    }

    /// Classify an open→close span.
    pub fn check_zone(&self, start: f64, end: f64) -> ZoneFact {
        let nearest = nearest_multiple(end, self.psych_step);
        if end >= nearest - self.box_step && end <= nearest + self.box_step {
            return ZoneFact::ClosedInBox { mid: nearest };
        }

        if end >= start {
            let below = first_multiple_down(end, self.psych_step);
            let below_top = below + self.box_step;
            if start <= below_top && end >= below_top {
                return ZoneFact::PiercedUp { mid: below };
            }
        } else {
            let above = first_multiple_up(end, self.psych_step);
            let above_bot = above - self.box_step;
            if start >= above_bot && end <= above_bot {
                return ZoneFact::PiercedDown { mid: above };
            }
        }
        ZoneFact::None
    }
}

impl ZoneClassifier for PsychBoxClassifier {
    fn name(&self) -> &str {
        "psych_box"
    }

    fn classify(&self, bar: &Bar) -> ZoneFact {
        self.check_zone(bar.open, bar.close)
    }
}
