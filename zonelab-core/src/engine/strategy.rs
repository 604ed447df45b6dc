//! Strategy trait — one deterministic state machine step per bar.
//!
//! A step consumes the state left by the previous bar and returns the state
//! for the next. Everything observable goes through the `Recorder`. Steps see
//! only the current bar plus whatever the previous step chose to carry forward,
//! so a run over a prefix of the bars is a prefix of the full run.

use std::fmt::Debug;

use crate::config::EngineConfig;
use crate::domain::{Bar, Position};

use super::recorder::Recorder;

pub trait Strategy: Send + Sync {
    type State: Debug + Clone + Default + Send + Sync;

    /// Human-readable name (e.g., "level_ladder").
    fn name(&self) -> &str;

    /// The resolved settings this strategy was built from.
    fn config(&self) -> EngineConfig;

    fn step(
        &self,
        state: Self::State,
        index: usize,
        bar: &Bar,
        out: &mut Recorder,
    ) -> Self::State;

    /// Position left open in `state`, if any.
    fn open_position(state: &Self::State) -> Option<&Position>;
}

/// A value and its value one bar earlier.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Lagged<T> {
    pub prev: T,
    pub curr: T,
}

impl<T: Copy> Lagged<T> {
    /// Move `curr` into `prev` and store `next` as `curr`.
    pub fn shift(self, next: T) -> Self {
        Self {
            prev: self.curr,
            curr: next,
        }
    }
}

/// The fields of the previous bar a step is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrevBar {
    pub close: f64,
    pub bullish: bool,
}

impl From<&Bar> for PrevBar {
    fn from(bar: &Bar) -> Self {
        Self {
            close: bar.close,
            bullish: bar.is_bullish(),
        }
    }
}
