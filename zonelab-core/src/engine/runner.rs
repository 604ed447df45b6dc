//! Run driver — validates inputs up front, then steps a strategy through every bar.
//!
//! `run` is the batch entry point. `Session` holds the same state explicitly
//! and takes one bar at a time; feeding it every bar of a series produces the
//! same output as `run` over that series.

use serde::{Deserialize, Serialize};

use crate::config::{BoxConfig, EngineConfig, LadderConfig};
use crate::domain::{Bar, BarError, ClosedPosition, Position};
use crate::error::EngineError;
use crate::fingerprint::RunDigest;

use super::event::Event;
use super::ladder::LadderStrategy;
use super::psych_box::BoxStrategy;
use super::recorder::{LevelSnapshot, Recorder};
use super::strategy::Strategy;

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    pub positions_closed: Vec<ClosedPosition>,
    pub open_position: Option<Position>,
    pub levels_history: Vec<LevelSnapshot>,
    pub events: Vec<Event>,
    pub config: EngineConfig,
}

impl RunOutput {
    /// Content hash of the whole bundle. Equal inputs give equal digests.
    pub fn digest(&self) -> RunDigest {
        let json = serde_json::to_vec(self).unwrap_or_default();
        RunDigest::from_bytes(&json)
    }

    pub fn bars_processed(&self) -> usize {
        self.levels_history.len()
    }
}

/// Run the configured engine over `bars`.
///
/// Fails before any bar is processed on an empty series, an invalid config,
/// or the first malformed bar. Bar timestamps are carried but not checked.
pub fn run(bars: &[Bar], config: &EngineConfig) -> Result<RunOutput, EngineError> {
    if bars.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    config.validate()?;
    validate_bars(bars)?;

    let span = tracing::info_span!("run", engine = config.engine_name(), bars = bars.len());
    let _guard = span.enter();

    let output = match config {
        EngineConfig::LevelLadder(c) => drive(LadderStrategy::new(c.clone()), bars),
        EngineConfig::PsychBox(c) => drive(BoxStrategy::new(c.clone()), bars),
    };

    tracing::info!(
        events = output.events.len(),
        closed = output.positions_closed.len(),
        open = output.open_position.is_some(),
        "run complete"
    );
    Ok(output)
}

fn validate_bars(bars: &[Bar]) -> Result<(), EngineError> {
    for (index, bar) in bars.iter().enumerate() {
        bar.validate()
            .map_err(|reason| EngineError::MalformedBar { index, reason })?;
    }
    Ok(())
}

fn drive<S: Strategy>(strategy: S, bars: &[Bar]) -> RunOutput {
    let mut session = Session::new(strategy);
    for bar in bars {
        session.advance(bar);
    }
    session.finish()
}

/// Incremental run with explicitly held state.
#[derive(Debug)]
pub struct Session<S: Strategy> {
    strategy: S,
    state: S::State,
    recorder: Recorder,
    next_index: usize,
    last_time: Option<i64>,
}

impl<S: Strategy> Session<S> {
    /// Start a session. The strategy must have been built from a validated config.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            state: S::State::default(),
            recorder: Recorder::new(),
            next_index: 0,
            last_time: None,
        }
    }

    /// Validate and process one bar. Returns the events it produced.
    ///
    /// Unlike batch `run`, a session rejects a bar whose `time` is earlier than
    /// the last timestamped bar. A rejected bar leaves the session unchanged.
    pub fn push(&mut self, bar: Bar) -> Result<&[Event], EngineError> {
        let index = self.next_index;
        let checked = bar.validate().and_then(|()| match (self.last_time, bar.time) {
            (Some(last), Some(t)) if t < last => Err(BarError::TimeOutOfOrder),
            _ => Ok(()),
        });
        if let Err(reason) = checked {
            tracing::warn!(index, %reason, "bar rejected");
            return Err(EngineError::MalformedBar { index, reason });
        }

        let before = self.recorder.events.len();
        self.advance(&bar);
        Ok(&self.recorder.events.as_slice()[before..])
    }

    fn advance(&mut self, bar: &Bar) {
        let state = std::mem::take(&mut self.state);
        self.state = self
            .strategy
            .step(state, self.next_index, bar, &mut self.recorder);
        self.next_index += 1;
        if bar.time.is_some() {
            self.last_time = bar.time;
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn state(&self) -> &S::State {
        &self.state
    }

    pub fn open_position(&self) -> Option<&Position> {
        S::open_position(&self.state)
    }

    pub fn events(&self) -> &[Event] {
        self.recorder.events.as_slice()
    }

    pub fn positions_closed(&self) -> &[ClosedPosition] {
        &self.recorder.closed
    }

    pub fn bars_processed(&self) -> usize {
        self.next_index
    }

    pub fn finish(self) -> RunOutput {
        let open_position = S::open_position(&self.state).cloned();
        let config = self.strategy.config();
        RunOutput {
            positions_closed: self.recorder.closed,
            open_position,
            levels_history: self.recorder.history,
            events: self.recorder.events.into_vec(),
            config,
        }
    }
}

impl Session<LadderStrategy> {
    pub fn ladder(config: LadderConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::new(LadderStrategy::new(config)))
    }
}

impl Session<BoxStrategy> {
    pub fn psych_box(config: BoxConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::new(BoxStrategy::new(config)))
    }
}
