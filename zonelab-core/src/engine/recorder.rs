//! Run recording — append-only event log, per-bar level history, closed-position ledger.
//!
//! A strategy step only ever appends. Nothing recorded for bar `i` changes
//! after bar `i + 1` is processed.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, ClosedPosition, EntryZone, PsychBox};
use crate::levels::LevelSet;

use super::event::{Event, EventKind};

/// Ordered event log. Bar indices never decrease.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        debug_assert!(
            self.events.last().map_or(true, |last| last.bar <= event.bar),
            "event for bar {} appended after bar {}",
            event.bar,
            self.events.last().map_or(0, |last| last.bar),
        );
        self.events.push(event);
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn into_vec(self) -> Vec<Event> {
        self.events
    }
}

/// Ladder state at the end of one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderSnapshot {
    pub bar: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    pub levels: LevelSet,
    /// Level crossed on this bar.
    pub active_level: Option<f64>,
    /// Level crossed on the previous bar.
    pub prev_active_level: Option<f64>,
    pub zone: Option<EntryZone>,
    pub in_position: bool,
}

/// Box state at the end of one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSnapshot {
    pub bar: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    pub zone: Option<PsychBox>,
    /// The box was formed, moved, broken, retested or cleared on this bar.
    pub changed: bool,
    pub in_position: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelSnapshot {
    Ladder(LadderSnapshot),
    Box(BoxSnapshot),
}

impl LevelSnapshot {
    pub fn bar(&self) -> usize {
        match self {
            Self::Ladder(s) => s.bar,
            Self::Box(s) => s.bar,
        }
    }
}

/// Everything a run appends to while stepping through bars.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub events: EventLog,
    pub history: Vec<LevelSnapshot>,
    pub closed: Vec<ClosedPosition>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, bar_index: usize, bar: &Bar, kind: EventKind) {
        tracing::debug!(bar = bar_index, event = kind.name(), "transition");
        self.events.push(Event::new(bar_index, bar, kind));
    }

    pub fn snapshot(&mut self, snapshot: LevelSnapshot) {
        self.history.push(snapshot);
    }

    pub fn close(&mut self, closed: ClosedPosition) {
        self.closed.push(closed);
    }

    /// Type of the most recently appended event.
    pub fn last_kind(&self) -> Option<&EventKind> {
        self.events.last().map(|e| &e.kind)
    }
}
