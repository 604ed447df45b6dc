//! Engine events — one record per state transition, appended in bar order.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, CloseReason, EntryZone, PsychBox, Side};

/// A state transition at `bar`. Several events may share a bar index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub bar: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    pub fn new(bar_index: usize, bar: &Bar, kind: EventKind) -> Self {
        Self {
            bar: bar_index,
            time: bar.time,
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    // ── Ladder entry zone ──
    EntryZoneCreated {
        zone: EntryZone,
        active_level: f64,
    },
    /// An older zone was replaced by a new one.
    EntryZoneRemoved {
        zone: EntryZone,
    },
    EntryZoneActivated {
        side: Side,
        zone: EntryZone,
        prev_close: f64,
        prev_active_level: f64,
    },
    EntryZoneActivationFailed {
        zone: EntryZone,
    },
    EntryZoneExpired {
        zone: EntryZone,
    },

    // ── Psychological box ──
    BoxFormed {
        zone: PsychBox,
        is_broken: bool,
        is_bull: Option<bool>,
        /// An existing box was moved to a different level.
        relocated: bool,
    },
    BoxBroken {
        side: Side,
        zone: PsychBox,
    },
    BoxRetest {
        zone: PsychBox,
    },
    BoxReverseInvalidated {
        zone: PsychBox,
    },
    SlReboxCreated {
        side: Side,
        mid: f64,
    },

    // ── Position lifecycle ──
    PositionOpened {
        side: Side,
        entry: f64,
        sl: f64,
        tp1: f64,
        tp2: f64,
        trigger_price: f64,
        condition: String,
    },
    Tp1Reached {
        tp: f64,
    },
    Tp2Reached {
        tp: f64,
    },
    Touched {
        action: f64,
    },
    SlHit {
        sl: f64,
    },
    Tp2Hit {
        tp2: f64,
    },
    Tp1Hit {
        tp1: f64,
    },
    PositionClosed {
        side: Side,
        reason: CloseReason,
        entry: f64,
        sl: f64,
        tp1: f64,
        tp2: f64,
        exit_price: f64,
    },
}

impl EventKind {
    /// The serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EntryZoneCreated { .. } => "entry_zone_created",
            Self::EntryZoneRemoved { .. } => "entry_zone_removed",
            Self::EntryZoneActivated { .. } => "entry_zone_activated",
            Self::EntryZoneActivationFailed { .. } => "entry_zone_activation_failed",
            Self::EntryZoneExpired { .. } => "entry_zone_expired",
            Self::BoxFormed { .. } => "box_formed",
            Self::BoxBroken { .. } => "box_broken",
            Self::BoxRetest { .. } => "box_retest",
            Self::BoxReverseInvalidated { .. } => "box_reverse_invalidated",
            Self::SlReboxCreated { .. } => "sl_rebox_created",
            Self::PositionOpened { .. } => "position_opened",
            Self::Tp1Reached { .. } => "tp1_reached",
            Self::Tp2Reached { .. } => "tp2_reached",
            Self::Touched { .. } => "touched",
            Self::SlHit { .. } => "sl_hit",
            Self::Tp2Hit { .. } => "tp2_hit",
            Self::Tp1Hit { .. } => "tp1_hit",
            Self::PositionClosed { .. } => "position_closed",
        }
    }

    /// Close reason named by a hit event; anything else maps to `Exit`.
    pub fn close_reason(&self) -> CloseReason {
        match self {
            Self::SlHit { .. } => CloseReason::StopLoss,
            Self::Tp2Hit { .. } => CloseReason::TakeProfit2,
            Self::Tp1Hit { .. } => CloseReason::TakeProfit1,
            _ => CloseReason::Exit,
        }
    }
}
