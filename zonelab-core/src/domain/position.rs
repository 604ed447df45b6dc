use serde::{Deserialize, Serialize};

use super::bar::Bar;

/// Direction of a position or of a zone's bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn is_long(self) -> bool {
        self == Self::Long
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Long => Self::Short,
            Self::Short => Self::Long,
        }
    }

    /// +1.0 for long, -1.0 for short.
    pub fn sign(self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }
}

/// Stop-loss and the two take-profit targets, fixed when a position opens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub sl: f64,
    pub tp1: f64,
    pub tp2: f64,
}

impl Bracket {
    /// Offsets measured from `anchor`: the stop sits against the side, the
    /// targets with it.
    pub fn from_anchor(side: Side, anchor: f64, sl: f64, tp1: f64, tp2: f64) -> Self {
        let s = side.sign();
        Self {
            sl: anchor - s * sl,
            tp1: anchor + s * tp1,
            tp2: anchor + s * tp2,
        }
    }
}

/// The single open position. Flat is `Option::<Position>::None` at the call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub side: Side,
    pub entry: f64,
    pub sl: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub opened_bar: usize,
    pub opened_at: Bar,
    pub tp1_reached: bool,
    pub tp2_reached: bool,
    /// Box variant only: price came back to the zone's action line after entry.
    pub touched: bool,
}

impl Position {
    pub fn open(side: Side, entry: f64, bracket: Bracket, bar_index: usize, bar: &Bar) -> Self {
        Self {
            side,
            entry,
            sl: bracket.sl,
            tp1: bracket.tp1,
            tp2: bracket.tp2,
            opened_bar: bar_index,
            opened_at: *bar,
            tp1_reached: false,
            tp2_reached: false,
            touched: false,
        }
    }
}
