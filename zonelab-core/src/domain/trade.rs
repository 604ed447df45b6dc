//! ClosedPosition — a finalized trade in the run's ledger.

use serde::{Deserialize, Serialize};

use super::bar::Bar;
use super::position::{Position, Side};

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    StopLoss,
    #[serde(rename = "take_profit_2")]
    TakeProfit2,
    /// Box variant: TP1 closes the trade once the action line was touched.
    #[serde(rename = "take_profit_1")]
    TakeProfit1,
    /// The reason could not be named from the event that triggered the close.
    Exit,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StopLoss => "stop_loss",
            Self::TakeProfit2 => "take_profit_2",
            Self::TakeProfit1 => "take_profit_1",
            Self::Exit => "exit",
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete round trip: open → close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    pub side: Side,
    pub entry: f64,
    pub sl: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub exit_price: f64,
    pub opened_bar: usize,
    pub closed_bar: usize,
    pub opened_at: Bar,
    pub closed_at: Bar,
    pub reason: CloseReason,
    pub tp1_reached: bool,
    pub tp2_reached: bool,
    pub touched: bool,
}

impl ClosedPosition {
    pub fn from_position(
        position: Position,
        reason: CloseReason,
        exit_price: f64,
        closed_bar: usize,
        closed_at: &Bar,
    ) -> Self {
        Self {
            side: position.side,
            entry: position.entry,
            sl: position.sl,
            tp1: position.tp1,
            tp2: position.tp2,
            exit_price,
            opened_bar: position.opened_bar,
            closed_bar,
            opened_at: position.opened_at,
            closed_at: *closed_at,
            reason,
            tp1_reached: position.tp1_reached,
            tp2_reached: position.tp2_reached,
            touched: position.touched,
        }
    }

    /// Result in price units, positive for a winner.
    pub fn points(&self) -> f64 {
        self.side.sign() * (self.exit_price - self.entry)
    }

    pub fn is_winner(&self) -> bool {
        self.points() > 0.0
    }
}
