//! Run summary — trade counts and net result of a finished run.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::CloseReason;
use crate::levels::price_to_pips;

use super::runner::RunOutput;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReasonCounts {
    pub stop_loss: usize,
    pub take_profit_1: usize,
    pub take_profit_2: usize,
    pub exit: usize,
}

impl ReasonCounts {
    fn add(&mut self, reason: CloseReason) {
        match reason {
            CloseReason::StopLoss => self.stop_loss += 1,
            CloseReason::TakeProfit1 => self.take_profit_1 += 1,
            CloseReason::TakeProfit2 => self.take_profit_2 += 1,
            CloseReason::Exit => self.exit += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub engine: String,
    pub bars: usize,
    pub events: usize,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    /// Sum of signed exit-minus-entry over closed trades, in price units.
    pub net_points: f64,
    /// `net_points` in pips; ladder engine only.
    pub net_pips: Option<f64>,
    pub by_reason: ReasonCounts,
    pub open_position: bool,
}

impl RunSummary {
    pub fn from_output(output: &RunOutput) -> Self {
        let mut by_reason = ReasonCounts::default();
        let mut wins = 0;
        let mut net_points = 0.0;
        for trade in &output.positions_closed {
            by_reason.add(trade.reason);
            if trade.is_winner() {
                wins += 1;
            }
            net_points += trade.points();
        }

        let trades = output.positions_closed.len();
        let win_rate = if trades == 0 {
            0.0
        } else {
            wins as f64 / trades as f64
        };
        let net_pips = match &output.config {
            EngineConfig::LevelLadder(c) => Some(price_to_pips(net_points, c.pip_size)),
            EngineConfig::PsychBox(_) => None,
        };

        Self {
            engine: output.config.engine_name().to_string(),
            bars: output.bars_processed(),
            events: output.events.len(),
            trades,
            wins,
            losses: trades - wins,
            win_rate,
            net_points,
            net_pips,
            by_reason,
            open_position: output.open_position.is_some(),
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "engine:     {}", self.engine)?;
        writeln!(f, "bars:       {}", self.bars)?;
        writeln!(f, "events:     {}", self.events)?;
        writeln!(
            f,
            "trades:     {} ({} won, {} lost, {:.1}% win rate)",
            self.trades,
            self.wins,
            self.losses,
            self.win_rate * 100.0
        )?;
        writeln!(
            f,
            "by reason:  sl {} / tp1 {} / tp2 {} / exit {}",
            self.by_reason.stop_loss,
            self.by_reason.take_profit_1,
            self.by_reason.take_profit_2,
            self.by_reason.exit
        )?;
        match self.net_pips {
            Some(pips) => writeln!(f, "net:        {:.5} ({pips:.1} pips)", self.net_points)?,
            None => writeln!(f, "net:        {:.5}", self.net_points)?,
        }
        write!(
            f,
            "open:       {}",
            if self.open_position { "yes" } else { "no" }
        )
    }
}
