//! Bar — the fundamental market data unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLC bar. `time` is an optional unix timestamp in seconds.
///
/// The engine never reads `time` for decisions; it is carried through to events
/// and ledger entries so a chart can place them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
}

/// Why a bar failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BarError {
    #[error("OHLC field is not finite")]
    NonFinite,
    #[error("high is below low")]
    HighBelowLow,
    #[error("open lies outside [low, high]")]
    OpenOutOfRange,
    #[error("close lies outside [low, high]")]
    CloseOutOfRange,
    #[error("time is earlier than the previous bar")]
    TimeOutOfOrder,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            time: None,
        }
    }

    pub fn with_time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    /// Close at or above open. A doji counts as bullish.
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Returns true if any OHLC field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// OHLC sanity check: finite fields, high >= low, open and close inside the range.
    pub fn validate(&self) -> Result<(), BarError> {
        if self.is_void() {
            return Err(BarError::NonFinite);
        }
        if self.high < self.low {
            return Err(BarError::HighBelowLow);
        }
        if self.open < self.low || self.open > self.high {
            return Err(BarError::OpenOutOfRange);
        }
        if self.close < self.low || self.close > self.high {
            return Err(BarError::CloseOutOfRange);
        }
        Ok(())
    }
}
