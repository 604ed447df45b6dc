//! Position lifecycle shared by both engines: open, milestone, close.

use crate::domain::{Bar, Bracket, CloseReason, ClosedPosition, Position, Side};

use super::event::EventKind;
use super::recorder::Recorder;

/// What made a position open, for the `position_opened` event.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub price: f64,
    pub condition: String,
}

pub fn open_position(
    side: Side,
    entry: f64,
    bracket: Bracket,
    trigger: Trigger,
    index: usize,
    bar: &Bar,
    out: &mut Recorder,
) -> Position {
    let position = Position::open(side, entry, bracket, index, bar);
    out.emit(
        index,
        bar,
        EventKind::PositionOpened {
            side,
            entry,
            sl: bracket.sl,
            tp1: bracket.tp1,
            tp2: bracket.tp2,
            trigger_price: trigger.price,
            condition: trigger.condition,
        },
    );
    position
}

/// Record the close and move the position into the ledger.
pub fn close_position(
    position: Position,
    reason: CloseReason,
    exit_price: f64,
    index: usize,
    bar: &Bar,
    out: &mut Recorder,
) {
    out.emit(
        index,
        bar,
        EventKind::PositionClosed {
            side: position.side,
            reason,
            entry: position.entry,
            sl: position.sl,
            tp1: position.tp1,
            tp2: position.tp2,
            exit_price,
        },
    );
    out.close(ClosedPosition::from_position(
        position, reason, exit_price, index, bar,
    ));
}

/// Whether the bar's range reached `level` in the position's favour.
pub fn reached(side: Side, bar: &Bar, level: f64) -> bool {
    match side {
        Side::Long => bar.high >= level,
        Side::Short => bar.low <= level,
    }
}

/// Whether the bar's range reached `level` against the position.
pub fn breached(side: Side, bar: &Bar, level: f64) -> bool {
    match side {
        Side::Long => bar.low <= level,
        Side::Short => bar.high >= level,
    }
}

/// Whether `price` lies strictly under `level` as the side sees it: below for
/// a long, above for a short.
pub fn under(side: Side, price: f64, level: f64) -> bool {
    match side {
        Side::Long => price < level,
        Side::Short => price > level,
    }
}

/// Price level a close reason settles at, from the bracket.
///
/// A bare `Exit` falls back to whichever bracket level the bar's range hit:
/// stop first, then TP2, otherwise TP1.
pub fn exit_level(position: &Position, reason: CloseReason, bar: &Bar) -> f64 {
    match reason {
        CloseReason::StopLoss => position.sl,
        CloseReason::TakeProfit2 => position.tp2,
        CloseReason::TakeProfit1 => position.tp1,
        CloseReason::Exit => {
            if breached(position.side, bar, position.sl) {
                position.sl
            } else if reached(position.side, bar, position.tp2) {
                position.tp2
            } else {
                position.tp1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_at(entry: f64) -> Position {
        let bracket = Bracket::from_anchor(Side::Long, entry, 1.5, 1.5, 3.0);
        Position::open(Side::Long, entry, bracket, 0, &Bar::new(entry, entry, entry, entry))
    }

    #[test]
    fn open_emits_and_close_ledgers() {
        let mut out = Recorder::new();
        let bar = Bar::new(2000.0, 2001.0, 1999.0, 2000.5);
        let bracket = Bracket::from_anchor(Side::Long, 2000.0, 1.5, 1.5, 3.0);
        let trigger = Trigger {
            price: 2000.5,
            condition: "test".into(),
        };
        let pos = open_position(Side::Long, 2000.0, bracket, trigger, 3, &bar, &mut out);
        assert_eq!(pos.opened_bar, 3);
        assert_eq!(out.last_kind().map(EventKind::name), Some("position_opened"));

        close_position(pos, CloseReason::TakeProfit2, 2003.0, 5, &bar, &mut out);
        assert_eq!(out.closed.len(), 1);
        assert_eq!(out.closed[0].closed_bar, 5);
        assert_eq!(out.closed[0].exit_price, 2003.0);
        assert_eq!(out.last_kind().map(EventKind::name), Some("position_closed"));
    }

    #[test]
    fn reach_and_breach_follow_side() {
        let bar = Bar::new(10.0, 12.0, 8.0, 11.0);
        assert!(reached(Side::Long, &bar, 12.0));
        assert!(!reached(Side::Long, &bar, 12.5));
        assert!(reached(Side::Short, &bar, 8.0));
        assert!(breached(Side::Long, &bar, 8.0));
        assert!(breached(Side::Short, &bar, 12.0));
        assert!(!breached(Side::Short, &bar, 12.5));
    }

    #[test]
    fn under_is_strict() {
        assert!(under(Side::Long, 9.9, 10.0));
        assert!(!under(Side::Long, 10.0, 10.0));
        assert!(under(Side::Short, 10.1, 10.0));
    }

    #[test]
    fn exit_level_per_reason() {
        let pos = long_at(2000.0);
        let bar = Bar::new(2000.0, 2000.5, 1999.5, 2000.2);
        assert_eq!(exit_level(&pos, CloseReason::StopLoss, &bar), 1998.5);
        assert_eq!(exit_level(&pos, CloseReason::TakeProfit1, &bar), 2001.5);
        assert_eq!(exit_level(&pos, CloseReason::TakeProfit2, &bar), 2003.0);
    }

    #[test]
    fn bare_exit_settles_at_level_the_bar_hit() {
        let pos = long_at(2000.0);
        let through_stop = Bar::new(2000.0, 2003.5, 1998.0, 2001.0);
        assert_eq!(exit_level(&pos, CloseReason::Exit, &through_stop), 1998.5);
        let through_tp2 = Bar::new(2000.0, 2003.5, 1999.0, 2003.0);
        assert_eq!(exit_level(&pos, CloseReason::Exit, &through_tp2), 2003.0);
        let inside = Bar::new(2000.0, 2001.0, 1999.0, 2000.5);
        assert_eq!(exit_level(&pos, CloseReason::Exit, &inside), 2001.5);

        let bracket = Bracket::from_anchor(Side::Short, 2000.0, 1.5, 1.5, 3.0);
        let short = Position::open(Side::Short, 2000.0, bracket, 0, &inside);
        let up_through_stop = Bar::new(2000.0, 2002.0, 1999.5, 2001.0);
        assert_eq!(exit_level(&short, CloseReason::Exit, &up_through_stop), 2001.5);
        let down_through_tp2 = Bar::new(2000.0, 2000.5, 1996.5, 1997.0);
        assert_eq!(exit_level(&short, CloseReason::Exit, &down_through_tp2), 1997.0);
    }
}
