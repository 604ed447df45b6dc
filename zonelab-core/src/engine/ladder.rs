//! Level-ladder engine — entry zones armed by level crossings.
//!
//! Per bar, in order:
//! 1. Ladder + active level from the close, lagged active level shifted.
//! 2. Open position: TP milestones (need a previous bar), then SL/TP2 close.
//! 3. Flat with an active level: replace any zone with a new one on that level.
//! 4. Flat, level last bar but none now: activate the zone or invalidate it.
//! 5. Flat, no level this bar nor last: consume an activated zone into a position.
//! 6. Flat: expire a zone that reached its expiry bar.
//! 7. Snapshot.

use crate::classifier::LevelCrossing;
use crate::config::{EngineConfig, LadderConfig};
use crate::domain::{Bar, Bracket, CloseReason, EntryZone, Position, Side};

use super::event::EventKind;
use super::lifecycle::{self, Trigger};
use super::recorder::{LadderSnapshot, LevelSnapshot, Recorder};
use super::strategy::{Lagged, PrevBar, Strategy};

/// State carried from one bar to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LadderState {
    pub position: Option<Position>,
    pub zone: Option<EntryZone>,
    pub active_level: Lagged<Option<f64>>,
    pub prev_bar: Option<PrevBar>,
}

#[derive(Debug, Clone)]
pub struct LadderStrategy {
    config: LadderConfig,
    classifier: LevelCrossing,
}

impl LadderStrategy {
    /// Build from a validated config.
    pub fn new(config: LadderConfig) -> Self {
        let classifier = LevelCrossing::from_config(&config);
        Self { config, classifier }
    }

    fn bracket(&self, side: Side, anchor: f64) -> Bracket {
        Bracket::from_anchor(
            side,
            anchor,
            self.config.sl_distance(),
            self.config.tp1_distance(),
            self.config.tp2_distance(),
        )
    }

    /// Flag TP1/TP2 the first time the bar reaches them coming from the near side.
    fn milestones(
        &self,
        position: &mut Position,
        prev_close: f64,
        index: usize,
        bar: &Bar,
        out: &mut Recorder,
    ) {
        let side = position.side;
        let approached = |target: f64| lifecycle::under(side, prev_close, target);

        if !position.tp1_reached
            && approached(position.tp1)
            && lifecycle::reached(side, bar, position.tp1)
        {
            position.tp1_reached = true;
            out.emit(index, bar, EventKind::Tp1Reached { tp: position.tp1 });
        }
        if !position.tp2_reached
            && approached(position.tp2)
            && lifecycle::reached(side, bar, position.tp2)
        {
            position.tp2_reached = true;
            out.emit(index, bar, EventKind::Tp2Reached { tp: position.tp2 });
        }
    }

    /// Stop-loss wins when both stop and TP2 lie inside the bar's range.
    fn exit(position: &Position, bar: &Bar) -> Option<(CloseReason, f64)> {
        if lifecycle::breached(position.side, bar, position.sl) {
            Some((CloseReason::StopLoss, position.sl))
        } else if lifecycle::reached(position.side, bar, position.tp2) {
            Some((CloseReason::TakeProfit2, position.tp2))
        } else {
            None
        }
    }

    fn activation(
        &self,
        zone: &EntryZone,
        prev: PrevBar,
        prev_level: f64,
        close: f64,
    ) -> Option<Side> {
        if prev.bullish && prev.close > prev_level && close > zone.top {
            Some(Side::Long)
        } else if !prev.bullish && prev.close < prev_level && close < zone.bottom {
            Some(Side::Short)
        } else {
            None
        }
    }

    fn consume(&self, zone: &EntryZone, side: Side, bar: &Bar) -> Option<Trigger> {
        let confirm = self.config.close_beyond_entry_zone;
        match side {
            Side::Long => {
                let touched = bar.low <= zone.top;
                if !touched || (confirm && bar.close <= zone.top) {
                    return None;
                }
                let condition = if confirm {
                    format!("low {} <= top {} and close {} > top", bar.low, zone.top, bar.close)
                } else {
                    format!("low {} <= top {}", bar.low, zone.top)
                };
                Some(Trigger {
                    price: zone.edge(Side::Long),
                    condition,
                })
            }
            Side::Short => {
                let touched = bar.high >= zone.bottom;
                if !touched || (confirm && bar.close >= zone.bottom) {
                    return None;
                }
                let condition = if confirm {
                    format!(
                        "high {} >= bottom {} and close {} < bottom",
                        bar.high, zone.bottom, bar.close
                    )
                } else {
                    format!("high {} >= bottom {}", bar.high, zone.bottom)
                };
                Some(Trigger {
                    price: zone.edge(Side::Short),
                    condition,
                })
            }
        }
    }
}

impl Strategy for LadderStrategy {
    type State = LadderState;

    fn name(&self) -> &str {
        "level_ladder"
    }

    fn config(&self) -> EngineConfig {
        EngineConfig::LevelLadder(self.config.clone())
    }

    fn step(&self, state: LadderState, index: usize, bar: &Bar, out: &mut Recorder) -> LadderState {
        let levels = self.classifier.ladder(bar.close);
        let fact = self.classifier.classify_against(&levels, bar);
        let active = state.active_level.shift(fact.active_level());
        let mut position = state.position;
        let mut zone = state.zone;

        // ─── Open position ───
        if let Some(mut open) = position.take() {
            if let Some(prev) = state.prev_bar {
                self.milestones(&mut open, prev.close, index, bar, out);
            }
            match Self::exit(&open, bar) {
                Some((reason, exit_price)) => {
                    lifecycle::close_position(open, reason, exit_price, index, bar, out);
                    zone = None;
                }
                None => position = Some(open),
            }
        }

        // ─── Create ───
        if position.is_none() {
            if let Some(level) = active.curr {
                if let Some(old) = zone.take() {
                    out.emit(index, bar, EventKind::EntryZoneRemoved { zone: old });
                }
                let created = EntryZone::around(
                    level,
                    self.config.entry_zone_half_width(),
                    index,
                    self.config.zone_no_bars,
                );
                out.emit(
                    index,
                    bar,
                    EventKind::EntryZoneCreated {
                        zone: created,
                        active_level: level,
                    },
                );
                zone = Some(created);
            }
        }

        // ─── Activate ───
        if position.is_none() && active.curr.is_none() {
            if let (Some(prev_level), Some(prev), Some(pending)) =
                (active.prev, state.prev_bar, zone.filter(|z| !z.is_activated()))
            {
                match self.activation(&pending, prev, prev_level, bar.close) {
                    Some(side) => {
                        let armed = EntryZone {
                            activation: Some(side),
                            ..pending
                        };
                        out.emit(
                            index,
                            bar,
                            EventKind::EntryZoneActivated {
                                side,
                                zone: armed,
                                prev_close: prev.close,
                                prev_active_level: prev_level,
                            },
                        );
                        zone = Some(armed);
                    }
                    None => {
                        out.emit(
                            index,
                            bar,
                            EventKind::EntryZoneActivationFailed { zone: pending },
                        );
                        zone = None;
                    }
                }
            }
        }

        // ─── Consume ───
        if position.is_none() && active.prev.is_none() && active.curr.is_none() {
            if let Some(armed) = zone {
                if let Some(side) = armed.activation {
                    if let Some(trigger) = self.consume(&armed, side, bar) {
                        let entry = armed.edge(side);
                        let bracket = self.bracket(side, entry);
                        position = Some(lifecycle::open_position(
                            side, entry, bracket, trigger, index, bar, out,
                        ));
                        zone = None;
                    }
                }
            }
        }

        // ─── Expire ───
        if position.is_none() {
            if let Some(stale) = zone.filter(|z| z.is_expired_at(index)) {
                out.emit(index, bar, EventKind::EntryZoneExpired { zone: stale });
                zone = None;
            }
        }

        out.snapshot(LevelSnapshot::Ladder(LadderSnapshot {
            bar: index,
            time: bar.time,
            levels,
            active_level: active.curr,
            prev_active_level: active.prev,
            zone,
            in_position: position.is_some(),
        }));

        LadderState {
            position,
            zone,
            active_level: active,
            prev_bar: Some(PrevBar::from(bar)),
        }
    }

    fn open_position(state: &LadderState) -> Option<&Position> {
        state.position.as_ref()
    }
}
