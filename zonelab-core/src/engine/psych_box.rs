//! Psychological-box engine — boxes around round numbers, entries on break and follow-through.
//!
//! Flat:
//! - no box: form one on a close inside a box (unbroken) or a pierce (broken, biased)
//! - box at a different level than this bar's fact: re-form it there
//! - unbroken box: a close beyond an edge breaks it in that direction
//! - broken box: close back inside → retest; close past the far edge →
//!   reverse-invalidated; close past the mid in the break direction → enter
//!
//! In trade, checked in order: SL, TP2, touch of the action line, TP1 (only
//! after a touch). A close through the stop additionally re-forms an opposite,
//! already broken box at the previous bar's box mid.

use crate::classifier::{PsychBoxClassifier, ZoneFact};
use crate::config::{BoxConfig, EngineConfig};
use crate::domain::{Bar, Bracket, CloseReason, Position, PsychBox, Side};

use super::event::EventKind;
use super::lifecycle::{self, Trigger};
use super::recorder::{BoxSnapshot, LevelSnapshot, Recorder};
use super::strategy::Strategy;

/// The box fields a step reads one bar later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrevBox {
    pub bias: Option<Side>,
    pub mid: f64,
}

impl From<&PsychBox> for PrevBox {
    fn from(zone: &PsychBox) -> Self {
        Self {
            bias: zone.bias,
            mid: zone.mid,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxState {
    pub position: Option<Position>,
    pub zone: Option<PsychBox>,
    /// Box as it stood at the end of the previous bar.
    pub prev_zone: Option<PrevBox>,
}

#[derive(Debug, Clone)]
pub struct BoxStrategy {
    config: BoxConfig,
    classifier: PsychBoxClassifier,
}

impl BoxStrategy {
    /// Build from a validated config.
    pub fn new(config: BoxConfig) -> Self {
        let classifier = PsychBoxClassifier::from_config(&config);
        Self { config, classifier }
    }

    /// The box a fact would form while flat with no box.
    fn formation(&self, fact: ZoneFact) -> Option<PsychBox> {
        let (mid, bias, broken) = match fact {
            ZoneFact::ClosedInBox { mid } => (mid, None, false),
            ZoneFact::PiercedUp { mid } => (mid, Some(Side::Long), true),
            ZoneFact::PiercedDown { mid } => (mid, Some(Side::Short), true),
            ZoneFact::None | ZoneFact::Crossed { .. } => return None,
        };
        Some(PsychBox::around(mid, self.config.box_step, bias, broken))
    }

    fn form(&self, zone: PsychBox, relocated: bool, index: usize, bar: &Bar, out: &mut Recorder) {
        out.emit(
            index,
            bar,
            EventKind::BoxFormed {
                zone,
                is_broken: zone.broken,
                is_bull: zone.is_bull(),
                relocated,
            },
        );
    }

    /// Flat with a box: returns the box to carry and, on entry, the new position.
    fn while_flat(
        &self,
        current: PsychBox,
        fact: ZoneFact,
        index: usize,
        bar: &Bar,
        out: &mut Recorder,
    ) -> (PsychBox, Option<Position>, bool) {
        if let Some(moved) = self.formation(fact).filter(|b| b.mid != current.mid) {
            self.form(moved, true, index, bar, out);
            return (moved, None, true);
        }

        if !current.broken {
            let side = if bar.close > current.top {
                Side::Long
            } else if bar.close < current.bottom {
                Side::Short
            } else {
                return (current, None, false);
            };
            let broken = PsychBox {
                bias: Some(side),
                broken: true,
                ..current
            };
            out.emit(index, bar, EventKind::BoxBroken { side, zone: broken });
            return (broken, None, true);
        }

        if fact == (ZoneFact::ClosedInBox { mid: current.mid }) {
            let retested = PsychBox {
                broken: false,
                ..current
            };
            out.emit(index, bar, EventKind::BoxRetest { zone: retested });
            return (retested, None, true);
        }

        let Some(side) = current.bias else {
            return (current, None, false);
        };
        let reversed = match side {
            Side::Long => bar.close < current.bottom,
            Side::Short => bar.close > current.top,
        };
        if reversed {
            let invalidated = PsychBox {
                broken: false,
                ..current
            };
            out.emit(
                index,
                bar,
                EventKind::BoxReverseInvalidated { zone: invalidated },
            );
            return (invalidated, None, true);
        }

        let follow_through = match side {
            Side::Long => bar.close > current.mid,
            Side::Short => bar.close < current.mid,
        };
        if !follow_through {
            return (current, None, false);
        }
        let relation = if side.is_long() { ">" } else { "<" };
        let trigger = Trigger {
            price: bar.close,
            condition: format!("close {} {relation} mid {}", bar.close, current.mid),
        };
        let bracket = Bracket::from_anchor(
            side,
            current.action_line(side),
            self.config.sl_step,
            self.config.tp1_step,
            self.config.tp2_step,
        );
        let position = lifecycle::open_position(side, bar.close, bracket, trigger, index, bar, out);
        (current, Some(position), false)
    }

    /// Emit the hit event for this bar, if any. Returns whether the position
    /// closes and whether the close went through the stop.
    fn check_hits(
        position: &mut Position,
        action_line: Option<f64>,
        index: usize,
        bar: &Bar,
        out: &mut Recorder,
    ) -> (bool, bool) {
        let side = position.side;
        if lifecycle::breached(side, bar, position.sl) {
            out.emit(index, bar, EventKind::SlHit { sl: position.sl });
            return (true, lifecycle::under(side, bar.close, position.sl));
        }
        if lifecycle::reached(side, bar, position.tp2) {
            out.emit(index, bar, EventKind::Tp2Hit { tp2: position.tp2 });
            return (true, false);
        }
        if !position.touched {
            if let Some(line) = action_line.filter(|&l| lifecycle::breached(side, bar, l)) {
                position.touched = true;
                out.emit(index, bar, EventKind::Touched { action: line });
            }
        }
        if position.touched && lifecycle::reached(side, bar, position.tp1) {
            out.emit(index, bar, EventKind::Tp1Hit { tp1: position.tp1 });
            return (true, false);
        }
        (false, false)
    }
}

impl Strategy for BoxStrategy {
    type State = BoxState;

    fn name(&self) -> &str {
        "psych_box"
    }

    fn config(&self) -> EngineConfig {
        EngineConfig::PsychBox(self.config.clone())
    }

    fn step(&self, state: BoxState, index: usize, bar: &Bar, out: &mut Recorder) -> BoxState {
        let fact = self.classifier.check_zone(bar.open, bar.close);
        let mut zone = state.zone;
        let mut position = None;
        let mut changed = false;

        match state.position {
            None => match zone {
                Some(current) => {
                    let (next, opened, moved) = self.while_flat(current, fact, index, bar, out);
                    zone = Some(next);
                    position = opened;
                    changed = moved;
                }
                None => {
                    if let Some(formed) = self.formation(fact) {
                        self.form(formed, false, index, bar, out);
                        zone = Some(formed);
                        changed = true;
                    }
                }
            },
            Some(mut open) => {
                let action_line = zone.map(|z| z.action_line(open.side));
                let (closes, rebox) = Self::check_hits(&mut open, action_line, index, bar, out);
                if closes {
                    // reason follows the hit event just recorded
                    let reason = out
                        .last_kind()
                        .map_or(CloseReason::Exit, EventKind::close_reason);
                    let exit_price = lifecycle::exit_level(&open, reason, bar);
                    lifecycle::close_position(open, reason, exit_price, index, bar, out);
                    zone = None;
                    changed = true;

                    if let Some(prev) = state.prev_zone.filter(|_| rebox) {
                        let side = prev.bias.map_or(Side::Long, Side::opposite);
                        let reboxed =
                            PsychBox::around(prev.mid, self.config.box_step, Some(side), true);
                        self.form(reboxed, false, index, bar, out);
                        out.emit(
                            index,
                            bar,
                            EventKind::SlReboxCreated {
                                side,
                                mid: prev.mid,
                            },
                        );
                        zone = Some(reboxed);
                    }
                } else {
                    position = Some(open);
                }
            }
        }

        out.snapshot(LevelSnapshot::Box(BoxSnapshot {
            bar: index,
            time: bar.time,
            zone,
            changed,
            in_position: position.is_some(),
        }));

        BoxState {
            position,
            zone,
            prev_zone: zone.as_ref().map(PrevBox::from),
        }
    }

    fn open_position(state: &BoxState) -> Option<&Position> {
        state.position.as_ref()
    }
}
