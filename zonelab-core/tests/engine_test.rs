//! End-to-end engine paths for both strategies.
//!
//! Each test drives `run` over a short hand-built series and checks the exact
//! event sequence plus the ledger.

use zonelab_core::config::{BoxConfig, EngineConfig, LadderConfig};
use zonelab_core::domain::{Bar, CloseReason, Side};
use zonelab_core::engine::{run, EventKind, LevelSnapshot, RunOutput};

// ── Helpers ──────────────────────────────────────────────────────────

/// `{open, high, low, close}` like the literal scenarios.
fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
    Bar::new(open, high, low, close)
}

fn names(output: &RunOutput) -> Vec<(usize, &'static str)> {
    output.events.iter().map(|e| (e.bar, e.kind.name())).collect()
}

fn ladder(bars: &[Bar]) -> RunOutput {
    run(bars, &EngineConfig::default()).unwrap()
}

fn boxes(bars: &[Bar]) -> RunOutput {
    run(bars, &EngineConfig::PsychBox(BoxConfig::default())).unwrap()
}

/// Up through 2000, then a bullish close above the zone top, then a dip into
/// the zone that closes back above it: long opened at 2000.5 on bar 2.
fn ladder_entry_bars() -> Vec<Bar> {
    vec![
        bar(1998.0, 2002.5, 1997.5, 2002.0),
        bar(2002.0, 2003.0, 2001.0, 2002.5),
        bar(2002.5, 2002.8, 2000.2, 2001.0),
    ]
}

/// Mirror of `ladder_entry_bars`: down through 2000, a bearish close below the
/// zone bottom, then a pop into the zone that closes back below it. Short
/// opened at 1999.5 on bar 2; `last` is bar 3.
fn short_ladder_bars(last: Bar) -> Vec<Bar> {
    vec![
        bar(2002.0, 2002.5, 1997.5, 1998.0),
        bar(1998.0, 1998.5, 1997.0, 1997.5),
        bar(1997.5, 1999.8, 1997.3, 1999.0),
        last,
    ]
}

// ── Scenario A ───────────────────────────────────────────────────────

#[test]
fn scenario_a_runs_to_completion() {
    let config = EngineConfig::LevelLadder(LadderConfig {
        pip_size: 0.01,
        level_pips: 500.0,
        n_levels: 4,
        entry_zone_pips: 50.0,
        zone_no_bars: 40,
        sl_pips: 150.0,
        tp1_pips: 150.0,
        tp2_pips: 300.0,
        ..Default::default()
    });
    let bars = vec![
        bar(2000.0, 2005.0, 1995.0, 2003.0),
        bar(2003.0, 2010.0, 2000.0, 2007.0),
        bar(2007.0, 2015.0, 2005.0, 2012.0),
        bar(2012.0, 2020.0, 2010.0, 2018.0),
        bar(2018.0, 2025.0, 2015.0, 2022.0),
    ];
    let output = run(&bars, &config).unwrap();

    assert!(output.open_position.is_none());
    assert!(output.positions_closed.is_empty());
    assert_eq!(output.levels_history.len(), bars.len());
    assert!(output.events.windows(2).all(|w| w[0].bar <= w[1].bar));

    // every bar from 1 on crosses the rung below its close and re-anchors the zone
    assert_eq!(
        names(&output),
        vec![
            (1, "entry_zone_created"),
            (2, "entry_zone_removed"),
            (2, "entry_zone_created"),
            (3, "entry_zone_removed"),
            (3, "entry_zone_created"),
            (4, "entry_zone_removed"),
            (4, "entry_zone_created"),
        ]
    );
    match &output.levels_history[4] {
        LevelSnapshot::Ladder(snap) => {
            assert_eq!(snap.active_level, Some(2020.0));
            assert_eq!(snap.prev_active_level, Some(2015.0));
            assert_eq!(snap.levels.up, vec![2025.0, 2030.0, 2035.0, 2040.0]);
            assert_eq!(snap.levels.dn, vec![2020.0, 2015.0, 2010.0, 2005.0]);
            assert_eq!(snap.zone.map(|z| z.mid), Some(2020.0));
        }
        other => panic!("expected ladder snapshot, got {other:?}"),
    }
}

// ── Scenario B ───────────────────────────────────────────────────────

#[test]
fn scenario_b_pierce_up_forms_broken_bull_box() {
    let output = boxes(&[bar(1999.0, 2001.5, 1998.5, 2001.0)]);
    assert_eq!(output.events.len(), 1);
    match &output.events[0].kind {
        EventKind::BoxFormed {
            zone,
            is_broken,
            is_bull,
            relocated,
        } => {
            assert!(*is_broken);
            assert_eq!(*is_bull, Some(true));
            assert!(!relocated);
            assert_eq!(zone.mid, 2000.0);
            assert_eq!(zone.top, 2000.5);
            assert_eq!(zone.bottom, 1999.5);
        }
        other => panic!("expected box_formed, got {other:?}"),
    }
    assert_eq!(output.events[0].bar, 0);
}

// ── Level ladder ─────────────────────────────────────────────────────

#[test]
fn ladder_long_runs_to_take_profit_2() {
    let mut bars = ladder_entry_bars();
    bars.push(bar(2001.0, 2003.2, 2000.8, 2003.0));
    bars.push(bar(2003.0, 2004.0, 2002.5, 2004.0));
    let output = ladder(&bars);

    assert_eq!(
        names(&output),
        vec![
            (0, "entry_zone_created"),
            (1, "entry_zone_activated"),
            (2, "position_opened"),
            (3, "tp1_reached"),
            (4, "tp2_reached"),
            (4, "position_closed"),
        ]
    );
    let trade = &output.positions_closed[0];
    assert_eq!(trade.side, Side::Long);
    assert_eq!(trade.entry, 2000.5);
    assert_eq!(trade.sl, 1999.0);
    assert_eq!(trade.tp1, 2002.0);
    assert_eq!(trade.tp2, 2003.5);
    assert_eq!(trade.reason, CloseReason::TakeProfit2);
    assert_eq!(trade.exit_price, 2003.5);
    assert_eq!((trade.opened_bar, trade.closed_bar), (2, 4));
    assert!(trade.tp1_reached && trade.tp2_reached);
    assert!(output.open_position.is_none());
}

#[test]
fn ladder_position_opens_at_zone_edge_with_trigger() {
    let output = ladder(&ladder_entry_bars());
    let open = output.open_position.as_ref().unwrap();
    assert_eq!(open.entry, 2000.5);
    assert_eq!(open.opened_bar, 2);
    match &output.events.last().unwrap().kind {
        EventKind::PositionOpened {
            trigger_price,
            condition,
            ..
        } => {
            assert_eq!(*trigger_price, 2000.5);
            assert!(condition.contains("close"));
        }
        other => panic!("expected position_opened, got {other:?}"),
    }
}

#[test]
fn ladder_stop_loss_then_new_zone_same_bar() {
    let mut bars = ladder_entry_bars();
    // crosses 2000 downward and takes out the stop at 1999
    bars.push(bar(2001.0, 2001.2, 1998.2, 1998.5));
    let output = ladder(&bars);

    assert_eq!(
        names(&output)[3..],
        [(3, "position_closed"), (3, "entry_zone_created")]
    );
    let trade = &output.positions_closed[0];
    assert_eq!(trade.reason, CloseReason::StopLoss);
    assert_eq!(trade.exit_price, 1999.0);
    assert!(!trade.tp1_reached);
    assert!(output.open_position.is_none());
}

#[test]
fn ladder_touch_only_mode_enters_without_close_confirmation() {
    let config = EngineConfig::LevelLadder(LadderConfig {
        close_beyond_entry_zone: false,
        ..Default::default()
    });
    let mut bars = ladder_entry_bars();
    // dip into the zone closing below its top: enough when confirmation is off
    bars[2] = bar(2002.5, 2002.8, 2000.2, 2000.4);
    let confirmed = ladder(&bars);
    let touched = run(&bars, &config).unwrap();

    assert!(confirmed.open_position.is_none());
    assert_eq!(touched.open_position.map(|p| p.entry), Some(2000.5));
}

#[test]
fn activated_zone_expires_at_creation_plus_lifetime() {
    let config = EngineConfig::LevelLadder(LadderConfig {
        zone_no_bars: 3,
        ..Default::default()
    });
    let bars = vec![
        bar(1998.0, 2002.5, 1997.5, 2002.0),
        bar(2002.0, 2003.0, 2001.0, 2002.5),
        // stays above the zone: not consumed
        bar(2002.5, 2003.5, 2002.2, 2003.0),
        bar(2003.0, 2004.0, 2002.8, 2003.5),
        bar(2003.5, 2004.0, 2000.2, 2001.0),
    ];
    let output = run(&bars, &config).unwrap();
    assert_eq!(
        names(&output),
        vec![
            (0, "entry_zone_created"),
            (1, "entry_zone_activated"),
            (3, "entry_zone_expired"),
        ]
    );
    // the dip on bar 4 finds no zone left to consume
    assert!(output.open_position.is_none());
}

#[test]
fn ladder_short_runs_to_take_profit_2() {
    let output = ladder(&short_ladder_bars(bar(1999.0, 1999.2, 1996.3, 1996.4)));

    assert_eq!(
        names(&output),
        vec![
            (0, "entry_zone_created"),
            (1, "entry_zone_activated"),
            (2, "position_opened"),
            (3, "tp1_reached"),
            (3, "tp2_reached"),
            (3, "position_closed"),
        ]
    );
    match &output.events[1].kind {
        EventKind::EntryZoneActivated { side, .. } => assert_eq!(*side, Side::Short),
        other => panic!("expected entry_zone_activated, got {other:?}"),
    }
    match &output.events[2].kind {
        EventKind::PositionOpened { trigger_price, .. } => assert_eq!(*trigger_price, 1999.5),
        other => panic!("expected position_opened, got {other:?}"),
    }
    let trade = &output.positions_closed[0];
    assert_eq!(trade.side, Side::Short);
    assert_eq!(trade.entry, 1999.5);
    assert_eq!(trade.sl, 2001.0);
    assert_eq!(trade.tp1, 1998.0);
    assert_eq!(trade.tp2, 1996.5);
    assert_eq!(trade.reason, CloseReason::TakeProfit2);
    assert_eq!(trade.exit_price, 1996.5);
    assert!(trade.is_winner());
    assert!(output.open_position.is_none());
}

#[test]
fn ladder_short_stop_loss_then_new_zone_same_bar() {
    // rallies through the stop at 2001 and back up through 2000
    let output = ladder(&short_ladder_bars(bar(1999.0, 2001.2, 1998.8, 2000.8)));

    assert_eq!(
        names(&output)[3..],
        [(3, "position_closed"), (3, "entry_zone_created")]
    );
    let trade = &output.positions_closed[0];
    assert_eq!(trade.side, Side::Short);
    assert_eq!(trade.reason, CloseReason::StopLoss);
    assert_eq!(trade.exit_price, 2001.0);
    assert!(!trade.tp1_reached);
    assert!((trade.points() + 1.5).abs() < 1e-9);
}

#[test]
fn ladder_zone_with_unbounded_lifetime_never_expires() {
    let config = EngineConfig::LevelLadder(LadderConfig {
        zone_no_bars: usize::MAX,
        ..Default::default()
    });
    let bars = vec![
        bar(2001.0, 2001.5, 2000.5, 2001.0),
        bar(1998.0, 2002.5, 1997.5, 2002.0),
    ];
    let output = run(&bars, &config).unwrap();

    assert_eq!(names(&output), vec![(1, "entry_zone_created")]);
    match &output.events[0].kind {
        EventKind::EntryZoneCreated { zone, .. } => assert_eq!(zone.expiry_bar, usize::MAX),
        other => panic!("expected entry_zone_created, got {other:?}"),
    }
}

#[test]
fn events_carry_bar_time() {
    let bars: Vec<Bar> = ladder_entry_bars()
        .into_iter()
        .enumerate()
        .map(|(i, b)| b.with_time(1_700_000_000 + 60 * i as i64))
        .collect();
    let output = ladder(&bars);
    for event in &output.events {
        assert_eq!(event.time, Some(1_700_000_000 + 60 * event.bar as i64));
    }
    assert_eq!(
        output.open_position.unwrap().opened_at.time,
        Some(1_700_000_120)
    );
}

// ── Psychological box ────────────────────────────────────────────────

#[test]
fn box_break_entry_touch_and_take_profit_1() {
    let output = boxes(&[
        bar(1998.0, 2000.5, 1997.5, 2000.2),
        bar(2000.2, 2002.2, 2000.0, 2002.0),
        bar(2002.0, 2002.6, 2001.8, 2002.4),
        bar(2002.4, 2002.5, 2000.3, 2001.0),
    ]);
    assert_eq!(
        names(&output),
        vec![
            (0, "box_formed"),
            (1, "box_broken"),
            (2, "position_opened"),
            (3, "touched"),
            (3, "tp1_hit"),
            (3, "position_closed"),
        ]
    );
    let trade = &output.positions_closed[0];
    assert_eq!(trade.entry, 2002.4);
    assert_eq!(trade.reason, CloseReason::TakeProfit1);
    assert_eq!(trade.exit_price, 2002.0);
    assert!(trade.touched);
    assert!(output.open_position.is_none());

    match &output.levels_history[3] {
        LevelSnapshot::Box(snap) => {
            assert!(snap.zone.is_none());
            assert!(snap.changed);
        }
        other => panic!("expected box snapshot, got {other:?}"),
    }
}

#[test]
fn box_retest_clears_broken_but_keeps_bias() {
    let output = boxes(&[
        bar(1999.0, 2001.5, 1998.5, 2001.0),
        bar(2001.0, 2001.2, 2000.1, 2000.3),
    ]);
    assert_eq!(names(&output), vec![(0, "box_formed"), (1, "box_retest")]);
    match &output.levels_history[1] {
        LevelSnapshot::Box(snap) => {
            let zone = snap.zone.unwrap();
            assert!(!zone.broken);
            assert_eq!(zone.bias, Some(Side::Long));
        }
        other => panic!("expected box snapshot, got {other:?}"),
    }
}

#[test]
fn box_reverse_through_far_edge_invalidates_break() {
    let output = boxes(&[
        bar(1999.0, 2001.5, 1998.5, 2001.0),
        bar(2001.0, 2001.2, 1999.0, 1999.2),
    ]);
    assert_eq!(
        names(&output),
        vec![(0, "box_formed"), (1, "box_reverse_invalidated")]
    );
    assert!(output.open_position.is_none());
}

#[test]
fn box_relocates_to_new_level_while_flat() {
    let output = boxes(&[
        bar(1998.0, 2000.5, 1997.5, 2000.2),
        bar(2000.2, 2005.3, 2000.0, 2005.1),
    ]);
    assert_eq!(names(&output), vec![(0, "box_formed"), (1, "box_formed")]);
    match &output.events[1].kind {
        EventKind::BoxFormed {
            zone, relocated, ..
        } => {
            assert!(*relocated);
            assert_eq!(zone.mid, 2005.0);
            assert!(!zone.broken);
        }
        other => panic!("expected box_formed, got {other:?}"),
    }
}

#[test]
fn box_stop_through_close_reboxes_opposite() {
    let output = boxes(&[
        bar(1999.0, 2001.5, 1998.5, 2001.0),
        bar(2001.0, 2002.5, 2000.8, 2002.0),
        bar(2002.0, 2002.2, 1997.8, 1998.0),
    ]);
    assert_eq!(
        names(&output),
        vec![
            (0, "box_formed"),
            (1, "position_opened"),
            (2, "sl_hit"),
            (2, "position_closed"),
            (2, "box_formed"),
            (2, "sl_rebox_created"),
        ]
    );
    assert_eq!(output.positions_closed[0].reason, CloseReason::StopLoss);
    assert_eq!(output.positions_closed[0].exit_price, 1999.0);
    match &output.events[5].kind {
        EventKind::SlReboxCreated { side, mid } => {
            assert_eq!(*side, Side::Short);
            assert_eq!(*mid, 2000.0);
        }
        other => panic!("expected sl_rebox_created, got {other:?}"),
    }
}

#[test]
fn box_stop_without_close_through_does_not_rebox() {
    let output = boxes(&[
        bar(1999.0, 2001.5, 1998.5, 2001.0),
        bar(2001.0, 2002.5, 2000.8, 2002.0),
        // wicks through 1999 but closes back above it
        bar(2002.0, 2002.2, 1998.8, 1999.6),
    ]);
    assert_eq!(
        names(&output)[2..],
        [(2, "sl_hit"), (2, "position_closed")]
    );
    match &output.levels_history[2] {
        LevelSnapshot::Box(snap) => assert!(snap.zone.is_none()),
        other => panic!("expected box snapshot, got {other:?}"),
    }
}

#[test]
fn box_take_profit_2_closes_without_touch() {
    let output = boxes(&[
        bar(1999.0, 2001.5, 1998.5, 2001.0),
        bar(2001.0, 2002.5, 2000.8, 2002.0),
        bar(2002.0, 2004.0, 2001.5, 2003.8),
    ]);
    let trade = &output.positions_closed[0];
    assert_eq!(trade.reason, CloseReason::TakeProfit2);
    assert_eq!(trade.exit_price, 2003.5);
    assert!(!trade.touched);
}

#[test]
fn box_short_stop_through_close_reboxes_long() {
    let output = boxes(&[
        bar(2001.0, 2001.2, 1998.8, 1999.0),
        bar(1999.0, 1999.2, 1997.8, 1998.0),
        bar(1998.0, 2001.8, 1997.9, 2001.6),
    ]);
    assert_eq!(
        names(&output),
        vec![
            (0, "box_formed"),
            (1, "position_opened"),
            (2, "sl_hit"),
            (2, "position_closed"),
            (2, "box_formed"),
            (2, "sl_rebox_created"),
        ]
    );
    match &output.events[0].kind {
        EventKind::BoxFormed {
            is_broken, is_bull, ..
        } => {
            assert!(*is_broken);
            assert_eq!(*is_bull, Some(false));
        }
        other => panic!("expected box_formed, got {other:?}"),
    }

    let trade = &output.positions_closed[0];
    assert_eq!(trade.side, Side::Short);
    assert_eq!(trade.entry, 1998.0);
    // bracket hangs off the box bottom at 1999.5
    assert_eq!(trade.sl, 2001.0);
    assert_eq!(trade.tp1, 1998.0);
    assert_eq!(trade.tp2, 1996.5);
    assert_eq!(trade.reason, CloseReason::StopLoss);
    assert_eq!(trade.exit_price, 2001.0);

    match &output.events[5].kind {
        EventKind::SlReboxCreated { side, mid } => {
            assert_eq!(*side, Side::Long);
            assert_eq!(*mid, 2000.0);
        }
        other => panic!("expected sl_rebox_created, got {other:?}"),
    }
}

#[test]
fn box_short_reverse_through_top_invalidates_break() {
    let output = boxes(&[
        bar(2001.0, 2001.2, 1998.8, 1999.0),
        bar(1999.0, 2001.2, 1998.9, 2001.0),
    ]);
    assert_eq!(
        names(&output),
        vec![(0, "box_formed"), (1, "box_reverse_invalidated")]
    );
    match &output.levels_history[1] {
        LevelSnapshot::Box(snap) => {
            let zone = snap.zone.unwrap();
            assert!(!zone.broken);
            assert_eq!(zone.bias, Some(Side::Short));
        }
        other => panic!("expected box snapshot, got {other:?}"),
    }
    assert!(output.open_position.is_none());
}

// ── Output bundle ────────────────────────────────────────────────────

#[test]
fn output_serializes_with_tagged_events() {
    let output = ladder(&ladder_entry_bars());
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["config"]["engine"], "level_ladder");
    assert_eq!(json["events"][0]["type"], "entry_zone_created");
    assert_eq!(json["levels_history"][0]["kind"], "ladder");
    assert!(json["positions_closed"].as_array().unwrap().is_empty());
    assert_eq!(json["open_position"]["side"], "long");
}
