mod common;

use airmouse::geometry::{Point, Rect};
use airmouse::pointer::classifier::{MAX_HOLD, TICK};
use airmouse::settings::AirMouseSettings;
use common::{gestures, ms, started_engine, Event};
use std::time::Instant;

#[test]
fn quick_press_emits_one_tap_gesture() {
    let t0 = Instant::now();
    let mut engine = started_engine(AirMouseSettings::default(), t0);
    engine.set_bounds(Rect::new(0, 0, 1000, 1000));

    engine.ingest_button(true, t0);
    engine.ingest_button(false, t0 + ms(80));

    let emitted = gestures(&engine);
    assert_eq!(
        emitted,
        vec![Event::Gesture {
            points: 1,
            hold_ms: 80,
        }]
    );
}

#[test]
fn hold_duration_tracks_release_time_within_one_tick() {
    let t0 = Instant::now();
    let mut engine = started_engine(AirMouseSettings::default(), t0);
    engine.set_bounds(Rect::new(0, 0, 1000, 1000));

    engine.ingest_button(true, t0);
    engine.advance(t0 + ms(990));
    engine.ingest_button(false, t0 + ms(1000));

    let gesture = &engine.sink().gestures[0];
    let t = ms(1000);
    assert!(gesture.hold_duration <= t && t - gesture.hold_duration < TICK);
}

#[test]
fn held_button_is_force_finished_at_the_hold_cap() {
    let t0 = Instant::now();
    let mut engine = started_engine(AirMouseSettings::default(), t0);
    engine.set_bounds(Rect::new(0, 0, 1000, 1000));

    engine.ingest_button(true, t0);
    engine.advance(t0 + ms(3000));

    assert_eq!(
        gestures(&engine),
        vec![Event::Gesture {
            points: 1,
            hold_ms: MAX_HOLD.as_millis() as u64,
        }]
    );

    // The eventual release finds nothing left to finish.
    engine.ingest_button(false, t0 + ms(3100));
    assert_eq!(gestures(&engine).len(), 1);
}

#[test]
fn release_in_the_force_finish_instant_emits_exactly_one_gesture() {
    let t0 = Instant::now();
    let mut engine = started_engine(AirMouseSettings::default(), t0);
    engine.set_bounds(Rect::new(0, 0, 1000, 1000));

    engine.ingest_button(true, t0);
    // Up lands exactly on the hold-cap deadline: the force-finish is
    // processed first, so the gesture carries the capped duration.
    engine.ingest_button(false, t0 + MAX_HOLD);

    assert_eq!(
        gestures(&engine),
        vec![Event::Gesture {
            points: 1,
            hold_ms: MAX_HOLD.as_millis() as u64,
        }]
    );
}

#[test]
fn repeated_down_does_not_restart_the_stroke() {
    let t0 = Instant::now();
    let mut engine = started_engine(AirMouseSettings::default(), t0);
    engine.set_bounds(Rect::new(0, 0, 1000, 1000));

    engine.ingest_button(true, t0);
    engine.ingest_button(true, t0 + ms(200));
    engine.ingest_button(false, t0 + ms(400));

    let gesture = &engine.sink().gestures[0];
    assert_eq!(gesture.hold_duration, ms(400));
    assert_eq!(engine.sink().gestures.len(), 1);
}

#[test]
fn stroke_skips_points_below_the_movement_threshold() {
    let t0 = Instant::now();
    let settings = AirMouseSettings {
        sensitivity: 1.0,
        ..AirMouseSettings::default()
    };
    let mut engine = started_engine(settings, t0);
    engine.set_bounds(Rect::new(0, 0, 1000, 1000));

    engine.ingest_button(true, t0);
    // 0.5 * 1 * 20 = 10 px, below the 25 px threshold.
    engine.ingest_motion(0.5, 0.0, t0 + ms(5));
    engine.advance(t0 + ms(30));
    engine.ingest_button(false, t0 + ms(40));

    assert_eq!(engine.sink().gestures[0].path.len(), 1);
}

#[test]
fn stroke_records_points_past_the_movement_threshold() {
    let t0 = Instant::now();
    let mut engine = started_engine(AirMouseSettings::default(), t0);
    engine.set_bounds(Rect::new(0, 0, 1000, 1000));

    engine.ingest_button(true, t0);
    // 1.0 * 50 * 20 = 1000 px, clamped to the right edge.
    engine.ingest_motion(1.0, 0.0, t0 + ms(5));
    engine.advance(t0 + ms(30));
    engine.ingest_button(false, t0 + ms(40));

    let path = &engine.sink().gestures[0].path;
    assert_eq!(path.len(), 2);
    assert_eq!(path.points()[0], Point::new(500, 500));
    assert_eq!(path.points()[1], Point::new(1000, 500));
}

#[test]
fn full_scenario_motion_under_held_button() {
    let t0 = Instant::now();
    let mut engine = started_engine(AirMouseSettings::default(), t0);
    engine.set_bounds(Rect::new(0, 0, 1000, 1000));
    engine.set_sensitivity(50.0);

    engine.ingest_button(true, t0);
    engine.ingest_motion(10.0, 0.0, t0 + ms(5));
    engine.advance(t0 + ms(1600));

    let emitted = gestures(&engine);
    assert_eq!(emitted.len(), 1, "exactly one gesture per press");
    let gesture = &engine.sink().gestures[0];
    assert_eq!(gesture.hold_duration, MAX_HOLD);
    assert!(gesture.path.len() >= 2);
    assert_eq!(gesture.stroke_duration(), MAX_HOLD / 2);
}
