#![allow(dead_code)]

use airmouse::geometry::Point;
use airmouse::pointer::scheduler::{SleepState, Visibility};
use airmouse::pointer::stroke::Gesture;
use airmouse::pointer::{PointerEngine, PointerSink};
use airmouse::settings::AirMouseSettings;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Position(Point),
    Gesture { points: usize, hold_ms: u64 },
    Visibility(Visibility),
    Sleep { state: SleepState, reattach_motion: bool },
}

/// Sink that records every callback in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<Event>,
    pub gestures: Vec<Gesture>,
}

impl PointerSink for RecordingSink {
    fn position_changed(&mut self, pos: Point) {
        self.events.push(Event::Position(pos));
    }

    fn gesture(&mut self, gesture: Gesture) {
        self.events.push(Event::Gesture {
            points: gesture.path.len(),
            hold_ms: gesture.hold_duration.as_millis() as u64,
        });
        self.gestures.push(gesture);
    }

    fn visibility_changed(&mut self, visibility: Visibility) {
        self.events.push(Event::Visibility(visibility));
    }

    fn sleep_changed(&mut self, sleep: SleepState, reattach_motion: bool) {
        self.events.push(Event::Sleep {
            state: sleep,
            reattach_motion,
        });
    }
}

pub fn engine(settings: AirMouseSettings) -> PointerEngine<RecordingSink> {
    PointerEngine::new(settings, RecordingSink::default())
}

pub fn started_engine(settings: AirMouseSettings, now: Instant) -> PointerEngine<RecordingSink> {
    let mut engine = engine(settings);
    engine.start(now);
    engine
}

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

pub fn gestures(engine: &PointerEngine<RecordingSink>) -> Vec<Event> {
    engine
        .sink()
        .events
        .iter()
        .filter(|event| matches!(event, Event::Gesture { .. }))
        .cloned()
        .collect()
}
