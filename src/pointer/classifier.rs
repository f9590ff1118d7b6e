use crate::geometry::Point;
use crate::pointer::stroke::{Gesture, StrokeBuilder};
use std::time::{Duration, Instant};

/// Recurring stroke-sample interval while the button is held.
pub const TICK: Duration = Duration::from_millis(25);

/// Longest a press may run before it is force-finished, so a stuck button
/// cannot record forever.
pub const MAX_HOLD: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pressing { down_at: Instant },
}

/// State machine over button transitions. A press starts a stroke at the
/// current cursor position; the recurring tick samples the stroke and
/// advances the hold timer; release (or reaching [`MAX_HOLD`]) finishes
/// the stroke into a [`Gesture`]. Exactly one gesture per press.
#[derive(Debug)]
pub struct ButtonClassifier {
    state: State,
    held: Duration,
    stroke: StrokeBuilder,
}

impl ButtonClassifier {
    pub fn new(move_threshold_px: f32) -> Self {
        Self {
            state: State::Idle,
            held: Duration::ZERO,
            stroke: StrokeBuilder::new(move_threshold_px),
        }
    }

    pub fn set_move_threshold(&mut self, threshold_px: f32) {
        self.stroke.set_threshold(threshold_px);
    }

    pub fn is_pressing(&self) -> bool {
        matches!(self.state, State::Pressing { .. })
    }

    /// Button down: begin a stroke at `pos`. Returns `false` when a press
    /// is already active (repeated downs are ignored).
    pub fn press(&mut self, now: Instant, pos: Point) -> bool {
        if self.is_pressing() {
            return false;
        }
        self.state = State::Pressing { down_at: now };
        self.held = Duration::ZERO;
        self.stroke.start(pos);
        true
    }

    /// Recurring tick while pressing: sample the stroke and advance the
    /// hold timer. Returns the finished gesture once the hold cap is hit.
    pub fn tick(&mut self, pos: Point) -> Option<Gesture> {
        if !self.is_pressing() {
            return None;
        }
        self.stroke.sample(pos);
        self.held += TICK;
        if self.held >= MAX_HOLD {
            tracing::debug!("press reached the hold cap, force-finishing stroke");
            let held = self.held;
            return Some(self.finish(held));
        }
        None
    }

    /// Button up: finish the stroke with the actual hold time. `None` when
    /// no press is active.
    pub fn release(&mut self, now: Instant) -> Option<Gesture> {
        match self.state {
            State::Pressing { down_at } => Some(self.finish(now.duration_since(down_at))),
            State::Idle => None,
        }
    }

    /// Drop any in-progress press without emitting a gesture.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.held = Duration::ZERO;
        let _ = self.stroke.finish();
    }

    fn finish(&mut self, hold: Duration) -> Gesture {
        self.state = State::Idle;
        self.held = Duration::ZERO;
        Gesture {
            path: self.stroke.finish(),
            hold_duration: hold,
        }
    }
}
