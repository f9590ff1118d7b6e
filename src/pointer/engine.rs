use crate::geometry::{Point, Rect};
use crate::pointer::classifier::{ButtonClassifier, TICK};
use crate::pointer::integrator::MotionIntegrator;
use crate::pointer::scheduler::{IdleScheduler, SchedulerEvent, SleepState, Visibility};
use crate::pointer::stroke::Gesture;
use crate::pointer::timers::TimerSet;
use crate::pointer::{PointerSink, TimerKey};
use crate::settings::AirMouseSettings;
use std::time::Instant;

/// Event-fusion facade: owns the cursor position and drives the motion
/// integrator, stroke classifier and idle scheduler from ingested input
/// plus deadline timers.
///
/// The engine keeps no clock of its own. Every call takes an explicit
/// `Instant`, and pending deadlines fire through [`advance`] — callers
/// decide whether that means an OS timer, a worker loop (see
/// [`crate::pointer::service`]) or a manual tick loop in tests. Ingest
/// calls first fire every deadline due at or before their timestamp, so
/// e.g. a hold-cap force-finish due at the same instant as a button-up is
/// processed first and the up becomes a no-op.
///
/// Until bounds are known, motion integrates unclamped; the first
/// `set_bounds` then either clamps, or centers the cursor when nothing has
/// moved yet (initial placement).
///
/// [`advance`]: PointerEngine::advance
pub struct PointerEngine<S> {
    sink: S,
    settings: AirMouseSettings,
    integrator: MotionIntegrator,
    classifier: ButtonClassifier,
    scheduler: IdleScheduler,
    timers: TimerSet<TimerKey>,
    scratch: Vec<SchedulerEvent>,
    position: Point,
    bounds: Option<Rect>,
    moved: bool,
    running: bool,
}

impl<S: PointerSink> PointerEngine<S> {
    pub fn new(settings: AirMouseSettings, sink: S) -> Self {
        let settings = settings.clamped();
        Self {
            sink,
            integrator: MotionIntegrator::new(settings.sensitivity),
            classifier: ButtonClassifier::new(settings.move_threshold_px),
            scheduler: IdleScheduler::new(settings.hide_delay(), settings.sleep_enabled),
            timers: TimerSet::new(),
            scratch: Vec::new(),
            position: Point::default(),
            bounds: None,
            moved: false,
            running: false,
            settings,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn visibility(&self) -> Visibility {
        self.scheduler.visibility()
    }

    pub fn sleep_state(&self) -> SleepState {
        self.scheduler.sleep()
    }

    pub fn settings(&self) -> &AirMouseSettings {
        &self.settings
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Begin processing input. Re-centers the cursor when bounds are
    /// already known and arms the idle timers.
    pub fn start(&mut self, now: Instant) {
        if self.running {
            tracing::warn!("engine already running");
            return;
        }
        self.running = true;
        self.moved = false;
        if let Some(bounds) = self.bounds {
            self.position = bounds.center();
            self.sink.position_changed(self.position);
        }
        self.note_activity(now);
    }

    /// Cancel all pending timers and drop any in-progress stroke. Further
    /// ingest calls are no-ops until [`start`](PointerEngine::start); no
    /// callback fires after this returns.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.timers.clear();
        self.classifier.reset();
        self.scheduler.reset(&mut self.timers);
        self.scratch.clear();
    }

    pub fn set_sensitivity(&mut self, value: f32) {
        self.integrator.set_sensitivity(value);
        self.settings.sensitivity = self.integrator.sensitivity();
    }

    /// Update screen bounds (rotation, resize). The position is clamped
    /// into the new rectangle; a repeated identical rectangle changes
    /// nothing. The very first bounds instead center the cursor, unless
    /// motion has already been integrated.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if self.bounds == Some(bounds) {
            return;
        }
        let first = self.bounds.is_none();
        self.bounds = Some(bounds);
        let next = if first && !self.moved {
            bounds.center()
        } else {
            bounds.clamp(self.position)
        };
        if next != self.position {
            self.position = next;
            if self.running {
                self.sink.position_changed(next);
            }
        }
    }

    /// Swap in new settings; timing changes apply to the next scheduling
    /// decision. While running this counts as activity, mirroring a user
    /// fiddling with the controls: the cursor shows and the idle countdown
    /// restarts under the new delays.
    pub fn update_settings(&mut self, settings: AirMouseSettings, now: Instant) {
        let settings = settings.clamped();
        self.integrator.set_sensitivity(settings.sensitivity);
        self.classifier.set_move_threshold(settings.move_threshold_px);
        self.scheduler
            .configure(settings.hide_delay(), settings.sleep_enabled);
        self.settings = settings;
        if self.running {
            self.run_timers(now);
            self.note_activity(now);
        }
    }

    /// One relative motion sample. Wake/show callbacks (if the sample ends
    /// an idle period) precede the position update.
    pub fn ingest_motion(&mut self, dx: f32, dy: f32, now: Instant) {
        if !self.running {
            return;
        }
        self.run_timers(now);
        self.note_activity(now);
        self.position = self
            .integrator
            .integrate(self.position, dx, dy, self.bounds);
        self.moved = true;
        self.sink.position_changed(self.position);
    }

    /// One button transition. Down starts a stroke at the current
    /// position; up finishes it into a gesture.
    pub fn ingest_button(&mut self, down: bool, now: Instant) {
        if !self.running {
            return;
        }
        self.run_timers(now);
        if down {
            if self.classifier.press(now, self.position) {
                self.timers.schedule(TimerKey::HoldTick, now + TICK);
            } else {
                tracing::debug!("button down during an active stroke, ignoring");
            }
        } else {
            self.timers.cancel(TimerKey::HoldTick);
            if let Some(gesture) = self.classifier.release(now) {
                self.emit_gesture(gesture, now);
            }
        }
    }

    /// Explicit wake request from the embedding application: shows the
    /// cursor, re-attaches motion sampling if asleep and restarts the
    /// idle countdown, exactly like a motion sample without the motion.
    pub fn wake(&mut self, now: Instant) {
        if !self.running {
            return;
        }
        self.run_timers(now);
        self.note_activity(now);
    }

    /// Fire every deadline due at or before `now`.
    pub fn advance(&mut self, now: Instant) {
        if !self.running {
            return;
        }
        self.run_timers(now);
    }

    /// Earliest pending deadline, for callers aligning their wakeups.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    fn run_timers(&mut self, now: Instant) {
        while let Some((key, at)) = self.timers.pop_due(now) {
            match key {
                TimerKey::HoldTick => {
                    if let Some(gesture) = self.classifier.tick(self.position) {
                        self.emit_gesture(gesture, at);
                    } else if self.classifier.is_pressing() {
                        self.timers.schedule(TimerKey::HoldTick, at + TICK);
                    }
                }
                TimerKey::Hide => {
                    self.scheduler.hide_fired(at, &mut self.timers, &mut self.scratch);
                    self.drain_scheduler_events();
                }
                TimerKey::Sleep => {
                    self.scheduler.sleep_fired(&mut self.scratch);
                    self.drain_scheduler_events();
                }
            }
        }
    }

    fn note_activity(&mut self, now: Instant) {
        self.scheduler
            .activity(now, &mut self.timers, &mut self.scratch);
        self.drain_scheduler_events();
    }

    fn drain_scheduler_events(&mut self) {
        for event in self.scratch.drain(..) {
            match event {
                SchedulerEvent::SleepChanged {
                    state,
                    reattach_motion,
                } => self.sink.sleep_changed(state, reattach_motion),
                SchedulerEvent::VisibilityChanged(visibility) => {
                    self.sink.visibility_changed(visibility)
                }
            }
        }
    }

    /// A finished stroke is itself activity. A stroke that completed while
    /// motion sampling was detached is discarded after waking: its path
    /// was recorded against a cursor that could not move.
    fn emit_gesture(&mut self, gesture: Gesture, now: Instant) {
        let was_asleep = self.scheduler.sleep() == SleepState::Asleep;
        self.note_activity(now);
        if was_asleep {
            tracing::debug!(
                points = gesture.path.len(),
                "discarding stroke recorded while asleep"
            );
            return;
        }
        tracing::trace!(
            points = gesture.path.len(),
            hold_ms = gesture.hold_duration.as_millis() as u64,
            "gesture finished"
        );
        self.sink.gesture(gesture);
    }
}
