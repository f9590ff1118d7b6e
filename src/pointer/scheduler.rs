use crate::pointer::timers::TimerSet;
use crate::pointer::TimerKey;
use std::time::{Duration, Instant};

/// Idle time after the cursor hides before motion sampling detaches.
pub const SLEEP_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepState {
    Awake,
    Asleep,
}

/// State transition produced by the scheduler, relayed by the engine to
/// its sink in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    SleepChanged {
        state: SleepState,
        reattach_motion: bool,
    },
    VisibilityChanged(Visibility),
}

/// Drives the cursor-visibility and sleep state machines off two
/// cancellable deadlines.
///
/// Activity (a motion sample, a finished gesture, a settings change) wakes
/// and shows the cursor and restarts the idle countdown. With hiding
/// disabled the sleep countdown is armed directly from activity instead,
/// so an always-visible cursor still lets the pen power down.
#[derive(Debug)]
pub struct IdleScheduler {
    visibility: Visibility,
    sleep: SleepState,
    hide_delay: Option<Duration>,
    sleep_enabled: bool,
}

impl IdleScheduler {
    pub fn new(hide_delay: Option<Duration>, sleep_enabled: bool) -> Self {
        Self {
            visibility: Visibility::Visible,
            sleep: SleepState::Awake,
            hide_delay,
            sleep_enabled,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn sleep(&self) -> SleepState {
        self.sleep
    }

    /// Swap in new timing settings; takes effect on the next scheduling
    /// decision.
    pub fn configure(&mut self, hide_delay: Option<Duration>, sleep_enabled: bool) {
        self.hide_delay = hide_delay;
        self.sleep_enabled = sleep_enabled;
    }

    /// Register activity: wake if asleep, show if hidden, restart the idle
    /// timers. Wake is emitted before show, the order re-attachment
    /// consumers rely on.
    pub fn activity(
        &mut self,
        now: Instant,
        timers: &mut TimerSet<TimerKey>,
        out: &mut Vec<SchedulerEvent>,
    ) {
        timers.cancel(TimerKey::Hide);
        timers.cancel(TimerKey::Sleep);

        if self.sleep == SleepState::Asleep {
            self.sleep = SleepState::Awake;
            tracing::debug!("waking: motion sampling should re-attach");
            out.push(SchedulerEvent::SleepChanged {
                state: SleepState::Awake,
                reattach_motion: true,
            });
        }
        if self.visibility == Visibility::Hidden {
            self.visibility = Visibility::Visible;
            out.push(SchedulerEvent::VisibilityChanged(Visibility::Visible));
        }

        match self.hide_delay {
            Some(delay) => timers.schedule(TimerKey::Hide, now + delay),
            None => {
                // Hiding disabled; the pen may still sleep while the cursor
                // stays on screen.
                if self.sleep_enabled {
                    timers.schedule(TimerKey::Sleep, now + SLEEP_DELAY);
                }
            }
        }
    }

    /// Hide deadline fired.
    pub fn hide_fired(
        &mut self,
        at: Instant,
        timers: &mut TimerSet<TimerKey>,
        out: &mut Vec<SchedulerEvent>,
    ) {
        tracing::debug!("hiding cursor");
        self.visibility = Visibility::Hidden;
        out.push(SchedulerEvent::VisibilityChanged(Visibility::Hidden));
        if self.sleep_enabled {
            timers.schedule(TimerKey::Sleep, at + SLEEP_DELAY);
        }
    }

    /// Sleep deadline fired: motion sampling should detach.
    pub fn sleep_fired(&mut self, out: &mut Vec<SchedulerEvent>) {
        tracing::debug!("entering sleep: motion sampling should detach");
        self.sleep = SleepState::Asleep;
        out.push(SchedulerEvent::SleepChanged {
            state: SleepState::Asleep,
            reattach_motion: false,
        });
    }

    /// Back to the initial state with no timers pending. Emits nothing;
    /// used on service shutdown.
    pub fn reset(&mut self, timers: &mut TimerSet<TimerKey>) {
        timers.cancel(TimerKey::Hide);
        timers.cancel(TimerKey::Sleep);
        self.visibility = Visibility::Visible;
        self.sleep = SleepState::Awake;
    }
}
