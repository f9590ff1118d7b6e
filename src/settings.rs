use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::time::Duration;

pub const SENSITIVITY_RANGE: RangeInclusive<f32> = 1.0..=100.0;
pub const HIDE_DELAY_RANGE_S: RangeInclusive<f32> = 5.0..=305.0;

/// Hide delays above this many seconds disable hiding entirely.
pub const HIDE_DELAY_INDEFINITE_S: f32 = 300.0;

/// Runtime-tunable knobs supplied by the embedding application. The
/// settings store itself (file, preferences service, ...) lives outside
/// this crate; values arrive here already loaded and may be swapped while
/// the service is running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirMouseSettings {
    /// User sensitivity applied to raw pen deltas, on top of the fixed
    /// hardware gain.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Seconds of inactivity before the cursor hides. Values above 300
    /// keep the cursor visible indefinitely.
    #[serde(default = "default_hide_delay_s")]
    pub hide_delay_s: f32,
    /// Detach motion sampling after a further idle minute once the cursor
    /// is hidden, to save the pen's battery.
    #[serde(default = "default_sleep_enabled")]
    pub sleep_enabled: bool,
    /// Minimum distance in pixels between recorded stroke points. The
    /// display collaborator scales this from a density-independent unit.
    #[serde(default = "default_move_threshold_px")]
    pub move_threshold_px: f32,
    /// When enabled the embedding application initialises the logger at
    /// debug level.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_sensitivity() -> f32 {
    50.0
}

fn default_hide_delay_s() -> f32 {
    10.0
}

fn default_sleep_enabled() -> bool {
    true
}

fn default_move_threshold_px() -> f32 {
    25.0
}

impl Default for AirMouseSettings {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            hide_delay_s: default_hide_delay_s(),
            sleep_enabled: default_sleep_enabled(),
            move_threshold_px: default_move_threshold_px(),
            debug_logging: false,
        }
    }
}

impl AirMouseSettings {
    /// Copy with every value forced into its supported range.
    pub fn clamped(&self) -> Self {
        Self {
            sensitivity: self
                .sensitivity
                .clamp(*SENSITIVITY_RANGE.start(), *SENSITIVITY_RANGE.end()),
            hide_delay_s: self
                .hide_delay_s
                .clamp(*HIDE_DELAY_RANGE_S.start(), *HIDE_DELAY_RANGE_S.end()),
            move_threshold_px: self.move_threshold_px.max(0.0),
            ..self.clone()
        }
    }

    /// Hide timer duration, or `None` when hiding is disabled.
    pub fn hide_delay(&self) -> Option<Duration> {
        if self.hide_delay_s > HIDE_DELAY_INDEFINITE_S {
            None
        } else {
            Some(Duration::from_secs_f32(self.hide_delay_s))
        }
    }
}
