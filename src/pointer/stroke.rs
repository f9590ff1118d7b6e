use crate::geometry::Point;
use std::time::Duration;

/// Positions traced while the button was held, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrokePath {
    points: Vec<Point>,
}

impl StrokePath {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One completed press: the traced path plus how long the button was held.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub path: StrokePath,
    pub hold_duration: Duration,
}

impl Gesture {
    /// Pacing for replaying the stroke through an input-injection API.
    /// Half the hold time gives the injected tap or drag a natural feel.
    pub fn stroke_duration(&self) -> Duration {
        self.hold_duration / 2
    }
}

/// Records a stroke while a button is held. Sampled positions closer than
/// the movement threshold to the last recorded point are skipped so jitter
/// cannot produce pathologically dense paths.
#[derive(Debug)]
pub struct StrokeBuilder {
    threshold_px: f32,
    points: Vec<Point>,
}

impl StrokeBuilder {
    pub fn new(threshold_px: f32) -> Self {
        Self {
            threshold_px,
            points: Vec::new(),
        }
    }

    pub fn set_threshold(&mut self, threshold_px: f32) {
        self.threshold_px = threshold_px;
    }

    /// Reset internal state to a single initial point.
    pub fn start(&mut self, at: Point) {
        self.points.clear();
        self.points.push(at);
    }

    /// Append `pos` if it moved at least the threshold away from the last
    /// recorded point. Returns whether a point was appended.
    pub fn sample(&mut self, pos: Point) -> bool {
        let last = match self.points.last() {
            Some(last) => *last,
            None => {
                self.points.push(pos);
                return true;
            }
        };
        let threshold_sq = f64::from(self.threshold_px) * f64::from(self.threshold_px);
        if pos.distance_sq(last) as f64 >= threshold_sq {
            self.points.push(pos);
            true
        } else {
            false
        }
    }

    /// Hand off the accumulated path and clear internal state.
    pub fn finish(&mut self) -> StrokePath {
        StrokePath {
            points: std::mem::take(&mut self.points),
        }
    }
}
