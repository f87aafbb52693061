//! Per-zone peak hold, hysteresis and fade.
//!
//! A zone rises instantly to the enhanced value of any signal that beats its
//! retained peak, holds that peak for `min_time_first_update`, then fades
//! exponentially in steps at least `min_time_between_updates` apart.

use crate::config::EngineConfig;

/// Retained peaks below this snap to zero
pub const SNAP_TO_ZERO: f32 = 0.01;

/// What happened to a zone during one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// New signal beat the retained peak
    Rise,
    /// End of the post-rise hold window
    FirstDecay,
    Decay,
    /// Nothing due this tick
    Hold,
}

/// Temporal state of one directional zone
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zone {
    retained_peak: f32,
    rising: bool,
    last_transition: f64,
}

impl Zone {
    pub fn new(now: f64) -> Self {
        Self {
            retained_peak: 0.0,
            rising: false,
            last_transition: now,
        }
    }

    /// Zone already holding `peak` and past its rise (used to resume or
    /// inspect fading in isolation)
    pub fn fading_from(peak: f32, now: f64) -> Self {
        Self {
            retained_peak: sanitize(peak),
            rising: false,
            last_transition: now,
        }
    }

    pub fn retained_peak(&self) -> f32 {
        self.retained_peak
    }

    pub fn is_rising(&self) -> bool {
        self.rising
    }

    pub fn last_transition(&self) -> f64 {
        self.last_transition
    }

    /// Advance the zone by one tick given this tick's raw rule output.
    ///
    /// Rise wins over decay; at most one fade step is applied per call.
    pub fn update(&mut self, signal: f32, now: f64, config: &EngineConfig) -> Transition {
        let signal = if signal.is_finite() { signal } else { 0.0 };
        let elapsed = now - self.last_transition;

        let transition = if signal > self.retained_peak {
            self.retained_peak = enhance(signal, config.min_threshold);
            self.rising = true;
            self.last_transition = now;
            Transition::Rise
        } else if self.rising && elapsed > config.min_time_first_update {
            self.retained_peak = fade(self.retained_peak, elapsed, config.decay_rate);
            self.rising = false;
            self.last_transition = now;
            Transition::FirstDecay
        } else if !self.rising && elapsed > config.min_time_between_updates {
            self.retained_peak = fade(self.retained_peak, elapsed, config.decay_rate);
            self.last_transition = now;
            Transition::Decay
        } else {
            Transition::Hold
        };

        self.retained_peak = sanitize(self.retained_peak);
        if self.retained_peak < SNAP_TO_ZERO {
            self.retained_peak = 0.0;
        }
        transition
    }
}

/// Step-shaped enhancement applied to a freshly risen peak.
///
/// Below `threshold` gives 0, above gives 1. Exactly at the threshold the
/// curve `sqrt(2x - threshold)` is used; with continuous input that branch
/// practically never fires.
pub fn enhance(x: f32, threshold: f32) -> f32 {
    if x < threshold {
        0.0
    } else if x > threshold {
        1.0
    } else {
        (2.0 * x - threshold).sqrt()
    }
}

/// Exponential fade of `value` over `elapsed` seconds
pub fn fade(value: f32, elapsed: f64, decay_rate: f32) -> f32 {
    (value as f64 * (-(decay_rate as f64) * elapsed).exp()) as f32
}

/// Non-finite values become 0, everything else lands in [0, 1]
fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
