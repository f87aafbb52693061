//! Final intensity shaping of retained peaks.

use crate::config::StrengthMode;

/// Lowest value the shared winner-take-all peak may fall to
pub const GLOBAL_PEAK_FLOOR: f32 = 1e-3;
/// Starting value of the shared peak
pub const INITIAL_GLOBAL_PEAK: f32 = 0.1;
/// Per-zone geometric decay of the shared peak
const GLOBAL_PEAK_DECAY: f32 = 0.9;
/// Share of the shared peak a zone must reach to show at all
const WINNER_RATIO: f32 = 0.6;
const RATIO_EPSILON: f32 = 1e-6;

/// Turns retained peaks into display strengths in [0, 1].
///
/// In winner-take-all mode the shaper carries one decaying peak shared by
/// all zones. It is updated once per zone shaped, so results depend on
/// zone order; the engine always shapes zones 0 through 11 in sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityShaper {
    mode: StrengthMode,
    global_peak: f32,
}

impl IntensityShaper {
    pub fn new(mode: StrengthMode) -> Self {
        Self {
            mode,
            global_peak: INITIAL_GLOBAL_PEAK,
        }
    }

    pub fn mode(&self) -> StrengthMode {
        self.mode
    }

    pub fn global_peak(&self) -> f32 {
        self.global_peak
    }

    /// Strength for one zone's retained peak
    pub fn shape(&mut self, retained_peak: f32) -> f32 {
        let raw = if retained_peak.is_finite() {
            retained_peak.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let strength = match self.mode {
            StrengthMode::WinnerTakeAll => {
                self.global_peak = (self.global_peak * GLOBAL_PEAK_DECAY)
                    .max(raw)
                    .max(GLOBAL_PEAK_FLOOR);
                let ratio = raw / (self.global_peak + RATIO_EPSILON);
                if ratio < WINNER_RATIO {
                    0.0
                } else {
                    (ratio - WINNER_RATIO) / (1.0 - WINNER_RATIO)
                }
            }
            StrengthMode::MultiDirection => raw * raw,
        };

        strength.clamp(0.0, 1.0)
    }
}
