//! The twelve directional zones and the rule each one applies.
//!
//! Zones run clockwise from the front in 30 degree steps and alternate
//! between cardinal zones (aligned with a speaker or speaker pair) and
//! transition zones (asymmetry between two neighbouring sources).

use crate::config::ChannelRole::{self, *};
use crate::normalizer::RoleLevels;

pub const ZONE_COUNT: usize = 12;

/// Angular width of a zone in degrees
pub const ZONE_SPAN_DEGREES: f32 = 360.0 / ZONE_COUNT as f32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneKind {
    Cardinal,
    Transition,
}

/// How a zone turns role levels into a raw directional signal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneRule {
    /// Mean of a speaker pair
    Average(ChannelRole, ChannelRole),
    /// Level of one speaker
    Single(ChannelRole),
    /// `max(0, source - reference)`
    Excess {
        source: ChannelRole,
        reference: ChannelRole,
    },
    /// `winner - other`, but only when it beats `other` by more than the
    /// configured ratio of the smaller level; otherwise exactly 0.
    Gated {
        winner: ChannelRole,
        other: ChannelRole,
    },
}

/// Rule for each zone, indexed clockwise from the front
pub const ZONE_RULES: [ZoneRule; ZONE_COUNT] = [
    ZoneRule::Average(FrontLeft, FrontRight),
    ZoneRule::Gated {
        winner: FrontRight,
        other: FrontLeft,
    },
    ZoneRule::Excess {
        source: Right,
        reference: FrontRight,
    },
    ZoneRule::Single(Right),
    ZoneRule::Excess {
        source: Right,
        reference: BackRight,
    },
    ZoneRule::Gated {
        winner: BackRight,
        other: BackLeft,
    },
    ZoneRule::Average(BackLeft, BackRight),
    ZoneRule::Gated {
        winner: BackLeft,
        other: BackRight,
    },
    ZoneRule::Excess {
        source: Left,
        reference: BackLeft,
    },
    ZoneRule::Single(Left),
    ZoneRule::Excess {
        source: Left,
        reference: FrontLeft,
    },
    ZoneRule::Gated {
        winner: FrontLeft,
        other: FrontRight,
    },
];

impl ZoneRule {
    pub fn kind(&self) -> ZoneKind {
        match self {
            ZoneRule::Average(..) | ZoneRule::Single(_) => ZoneKind::Cardinal,
            ZoneRule::Excess { .. } | ZoneRule::Gated { .. } => ZoneKind::Transition,
        }
    }

    /// Raw signal for this tick. Never negative, not clamped upward.
    pub fn evaluate(&self, levels: &RoleLevels, max_dif_ratio: f32) -> f32 {
        match *self {
            ZoneRule::Average(a, b) => (levels.get(a) + levels.get(b)) / 2.0,
            ZoneRule::Single(role) => levels.get(role),
            ZoneRule::Excess { source, reference } => {
                (levels.get(source) - levels.get(reference)).max(0.0)
            }
            ZoneRule::Gated { winner, other } => {
                let (w, o) = (levels.get(winner), levels.get(other));
                let smaller = w.min(o);
                if smaller <= 0.0 {
                    return 0.0;
                }
                let diff = w - o;
                if diff / smaller > max_dif_ratio {
                    diff
                } else {
                    0.0
                }
            }
        }
    }
}

/// Evaluate every zone rule in order
pub fn evaluate_all(levels: &RoleLevels, max_dif_ratio: f32) -> [f32; ZONE_COUNT] {
    let mut signals = [0.0; ZONE_COUNT];
    for (signal, rule) in signals.iter_mut().zip(ZONE_RULES.iter()) {
        *signal = rule.evaluate(levels, max_dif_ratio);
    }
    signals
}

/// Compass angle of a zone's centre in degrees, 0 = front, clockwise
pub fn zone_center_degrees(zone: usize) -> f32 {
    (zone % ZONE_COUNT) as f32 * ZONE_SPAN_DEGREES
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATIO: f32 = 0.01;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_kinds_alternate_with_cardinals_every_third_zone() {
        for (i, rule) in ZONE_RULES.iter().enumerate() {
            let expected = if i % 3 == 0 {
                ZoneKind::Cardinal
            } else {
                ZoneKind::Transition
            };
            assert_eq!(rule.kind(), expected, "zone {}", i);
        }
    }

    #[test]
    fn test_cardinal_rules() {
        let levels = RoleLevels::new()
            .with(FrontLeft, 0.2)
            .with(FrontRight, 0.6)
            .with(Right, 0.7)
            .with(Left, 0.1)
            .with(BackLeft, 0.3)
            .with(BackRight, 0.5);
        let signals = evaluate_all(&levels, RATIO);
        assert!(close(signals[0], 0.4));
        assert!(close(signals[3], 0.7));
        assert!(close(signals[6], 0.4));
        assert!(close(signals[9], 0.1));
    }

    #[test]
    fn test_excess_rules_never_negative() {
        let levels = RoleLevels::new()
            .with(FrontRight, 0.9)
            .with(Right, 0.3)
            .with(BackRight, 0.1);
        let signals = evaluate_all(&levels, RATIO);
        assert_eq!(signals[2], 0.0);
        assert!(close(signals[4], 0.2));
    }

    #[test]
    fn test_gate_at_threshold_is_closed() {
        // (0.505 - 0.5) / 0.5 == 0.01, which is not strictly greater
        let levels = RoleLevels::new()
            .with(FrontLeft, 0.505)
            .with(FrontRight, 0.50);
        assert_eq!(ZONE_RULES[11].evaluate(&levels, RATIO), 0.0);

        let levels = RoleLevels::new()
            .with(FrontLeft, 0.50)
            .with(FrontRight, 0.505);
        assert_eq!(ZONE_RULES[1].evaluate(&levels, RATIO), 0.0);
        assert_eq!(ZONE_RULES[11].evaluate(&levels, RATIO), 0.0);
    }

    #[test]
    fn test_gate_above_threshold_passes_difference() {
        let levels = RoleLevels::new()
            .with(FrontLeft, 0.50)
            .with(FrontRight, 0.52);
        assert!(close(ZONE_RULES[1].evaluate(&levels, RATIO), 0.02));
        // the mirrored zone only fires for the other side
        assert_eq!(ZONE_RULES[11].evaluate(&levels, RATIO), 0.0);

        let levels = RoleLevels::new()
            .with(FrontLeft, 0.52)
            .with(FrontRight, 0.50);
        assert!(close(ZONE_RULES[11].evaluate(&levels, RATIO), 0.02));
    }

    #[test]
    fn test_gate_with_silent_side_is_closed() {
        let levels = RoleLevels::new().with(BackRight, 0.8);
        assert_eq!(ZONE_RULES[5].evaluate(&levels, RATIO), 0.0);
        assert_eq!(ZONE_RULES[7].evaluate(&levels, RATIO), 0.0);
        // the cardinal back zone still sees it
        assert!(close(ZONE_RULES[6].evaluate(&levels, RATIO), 0.4));
    }

    #[test]
    fn test_zone_angles() {
        assert_eq!(zone_center_degrees(0), 0.0);
        assert_eq!(zone_center_degrees(3), 90.0);
        assert_eq!(zone_center_degrees(9), 270.0);
        assert_eq!(zone_center_degrees(12), 0.0);
    }
}
