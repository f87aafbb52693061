//! Engine configuration.
//!
//! Everything the engine needs is fixed at construction time and passed in
//! as one [`EngineConfig`]. Defaults match the values the radar was tuned
//! with on an 8-channel virtual cable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;

/// Minimum number of physical channels the zone table can work with
pub const MIN_CHANNELS: usize = 8;

/// Full-scale magnitude of a signed 32-bit capture stream
pub const FULL_SCALE_I32: f64 = 2_147_483_648.0;

/// Logical speaker positions consumed by the zone rule table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    FrontLeft,
    FrontRight,
    Left,
    Right,
    BackLeft,
    BackRight,
}

impl ChannelRole {
    pub const ALL: [ChannelRole; 6] = [
        ChannelRole::FrontLeft,
        ChannelRole::FrontRight,
        ChannelRole::Left,
        ChannelRole::Right,
        ChannelRole::BackLeft,
        ChannelRole::BackRight,
    ];

    /// Short label used in logs (FL, FR, ...)
    pub fn label(self) -> &'static str {
        match self {
            ChannelRole::FrontLeft => "FL",
            ChannelRole::FrontRight => "FR",
            ChannelRole::Left => "L",
            ChannelRole::Right => "R",
            ChannelRole::BackLeft => "BL",
            ChannelRole::BackRight => "BR",
        }
    }
}

impl fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelRole::FrontLeft => "front-left",
            ChannelRole::FrontRight => "front-right",
            ChannelRole::Left => "left",
            ChannelRole::Right => "right",
            ChannelRole::BackLeft => "back-left",
            ChannelRole::BackRight => "back-right",
        };
        f.write_str(name)
    }
}

/// Zero-based physical channel index for each role.
///
/// Must follow the channel order of the capture device. The default is the
/// usual 7.1 layout (FL, FR, C, LFE, BL, BR, SL, SR).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelMapping {
    pub front_left: usize,
    pub front_right: usize,
    pub left: usize,
    pub right: usize,
    pub back_left: usize,
    pub back_right: usize,
}

impl Default for ChannelMapping {
    fn default() -> Self {
        Self {
            front_left: 0,
            front_right: 1,
            back_left: 4,
            back_right: 5,
            left: 6,
            right: 7,
        }
    }
}

impl ChannelMapping {
    pub fn index(&self, role: ChannelRole) -> usize {
        match role {
            ChannelRole::FrontLeft => self.front_left,
            ChannelRole::FrontRight => self.front_right,
            ChannelRole::Left => self.left,
            ChannelRole::Right => self.right,
            ChannelRole::BackLeft => self.back_left,
            ChannelRole::BackRight => self.back_right,
        }
    }

    /// Check that every role lands on a distinct channel the device has
    pub fn validate(&self, channels: usize) -> Result<(), EngineError> {
        for (i, &role) in ChannelRole::ALL.iter().enumerate() {
            let index = self.index(role);
            if index >= channels {
                return Err(EngineError::RoleOutOfRange {
                    role,
                    index,
                    channels,
                });
            }
            if let Some(&first) = ChannelRole::ALL[..i]
                .iter()
                .find(|&&other| self.index(other) == index)
            {
                return Err(EngineError::DuplicateRole {
                    first,
                    second: role,
                    index,
                });
            }
        }
        Ok(())
    }
}

/// How retained peaks are turned into display strengths
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrengthMode {
    /// Only the dominant direction (and close competitors) light up
    WinnerTakeAll,
    /// Every direction shows, weak ones suppressed quadratically
    #[default]
    MultiDirection,
}

impl StrengthMode {
    pub fn toggled(self) -> Self {
        match self {
            StrengthMode::WinnerTakeAll => StrengthMode::MultiDirection,
            StrengthMode::MultiDirection => StrengthMode::WinnerTakeAll,
        }
    }
}

impl fmt::Display for StrengthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrengthMode::WinnerTakeAll => f.write_str("winner-take-all"),
            StrengthMode::MultiDirection => f.write_str("multi-direction"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Hold time in seconds before a freshly risen peak starts to fade
    pub min_time_first_update: f64,
    /// Minimum seconds between two fade steps once fading
    pub min_time_between_updates: f64,
    /// Relative difference a gated transition zone must exceed
    pub max_dif_ratio: f32,
    /// Levels below this are treated as silence (also the enhancer step)
    pub min_threshold: f32,
    /// Exponential fade rate per second
    pub decay_rate: f32,
    /// Seconds between two ticks
    pub tick_period: f64,
    pub strength_mode: StrengthMode,
    /// Display range the renderer multiplies strengths by
    pub max_color_range: f32,
    /// Magnitude of a full-scale capture sample
    pub full_scale: f64,
    pub mapping: ChannelMapping,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_time_first_update: 0.5,
            min_time_between_updates: 0.1,
            max_dif_ratio: 0.01,
            min_threshold: 0.005,
            decay_rate: 2.0,
            tick_period: 0.1,
            strength_mode: StrengthMode::default(),
            max_color_range: 255.0,
            full_scale: FULL_SCALE_I32,
            mapping: ChannelMapping::default(),
        }
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot run with on a device with
    /// `channels` inputs.
    pub fn validate(&self, channels: usize) -> Result<(), EngineError> {
        if channels < MIN_CHANNELS {
            return Err(EngineError::TooFewChannels {
                found: channels,
                required: MIN_CHANNELS,
            });
        }
        self.mapping.validate(channels)?;

        positive("min_time_first_update", self.min_time_first_update)?;
        positive("min_time_between_updates", self.min_time_between_updates)?;
        positive("decay_rate", self.decay_rate as f64)?;
        positive("tick_period", self.tick_period)?;
        positive("full_scale", self.full_scale)?;
        positive("max_color_range", self.max_color_range as f64)?;

        if !(self.max_dif_ratio >= 0.0 && self.max_dif_ratio.is_finite()) {
            return Err(EngineError::InvalidParameter {
                name: "max_dif_ratio",
                value: self.max_dif_ratio as f64,
            });
        }
        if !(0.0..1.0).contains(&self.min_threshold) {
            return Err(EngineError::InvalidParameter {
                name: "min_threshold",
                value: self.min_threshold as f64,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), EngineError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidParameter { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_for_eight_channels() {
        assert_eq!(EngineConfig::default().validate(8), Ok(()));
    }

    #[test]
    fn test_too_few_channels() {
        let err = EngineConfig::default().validate(6).unwrap_err();
        assert_eq!(
            err,
            EngineError::TooFewChannels {
                found: 6,
                required: MIN_CHANNELS
            }
        );
    }

    #[test]
    fn test_role_out_of_range() {
        let mut config = EngineConfig::default();
        config.mapping.right = 9;
        match config.validate(8) {
            Err(EngineError::RoleOutOfRange { role, index, .. }) => {
                assert_eq!(role, ChannelRole::Right);
                assert_eq!(index, 9);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_role() {
        let mut config = EngineConfig::default();
        config.mapping.back_right = config.mapping.back_left;
        assert!(matches!(
            config.validate(8),
            Err(EngineError::DuplicateRole {
                first: ChannelRole::BackLeft,
                second: ChannelRole::BackRight,
                index: 4
            })
        ));
    }

    #[test]
    fn test_rejects_non_positive_timing() {
        let config = EngineConfig {
            min_time_between_updates: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(8),
            Err(EngineError::InvalidParameter {
                name: "min_time_between_updates",
                ..
            })
        ));

        let config = EngineConfig {
            decay_rate: f32::NAN,
            ..EngineConfig::default()
        };
        assert!(config.validate(8).is_err());
    }

    #[test]
    fn test_strength_mode_toggle() {
        assert_eq!(
            StrengthMode::WinnerTakeAll.toggled(),
            StrengthMode::MultiDirection
        );
        assert_eq!(
            StrengthMode::MultiDirection.toggled(),
            StrengthMode::WinnerTakeAll
        );
    }
}
