//! Error types for engine startup.
use thiserror::Error;

use crate::config::ChannelRole;

/// Configuration problems that prevent the engine from starting.
///
/// Ticks themselves never fail; these are only reported by
/// [`RadarEngine::new`](crate::RadarEngine::new).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The capture device exposes fewer channels than the role mapping needs
    #[error("device has {found} channels, at least {required} are required")]
    TooFewChannels { found: usize, required: usize },

    /// A role points past the last physical channel
    #[error("{role} is mapped to channel {index}, but the device only has {channels}")]
    RoleOutOfRange {
        role: ChannelRole,
        index: usize,
        channels: usize,
    },

    /// Two roles share one physical channel
    #[error("{first} and {second} are both mapped to channel {index}")]
    DuplicateRole {
        first: ChannelRole,
        second: ChannelRole,
        index: usize,
    },

    /// A numeric setting is outside its accepted range
    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
