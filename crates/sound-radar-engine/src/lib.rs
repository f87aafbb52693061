//! Directional sound intensity engine.
//!
//! Turns a multi-channel audio feed into twelve per-direction strengths
//! around the listener. Each tick:
//!
//! 1. reduces the audio drained since the last tick to one peak per channel
//!    and normalizes it ([`normalizer`]),
//! 2. evaluates the twelve directional rules ([`zones`]),
//! 3. advances each zone's peak-hold/fade state ([`state`]),
//! 4. shapes the retained peaks into display strengths ([`shaper`]).
//!
//! The engine has no device or window dependencies; it is a pure function
//! of time and audio blocks, driven by [`RadarEngine::tick`].

pub mod config;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod shaper;
pub mod state;
pub mod zones;

pub use config::{
    ChannelMapping, ChannelRole, EngineConfig, StrengthMode, FULL_SCALE_I32, MIN_CHANNELS,
};
pub use engine::{RadarEngine, Strengths, Ticker};
pub use error::EngineError;
pub use normalizer::{AudioBlock, ChannelSet, NormalizedLevels, RoleLevels};
pub use shaper::IntensityShaper;
pub use state::{Transition, Zone};
pub use zones::{ZoneKind, ZoneRule, ZONE_COUNT, ZONE_RULES};
