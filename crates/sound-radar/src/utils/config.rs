//! Configuration file management.
//!
//! Handles loading and saving user preferences to `~/.sound-radar.toml`.

use serde::{Deserialize, Serialize};
use sound_radar_engine::{ChannelMapping, EngineConfig, StrengthMode};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 3;
const DEFAULT_SIZE_MULTIPLIER: f32 = 2.0;
const DEFAULT_OPACITY_MULTIPLIER: f32 = 2.0;

/// Devices whose name contains one of these are picked automatically
pub const DEFAULT_DEVICE_KEYWORDS: &[&str] =
    &["CABLE Output", "VB-Audio Virtual Cable", "VB-Audio"];

const CONFIG_TEMPLATE: &str = r#"# sound-radar configuration file

# Timeout in seconds when opening an audio device (default: 3)
# device_timeout_secs = 3

# Last selected audio device (auto-saved)
# last_device = "Device Name"

# Substrings searched (case-insensitive) in device names when no device
# was saved or passed with --device
# device_keywords = ["CABLE Output", "VB-Audio Virtual Cable", "VB-Audio"]

# =============================================================================
# Engine timing and thresholds
# =============================================================================

# min_time_first_update = 0.5     # Hold time (s) after a rise before fading
# min_time_between_updates = 0.1  # Minimum time (s) between fade steps
# max_dif_ratio = 0.01            # Relative gap needed by gated transition zones
# min_threshold = 0.005           # Channel levels below this count as silence
# decay_rate = 2.0                # Exponential fade rate (higher = faster)
# tick_period = 0.1               # Seconds between radar updates

# "multi-direction" (several directions visible) or
# "winner-take-all" (only the dominant direction)
# strength_mode = "multi-direction"

# max_color_range = 255

# =============================================================================
# Display
# =============================================================================

# size_multiplier = 2.0           # Radar size (0.5 ~ 2.0)
# opacity_multiplier = 2.0        # Arc opacity (0.0 ~ 2.0)

# =============================================================================
# Channel mapping (zero-based physical channel per speaker role)
# =============================================================================

# [channel_mapping]
# front_left = 0
# front_right = 1
# back_left = 4
# back_right = 5
# left = 6
# right = 7
"#;

/// Display settings for the radar renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayConfig {
    pub size_multiplier: f32,
    pub opacity_multiplier: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            size_multiplier: DEFAULT_SIZE_MULTIPLIER,
            opacity_multiplier: DEFAULT_OPACITY_MULTIPLIER,
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
    pub last_device: Option<String>,
    pub device_timeout_secs: Option<u64>,
    pub device_keywords: Option<Vec<String>>,

    // Engine (flattened for simpler TOML)
    pub min_time_first_update: Option<f64>,
    pub min_time_between_updates: Option<f64>,
    pub max_dif_ratio: Option<f32>,
    pub min_threshold: Option<f32>,
    pub decay_rate: Option<f32>,
    pub tick_period: Option<f64>,
    pub strength_mode: Option<StrengthMode>,
    pub max_color_range: Option<f32>,

    // Display
    pub size_multiplier: Option<f32>,
    pub opacity_multiplier: Option<f32>,

    // Tables go last so the file serializes as valid TOML
    pub channel_mapping: Option<ChannelMapping>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".sound-radar.toml"))
    }

    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        // Create template file if it doesn't exist
        if !path.exists() {
            match fs::write(&path, CONFIG_TEMPLATE) {
                Ok(()) => info!("Created config template at {:?}", path),
                Err(e) => warn!("Could not write config template {:?}: {}", path, e),
            }
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                warn!("Could not read {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Parse TOML, falling back to defaults on malformed content
    pub fn parse(content: &str) -> Self {
        toml::from_str(content).unwrap_or_else(|e| {
            warn!("Ignoring malformed config: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) {
        let Some(path) = Self::path() else {
            return;
        };
        match toml::to_string(self) {
            Ok(content) => match fs::write(&path, &content) {
                Ok(()) => info!("Config saved to {:?}", path),
                Err(e) => warn!("Could not save config to {:?}: {}", path, e),
            },
            Err(e) => warn!("Could not serialize config: {}", e),
        }
    }

    pub fn set_device(&mut self, name: &str) {
        self.last_device = Some(name.to_string());
        self.save();
    }

    pub fn device_timeout_secs(&self) -> u64 {
        self.device_timeout_secs.unwrap_or(DEFAULT_DEVICE_TIMEOUT_SECS)
    }

    pub fn device_keywords(&self) -> Vec<String> {
        self.device_keywords.clone().unwrap_or_else(|| {
            DEFAULT_DEVICE_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect()
        })
    }

    /// Build the engine configuration, filling gaps with engine defaults
    pub fn engine(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            min_time_first_update: self
                .min_time_first_update
                .unwrap_or(defaults.min_time_first_update),
            min_time_between_updates: self
                .min_time_between_updates
                .unwrap_or(defaults.min_time_between_updates),
            max_dif_ratio: self.max_dif_ratio.unwrap_or(defaults.max_dif_ratio),
            min_threshold: self.min_threshold.unwrap_or(defaults.min_threshold),
            decay_rate: self.decay_rate.unwrap_or(defaults.decay_rate),
            tick_period: self.tick_period.unwrap_or(defaults.tick_period),
            strength_mode: self.strength_mode.unwrap_or(defaults.strength_mode),
            max_color_range: self.max_color_range.unwrap_or(defaults.max_color_range),
            mapping: self.channel_mapping.unwrap_or(defaults.mapping),
            ..defaults
        }
    }

    pub fn display(&self) -> DisplayConfig {
        DisplayConfig {
            size_multiplier: self.size_multiplier.unwrap_or(DEFAULT_SIZE_MULTIPLIER),
            opacity_multiplier: self
                .opacity_multiplier
                .unwrap_or(DEFAULT_OPACITY_MULTIPLIER),
        }
    }
}
