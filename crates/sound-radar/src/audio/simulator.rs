//! Synthetic multi-channel source for running the radar without hardware.
//!
//! A single virtual sound source wanders around the listener; each speaker
//! role receives noise weighted by how closely it faces the source.

use rand::Rng;
use sound_radar_engine::{AudioBlock, ChannelMapping, ChannelRole, FULL_SCALE_I32};
use std::time::Instant;

/// Channels produced by the simulator
pub const SIM_CHANNELS: usize = 8;
/// Frames generated per simulated block
const FRAMES_PER_BLOCK: usize = 64;
/// Degrees per second the virtual source moves
const ORBIT_SPEED: f32 = 40.0;

/// Compass angle of each speaker role (0 = front, clockwise)
fn speaker_angle(role: ChannelRole) -> f32 {
    match role {
        ChannelRole::FrontLeft => -30.0,
        ChannelRole::FrontRight => 30.0,
        ChannelRole::Right => 90.0,
        ChannelRole::BackRight => 150.0,
        ChannelRole::BackLeft => -150.0,
        ChannelRole::Left => -90.0,
    }
}

/// Gain of a speaker at `speaker` degrees for a source at `source` degrees
pub fn speaker_gain(source: f32, speaker: f32) -> f32 {
    let cos = (source - speaker).to_radians().cos();
    if cos > 0.0 {
        cos * cos
    } else {
        0.0
    }
}

pub struct Simulator {
    mapping: ChannelMapping,
    angle: f32,
    /// Peak level of the virtual source (fraction of full scale)
    level: f32,
    /// Seconds the source stays silent after a burst
    quiet_for: f32,
    last: Instant,
}

impl Simulator {
    pub fn new(mapping: ChannelMapping) -> Self {
        Self {
            mapping,
            angle: 0.0,
            level: 0.3,
            quiet_for: 0.0,
            last: Instant::now(),
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Blocks "captured" since the previous call
    pub fn drain(&mut self) -> Vec<AudioBlock> {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;

        let mut rng = rand::rng();
        let step = ORBIT_SPEED * dt * rng.random_range(0.5..1.5);
        self.angle = (self.angle + step).rem_euclid(360.0);

        // occasional pauses so zones get to fade
        if self.quiet_for > 0.0 {
            self.quiet_for -= dt;
            return Vec::new();
        }
        if rng.random_bool(0.02) {
            self.quiet_for = rng.random_range(0.5..2.0);
            self.level = rng.random_range(0.05..0.5);
        }

        let gains: Vec<(usize, f32)> = ChannelRole::ALL
            .iter()
            .map(|&role| {
                (
                    self.mapping.index(role),
                    speaker_gain(self.angle, speaker_angle(role)),
                )
            })
            .collect();

        let mut samples = vec![0i32; FRAMES_PER_BLOCK * SIM_CHANNELS];
        for frame in samples.chunks_exact_mut(SIM_CHANNELS) {
            for &(channel, gain) in &gains {
                if let Some(sample) = frame.get_mut(channel) {
                    let noise: f32 = rng.random_range(-1.0..1.0);
                    *sample = ((noise * gain * self.level) as f64 * FULL_SCALE_I32) as i32;
                }
            }
        }

        vec![AudioBlock::new(SIM_CHANNELS, samples)]
    }
}
