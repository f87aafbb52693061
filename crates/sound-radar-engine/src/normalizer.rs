//! Per-channel level extraction and normalization.
//!
//! Each tick reduces every audio block that arrived since the previous tick
//! to one peak per channel, scales it by the capture full scale and runs it
//! through a zeroing threshold plus a compressive exponential curve.

use crate::config::{ChannelMapping, ChannelRole};

/// Steepness of the compressive curve `1 - e^(-k x)`
const COMPRESSION: f32 = 5.0;

/// One interleaved block of signed capture samples (frames x channels)
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBlock {
    channels: usize,
    samples: Vec<i32>,
}

impl AudioBlock {
    /// `samples` is interleaved; a trailing partial frame is ignored.
    pub fn new(channels: usize, samples: Vec<i32>) -> Self {
        Self { channels, samples }
    }

    /// Build a block from one sample per channel per frame
    pub fn from_frames<I>(frames: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<[i32]>,
    {
        let mut channels = 0;
        let mut samples = Vec::new();
        for frame in frames {
            let frame = frame.as_ref();
            channels = frame.len();
            samples.extend_from_slice(frame);
        }
        Self { channels, samples }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }

    /// Complete frames; a block without channels has none
    pub fn frames(&self) -> impl Iterator<Item = &[i32]> {
        let usable = if self.channels == 0 {
            0
        } else {
            self.samples.len()
        };
        // chunks_exact panics on 0
        self.samples[..usable].chunks_exact(self.channels.max(1))
    }
}

/// Raw per-channel peaks for one tick, as a fraction of full scale.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSet {
    peaks: Vec<f32>,
}

impl ChannelSet {
    /// All-silent set, used when nothing arrived since the last tick
    pub fn silent(channels: usize) -> Self {
        Self {
            peaks: vec![0.0; channels],
        }
    }

    pub fn from_peaks(peaks: Vec<f32>) -> Self {
        Self { peaks }
    }

    /// Per-channel maximum across every block, floored at zero.
    ///
    /// Channels a block does not carry stay at zero, extra channels in a
    /// block are ignored.
    pub fn from_blocks<'a, I>(channels: usize, full_scale: f64, blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a AudioBlock>,
    {
        let mut maxima = vec![0i64; channels];
        for block in blocks {
            for frame in block.frames() {
                for (max, &sample) in maxima.iter_mut().zip(frame) {
                    *max = (*max).max(sample as i64);
                }
            }
        }

        let peaks = maxima
            .into_iter()
            .map(|m| (m as f64 / full_scale) as f32)
            .collect();
        Self { peaks }
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn peaks(&self) -> &[f32] {
        &self.peaks
    }

    /// Apply threshold + compression to every channel
    pub fn normalize(&self, min_threshold: f32) -> NormalizedLevels {
        NormalizedLevels {
            levels: self
                .peaks
                .iter()
                .map(|&x| normalize_level(x, min_threshold))
                .collect(),
        }
    }
}

/// Zero `x` below `min_threshold`, otherwise compress it with `1 - e^(-5x)`.
///
/// NaN counts as below threshold.
pub fn normalize_level(x: f32, min_threshold: f32) -> f32 {
    if !(x >= min_threshold) {
        return 0.0;
    }
    let level = 1.0 - (-COMPRESSION * x).exp();
    if level.is_finite() {
        level.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedLevels {
    levels: Vec<f32>,
}

impl NormalizedLevels {
    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    /// Pick out the six role levels; unmapped channels are dropped here.
    pub fn roles(&self, mapping: &ChannelMapping) -> RoleLevels {
        let mut values = [0.0; 6];
        for (value, &role) in values.iter_mut().zip(ChannelRole::ALL.iter()) {
            *value = self.levels.get(mapping.index(role)).copied().unwrap_or(0.0);
        }
        RoleLevels(values)
    }
}

/// Normalized level of each [`ChannelRole`] for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoleLevels([f32; 6]);

impl RoleLevels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: ChannelRole, level: f32) -> Self {
        self.set(role, level);
        self
    }

    pub fn set(&mut self, role: ChannelRole, level: f32) {
        self.0[slot(role)] = level;
    }

    pub fn get(&self, role: ChannelRole) -> f32 {
        self.0[slot(role)]
    }
}

fn slot(role: ChannelRole) -> usize {
    match role {
        ChannelRole::FrontLeft => 0,
        ChannelRole::FrontRight => 1,
        ChannelRole::Left => 2,
        ChannelRole::Right => 3,
        ChannelRole::BackLeft => 4,
        ChannelRole::BackRight => 5,
    }
}
