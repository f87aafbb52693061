//! Tick driver tying normalization, zone rules, zone state and shaping
//! together.

use tracing::{debug, info, trace};

use crate::config::{ChannelRole, EngineConfig};
use crate::error::EngineError;
use crate::normalizer::{AudioBlock, ChannelSet, RoleLevels};
use crate::shaper::IntensityShaper;
use crate::state::{Transition, Zone};
use crate::zones::{evaluate_all, ZONE_COUNT};

/// Display strength of every zone for one tick, each in [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Strengths([f32; ZONE_COUNT]);

impl Strengths {
    pub fn values(&self) -> &[f32; ZONE_COUNT] {
        &self.0
    }

    pub fn get(&self, zone: usize) -> f32 {
        self.0.get(zone).copied().unwrap_or(0.0)
    }

    /// Strengths multiplied by the renderer's display range
    pub fn scaled(&self, max_color_range: f32) -> [f32; ZONE_COUNT] {
        self.0.map(|s| s * max_color_range)
    }

    /// `(zone, strength)` pairs in zone order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.0.iter().copied().enumerate()
    }

    /// Loudest zone, if any is non-zero
    pub fn strongest(&self) -> Option<(usize, f32)> {
        self.iter()
            .filter(|&(_, s)| s > 0.0)
            .fold(None, |best, (zone, s)| match best {
                Some((_, b)) if b >= s => best,
                _ => Some((zone, s)),
            })
    }
}

/// The directional sound intensity engine.
///
/// Owns the twelve zones and the shaper. Every call to [`tick`](Self::tick)
/// runs to completion before returning; callers must not tick faster than
/// once per `tick_period` (see [`Ticker`]).
pub struct RadarEngine {
    config: EngineConfig,
    channels: usize,
    zones: [Zone; ZONE_COUNT],
    shaper: IntensityShaper,
    strengths: Strengths,
}

impl RadarEngine {
    /// Start an engine for a device with `channels` inputs at time `now`
    /// (seconds on any monotonic clock).
    pub fn new(config: EngineConfig, channels: usize, now: f64) -> Result<Self, EngineError> {
        config.validate(channels)?;

        info!(
            "Radar engine started: {} channels, {} mode, mapping FL={} FR={} L={} R={} BL={} BR={}",
            channels,
            config.strength_mode,
            config.mapping.front_left,
            config.mapping.front_right,
            config.mapping.left,
            config.mapping.right,
            config.mapping.back_left,
            config.mapping.back_right,
        );

        Ok(Self {
            shaper: IntensityShaper::new(config.strength_mode),
            config,
            channels,
            zones: [Zone::new(now); ZONE_COUNT],
            strengths: Strengths::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn zones(&self) -> &[Zone; ZONE_COUNT] {
        &self.zones
    }

    pub fn global_peak(&self) -> f32 {
        self.shaper.global_peak()
    }

    /// Strengths produced by the most recent tick
    pub fn strengths(&self) -> Strengths {
        self.strengths
    }

    /// Run one tick over every block drained since the previous tick.
    ///
    /// An empty iterator is the normal idle case: levels read as silence and
    /// zones keep fading.
    pub fn tick<'a, I>(&mut self, now: f64, blocks: I) -> Strengths
    where
        I: IntoIterator<Item = &'a AudioBlock>,
    {
        let mut count = 0usize;
        let set = ChannelSet::from_blocks(
            self.channels,
            self.config.full_scale,
            blocks.into_iter().inspect(|_| count += 1),
        );
        trace!("Drained {} audio blocks", count);
        self.tick_channels(now, &set)
    }

    /// Run one tick from already reduced per-channel peaks
    pub fn tick_channels(&mut self, now: f64, set: &ChannelSet) -> Strengths {
        let levels = set
            .normalize(self.config.min_threshold)
            .roles(&self.config.mapping);
        self.tick_levels(now, &levels)
    }

    /// Run one tick from normalized role levels
    pub fn tick_levels(&mut self, now: f64, levels: &RoleLevels) -> Strengths {
        debug!(
            "levels {}",
            ChannelRole::ALL
                .iter()
                .map(|&r| format!("{}={:.1}", r.label(), levels.get(r) * 100.0))
                .collect::<Vec<_>>()
                .join(" ")
        );

        let signals = evaluate_all(levels, self.config.max_dif_ratio);

        let mut strengths = [0.0; ZONE_COUNT];
        for (i, zone) in self.zones.iter_mut().enumerate() {
            let transition = zone.update(signals[i], now, &self.config);
            if transition == Transition::Rise {
                trace!("zone {} rose to {:.3}", i, zone.retained_peak());
            }
            strengths[i] = self.shaper.shape(zone.retained_peak());
        }

        debug!(
            "peaks {:?}",
            self.zones
                .iter()
                .map(|z| (z.retained_peak() * 100.0).round() / 100.0)
                .collect::<Vec<_>>()
        );

        self.strengths = Strengths(strengths);
        self.strengths
    }
}

/// Fixed-period tick scheduler.
///
/// Fires at most once per poll and never queues missed periods, so a late
/// caller gets one tick rather than a burst.
#[derive(Clone, Copy, Debug)]
pub struct Ticker {
    period: f64,
    last: f64,
}

impl Ticker {
    pub fn new(period: f64, now: f64) -> Self {
        Self { period, last: now }
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// True if a tick is due at `now`; marks it as taken.
    pub fn poll(&mut self, now: f64) -> bool {
        if now - self.last >= self.period {
            self.last = now;
            true
        } else {
            false
        }
    }
}
