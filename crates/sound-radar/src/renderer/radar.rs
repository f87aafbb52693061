//! Radar arcs, one per zone.
//!
//! Each zone is drawn as a 30 degree arc around the window centre. Its
//! strength pushes the arc outward, thickens it and walks it up a
//! green-yellow-orange ramp.

use nannou::color::Rgba8;
use nannou::prelude::*;
use sound_radar_engine::zones::{zone_center_degrees, ZONE_SPAN_DEGREES};
use sound_radar_engine::ZONE_COUNT;

use crate::utils::DisplayConfig;

/// Arc radius at zero and full strength, as a share of the shorter window
/// side (before the size multiplier)
const MIN_RADIUS: f32 = 0.18;
const MAX_RADIUS: f32 = 0.40;
/// Stroke weight at zero and full strength
const MIN_WEIGHT: f32 = 2.0;
const MAX_WEIGHT: f32 = 12.0;
/// Points along each arc
const ARC_POINTS: usize = 20;

/// Fully transparent clear colour so only the arcs show on the desktop
pub fn overlay_background() -> Rgba {
    rgba(0.0, 0.0, 0.0, 0.0)
}

pub struct Radar {
    display: DisplayConfig,
    /// Zone levels as handed over by the engine (strength x color range)
    levels: [f32; ZONE_COUNT],
    color_range: f32,
}

impl Radar {
    pub fn new(display: DisplayConfig, color_range: f32) -> Self {
        Self {
            display,
            levels: [0.0; ZONE_COUNT],
            color_range,
        }
    }

    pub fn update(&mut self, levels: [f32; ZONE_COUNT]) {
        self.levels = levels;
    }

    pub fn set_color_range(&mut self, color_range: f32) {
        self.color_range = color_range;
    }

    /// Level of `zone` mapped back to [0, 1]
    pub fn strength(&self, zone: usize) -> f32 {
        let level = self.levels.get(zone).copied().unwrap_or(0.0);
        unit_strength(level, self.color_range)
    }

    pub fn draw(&self, draw: &Draw, bounds: Rect) {
        let short_side = bounds.w().min(bounds.h());
        let center = bounds.xy();

        for zone in 0..ZONE_COUNT {
            let strength = self.strength(zone);
            let radius = short_side
                * (MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * strength)
                * self.display.size_multiplier;
            let weight = MIN_WEIGHT + (MAX_WEIGHT - MIN_WEIGHT) * strength;

            let points = arc_points(center, radius, zone);
            draw.polyline()
                .weight(weight)
                .caps_round()
                .points(points)
                .color(strength_color(strength, self.display.opacity_multiplier));
        }
    }
}

fn unit_strength(level: f32, color_range: f32) -> f32 {
    if color_range > 0.0 && level.is_finite() {
        (level / color_range).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Points of the arc for `zone`, clockwise from the front (screen top)
fn arc_points(center: Vec2, radius: f32, zone: usize) -> Vec<Vec2> {
    let start = zone_center_degrees(zone % ZONE_COUNT) - ZONE_SPAN_DEGREES / 2.0;
    (0..=ARC_POINTS)
        .map(|i| {
            let compass = start + ZONE_SPAN_DEGREES * i as f32 / ARC_POINTS as f32;
            // compass runs clockwise from +y, nannou angles counter-clockwise from +x
            let angle = (90.0 - compass).to_radians();
            pt2(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Colour ramp: faint light green, green, yellow, orange-red
fn strength_color(strength: f32, opacity_multiplier: f32) -> Rgba8 {
    let (r, g, b, alpha) = if strength < 0.25 {
        (60, 200, 60, 40.0)
    } else if strength < 0.5 {
        (40, 255, 80, 90.0)
    } else if strength < 0.75 {
        (255, 220, 60, 150.0)
    } else {
        (255, 120, 40, 220.0)
    };
    let alpha = (alpha * opacity_multiplier).clamp(0.0, 255.0) as u8;
    rgba8(r, g, b, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_arc_is_centered_on_top() {
        let points = arc_points(Vec2::ZERO, 100.0, 0);
        let mid = points[ARC_POINTS / 2];
        assert!(mid.x.abs() < 1e-3);
        assert!((mid.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_right_arc_is_on_the_right() {
        let points = arc_points(Vec2::ZERO, 100.0, 3);
        let mid = points[ARC_POINTS / 2];
        assert!((mid.x - 100.0).abs() < 1e-3);
        assert!(mid.y.abs() < 1e-3);
    }

    #[test]
    fn test_levels_are_read_against_color_range() {
        let mut radar = Radar::new(DisplayConfig::default(), 100.0);
        let mut levels = [0.0; ZONE_COUNT];
        levels[3] = 50.0;
        levels[6] = 400.0;
        radar.update(levels);
        assert_eq!(radar.strength(3), 0.5);
        assert_eq!(radar.strength(6), 1.0);
        assert_eq!(radar.strength(0), 0.0);

        // the same engine levels at full 255 range
        radar.set_color_range(255.0);
        levels[3] = 255.0;
        radar.update(levels);
        assert_eq!(radar.strength(3), 1.0);
    }

    #[test]
    fn test_overlay_background_is_transparent() {
        assert_eq!(overlay_background().alpha, 0.0);
    }

    #[test]
    fn test_color_ramp_and_opacity_clamp() {
        let faint = strength_color(0.1, 2.0);
        assert_eq!((faint.red, faint.green, faint.blue, faint.alpha), (60, 200, 60, 80));
        let loud = strength_color(0.9, 2.0);
        assert_eq!(loud.alpha, 255);
        assert_eq!(loud.red, 255);
    }
}
