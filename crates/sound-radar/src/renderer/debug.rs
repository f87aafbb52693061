//! Debug overlay: per-zone numbers and engine state.

use nannou::prelude::*;
use sound_radar_engine::{RadarEngine, ZONE_COUNT};

const FONT_SIZE: u32 = 14;
const LINE_HEIGHT: f32 = 18.0;

/// Lines of text describing the engine after its latest tick
pub fn debug_lines(engine: &RadarEngine, source_name: &str) -> Vec<String> {
    let strengths = engine.strengths();
    let mut lines = vec![
        format!("source: {} ({} ch)", source_name, engine.channels()),
        format!(
            "mode: {}  global peak: {:.3}",
            engine.config().strength_mode,
            engine.global_peak()
        ),
    ];
    for (zone, state) in engine.zones().iter().enumerate() {
        lines.push(format!(
            "{:>2}  peak {:.2}  strength {:.2}{}",
            zone,
            state.retained_peak(),
            strengths.get(zone),
            if state.is_rising() { "  hold" } else { "" }
        ));
    }
    lines
}

pub fn draw(draw: &Draw, bounds: Rect, lines: &[String]) {
    let padding = 12.0;
    let width = 320.0;
    let left = bounds.left() + padding;
    let top = bounds.top() - padding;

    draw.rect()
        .x_y(left + width / 2.0, top - LINE_HEIGHT * lines.len() as f32 / 2.0)
        .w_h(width, LINE_HEIGHT * lines.len() as f32 + padding)
        .color(rgba(0.0, 0.0, 0.0, 0.7));

    for (i, line) in lines.iter().enumerate() {
        let y = top - LINE_HEIGHT * (i as f32 + 0.5);
        draw.text(line)
            .xy(pt2(left + width / 2.0, y))
            .wh(pt2(width - padding, LINE_HEIGHT))
            .left_justify()
            .color(rgba(0.6, 1.0, 0.6, 0.9))
            .font_size(FONT_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sound_radar_engine::EngineConfig;

    #[test]
    fn test_debug_lines_cover_every_zone() {
        let engine = RadarEngine::new(EngineConfig::default(), 8, 0.0).unwrap();
        let lines = debug_lines(&engine, "test");
        assert_eq!(lines.len(), 2 + ZONE_COUNT);
        assert!(lines[0].contains("test"));
        assert!(lines[1].contains("multi-direction"));
    }
}
