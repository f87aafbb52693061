use proptest::prelude::*;
use sound_radar_engine::{
    AudioBlock, ChannelRole, EngineConfig, IntensityShaper, RadarEngine, RoleLevels,
    StrengthMode, ZONE_COUNT,
};

const TICK: f64 = 0.1;

fn engine(mode: StrengthMode) -> RadarEngine {
    let config = EngineConfig {
        strength_mode: mode,
        full_scale: 1000.0,
        ..EngineConfig::default()
    };
    RadarEngine::new(config, 8, 0.0).unwrap()
}

/// One block where only `channel` carries `level` (fraction of 1000)
fn block_on(channel: usize, level: f32) -> AudioBlock {
    let mut frame = [0i32; 8];
    frame[channel] = (level * 1000.0) as i32;
    AudioBlock::from_frames([frame, [0; 8]])
}

#[test]
fn test_right_source_lights_right_side() {
    let mut engine = engine(StrengthMode::MultiDirection);
    let levels = RoleLevels::new().with(ChannelRole::Right, 0.4);

    let strengths = engine.tick_levels(TICK, &levels);

    for zone in 0..ZONE_COUNT {
        let z = &engine.zones()[zone];
        if (2..=4).contains(&zone) {
            assert_eq!(z.retained_peak(), 1.0, "zone {}", zone);
            assert!(z.is_rising(), "zone {}", zone);
            assert_eq!(strengths.get(zone), 1.0);
        } else {
            assert_eq!(z.retained_peak(), 0.0, "zone {}", zone);
            assert_eq!(strengths.get(zone), 0.0);
        }
    }
}

#[test]
fn test_audio_blocks_flow_through_mapping() {
    let mut engine = engine(StrengthMode::MultiDirection);
    // channel 6 is the left speaker in the default mapping
    let blocks = [block_on(6, 0.3), block_on(6, 0.1)];

    let strengths = engine.tick(TICK, blocks.iter());

    assert_eq!(strengths.get(9), 1.0);
    assert_eq!(strengths.get(8), 1.0);
    assert_eq!(strengths.get(10), 1.0);
    assert_eq!(strengths.get(3), 0.0);
}

#[test]
fn test_front_pair_lights_front_only() {
    let mut engine = engine(StrengthMode::MultiDirection);
    let blocks = [AudioBlock::from_frames([[400, 400, 0, 0, 0, 0, 0, 0]])];

    let strengths = engine.tick(TICK, blocks.iter());

    assert_eq!(strengths.get(0), 1.0);
    // symmetric pair keeps both gated front transitions closed
    assert_eq!(strengths.get(1), 0.0);
    assert_eq!(strengths.get(11), 0.0);
}

#[test]
fn test_silence_holds_then_fades_to_zero() {
    let mut engine = engine(StrengthMode::MultiDirection);
    let levels = RoleLevels::new().with(ChannelRole::Left, 0.5);
    engine.tick_levels(0.1, &levels);

    // hold window: nothing changes for 0.5s after the rise
    for now in [0.2, 0.3, 0.4, 0.5] {
        let strengths = engine.tick(now, std::iter::empty());
        assert_eq!(strengths.get(9), 1.0);
        assert!(engine.zones()[9].is_rising());
    }

    // first decay lands once the hold window has passed
    let strengths = engine.tick(0.65, std::iter::empty());
    assert!(strengths.get(9) < 1.0);
    assert!(!engine.zones()[9].is_rising());

    // e^(-2t) drops below the snap level within a few seconds
    let mut now = 0.65;
    for _ in 0..40 {
        now += TICK;
        engine.tick(now, std::iter::empty());
    }
    assert_eq!(engine.zones()[9].retained_peak(), 0.0);
    assert_eq!(engine.strengths().get(9), 0.0);
}

#[test]
fn test_new_rise_supersedes_fade() {
    let mut engine = engine(StrengthMode::MultiDirection);
    let levels = RoleLevels::new().with(ChannelRole::Left, 0.5);
    engine.tick_levels(TICK, &levels);

    let mut now = TICK;
    for _ in 0..8 {
        now += TICK;
        engine.tick(now, std::iter::empty());
    }
    let faded = engine.zones()[9].retained_peak();
    assert!(faded < 1.0 && faded > 0.0);

    now += TICK;
    engine.tick_levels(now, &levels);
    assert_eq!(engine.zones()[9].retained_peak(), 1.0);
    assert!(engine.zones()[9].is_rising());
}

#[test]
fn test_winner_take_all_picks_dominant_direction() {
    let mut engine = engine(StrengthMode::WinnerTakeAll);
    let levels = RoleLevels::new().with(ChannelRole::BackLeft, 0.6);

    let strengths = engine.tick_levels(TICK, &levels);

    // back-left alone only reaches the back average; both back gates see a silent side
    let (zone, strength) = strengths.strongest().unwrap();
    assert_eq!(zone, 6);
    assert!(strength > 0.99);
    assert!(engine.global_peak() >= 1e-3);
}

#[test]
fn test_winner_take_all_shapes_zones_in_ascending_order() {
    let mut engine = engine(StrengthMode::WinnerTakeAll);

    // right side rises, then has faded by the time the left side rises
    engine.tick_levels(0.1, &RoleLevels::new().with(ChannelRole::Right, 0.4));
    let strengths = engine.tick_levels(0.7, &RoleLevels::new().with(ChannelRole::Left, 0.4));

    let faded = (-2.0f64 * 0.6).exp() as f32;
    for zone in 2..=4 {
        assert!((engine.zones()[zone].retained_peak() - faded).abs() < 1e-5);
    }
    for zone in 8..=10 {
        assert_eq!(engine.zones()[zone].retained_peak(), 1.0);
        assert!(strengths.get(zone) > 0.99);
    }

    // the weaker right zones are shaped before the louder left ones, so the
    // shared peak has only decayed down to them and they still show
    assert!((strengths.get(2) - 0.6595).abs() < 1e-3, "got {}", strengths.get(2));
    assert!((strengths.get(3) - 0.8995).abs() < 1e-3, "got {}", strengths.get(3));
    assert!(strengths.get(4) > 0.99, "got {}", strengths.get(4));

    // shaped in the opposite order the louder zones would hide them
    let mut reversed = IntensityShaper::new(StrengthMode::WinnerTakeAll);
    let mut reversed_strengths = [0.0; ZONE_COUNT];
    for zone in (0..ZONE_COUNT).rev() {
        reversed_strengths[zone] = reversed.shape(engine.zones()[zone].retained_peak());
    }
    assert_eq!(reversed_strengths[4], 0.0);
    assert_eq!(reversed_strengths[3], 0.0);
    assert_eq!(reversed_strengths[2], 0.0);
}

#[test]
fn test_scaled_output_uses_color_range() {
    let mut engine = engine(StrengthMode::MultiDirection);
    let levels = RoleLevels::new().with(ChannelRole::Right, 0.4);
    let strengths = engine.tick_levels(TICK, &levels);
    let scaled = strengths.scaled(engine.config().max_color_range);
    assert_eq!(scaled[3], 255.0);
    assert_eq!(scaled[0], 0.0);
}

fn arb_block() -> impl Strategy<Value = AudioBlock> {
    prop::collection::vec(any::<i32>(), 8..64).prop_map(|samples| AudioBlock::new(8, samples))
}

proptest! {
    #[test]
    fn retained_peaks_and_strengths_stay_in_unit_range(
        ticks in prop::collection::vec(prop::collection::vec(arb_block(), 0..3), 1..40),
        winner in any::<bool>(),
    ) {
        let mode = if winner { StrengthMode::WinnerTakeAll } else { StrengthMode::MultiDirection };
        let config = EngineConfig { strength_mode: mode, ..EngineConfig::default() };
        let mut engine = RadarEngine::new(config, 8, 0.0).unwrap();

        for (i, blocks) in ticks.iter().enumerate() {
            let now = (i + 1) as f64 * TICK;
            let strengths = engine.tick(now, blocks.iter());
            for zone in engine.zones() {
                prop_assert!((0.0..=1.0).contains(&zone.retained_peak()));
            }
            for (_, s) in strengths.iter() {
                prop_assert!((0.0..=1.0).contains(&s));
            }
            prop_assert!(engine.global_peak() >= 1e-3);
        }
    }
}
