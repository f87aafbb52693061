mod audio;
mod renderer;
mod ui;
mod utils;

use audio::{AudioSource, Simulator, SourcePipe};
use nannou::prelude::*;
use renderer::{overlay_background, Radar};
use sound_radar_engine::{EngineConfig, RadarEngine, Ticker};
use std::env;
use std::time::Instant;
use tracing::{error, info, warn};
use ui::bindings::{parse_key, Action};
use utils::Config;

fn main() {
    utils::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--list-devices".to_string()) {
        SourcePipe::list_devices();
        return;
    }

    nannou::app(model).update(update).run();
}

struct Model {
    source: AudioSource,
    engine: RadarEngine,
    ticker: Ticker,
    radar: Radar,
    config: Config,
    /// Monotonic reference for engine timestamps
    start: Instant,
    show_debug: bool,
    debug_lines: Vec<String>,
}

impl Model {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Replace the engine, e.g. after a device or mode change. Zone state
    /// starts over.
    fn restart_engine(&mut self, engine_config: EngineConfig) {
        let now = self.now();
        match RadarEngine::new(engine_config, self.source.channels(), now) {
            Ok(engine) => {
                self.ticker = Ticker::new(engine.config().tick_period, now);
                self.radar.set_color_range(engine.config().max_color_range);
                self.engine = engine;
            }
            Err(e) => error!("Keeping previous engine: {}", e),
        }
    }
}

/// Value following `flag` on the command line
fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn model(app: &App) -> Model {
    let args: Vec<String> = env::args().collect();
    let simulate = args.contains(&"--simulate".to_string());
    let show_debug = args.contains(&"--debug".to_string()) || args.contains(&"-d".to_string());

    // frameless see-through overlay that stays above other windows
    app.new_window()
        .title("sound-radar")
        .size(500, 500)
        .decorations(false)
        .transparent(true)
        .always_on_top(true)
        .view(view)
        .key_pressed(key_pressed)
        .build()
        .unwrap();

    let mut config = Config::load();
    let engine_config = config.engine();

    let source = if simulate {
        info!("Using simulated 8-channel source");
        AudioSource::Simulated(Simulator::new(engine_config.mapping))
    } else {
        match SourcePipe::open(arg_value(&args, "--device"), &config) {
            Ok(pipe) => {
                if config.last_device.as_deref() != Some(pipe.device_name()) {
                    config.set_device(pipe.device_name());
                }
                AudioSource::Device(pipe)
            }
            Err(e) => {
                error!("Audio capture failed: {}", e);
                SourcePipe::list_devices();
                std::process::exit(1);
            }
        }
    };

    let start = Instant::now();
    let engine = match RadarEngine::new(engine_config, source.channels(), 0.0) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Cannot start radar on {}: {}", source.name(), e);
            std::process::exit(1);
        }
    };

    Model {
        ticker: Ticker::new(engine.config().tick_period, 0.0),
        radar: Radar::new(config.display(), engine.config().max_color_range),
        source,
        engine,
        config,
        start,
        show_debug,
        debug_lines: Vec::new(),
    }
}

fn update(_app: &App, model: &mut Model, _update: Update) {
    let now = model.now();
    if !model.ticker.poll(now) {
        return;
    }

    let blocks = model.source.drain();
    let strengths = model.engine.tick(now, blocks.iter());
    model
        .radar
        .update(strengths.scaled(model.engine.config().max_color_range));

    if model.show_debug {
        model.debug_lines = renderer::debug::debug_lines(&model.engine, &model.source.name());
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let bounds = app.window_rect();

    draw.background().color(overlay_background());
    model.radar.draw(&draw, bounds);

    if model.show_debug {
        renderer::debug::draw(&draw, bounds, &model.debug_lines);
    }

    draw.to_frame(app, &frame).unwrap();
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match parse_key(key) {
        Some(Action::Quit) => app.quit(),
        Some(Action::ToggleDebug) => model.show_debug = !model.show_debug,
        Some(Action::ToggleStrengthMode) => {
            let mut engine_config = model.engine.config().clone();
            engine_config.strength_mode = engine_config.strength_mode.toggled();
            info!("Strength mode: {}", engine_config.strength_mode);
            model.restart_engine(engine_config);
        }
        Some(Action::NextDevice) => match model.source.next_device(&model.config) {
            Some((name, _channels)) => {
                model.config.set_device(&name);
                let engine_config = model.engine.config().clone();
                model.restart_engine(engine_config);
            }
            None => warn!("No other usable capture device"),
        },
        None => {}
    }
}
