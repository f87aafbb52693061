mod simulator;
mod source_pipe;

pub use simulator::{Simulator, SIM_CHANNELS};
pub use source_pipe::SourcePipe;

use sound_radar_engine::AudioBlock;

use crate::utils::Config;

/// Where the radar gets its audio blocks from
pub enum AudioSource {
    Device(SourcePipe),
    Simulated(Simulator),
}

impl AudioSource {
    pub fn channels(&self) -> usize {
        match self {
            AudioSource::Device(pipe) => pipe.channels(),
            AudioSource::Simulated(_) => SIM_CHANNELS,
        }
    }

    pub fn name(&self) -> String {
        match self {
            AudioSource::Device(pipe) => pipe.device_name().to_string(),
            AudioSource::Simulated(sim) => format!("simulated ({:.0} deg)", sim.angle()),
        }
    }

    /// All blocks that arrived since the last call
    pub fn drain(&mut self) -> Vec<AudioBlock> {
        match self {
            AudioSource::Device(pipe) => pipe.drain(),
            AudioSource::Simulated(sim) => sim.drain(),
        }
    }

    /// Move to the next usable capture device; the simulator has none
    pub fn next_device(&mut self, config: &Config) -> Option<(String, usize)> {
        match self {
            AudioSource::Device(pipe) => pipe.next_device(config),
            AudioSource::Simulated(_) => None,
        }
    }
}
