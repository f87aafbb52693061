//! Audio device capture and stream management.
//!
//! Opens a multi-channel input device with cpal and forwards every callback
//! buffer as one [`AudioBlock`] over an unbounded channel. The radar tick
//! drains the channel without blocking.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, SupportedStreamConfig};
use crossbeam_channel::{unbounded, Receiver, Sender};
use sound_radar_engine::{AudioBlock, FULL_SCALE_I32, MIN_CHANNELS};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::utils::Config;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("no audio input device found")]
    NoDevice,

    #[error("could not read config of {name}: {reason}")]
    Config { name: String, reason: String },

    #[error("unsupported sample format {0:?}")]
    UnsupportedFormat(SampleFormat),

    #[error("failed to build stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("failed to start stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

pub struct DeviceInfo {
    pub device: Device,
    pub name: String,
    pub channels: usize,
}

pub struct SourcePipe {
    sender: Sender<AudioBlock>,
    receiver: Receiver<AudioBlock>,
    devices: Vec<DeviceInfo>,
    current_device: usize,
    channels: usize,
    _stream: Stream,
}

impl SourcePipe {
    /// Open the preferred device, or the first one found by the lookup order:
    /// `preferred` substring, saved device, configured keywords, host default.
    pub fn open(preferred: Option<&str>, config: &Config) -> Result<Self, CaptureError> {
        let devices = Self::collect_devices();
        let index =
            Self::choose_device(&devices, preferred, config).ok_or(CaptureError::NoDevice)?;

        let (sender, receiver) = unbounded();
        let timeout = Duration::from_secs(config.device_timeout_secs());
        let (stream, channels) = Self::build_stream(&devices[index], sender.clone(), timeout)?;
        info!(
            "[{}] Selected: {} ({} channels)",
            index, devices[index].name, channels
        );

        Ok(Self {
            sender,
            receiver,
            devices,
            current_device: index,
            channels,
            _stream: stream,
        })
    }

    pub fn list_devices() {
        println!("\n=== Audio Input Devices ===");
        for (idx, info) in Self::collect_devices().iter().enumerate() {
            let marker = if info.channels >= MIN_CHANNELS {
                ""
            } else {
                "  (too few channels)"
            };
            println!("  [{}] {} - {} ch{}", idx, info.name, info.channels, marker);
        }
        println!("Use --device <name> to pick one, or n to cycle while running\n");
    }

    fn collect_devices() -> Vec<DeviceInfo> {
        let host = cpal::default_host();
        let mut devices = Vec::new();

        if let Ok(input_devices) = host.input_devices() {
            for device in input_devices {
                let Ok(name) = device.name() else { continue };
                let channels = device
                    .default_input_config()
                    .map(|c| c.channels() as usize)
                    .unwrap_or(0);
                devices.push(DeviceInfo {
                    device,
                    name,
                    channels,
                });
            }
        }

        devices
    }

    fn choose_device(
        devices: &[DeviceInfo],
        preferred: Option<&str>,
        config: &Config,
    ) -> Option<usize> {
        let find = |needle: &str| {
            let needle = needle.to_lowercase();
            devices
                .iter()
                .position(|d| d.channels > 0 && d.name.to_lowercase().contains(&needle))
        };

        preferred
            .and_then(|p| find(p))
            .or_else(|| {
                let name = config.last_device.as_deref()?;
                devices.iter().position(|d| d.name == name)
            })
            .or_else(|| {
                config
                    .device_keywords()
                    .iter()
                    .find_map(|k| find(k.as_str()))
            })
            .or_else(|| {
                let host = cpal::default_host();
                let default_name = host.default_input_device().and_then(|d| d.name().ok())?;
                devices.iter().position(|d| d.name == default_name)
            })
    }

    /// Get device config with timeout (the config call often hangs on bad devices)
    fn config_with_timeout(
        info: &DeviceInfo,
        timeout: Duration,
    ) -> Result<SupportedStreamConfig, CaptureError> {
        let device = info.device.clone();
        let (tx, rx) = crossbeam_channel::bounded(1);

        std::thread::spawn(move || {
            let _ = tx.send(device.default_input_config());
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(config)) => Ok(config),
            Ok(Err(e)) => Err(CaptureError::Config {
                name: info.name.clone(),
                reason: e.to_string(),
            }),
            Err(_) => Err(CaptureError::Config {
                name: info.name.clone(),
                reason: format!("timed out after {:?}", timeout),
            }),
        }
    }

    fn build_stream(
        info: &DeviceInfo,
        sender: Sender<AudioBlock>,
        timeout: Duration,
    ) -> Result<(Stream, usize), CaptureError> {
        let supported = Self::config_with_timeout(info, timeout)?;
        let format = supported.sample_format();
        let stream_config = supported.config();
        let channels = stream_config.channels as usize;

        let err_fn = |err| warn!("Audio stream error: {}", err);

        let stream = match format {
            SampleFormat::I32 => info.device.build_input_stream(
                &stream_config,
                move |data: &[i32], _: &cpal::InputCallbackInfo| {
                    let _ = sender.send(AudioBlock::new(channels, data.to_vec()));
                },
                err_fn,
                None,
            )?,
            SampleFormat::I16 => info.device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let samples = data.iter().map(|&s| (s as i32) << 16).collect();
                    let _ = sender.send(AudioBlock::new(channels, samples));
                },
                err_fn,
                None,
            )?,
            SampleFormat::F32 => info.device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples = data.iter().map(|&s| float_to_i32(s)).collect();
                    let _ = sender.send(AudioBlock::new(channels, samples));
                },
                err_fn,
                None,
            )?,
            other => return Err(CaptureError::UnsupportedFormat(other)),
        };

        stream.play()?;
        Ok((stream, channels))
    }

    /// Switch to the next device that has enough channels for the radar.
    /// Returns the new device name and channel count.
    pub fn next_device(&mut self, config: &Config) -> Option<(String, usize)> {
        let count = self.devices.len();
        let timeout = Duration::from_secs(config.device_timeout_secs());

        for step in 1..count {
            let index = (self.current_device + step) % count;
            let info = &self.devices[index];
            if info.channels < MIN_CHANNELS {
                continue;
            }

            let name = info.name.clone();
            info!("[{}] Selecting: {}", index, name);
            match Self::build_stream(info, self.sender.clone(), timeout) {
                Ok((stream, channels)) => {
                    self._stream = stream;
                    // drop blocks captured from the previous device
                    self.drain();
                    self.current_device = index;
                    self.channels = channels;
                    return Some((name, channels));
                }
                Err(e) => warn!("  -> {}", e),
            }
        }
        None
    }

    pub fn device_name(&self) -> &str {
        &self.devices[self.current_device].name
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Every block captured since the previous call; never blocks
    pub fn drain(&self) -> Vec<AudioBlock> {
        self.receiver.try_iter().collect()
    }
}

/// Convert a float sample in [-1, 1] to signed 32-bit full scale
pub fn float_to_i32(sample: f32) -> i32 {
    // float-to-int `as` saturates
    (sample as f64 * FULL_SCALE_I32) as i32
}
