// SPDX-License-Identifier: MPL-2.0
//! Audio output through the default cpal device.

use super::Volume;
use crate::error::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub type AudioSamples = Arc<Vec<f32>>;

/// Sample format the decoders produce for the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioOutputConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug)]
pub enum AudioOutputCommand {
    Play(AudioSamples),
    Pause,
    Resume,
    /// Drops queued samples, used on seek.
    ClearBuffer,
    SetVolume(Volume),
    Stop,
}

/// State read by the device callback.
struct SharedState {
    volume_bits: AtomicU32,
    paused: AtomicBool,
}

impl SharedState {
    fn new(volume: Volume) -> Self {
        Self {
            volume_bits: AtomicU32::new(volume.value().to_bits()),
            paused: AtomicBool::new(false),
        }
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    fn set_volume(&self, volume: Volume) {
        self.volume_bits
            .store(volume.value().to_bits(), Ordering::Relaxed);
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    /// Gain to apply, `None` when the output must stay silent.
    fn gain(&self) -> Option<f32> {
        let volume = self.volume();
        (!self.is_paused() && volume > 0.0).then_some(volume)
    }
}

/// Fills `data` from the front of `queue`, silence past its end.
fn fill_output<T: cpal::SizedSample + cpal::FromSample<f32>>(
    data: &mut [T],
    queue: &mut Vec<f32>,
    gain: Option<f32>,
) {
    let Some(gain) = gain else {
        data.fill(T::from_sample(0.0f32));
        return;
    };

    let consumed = data.len().min(queue.len());
    for (out, sample) in data.iter_mut().zip(queue.iter()) {
        // Just below 1.0 since the i16 conversion overflows at exactly 1.0
        *out = T::from_sample((sample * gain).clamp(-1.0, 0.999_999_9));
    }
    data[consumed..].fill(T::from_sample(0.0f32));
    queue.drain(..consumed);
}

/// Handle on the running output stream. Dropping it stops the device.
pub struct AudioOutput {
    command_tx: mpsc::UnboundedSender<AudioOutputCommand>,
    shared_state: Arc<SharedState>,
    config: AudioOutputConfig,
    _stream: cpal::Stream,
}

impl AudioOutput {
    pub fn new(volume: Volume) -> Result<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| Error::Io("No audio output device found".to_string()))?;
        let supported = device
            .default_output_config()
            .map_err(|e| Error::Io(format!("Failed to get audio config: {e}")))?;

        let config = AudioOutputConfig {
            sample_rate: supported.sample_rate().0,
            channels: supported.channels(),
        };

        let shared_state = Arc::new(SharedState::new(volume));
        // At most one second of audio is queued
        let capacity = config.sample_rate as usize * usize::from(config.channels);
        let queue = Arc::new(Mutex::new(Vec::with_capacity(capacity)));

        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<AudioOutputCommand>();
        let task_queue = Arc::clone(&queue);
        let task_state = Arc::clone(&shared_state);
        tokio::spawn(async move {
            while let Some(command) = command_rx.recv().await {
                match command {
                    AudioOutputCommand::Play(samples) => {
                        if let Ok(mut queue) = task_queue.lock() {
                            let room = capacity.saturating_sub(queue.len());
                            queue.extend_from_slice(&samples[..samples.len().min(room)]);
                        }
                    }
                    AudioOutputCommand::Pause => task_state.set_paused(true),
                    AudioOutputCommand::Resume => task_state.set_paused(false),
                    AudioOutputCommand::ClearBuffer => {
                        if let Ok(mut queue) = task_queue.lock() {
                            queue.clear();
                        }
                    }
                    AudioOutputCommand::SetVolume(volume) => task_state.set_volume(volume),
                    AudioOutputCommand::Stop => {
                        if let Ok(mut queue) = task_queue.lock() {
                            queue.clear();
                        }
                        task_state.set_paused(true);
                        break;
                    }
                }
            }
        });

        let stream_config: cpal::StreamConfig = supported.config();
        let stream = match supported.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &stream_config, queue, Arc::clone(&shared_state))?
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &stream_config, queue, Arc::clone(&shared_state))?
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &stream_config, queue, Arc::clone(&shared_state))?
            }
            other => {
                return Err(Error::Io(format!("Unsupported audio sample format: {other:?}")));
            }
        };
        stream
            .play()
            .map_err(|e| Error::Io(format!("Failed to start audio stream: {e}")))?;

        tracing::debug!(
            sample_rate = config.sample_rate,
            channels = config.channels,
            "audio output started"
        );

        Ok(Self {
            command_tx,
            shared_state,
            config,
            _stream: stream,
        })
    }

    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        queue: Arc<Mutex<Vec<f32>>>,
        shared_state: Arc<SharedState>,
    ) -> Result<cpal::Stream> {
        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| match queue.lock() {
                    Ok(mut queue) => fill_output(data, &mut queue, shared_state.gain()),
                    Err(_) => data.fill(T::from_sample(0.0f32)),
                },
                |err| tracing::warn!(error = %err, "audio output error"),
                None,
            )
            .map_err(|e| Error::Io(format!("Failed to build audio stream: {e}")))
    }

    fn send(&self, command: AudioOutputCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::Io("Audio output channel closed".into()))
    }

    pub fn play(&self, samples: AudioSamples) -> Result<()> {
        self.send(AudioOutputCommand::Play(samples))
    }

    pub fn pause(&self) -> Result<()> {
        self.send(AudioOutputCommand::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(AudioOutputCommand::Resume)
    }

    pub fn clear_buffer(&self) -> Result<()> {
        self.send(AudioOutputCommand::ClearBuffer)
    }

    pub fn set_volume(&self, volume: Volume) -> Result<()> {
        self.send(AudioOutputCommand::SetVolume(volume))
    }

    pub fn stop(&self) -> Result<()> {
        self.send(AudioOutputCommand::Stop)
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        Volume::new(self.shared_state.volume())
    }

    #[must_use]
    pub fn config(&self) -> AudioOutputConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn shared_state_tracks_volume() {
        let state = SharedState::new(Volume::new(0.8));
        assert_abs_diff_eq!(state.volume(), 0.8);

        state.set_volume(Volume::new(0.25));
        assert_abs_diff_eq!(state.volume(), 0.25);
    }

    #[test]
    fn gain_is_silent_when_paused_or_muted() {
        let state = SharedState::new(Volume::new(0.5));
        assert_eq!(state.gain(), Some(0.5));

        state.set_paused(true);
        assert_eq!(state.gain(), None);

        state.set_paused(false);
        state.set_volume(Volume::new(0.0));
        assert_eq!(state.gain(), None);
    }

    #[test]
    fn fill_applies_gain_and_drains_queue() {
        let mut queue = vec![0.5, -0.5, 1.0, 0.25];
        let mut data = [0.0f32; 3];

        fill_output(&mut data, &mut queue, Some(0.5));

        assert_abs_diff_eq!(data[0], 0.25);
        assert_abs_diff_eq!(data[1], -0.25);
        assert_abs_diff_eq!(data[2], 0.5);
        assert_eq!(queue, vec![0.25]);
    }

    #[test]
    fn fill_pads_with_silence() {
        let mut queue = vec![0.5];
        let mut data = [1.0f32; 3];

        fill_output(&mut data, &mut queue, Some(1.0));

        assert_abs_diff_eq!(data[0], 0.5);
        assert_abs_diff_eq!(data[1], 0.0);
        assert_abs_diff_eq!(data[2], 0.0);
        assert!(queue.is_empty());
    }

    #[test]
    fn silent_fill_keeps_queue() {
        let mut queue = vec![0.5, 0.5];
        let mut data = [1.0f32; 2];

        fill_output(&mut data, &mut queue, None);

        assert_eq!(data, [0.0, 0.0]);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn fill_clamps_overdriven_samples() {
        let mut queue = vec![2.0, -2.0];
        let mut data = [0i16; 2];

        fill_output(&mut data, &mut queue, Some(1.0));

        assert_eq!(data[1], i16::MIN);
        assert!(data[0] > 32_000);
    }

    #[tokio::test]
    #[ignore = "requires audio hardware"]
    async fn audio_output_can_be_created() {
        if let Ok(output) = AudioOutput::new(Volume::new(0.3)) {
            assert_abs_diff_eq!(output.volume().value(), 0.3);
            assert!(output.config().sample_rate > 0);
            assert!(output.config().channels > 0);
        }
    }
}
