//! # Click Playback Module
//!
//! Synthesizes the metronome's click tones and plays them through the
//! default output device using CPAL (Cross-Platform Audio Library).
//!
//! ## Features
//! - Pre-rendered accent (800 Hz) and plain (600 Hz) sine clicks
//! - Exponential gain ramp 0.3 → 0.01 over 100 ms
//! - Fire-and-forget triggering; a retrigger cuts the previous click
//! - Playback failure degrades to silence, never an error for the caller

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Frequency of the accented downbeat click.
pub const ACCENT_HZ: f32 = 800.0;
/// Frequency of the plain beat click.
pub const BEAT_HZ: f32 = 600.0;
/// Click length in seconds.
pub const CLICK_SECONDS: f32 = 0.1;

const CLICK_GAIN: f32 = 0.3;
const CLICK_FLOOR: f32 = 0.01;

/// A click currently being played out: the tone buffer and the read head.
struct Voice {
    samples: Arc<Vec<f32>>,
    position: usize,
}

/// Owns the output stream and the two pre-rendered click tones.
///
/// The stream runs for the lifetime of the player and emits silence unless a
/// voice is active. [`trigger`](ClickPlayer::trigger) swaps in a fresh voice;
/// the audio callback mixes it out and clears the slot when done.
pub struct ClickPlayer {
    _stream: cpal::Stream,
    accent: Arc<Vec<f32>>,
    beat: Arc<Vec<f32>>,
    active: Arc<Mutex<Option<Voice>>>,
}

impl ClickPlayer {
    /// Opens the default output device and starts the (silent) stream.
    ///
    /// # Returns
    /// * `Ok(player)` - stream running, ready to trigger clicks
    /// * `Err(e)` - no device, no f32 output format, or the stream failed
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No output device available"))?;

        let supported = device.default_output_config()?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(anyhow!(
                "No f32 output format available (got {:?})",
                supported.sample_format()
            ));
        }

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels() as usize;
        let config: cpal::StreamConfig = supported.into();

        let accent = Arc::new(render_click(sample_rate, ACCENT_HZ));
        let beat = Arc::new(render_click(sample_rate, BEAT_HZ));
        let active: Arc<Mutex<Option<Voice>>> = Arc::new(Mutex::new(None));

        let err_fn = |err| eprintln!("[AUDIO] An error occurred on the output stream: {err}");

        let callback_slot = Arc::clone(&active);
        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                data.fill(0.0);
                let Ok(mut slot) = callback_slot.lock() else {
                    return;
                };
                let Some(voice) = slot.as_mut() else {
                    return;
                };
                for frame in data.chunks_mut(channels) {
                    let Some(&sample) = voice.samples.get(voice.position) else {
                        break;
                    };
                    voice.position += 1;
                    for out in frame {
                        *out = sample;
                    }
                }
                if voice.position >= voice.samples.len() {
                    *slot = None;
                }
            },
            err_fn,
            None,
        )?;

        stream.play()?;

        Ok(Self { _stream: stream, accent, beat, active })
    }

    /// Starts a click. Fire-and-forget: completion is never awaited, and a
    /// click still in flight is simply replaced.
    pub fn trigger(&self, is_accent: bool) {
        let samples = if is_accent { &self.accent } else { &self.beat };
        if let Ok(mut slot) = self.active.lock() {
            *slot = Some(Voice { samples: Arc::clone(samples), position: 0 });
        }
    }
}

/// Renders one click tone: a sine burst with an exponential gain ramp from
/// [`CLICK_GAIN`] down to [`CLICK_FLOOR`] across [`CLICK_SECONDS`].
fn render_click(sample_rate: u32, freq: f32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * CLICK_SECONDS) as usize;
    let mut samples = Vec::with_capacity(num_samples);

    for i in 0..num_samples {
        let t = i as f32 / sample_rate as f32;
        let envelope = CLICK_GAIN * (CLICK_FLOOR / CLICK_GAIN).powf(t / CLICK_SECONDS);
        samples.push((t * freq * std::f32::consts::TAU).sin() * envelope);
    }

    samples
}
