// Buzzer preview rendering
// Synthesizes a melody as the square wave a single-oscillator beeper produces

use hound::{SampleFormat, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::melody::{Event, Melody};

/// Preview synthesis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,

    /// Length of one playback time unit in milliseconds
    pub time_unit_ms: f64,

    /// Square wave amplitude [0.0, 1.0]
    pub amplitude: f32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            sample_rate: 22050,
            time_unit_ms: 100.0,
            amplitude: 0.3,
        }
    }
}

/// Number of output samples an event of `duration` time units occupies
fn event_samples(duration: f64, config: &PreviewConfig) -> usize {
    (duration * config.time_unit_ms / 1000.0 * config.sample_rate as f64).round() as usize
}

/// Render a melody to mono samples.
/// Phase carries across consecutive tones so note changes do not click.
pub fn render_square_wave(melody: &Melody, config: &PreviewConfig) -> Vec<f32> {
    if config.sample_rate == 0 {
        return Vec::new();
    }

    let amplitude = config.amplitude.clamp(0.0, 1.0);
    let total: usize = melody
        .events()
        .iter()
        .map(|e| event_samples(e.duration(), config))
        .sum();

    let mut output = Vec::with_capacity(total);
    let mut phase = 0.0f64;

    for event in melody.events() {
        let count = event_samples(event.duration(), config);
        match *event {
            Event::Silence { .. } => {
                output.extend(std::iter::repeat(0.0).take(count));
                phase = 0.0;
            }
            Event::Tone { frequency, .. } => {
                let step = frequency as f64 / config.sample_rate as f64;
                for _ in 0..count {
                    output.push(if phase < 0.5 { amplitude } else { -amplitude });
                    phase = (phase + step).fract();
                }
            }
        }
    }

    output
}

/// Encode mono samples as 16-bit PCM WAV bytes
pub fn to_wav_bytes(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;

        for &sample in samples {
            let sample_i16 = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
            writer.write_sample(sample_i16)?;
        }

        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
