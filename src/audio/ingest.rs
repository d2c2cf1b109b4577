// Audio ingestion module
// Reads PCM WAV data into normalized f32 samples for melody extraction

use hound::{SampleFormat, WavReader};
use std::io::{Cursor, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to read WAV file: {0}")]
    WavReadError(#[from] hound::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("WAV file declares zero channels")]
    NoChannels,
}

#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved samples normalized to f32 in range [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz (e.g., 22050, 44100)
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl AudioData {
    /// Wrap an already-decoded mono buffer
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        AudioData {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    /// Number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        match self.channels {
            0 => 0,
            ch => self.samples.len() / ch as usize,
        }
    }

    /// Get duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Convert to mono by averaging channels
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.clone();
        }

        let channels = self.channels as usize;
        self.samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }
}

/// Ingest a WAV file from raw bytes
pub fn ingest_wav(data: &[u8]) -> Result<AudioData, AudioError> {
    read_wav(WavReader::new(Cursor::new(data))?)
}

/// Ingest a WAV file from disk
pub fn ingest_wav_file(path: impl AsRef<Path>) -> Result<AudioData, AudioError> {
    read_wav(WavReader::open(path)?)
}

fn read_wav<R: Read>(mut reader: WavReader<R>) -> Result<AudioData, AudioError> {
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioError::NoChannels);
    }

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        // 8-bit WAV is unsigned on disk, hound re-centers it around zero
        (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let full_scale = (1u64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<Vec<_>, _>>()?
        }
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        (format, bits) => {
            return Err(AudioError::UnsupportedFormat(format!(
                "{:?} {}-bit audio",
                format, bits
            )));
        }
    };

    let audio = AudioData {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    };

    log::info!(
        "Loaded WAV: {} Hz, {} channels, {}-bit, {:.2} s",
        audio.sample_rate,
        audio.channels,
        spec.bits_per_sample,
        audio.duration_secs()
    );

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn wav_bytes(spec: WavSpec, samples: &[i16]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_audio_data_to_mono() {
        // Create stereo audio: [L, R, L, R, L, R]
        let audio_data = AudioData {
            samples: vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
            sample_rate: 44100,
            channels: 2,
        };

        let mono = audio_data.to_mono();

        assert_eq!(mono.len(), 3);
        assert!((mono[0] - 0.15).abs() < 1e-6);
        assert!((mono[1] - 0.35).abs() < 1e-6);
        assert!((mono[2] - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_audio_data_duration_secs() {
        let audio_data = AudioData::from_mono(vec![0.0; 11025], 22050);
        assert_eq!(audio_data.frame_count(), 11025);
        assert_eq!(audio_data.duration_secs(), 0.5);
    }

    #[test]
    fn test_ingest_16bit_stereo() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let bytes = wav_bytes(spec, &[16384, -16384, 0, 32767]);

        let audio = ingest_wav(&bytes).unwrap();
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.frame_count(), 2);
        assert!((audio.samples[0] - 0.5).abs() < 1e-6);
        assert!((audio.samples[1] + 0.5).abs() < 1e-6);

        let mono = audio.to_mono();
        assert!(mono[0].abs() < 1e-6);
    }

    #[test]
    fn test_ingest_rejects_garbage() {
        let result = ingest_wav(b"definitely not a wav file");
        assert!(matches!(result, Err(AudioError::WavReadError(_))));
    }
}
