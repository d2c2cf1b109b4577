// Windowed pitch extraction
// Frames the waveform with 50% overlap, gates silence by peak amplitude,
// picks the strongest in-band FFT bin, and run-length merges the results

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::audio::spectrum::{bin_frequency, SpectrumAnalyzer};

use super::error::{check_positive, ConfigError, InputError};
use super::types::RawEvent;

/// Configuration for pitch extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Analysis window length in seconds
    pub window_duration: f64,

    /// Frames whose tapered peak amplitude falls below this are rests
    pub silence_threshold: f32,

    /// Lowest admissible pitch in Hz
    pub min_freq: u32,

    /// Highest admissible pitch in Hz
    pub max_freq: u32,

    /// Consecutive estimates closer than this (Hz) extend the same note
    pub similarity_hz: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            window_duration: 0.1,
            silence_threshold: 0.01,
            min_freq: 50,
            max_freq: 20000,
            similarity_hz: 20,
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !check_positive(self.window_duration) {
            return Err(ConfigError::WindowDuration(self.window_duration));
        }
        if !(self.silence_threshold > 0.0 && self.silence_threshold < 1.0) {
            return Err(ConfigError::SilenceThreshold(self.silence_threshold));
        }
        if self.min_freq == 0 || self.min_freq >= self.max_freq {
            return Err(ConfigError::FrequencyBand {
                min: self.min_freq,
                max: self.max_freq,
            });
        }
        if self.similarity_hz == 0 {
            return Err(ConfigError::SimilarityHz(self.similarity_hz));
        }
        Ok(())
    }
}

/// Per-frame classification before run-length merging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramePitch {
    Silent,
    Tonal(u32),
}

pub struct PitchExtractor {
    config: ExtractorConfig,
}

impl PitchExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(PitchExtractor { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Analysis window length in samples at `sample_rate`
    pub fn window_size(&self, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.config.window_duration).round() as usize
    }

    /// Number of full frames a buffer of `sample_count` samples yields
    pub fn frame_count(&self, sample_count: usize, sample_rate: u32) -> usize {
        let window_size = self.window_size(sample_rate);
        let hop = window_size / 2;
        if hop == 0 || sample_count < window_size {
            return 0;
        }
        (sample_count - window_size) / hop + 1
    }

    /// Extract a run-length encoded pitch track from a mono buffer.
    ///
    /// A buffer shorter than one window yields no events. Trailing samples
    /// that do not fill a whole window are dropped.
    pub fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<RawEvent>, InputError> {
        if sample_rate == 0 {
            return Err(InputError::InvalidSampleRate);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(InputError::NonFiniteSample(index));
        }

        let window_size = self.window_size(sample_rate);
        let frames = self.frame_count(samples.len(), sample_rate);
        if frames == 0 {
            log::debug!(
                "No complete {}-sample window in {} samples",
                window_size,
                samples.len()
            );
            return Ok(Vec::new());
        }

        let hop = window_size / 2;
        let band = self.candidate_bins(sample_rate, window_size);
        if band.is_none() {
            log::warn!(
                "No FFT bin of a {}-sample window at {} Hz falls in {}..{} Hz; every frame is a rest",
                window_size,
                sample_rate,
                self.config.min_freq,
                self.config.max_freq
            );
        }

        log::debug!(
            "Analyzing {} frames (window {} samples, hop {})",
            frames,
            window_size,
            hop
        );

        let mut analyzer = SpectrumAnalyzer::new(window_size);
        let events = (0..frames)
            .map(|i| {
                let start = i * hop;
                let frame = &samples[start..start + window_size];
                self.classify_frame(&mut analyzer, frame, sample_rate, band.clone())
            })
            .fold(Vec::new(), |events, pitch| {
                merge_frame(events, pitch, self.config.similarity_hz)
            });

        log::debug!("Extracted {} raw events from {} frames", events.len(), frames);
        Ok(events)
    }

    /// Bins whose center frequency lies within [min_freq, max_freq]
    fn candidate_bins(&self, sample_rate: u32, window_size: usize) -> Option<RangeInclusive<usize>> {
        let min = self.config.min_freq as f64;
        let max = self.config.max_freq as f64;
        let in_band = |bin: &usize| {
            let freq = bin_frequency(*bin, sample_rate, window_size);
            freq >= min && freq <= max
        };

        let last_bin = window_size / 2;
        let first = (0..=last_bin).find(in_band)?;
        let last = (first..=last_bin).rev().find(in_band)?;
        Some(first..=last)
    }

    fn classify_frame(
        &self,
        analyzer: &mut SpectrumAnalyzer,
        frame: &[f32],
        sample_rate: u32,
        band: Option<RangeInclusive<usize>>,
    ) -> FramePitch {
        let peak = analyzer.taper(frame);
        if peak < self.config.silence_threshold {
            return FramePitch::Silent;
        }

        let Some(band) = band else {
            return FramePitch::Silent;
        };

        let magnitudes = match analyzer.magnitudes() {
            Ok(magnitudes) => magnitudes,
            Err(e) => {
                log::warn!("FFT failed on frame, treating as rest: {}", e);
                return FramePitch::Silent;
            }
        };

        // First maximum wins on ties
        let mut best_bin = *band.start();
        let mut best_mag = f32::NEG_INFINITY;
        for bin in band {
            let mag = magnitudes[bin];
            if mag > best_mag {
                best_bin = bin;
                best_mag = mag;
            }
        }

        let window_size = analyzer.window_size();
        FramePitch::Tonal(bin_frequency(best_bin, sample_rate, window_size).round() as u32)
    }
}

/// Fold step: extend the last event or start a new one.
/// The first frequency of a tonal run is kept for the whole run.
fn merge_frame(mut events: Vec<RawEvent>, pitch: FramePitch, similarity_hz: u32) -> Vec<RawEvent> {
    match (events.last_mut(), pitch) {
        (Some(last), FramePitch::Silent) if last.is_silence() => last.frame_count += 1,
        (Some(last), FramePitch::Tonal(freq))
            if !last.is_silence() && freq.abs_diff(last.frequency) < similarity_hz =>
        {
            last.frame_count += 1
        }
        (_, FramePitch::Silent) => events.push(RawEvent::silence(1)),
        (_, FramePitch::Tonal(freq)) => events.push(RawEvent::tone(freq, 1)),
    }
    events
}
