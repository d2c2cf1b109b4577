// Event optimization for beeper playback
// Scale snapping, duration capping, time-unit scaling, rest merging, truncation

use serde::{Deserialize, Serialize};

use super::error::{check_positive, ConfigError};
use super::scale::Scale;
use super::types::{round_tenths, Event, Melody, RawEvent};

/// Configuration for the optimizer stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Notes that tonal estimates may be snapped to
    pub scale: Scale,

    /// Snap only when |note - freq| / freq is strictly below this
    pub tolerance_ratio: f64,

    /// Longest single event, in frames (before scaling); at least 1
    pub max_event_duration: f64,

    /// Frames per output time unit
    pub duration_scale: f64,

    /// Floor for every emitted duration, in time units (rounded up to tenths)
    pub min_duration: f64,

    /// Hard cap on the number of emitted events
    pub max_events: usize,

    /// Tonal frequencies are clamped into [min_freq, max_freq]
    pub min_freq: u32,
    pub max_freq: u32,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            scale: Scale::default(),
            tolerance_ratio: 0.12,
            max_event_duration: 5.0,
            duration_scale: 4.0,
            min_duration: 0.1,
            max_events: 300,
            min_freq: 50,
            max_freq: 20000,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance_ratio.is_finite() && self.tolerance_ratio >= 0.0) {
            return Err(ConfigError::ToleranceRatio(self.tolerance_ratio));
        }
        // At least one frame per segment, so splitting always makes progress
        if !(self.max_event_duration.is_finite() && self.max_event_duration >= 1.0) {
            return Err(ConfigError::MaxEventDuration(self.max_event_duration));
        }
        if !check_positive(self.duration_scale) {
            return Err(ConfigError::DurationScale(self.duration_scale));
        }
        if !check_positive(self.min_duration) {
            return Err(ConfigError::MinDuration(self.min_duration));
        }
        if self.max_events == 0 {
            return Err(ConfigError::MaxEvents);
        }
        if self.min_freq == 0 || self.min_freq >= self.max_freq {
            return Err(ConfigError::FrequencyBand {
                min: self.min_freq,
                max: self.max_freq,
            });
        }
        Ok(())
    }
}

/// Optimized melody plus how many events the length cap dropped
#[derive(Debug, Clone, PartialEq)]
pub struct Optimized {
    pub melody: Melody,
    pub dropped_events: usize,
}

pub struct EventOptimizer {
    config: OptimizerConfig,
}

impl EventOptimizer {
    pub fn new(config: OptimizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(EventOptimizer { config })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Turn extractor output into a playable melody
    pub fn optimize(&self, raw: &[RawEvent]) -> Melody {
        self.optimize_detailed(raw).melody
    }

    /// Like [`optimize`](Self::optimize), also reporting truncation
    pub fn optimize_detailed(&self, raw: &[RawEvent]) -> Optimized {
        self.run(raw.iter().map(|e| (e.frequency, e.frame_count as f64)))
    }

    /// Re-run the optimizer over an existing melody, reading each duration
    /// as a frame count. Useful for re-tuning a stored melody.
    pub fn reoptimize(&self, melody: &Melody) -> Melody {
        self.run(melody.events().iter().map(|e| (e.frequency(), e.duration())))
            .melody
    }

    /// Snap to the nearest scale note when close enough, then clamp to the band
    pub fn snap_frequency(&self, frequency: u32) -> u32 {
        let snapped = if frequency == 0 {
            frequency
        } else {
            let note = self.config.scale.nearest(frequency);
            let ratio = note.abs_diff(frequency) as f64 / frequency as f64;
            if ratio < self.config.tolerance_ratio {
                note
            } else {
                frequency
            }
        };
        snapped.clamp(self.config.min_freq, self.config.max_freq)
    }

    /// Smallest emitted duration: `min_duration` rounded up to whole tenths,
    /// so rounding can never take an event below the configured floor
    fn duration_floor(&self) -> f64 {
        ((self.config.min_duration * 10.0 - 1e-9).ceil() / 10.0).max(0.1)
    }

    /// Frame count to time units, rounded to one decimal and floored
    fn scaled_duration(&self, frames: f64) -> f64 {
        round_tenths(frames / self.config.duration_scale).max(self.duration_floor())
    }

    fn run(&self, frames: impl Iterator<Item = (u32, f64)>) -> Optimized {
        let shaped = frames.fold(Shaped::default(), |shaped, (frequency, frames)| {
            if frequency == 0 {
                self.push_silence(shaped, frames)
            } else {
                self.push_tone(shaped, frequency, frames)
            }
        });

        if shaped.dropped > 0 {
            log::info!(
                "Truncating melody to {} events ({} dropped)",
                self.config.max_events,
                shaped.dropped
            );
        }

        Optimized {
            melody: Melody::new(shaped.events),
            dropped_events: shaped.dropped,
        }
    }

    fn is_full(&self, shaped: &Shaped) -> bool {
        shaped.events.len() >= self.config.max_events
    }

    fn push_silence(&self, mut shaped: Shaped, frames: f64) -> Shaped {
        let duration = self.scaled_duration(frames);
        let full = self.is_full(&shaped);
        match shaped.events.last_mut() {
            Some(Event::Silence { duration: previous }) => {
                *previous = round_tenths(*previous + duration);
            }
            _ if full => shaped.dropped += 1,
            _ => shaped.events.push(Event::Silence { duration }),
        }
        shaped
    }

    /// Long notes become several capped events at the same pitch. The cap is
    /// applied to frame counts, before scaling to time units. Once the event
    /// limit is reached the remaining segments are only counted.
    fn push_tone(&self, mut shaped: Shaped, frequency: u32, frames: f64) -> Shaped {
        let frequency = self.snap_frequency(frequency);
        let cap = self.config.max_event_duration;

        let mut remaining = frames;
        while remaining > 0.0 {
            if self.is_full(&shaped) {
                shaped.dropped += (remaining / cap).ceil() as usize;
                break;
            }
            let segment = if remaining > cap { cap } else { remaining };
            shaped.events.push(Event::Tone {
                frequency,
                duration: self.scaled_duration(segment),
            });
            remaining -= segment;
        }
        shaped
    }
}

/// Fold state: events kept so far and how many fell past the limit
#[derive(Default)]
struct Shaped {
    events: Vec<Event>,
    dropped: usize,
}
