// Conversion pipeline
// Validated configuration feeding extraction then optimization

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::melody::{
    ConfigError, EventOptimizer, ExtractorConfig, InputError, Melody, OptimizerConfig,
    PitchExtractor, Scale,
};

use super::report::ConversionReport;

/// Every pipeline tunable in one place. Missing JSON fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Rate used by [`Converter::convert_samples`]
    pub sample_rate: u32,
    pub window_duration: f64,
    pub silence_threshold: f32,
    pub min_freq: u32,
    pub max_freq: u32,
    pub similarity_hz: u32,
    pub scale: Scale,
    pub tolerance_ratio: f64,
    pub max_event_duration: f64,
    pub duration_scale: f64,
    pub min_duration: f64,
    pub max_events: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        let extractor = ExtractorConfig::default();
        let optimizer = OptimizerConfig::default();
        ConverterConfig {
            sample_rate: 22050,
            window_duration: extractor.window_duration,
            silence_threshold: extractor.silence_threshold,
            min_freq: extractor.min_freq,
            max_freq: extractor.max_freq,
            similarity_hz: extractor.similarity_hz,
            scale: optimizer.scale,
            tolerance_ratio: optimizer.tolerance_ratio,
            max_event_duration: optimizer.max_event_duration,
            duration_scale: optimizer.duration_scale,
            min_duration: optimizer.min_duration,
            max_events: optimizer.max_events,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConverterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&contents)?)
    }

    pub fn extractor(&self) -> ExtractorConfig {
        ExtractorConfig {
            window_duration: self.window_duration,
            silence_threshold: self.silence_threshold,
            min_freq: self.min_freq,
            max_freq: self.max_freq,
            similarity_hz: self.similarity_hz,
        }
    }

    pub fn optimizer(&self) -> OptimizerConfig {
        OptimizerConfig {
            scale: self.scale.clone(),
            tolerance_ratio: self.tolerance_ratio,
            max_event_duration: self.max_event_duration,
            duration_scale: self.duration_scale,
            min_duration: self.min_duration,
            max_events: self.max_events,
            min_freq: self.min_freq,
            max_freq: self.max_freq,
        }
    }
}

/// Outcome of a conversion
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    Melody {
        melody: Melody,
        report: ConversionReport,
    },
    /// Extraction produced no events; there is nothing to emit
    NoSignal,
}

impl Conversion {
    pub fn melody(&self) -> Option<&Melody> {
        match self {
            Conversion::Melody { melody, .. } => Some(melody),
            Conversion::NoSignal => None,
        }
    }
}

pub struct Converter {
    config: ConverterConfig,
    extractor: PitchExtractor,
    optimizer: EventOptimizer,
}

impl Converter {
    /// Validate every tunable before any sample is touched
    pub fn new(config: ConverterConfig) -> Result<Self, ConfigError> {
        if config.sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }
        let extractor = PitchExtractor::new(config.extractor())?;
        let optimizer = EventOptimizer::new(config.optimizer())?;

        Ok(Converter {
            config,
            extractor,
            optimizer,
        })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a buffer recorded at the configured sample rate
    pub fn convert_samples(&self, samples: &[f32]) -> Result<Conversion, InputError> {
        self.convert(samples, self.config.sample_rate)
    }

    /// Convert a mono buffer at `sample_rate` into a beeper melody
    pub fn convert(&self, samples: &[f32], sample_rate: u32) -> Result<Conversion, InputError> {
        if samples.is_empty() {
            return Err(InputError::EmptyBuffer);
        }

        let raw = self.extractor.extract(samples, sample_rate)?;
        if raw.is_empty() {
            log::info!("No suitable frequencies found in {} samples", samples.len());
            return Ok(Conversion::NoSignal);
        }

        let optimized = self.optimizer.optimize_detailed(&raw);
        let report =
            ConversionReport::new(sample_rate, &raw, &optimized.melody, optimized.dropped_events);
        log::info!("Converted: {}", report);

        Ok(Conversion::Melody {
            melody: optimized.melody,
            report,
        })
    }
}
