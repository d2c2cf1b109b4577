// Melody pipeline errors
// Configuration is rejected up front; input is rejected before any frame is analyzed

use thiserror::Error;

use super::scale::ScaleError;

/// A tunable outside its valid domain
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Sample rate must be positive")]
    SampleRate,

    #[error("Window duration must be a positive number of seconds, got {0}")]
    WindowDuration(f64),

    #[error("Silence threshold must lie strictly between 0 and 1, got {0}")]
    SilenceThreshold(f32),

    #[error("Frequency band must satisfy 0 < min < max, got {min}..{max} Hz")]
    FrequencyBand { min: u32, max: u32 },

    #[error("Run similarity must be at least 1 Hz, got {0}")]
    SimilarityHz(u32),

    #[error("Snap tolerance ratio must be a non-negative number, got {0}")]
    ToleranceRatio(f64),

    #[error("Maximum event duration must be at least one frame, got {0}")]
    MaxEventDuration(f64),

    #[error("Duration scale must be positive, got {0}")]
    DurationScale(f64),

    #[error("Minimum duration must be positive, got {0}")]
    MinDuration(f64),

    #[error("Maximum event count must be at least 1")]
    MaxEvents,

    #[error("Invalid scale: {0}")]
    Scale(#[from] ScaleError),
}

/// A sample buffer that cannot be analyzed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Sample buffer is empty")]
    EmptyBuffer,

    #[error("Sample rate must be positive")]
    InvalidSampleRate,

    #[error("Sample {0} is not a finite number")]
    NonFiniteSample(usize),
}

pub(crate) fn check_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
