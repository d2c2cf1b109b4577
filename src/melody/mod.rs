// Melody extraction module
// Pitch tracking, scale snapping, and event shaping for monophonic beepers

pub mod error;
pub mod extractor;
pub mod optimizer;
pub mod scale;
pub mod types;

pub use error::{ConfigError, InputError};
pub use extractor::{ExtractorConfig, PitchExtractor};
pub use optimizer::{EventOptimizer, Optimized, OptimizerConfig};
pub use scale::{Scale, ScaleError, CHROMATIC_C3_B7};
pub use types::{Event, Melody, RawEvent};
