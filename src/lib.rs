// Beepify - Audio to Beeper Melody Converter
// Module declarations

pub mod audio;
pub mod emit;
pub mod melody;
pub mod pipeline;
pub mod render;

pub use melody::{
    ConfigError, Event, EventOptimizer, ExtractorConfig, InputError, Melody, OptimizerConfig,
    PitchExtractor, RawEvent, Scale,
};
pub use pipeline::{Conversion, ConversionReport, ConvertError, Converter, ConverterConfig};
