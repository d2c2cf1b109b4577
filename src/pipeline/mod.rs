// Conversion pipeline module
// Glue from a sample buffer to an optimized melody, plus run reporting

pub mod convert;
pub mod error;
pub mod report;

pub use convert::{ConfigLoadError, Conversion, Converter, ConverterConfig};
pub use error::ConvertError;
pub use report::ConversionReport;
