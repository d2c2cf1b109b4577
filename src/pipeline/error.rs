// Conversion errors
// One error type for a whole file-to-header run

use thiserror::Error;

use crate::audio::AudioError;
use crate::emit::EmitError;
use crate::melody::{ConfigError, InputError};

use super::convert::ConfigLoadError;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Config file error: {0}")]
    ConfigLoad(#[from] ConfigLoadError),

    #[error("Invalid input: {0}")]
    Input(#[from] InputError),

    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),

    #[error("Preview encoding error: {0}")]
    Preview(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
