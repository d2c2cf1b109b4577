// Audio processing module
// WAV ingestion and the spectral helpers used by pitch extraction

pub mod ingest;
pub mod spectrum;

pub use ingest::{ingest_wav, ingest_wav_file, AudioData, AudioError};
pub use spectrum::{bin_frequency, hann_window, SpectrumAnalyzer};
