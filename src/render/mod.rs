// Render module
// Audible previews of converted melodies

pub mod preview;

pub use preview::{render_square_wave, to_wav_bytes, PreviewConfig};
