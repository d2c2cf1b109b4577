// Sequence emitter module
// Serializes optimized melodies for firmware playback routines

pub mod header;

pub use header::{default_header_path, render_c_header, sound_name_from_path, write_c_header, EmitError};
