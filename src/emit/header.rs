// C header emitter
// Renders a melody as constant tone/duration arrays plus a Play<Name>Sound() wrapper

use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::melody::Melody;

const TONES_PER_LINE: usize = 8;
const DURATIONS_PER_LINE: usize = 12;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Melody has no events to emit")]
    EmptyMelody,

    #[error("'{0}' is not a valid C identifier")]
    InvalidName(String),

    #[error("Failed to format header: {0}")]
    Format(#[from] fmt::Error),

    #[error("Failed to write header: {0}")]
    Io(#[from] std::io::Error),
}

/// Derive a sound name from a source file: the file stem reduced to
/// ASCII alphanumerics and underscores, prefixed with `sound_` when it
/// would start with a digit
pub fn sound_name_from_path(path: impl AsRef<Path>) -> String {
    let name: String = path
        .as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    match name.chars().next() {
        None => "sound".to_string(),
        Some(c) if c.is_ascii_digit() => format!("sound_{}", name),
        Some(_) => name,
    }
}

/// Default output file for a sound name: `<name>_sound.h`
pub fn default_header_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}_sound.h", name))
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest
fn title_case(name: &str) -> String {
    let mut previous_alpha = false;
    name.chars()
        .map(|c| {
            let mapped = if c.is_ascii_alphabetic() && !previous_alpha {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            previous_alpha = c.is_ascii_alphabetic();
            mapped
        })
        .collect()
}

fn validate_name(name: &str) -> Result<(), EmitError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(EmitError::InvalidName(name.to_string()))
    }
}

/// Lay out values `per_line` to a row, four-space indented, comma separated
fn write_rows(out: &mut impl fmt::Write, values: &[String], per_line: usize) -> fmt::Result {
    let last = values.len().saturating_sub(1);
    for (i, value) in values.iter().enumerate() {
        if i % per_line == 0 {
            out.write_str("    ")?;
        }
        out.write_str(value)?;
        if i < last {
            out.write_char(',')?;
        }
        if i % per_line == per_line - 1 || i == last {
            out.write_char('\n')?;
        } else {
            out.write_char(' ')?;
        }
    }
    Ok(())
}

/// Render `melody` as a C header for the firmware's `PlaySoundEffect` routine
pub fn render_c_header(melody: &Melody, name: &str) -> Result<String, EmitError> {
    if melody.is_empty() {
        return Err(EmitError::EmptyMelody);
    }
    validate_name(name)?;

    let mut out = String::new();
    write_header(&mut out, melody, name)?;
    Ok(out)
}

fn write_header(out: &mut impl fmt::Write, melody: &Melody, name: &str) -> fmt::Result {
    let upper = name.to_ascii_uppercase();
    let title = title_case(name);

    let tones: Vec<String> = melody.frequencies().iter().map(|f| format!("{:4}", f)).collect();
    let durations: Vec<String> = melody.durations().iter().map(|d| format!("{:.6}", d)).collect();

    writeln!(out, "// Auto-generated header file from audio conversion")?;
    writeln!(out, "// Note: Frequency 0 = silence/rest periods")?;
    writeln!(out)?;
    writeln!(out, "#ifndef {}_SOUND_H", upper)?;
    writeln!(out, "#define {}_SOUND_H", upper)?;
    writeln!(out)?;
    writeln!(out, "// {} sound effect", title)?;
    writeln!(out, "#define {}_LENGTH {}", upper, melody.len())?;
    writeln!(out)?;
    writeln!(out, "const unsigned long {}_TONES[] = {{", upper)?;
    write_rows(out, &tones, TONES_PER_LINE)?;
    writeln!(out, "}};")?;
    writeln!(out)?;
    writeln!(out, "const unsigned long {}_DURATIONS[] = {{", upper)?;
    write_rows(out, &durations, DURATIONS_PER_LINE)?;
    writeln!(out, "}};")?;
    writeln!(out)?;
    writeln!(out, "// Function to play the {} sound", name)?;
    writeln!(out, "static inline void Play{}Sound(void) {{", title)?;
    writeln!(
        out,
        "    PlaySoundEffect({u}_TONES, {u}_DURATIONS, {u}_LENGTH);",
        u = upper
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "#endif // {}_SOUND_H", upper)
}

/// Render and write a header to `path`
pub fn write_c_header(melody: &Melody, name: &str, path: impl AsRef<Path>) -> Result<(), EmitError> {
    let header = render_c_header(melody, name)?;
    std::fs::write(path.as_ref(), header)?;
    log::info!("Header file written to: {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melody::Event;

    fn melody() -> Melody {
        Melody::new(vec![
            Event::Silence { duration: 0.5 },
            Event::Tone { frequency: 440, duration: 1.2 },
            Event::Tone { frequency: 1047, duration: 0.2 },
        ])
    }

    #[test]
    fn test_sound_name_from_path() {
        assert_eq!(sound_name_from_path("/music/level-1 theme.mp3"), "level1theme");
        assert_eq!(sound_name_from_path("boss_fight.wav"), "boss_fight");
        assert_eq!(sound_name_from_path("---.wav"), "sound");
        assert_eq!(sound_name_from_path("sfx/2fast.wav"), "sound_2fast");
    }

    #[test]
    fn test_digit_leading_file_still_renders() {
        let name = sound_name_from_path("1-up.wav");
        assert_eq!(name, "sound_1up");

        let header = render_c_header(&melody(), &name).unwrap();
        assert!(header.contains("#define SOUND_1UP_LENGTH 3"));
        assert!(header.contains("PlaySound_1UpSound"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("victory"), "Victory");
        assert_eq!(title_case("boss_fight"), "Boss_Fight");
        assert_eq!(title_case("level2up"), "Level2Up");
    }

    #[test]
    fn test_render_header() {
        let header = render_c_header(&melody(), "victory").unwrap();

        assert!(header.contains("#ifndef VICTORY_SOUND_H"));
        assert!(header.contains("#define VICTORY_LENGTH 3"));
        assert!(header.contains("const unsigned long VICTORY_TONES[] = {\n       0,  440, 1047\n};"));
        assert!(header.contains(
            "const unsigned long VICTORY_DURATIONS[] = {\n    0.500000, 1.200000, 0.200000\n};"
        ));
        assert!(header.contains("static inline void PlayVictorySound(void) {"));
        assert!(header.contains("PlaySoundEffect(VICTORY_TONES, VICTORY_DURATIONS, VICTORY_LENGTH);"));
        assert!(header.trim_end().ends_with("#endif // VICTORY_SOUND_H"));
    }

    #[test]
    fn test_tones_wrap_every_eight() {
        let events = (0..9)
            .map(|_| Event::Tone { frequency: 262, duration: 0.2 })
            .collect();
        let header = render_c_header(&Melody::new(events), "scale").unwrap();
        assert!(header.contains(
            "     262,  262,  262,  262,  262,  262,  262,  262,\n     262\n"
        ));
    }

    #[test]
    fn test_render_rejects_empty_and_bad_names() {
        assert!(matches!(
            render_c_header(&Melody::default(), "x"),
            Err(EmitError::EmptyMelody)
        ));
        assert!(matches!(
            render_c_header(&melody(), "2fast"),
            Err(EmitError::InvalidName(_))
        ));
    }

    #[test]
    fn test_write_header_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(default_header_path("victory"));
        write_c_header(&melody(), "victory", &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("VICTORY_TONES"));
        assert_eq!(path.file_name().unwrap(), "victory_sound.h");
    }
}
