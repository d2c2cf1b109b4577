// Beepify command line
// Converts a WAV recording into a C header of beeper tones and durations

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use beepify_lib::audio::ingest_wav_file;
use beepify_lib::emit::{default_header_path, sound_name_from_path, write_c_header};
use beepify_lib::render::{render_square_wave, to_wav_bytes, PreviewConfig};
use beepify_lib::{Conversion, ConvertError, Converter, ConverterConfig};

/// Convert audio to a beeper melody header
#[derive(Parser, Debug)]
#[command(name = "beepify", version)]
#[command(about = "Convert a WAV recording into tone/duration arrays for a monophonic beeper")]
struct Args {
    /// Input WAV file
    input: PathBuf,

    /// Output header path (defaults to <name>_sound.h)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Sound name used for identifiers (defaults to the input file stem)
    #[arg(long)]
    name: Option<String>,

    /// JSON file with pipeline settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Analysis window duration in seconds
    #[arg(long)]
    window_duration: Option<f64>,

    /// Amplitude threshold for silence detection (0.001-0.1 is typical)
    #[arg(long)]
    silence_threshold: Option<f32>,

    /// Maximum number of events in the output
    #[arg(long)]
    max_events: Option<usize>,

    /// Also render a square-wave preview of the melody to this WAV file
    #[arg(long, value_name = "FILE")]
    preview: Option<PathBuf>,

    /// Print the conversion report as JSON
    #[arg(long)]
    report: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn load_config(args: &Args) -> Result<ConverterConfig, ConvertError> {
    let mut config = match &args.config {
        Some(path) => ConverterConfig::load(path)?,
        None => ConverterConfig::default(),
    };

    if let Some(window_duration) = args.window_duration {
        config.window_duration = window_duration;
    }
    if let Some(silence_threshold) = args.silence_threshold {
        config.silence_threshold = silence_threshold;
    }
    if let Some(max_events) = args.max_events {
        config.max_events = max_events;
    }

    Ok(config)
}

fn run(args: &Args) -> Result<(), ConvertError> {
    let converter = Converter::new(load_config(args)?)?;

    let audio = ingest_wav_file(&args.input)?;
    if audio.sample_rate != converter.config().sample_rate {
        log::info!(
            "Analyzing at the file's native {} Hz (configured {} Hz); no resampling is done",
            audio.sample_rate,
            converter.config().sample_rate
        );
    }

    let samples = audio.to_mono();
    let (melody, report) = match converter.convert(&samples, audio.sample_rate)? {
        Conversion::Melody { melody, report } => (melody, report),
        Conversion::NoSignal => {
            log::warn!("No suitable frequencies found in {}", args.input.display());
            return Ok(());
        }
    };

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| sound_name_from_path(&args.input));
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_header_path(&name));

    write_c_header(&melody, &name, &output)?;

    if let Some(preview_path) = &args.preview {
        let preview = PreviewConfig::default();
        let samples = render_square_wave(&melody, &preview);
        std::fs::write(preview_path, to_wav_bytes(&samples, preview.sample_rate)?)?;
        log::info!("Preview written to: {}", preview_path.display());
    }

    if args.report {
        println!("{}", report.to_json()?);
    }

    log::info!("Add '#include \"{}\"' to your C project", output.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    run(&args).with_context(|| format!("converting {}", args.input.display()))
}
