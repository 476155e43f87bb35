// Lyrebird Music Generator — CLI entry point.
//
// Generates a scale, a random melody or a rule-based melody and writes it to
// MIDI (or JSON). The pipeline: build request → generate → serialize.
//
// Usage:
//   cargo run -p lyrebird_music -- scale [--key "D Major"] [--tempo BPM]
//   cargo run -p lyrebird_music -- random [--count N] [--seed N]
//   cargo run -p lyrebird_music -- rule-based [--contour arch] [--leap-probability P]
//     [--max-leap N] [--count N] [--seed N]
//
// Every subcommand also takes --note-length, --instrument, --octaves,
// --output, --format and --config (a JSON GenerationRequest whose fields the
// other flags override). Set RUST_LOG=debug for generation details.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lyrebird_music::export::ExportFormat;
use lyrebird_music::presets::{resolve_instrument, resolve_note_length};
use lyrebird_music::{Algorithm, Contour, GenerationRequest};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

/// Generate scales and melodies in major keys
#[derive(Parser)]
#[command(name = "generate")]
#[command(about = "Generate scales and melodies and write them to MIDI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ascending and descending scale with held tonics
    Scale {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Notes drawn uniformly at random from the key's scale
    Random {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        melody: MelodyArgs,
    },
    /// Stepwise melody following a contour, with occasional leaps
    RuleBased {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        melody: MelodyArgs,
        #[command(flatten)]
        shape: ShapeArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Key name, e.g. "C Major" or "Bb Major"
    #[arg(long)]
    key: Option<String>,
    /// Tempo in BPM
    #[arg(long)]
    tempo: Option<u32>,
    /// Note length: whole, half, quarter, eighth, sixteenth, or a multiplier
    #[arg(long)]
    note_length: Option<String>,
    /// Instrument name or General MIDI program number
    #[arg(long)]
    instrument: Option<String>,
    /// Comma-separated octave base pitches (default 48,60,72)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    octaves: Option<Vec<i32>>,
    /// Output file (defaults to a name derived from the generator)
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = FormatArg::Midi)]
    format: FormatArg,
    /// JSON request file to start from
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct MelodyArgs {
    /// Number of notes
    #[arg(long)]
    count: Option<usize>,
    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct ShapeArgs {
    /// Probability in [0, 1] of a leap instead of a step
    #[arg(long)]
    leap_probability: Option<f64>,
    /// Largest leap in scale degrees
    #[arg(long)]
    max_leap: Option<u32>,
    /// arch, ascending, descending or random
    #[arg(long)]
    contour: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Midi,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Midi => ExportFormat::Midi,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (algorithm, common, melody, shape) = match cli.command {
        Command::Scale { common } => (Algorithm::Scale, common, None, None),
        Command::Random { common, melody } => (Algorithm::Random, common, Some(melody), None),
        Command::RuleBased {
            common,
            melody,
            shape,
        } => (Algorithm::RuleBased, common, Some(melody), Some(shape)),
    };

    println!("=== Lyrebird Music Generator ===");

    println!("[1/3] Building request...");
    let request = build_request(&common, melody.as_ref(), shape.as_ref())?;
    println!("  Key: {}", request.key);
    println!("  Tempo: {} BPM", request.tempo);
    println!("  Note length: {} quarter(s)", request.note_length_fraction);
    println!("  Instrument: program {}", request.instrument);
    if algorithm != Algorithm::Scale {
        println!("  Notes: {}", request.note_count);
    }
    if algorithm == Algorithm::RuleBased {
        println!(
            "  Contour: {} (leap probability {}, max leap {})",
            request.shape.contour, request.shape.leap_probability, request.shape.max_leap_size
        );
    }

    let seed = melody.as_ref().and_then(|m| m.seed);
    let mut rng = if let Some(s) = seed {
        println!("  Seed: {s}");
        StdRng::seed_from_u64(s)
    } else {
        StdRng::from_os_rng()
    };

    println!("[2/3] Generating {algorithm:?}...");
    let result = algorithm
        .generate(&request, &mut rng)
        .context("generation failed")?;
    println!(
        "  {} notes, {:.2}s",
        result.notes.len(),
        result.total_duration()
    );

    let format = ExportFormat::from(common.format);
    let output = common
        .output
        .clone()
        .unwrap_or_else(|| format.file_name(&algorithm.default_filename(&request.key)));
    println!("[3/3] Writing to {}...", output.display());
    format
        .serializer()
        .write(&result, &output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("  Done!");
    if format == ExportFormat::Midi {
        println!();
        println!("Play with: timidity {} (or any MIDI player)", output.display());
    }
    Ok(())
}

/// Start from the config file (or defaults) and apply explicit flags on top.
fn build_request(
    common: &CommonArgs,
    melody: Option<&MelodyArgs>,
    shape: Option<&ShapeArgs>,
) -> Result<GenerationRequest> {
    let mut request = match &common.config {
        Some(path) => GenerationRequest::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GenerationRequest::default(),
    };

    if let Some(key) = &common.key {
        request.key = key.clone();
    }
    if let Some(tempo) = common.tempo {
        request.tempo = tempo;
    }
    if let Some(length) = &common.note_length {
        request.note_length_fraction = resolve_note_length(length)?;
    }
    if let Some(instrument) = &common.instrument {
        request.instrument = resolve_instrument(instrument)?;
    }
    if let Some(octaves) = &common.octaves {
        request.octave_bases = octaves.clone();
    }

    if let Some(count) = melody.and_then(|m| m.count) {
        request.note_count = count;
    }

    if let Some(shape) = shape {
        if let Some(p) = shape.leap_probability {
            request.shape.leap_probability = p;
        }
        if let Some(max) = shape.max_leap {
            request.shape.max_leap_size = max;
        }
        if let Some(contour) = &shape.contour {
            request.shape.contour = contour.parse::<Contour>()?;
        }
    }

    tracing::debug!(?request, "resolved request");
    Ok(request)
}
