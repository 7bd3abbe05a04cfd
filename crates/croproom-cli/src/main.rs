//! Headless export: decode an image, apply saved edit settings, and write
//! the rendered slices to a directory.
//!
//! Usage examples:
//!   croproom photo.jpg --settings edit.json --output-dir out/
//!   croproom photo.png --split 3 --format jpeg --quality 90
//!   croproom photo.jpg --settings edit.json --seed 7 -v

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use croproom_core::geometry::image_bounds;
use croproom_core::{
    decode_image, export_to_sink, DecodeError, EditSettings, EncodedBuffer, ExportError,
    ExportFormat, ExportOptions, ExportSink, SinkError, Size, SplitPlan,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ============================================================================
// CLI argument definition
// ============================================================================

/// Render an edited image to PNG or JPEG files, optionally cut into
/// equal-width vertical slices.
#[derive(Parser, Debug)]
#[command(name = "croproom", version)]
struct Args {
    /// Source image (JPEG or PNG).
    input: PathBuf,

    /// Edit settings as JSON (transform, crop, adjustments, filters,
    /// curves, split). Missing fields take their defaults.
    #[arg(short, long, value_name = "FILE.json")]
    settings: Option<PathBuf>,

    /// Directory the exported files are written to. Created if missing.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// JPEG quality (1-100). Ignored for PNG.
    #[arg(short, long, default_value_t = 95, value_name = "1-100")]
    quality: u8,

    /// Preview container the crop was drawn in, as WIDTHxHEIGHT pixels.
    #[arg(long, value_name = "WxH", default_value = "800x800")]
    container: String,

    /// Cut the export into this many slices (1-5), overriding the settings file.
    #[arg(long, value_name = "N")]
    split: Option<u32>,

    /// Seed for film grain. Without it every run draws fresh noise.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between written slices, in milliseconds.
    #[arg(long, value_name = "MS")]
    pacing_ms: Option<u64>,

    /// Log pipeline stages (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Jpeg => ExportFormat::Jpeg,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
enum CliError {
    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not create output directory '{}': {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("invalid --container '{0}', expected WIDTHxHEIGHT")]
    Container(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

// ============================================================================
// File sink
// ============================================================================

/// Writes each export into a directory under its suggested filename.
struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            written: Vec::new(),
        }
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, file: &EncodedBuffer) -> Result<(), SinkError> {
        let path = self.dir.join(&file.filename);
        fs::write(&path, &file.bytes)
            .map_err(|e| SinkError::new(format!("{}: {}", path.display(), e)))?;
        self.written.push(path);
        Ok(())
    }
}

// ============================================================================
// Entry point
// ============================================================================

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(written) => {
            for path in &written {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "Export failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Vec<PathBuf>, CliError> {
    let bytes = fs::read(&args.input).map_err(|source| CliError::Read {
        path: args.input.clone(),
        source,
    })?;
    let image = decode_image(&bytes)?;
    info!(width = image.width, height = image.height, "Decoded {}", args.input.display());

    let mut settings = match &args.settings {
        Some(path) => load_settings(path)?,
        None => EditSettings::default(),
    };
    if let Some(count) = args.split {
        settings.split = SplitPlan::new(count);
    }

    let options = export_options(args);
    let container = parse_container(&args.container)?;
    let bounds = image_bounds(container, image.natural_size(), &settings.transform.normalized());

    fs::create_dir_all(&args.output_dir).map_err(|source| CliError::OutputDir {
        path: args.output_dir.clone(),
        source,
    })?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut sink = DirectorySink::new(&args.output_dir);

    export_to_sink(&image, &settings, bounds, &options, &mut rng, &mut sink, std::thread::sleep)?;
    Ok(sink.written)
}

fn load_settings(path: &Path) -> Result<EditSettings, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn export_options(args: &Args) -> ExportOptions {
    let defaults = ExportOptions::default();
    ExportOptions {
        format: args.format.into(),
        jpeg_quality: args.quality,
        slice_pacing_ms: args.pacing_ms.unwrap_or(defaults.slice_pacing_ms),
        filename_stem: args
            .input
            .file_stem()
            .map(|s| format!("{}-edited", s.to_string_lossy()))
            .unwrap_or_else(|| defaults.filename_stem.clone()),
        ..defaults
    }
}

/// Parse `WIDTHxHEIGHT` into a non-degenerate size.
fn parse_container(text: &str) -> Result<Size, CliError> {
    let invalid = || CliError::Container(text.to_string());
    let (w, h) = text.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f64 = w.trim().parse().map_err(|_| invalid())?;
    let height: f64 = h.trim().parse().map_err(|_| invalid())?;
    let size = Size::new(width, height);
    if size.is_degenerate() {
        return Err(invalid());
    }
    Ok(size)
}
