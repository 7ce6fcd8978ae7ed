//! lnorm-batch - Batch loudness normalizer
//!
//! Normalizes each input file to the target integrated loudness and encodes it
//! to MP3 with ffmpeg, showing batch progress while the worker runs.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use lnorm_batch::services::{BatchNormalizer, FfmpegTranscoder};
use lnorm_batch::ui::{run_batch, InterfaceOptions};
use lnorm_batch::AppState;
use lnorm_common::config::{LoggingConfig, SettingsPathResolver, SettingsStore};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for lnorm-batch
#[derive(Parser, Debug)]
#[command(name = "lnorm-batch")]
#[command(about = "Loudness-normalize audio files to MP3 with ffmpeg")]
#[command(version)]
struct Args {
    /// Audio files to process (.m4a .aac .wav .mp3 .ogg)
    files: Vec<PathBuf>,

    /// Output directory (remembered for the next run)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Target integrated loudness in LUFS, -23 to -14
    #[arg(short, long, allow_negative_numbers = true)]
    target_lufs: Option<f64>,

    /// ffmpeg binary (default: bundled ffmpeg/, then PATH)
    #[arg(long, env = "LNORM_FFMPEG")]
    ffmpeg: Option<PathBuf>,

    /// Settings file location
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Do not open the output directory when done
    #[arg(long)]
    no_open: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let settings_path = SettingsPathResolver::new()
        .with_explicit(args.settings.clone())
        .resolve();
    let store = SettingsStore::new(settings_path);

    // Logging options come from the settings file itself
    let logging = store
        .try_load()
        .ok()
        .flatten()
        .map(|settings| settings.logging)
        .unwrap_or_default();
    init_tracing(&logging)?;

    info!("Starting lnorm-batch {}", env!("CARGO_PKG_VERSION"));
    info!("Settings: {}", store.path().display());

    let mut state = AppState::load(store);

    if let Some(dir) = &args.output_dir {
        state
            .set_output_dir(dir)
            .context("Failed to save output directory")?;
    }
    if let Some(lufs) = args.target_lufs {
        state
            .set_target_lufs(lufs)
            .context("Invalid target loudness")?;
    }

    let given = args.files.len();
    let accepted = state.add_files(args.files);
    if accepted < given {
        warn!("{} of {} path(s) skipped (not audio files)", given - accepted, given);
    }

    let explicit_binary = args.ffmpeg.or_else(|| state.settings().ffmpeg_path.clone());
    let transcoder = FfmpegTranscoder::locate(explicit_binary.as_deref());
    match transcoder.probe() {
        Ok(version) => info!("Transcoder: {} ({})", transcoder.binary().display(), version),
        Err(e) => warn!("Transcoder check failed: {}", e),
    }

    let normalizer = Arc::new(BatchNormalizer::new(transcoder));
    let options = InterfaceOptions {
        open_output_dir: !args.no_open,
        show_progress: true,
    };

    let report = run_batch(&mut state, normalizer, options).await?;

    if report.failed() > 0 {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Install the tracing subscriber
///
/// `RUST_LOG` overrides the configured level. Logs go to the configured file
/// when one is set, otherwise to stderr.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lnorm_batch={level},lnorm_common={level}",
            level = logging.level
        ))
    });

    let (file_layer, stderr_layer) = match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => (None, Some(fmt::layer().with_writer(std::io::stderr))),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}
