//! Error types for lnorm-batch
//!
//! Only failures detected before the first file is touched reach the caller
//! of a batch. Per-file transcode failures are recorded in the batch report.

use std::path::PathBuf;
use thiserror::Error;

/// Batch normalization error
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Nothing to process
    #[error("No input files selected")]
    NoInputFiles,

    /// Loudness target is not a finite negative LUFS value
    #[error("Invalid target loudness: {0} LUFS")]
    InvalidTargetLoudness(f64),

    /// Output directory could not be created
    #[error("Cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Transcoder process could not be started
    #[error("Failed to start {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the transcoder process failed
    #[error("Failed waiting for transcoder: {0}")]
    Wait(#[source] std::io::Error),

    /// Transcoder stderr was not captured
    #[error("Transcoder diagnostic stream unavailable")]
    MissingDiagnosticStream,

    /// Background worker panicked or was dropped
    #[error("Batch worker failed: {0}")]
    Worker(String),

    /// lnorm-common error
    #[error("Common error: {0}")]
    Common(#[from] lnorm_common::Error),
}

/// Result type for batch operations
pub type NormalizeResult<T> = Result<T, NormalizeError>;
