//! Batch normalization services

pub mod batch_normalizer;
pub mod diagnostics;
pub mod loudnorm;
pub mod progress;
pub mod transcoder;

pub use batch_normalizer::{
    BatchJob, BatchNormalizer, BatchObserver, BatchReport, FileStatus, FileTask,
};
pub use diagnostics::{parse_duration, parse_elapsed, DiagnosticLines, DiagnosticScan};
pub use loudnorm::{LoudnessTarget, LoudnormFilter};
pub use progress::BatchProgress;
pub use transcoder::{
    output_path_for, FfmpegTranscoder, RunSummary, TranscodeRequest, Transcoder,
};
