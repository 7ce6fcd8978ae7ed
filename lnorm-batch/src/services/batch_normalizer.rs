//! Batch loudness normalizer
//!
//! Runs one transcode per input file, strictly in input order and one at a
//! time, turning each transcode's diagnostic stream into batch-wide progress.
//!
//! # Outcome policy
//! A file succeeded if its expected output exists on disk after the process
//! exits. The exit code is logged but does not decide the outcome. A failure
//! never stops the batch; every file is attempted and progress always ends at
//! exactly 1.0.

use crate::error::{NormalizeError, NormalizeResult};
use crate::services::diagnostics::DiagnosticScan;
use crate::services::loudnorm::{LoudnessTarget, LoudnormFilter};
use crate::services::progress::BatchProgress;
use crate::services::transcoder::{output_path_for, TranscodeRequest, Transcoder};
use lnorm_common::events::FileOutcome;
use lnorm_common::timecode::format_timecode;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Ordered input files, output directory and loudness target
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Input files; order fixes progress weighting and processing order
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Integrated loudness target (LUFS)
    pub target_lufs: f64,
}

impl BatchJob {
    pub fn new(inputs: Vec<PathBuf>, output_dir: impl Into<PathBuf>, target_lufs: f64) -> Self {
        Self {
            inputs,
            output_dir: output_dir.into(),
            target_lufs,
        }
    }

    /// Check preconditions that do not touch the filesystem
    pub fn validate(&self) -> NormalizeResult<LoudnessTarget> {
        if self.inputs.is_empty() {
            return Err(NormalizeError::NoInputFiles);
        }
        LoudnessTarget::new(self.target_lufs)
    }

    /// Validate and create the output directory if missing
    pub fn prepare(&self) -> NormalizeResult<LoudnessTarget> {
        let target = self.validate()?;
        std::fs::create_dir_all(&self.output_dir).map_err(|source| {
            NormalizeError::OutputDirectory {
                path: self.output_dir.clone(),
                source,
            }
        })?;
        Ok(target)
    }

    /// Per-file tasks in input order, all pending
    pub fn tasks(&self) -> Vec<FileTask> {
        self.inputs
            .iter()
            .map(|input| FileTask::new(input, &self.output_dir))
            .collect()
    }
}

/// Per-file status
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Pending,
    Running,
    Succeeded,
    Failed { reason: String },
}

/// One input file and its derived output
#[derive(Debug, Clone, PartialEq)]
pub struct FileTask {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: FileStatus,
}

impl FileTask {
    pub fn new(input: &Path, output_dir: &Path) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output_path_for(input, output_dir),
            status: FileStatus::Pending,
        }
    }

    /// Terminal outcome, `None` while pending or running
    pub fn outcome(&self) -> Option<FileOutcome> {
        match &self.status {
            FileStatus::Succeeded => Some(FileOutcome::Succeeded),
            FileStatus::Failed { reason } => Some(FileOutcome::Failed {
                reason: reason.clone(),
            }),
            FileStatus::Pending | FileStatus::Running => None,
        }
    }
}

/// Result of a finished batch
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub tasks: Vec<FileTask>,
    /// Last progress value reported (always 1.0)
    pub final_progress: f64,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == FileStatus::Succeeded)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.tasks.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileTask> {
        self.tasks
            .iter()
            .filter(|t| matches!(t.status, FileStatus::Failed { .. }))
    }
}

/// Receives progress and per-file notifications from a running batch
///
/// Any `FnMut(f64)` closure is an observer that only cares about progress.
pub trait BatchObserver {
    /// Batch-wide fraction complete (0.0-1.0)
    fn progress(&mut self, fraction: f64);

    fn file_started(&mut self, _index: usize, _task: &FileTask) {}

    fn file_completed(&mut self, _index: usize, _task: &FileTask) {}
}

impl<F: FnMut(f64)> BatchObserver for F {
    fn progress(&mut self, fraction: f64) {
        self(fraction)
    }
}

/// Sequential batch normalizer over a [`Transcoder`]
pub struct BatchNormalizer<T> {
    transcoder: T,
}

impl<T: Transcoder> BatchNormalizer<T> {
    pub fn new(transcoder: T) -> Self {
        Self { transcoder }
    }

    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    /// Run the batch, reporting progress to `observer`
    ///
    /// Errors only for failed preconditions (no inputs, invalid target,
    /// output directory cannot be created); nothing is transcoded then.
    pub fn run<O: BatchObserver>(
        &self,
        job: &BatchJob,
        mut observer: O,
    ) -> NormalizeResult<BatchReport> {
        self.run_observed(job, &mut observer)
    }

    pub fn run_observed(
        &self,
        job: &BatchJob,
        observer: &mut dyn BatchObserver,
    ) -> NormalizeResult<BatchReport> {
        let target = job.prepare()?;

        let filter = LoudnormFilter::new(target);
        let mut tasks = job.tasks();
        let mut progress = BatchProgress::new(tasks.len());

        info!(
            "Normalizing {} file(s) to {} into {}",
            tasks.len(),
            target,
            job.output_dir.display()
        );
        observer.progress(progress.current());

        for (index, task) in tasks.iter_mut().enumerate() {
            self.process_file(index, task, filter, &mut progress, observer);
        }

        let final_progress = progress.finish();
        observer.progress(final_progress);

        Ok(BatchReport {
            tasks,
            final_progress,
        })
    }

    fn process_file(
        &self,
        index: usize,
        task: &mut FileTask,
        filter: LoudnormFilter,
        progress: &mut BatchProgress,
        observer: &mut dyn BatchObserver,
    ) {
        task.status = FileStatus::Running;
        observer.file_started(index, task);

        let request = TranscodeRequest::new(&task.input, &task.output, filter);
        let mut scan = DiagnosticScan::new();
        let result = self.transcoder.transcode(&request, &mut |line: &str| {
            if let Some(fraction) = scan.observe(line) {
                if let Some(value) = progress.advance(index, fraction) {
                    observer.progress(value);
                }
            }
        });

        if let Some(duration) = scan.duration() {
            debug!("{}: duration {}", task.input.display(), format_timecode(duration));
        }

        task.status = match result {
            Ok(summary) if task.output.exists() => {
                if !summary.success() {
                    warn!(
                        "Transcoder exited with {:?} but {} exists; counting as success",
                        summary.exit_code,
                        task.output.display()
                    );
                }
                info!("Created: {}", task.output.display());
                FileStatus::Succeeded
            }
            Ok(summary) => {
                warn!(
                    "Failed to create {} (exit code {:?})",
                    task.output.display(),
                    summary.exit_code
                );
                FileStatus::Failed {
                    reason: match summary.exit_code {
                        Some(code) => format!("output not created (exit code {})", code),
                        None => "output not created (terminated by signal)".to_string(),
                    },
                }
            }
            Err(e) => {
                error!("Processing {} failed: {}", task.input.display(), e);
                FileStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        observer.file_completed(index, task);
    }
}
