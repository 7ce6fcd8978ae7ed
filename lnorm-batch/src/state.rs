//! Application state owned by the interface thread
//!
//! Holds the selected files, persisted settings and the progress the interface
//! displays. The worker never touches it; progress arrives as events and is
//! applied here.

use crate::error::{NormalizeError, NormalizeResult};
use crate::services::BatchJob;
use crate::ui::input_filter::accept_audio_files;
use lnorm_common::config::{
    is_valid_target_lufs, Settings, SettingsStore, MAX_TARGET_LUFS, MIN_TARGET_LUFS,
};
use lnorm_common::events::{FileOutcome, NormalizeEvent};
use lnorm_common::Error as CommonError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Outcome summary of the last finished batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub output_dir: PathBuf,
    pub succeeded: usize,
    pub failed: usize,
    /// Failed inputs with their reasons, in input order
    pub failures: Vec<(PathBuf, String)>,
}

/// Interface-side application state
#[derive(Debug)]
pub struct AppState {
    store: SettingsStore,
    settings: Settings,
    selected_files: Vec<PathBuf>,
    progress: f64,
    active_batch: Option<Uuid>,
    failures: Vec<(PathBuf, String)>,
    last_summary: Option<BatchSummary>,
}

impl AppState {
    /// Load settings from `store` (creating the file if missing)
    pub fn load(store: SettingsStore) -> Self {
        let settings = store.load_or_create();
        Self::with_settings(store, settings)
    }

    pub fn with_settings(store: SettingsStore, settings: Settings) -> Self {
        Self {
            store,
            settings,
            selected_files: Vec::new(),
            progress: 0.0,
            active_batch: None,
            failures: Vec::new(),
            last_summary: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selected_files(&self) -> &[PathBuf] {
        &self.selected_files
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_running(&self) -> bool {
        self.active_batch.is_some()
    }

    pub fn last_summary(&self) -> Option<&BatchSummary> {
        self.last_summary.as_ref()
    }

    /// Append audio files to the selection; returns how many were accepted
    pub fn add_files<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let accepted = accept_audio_files(paths);
        let count = accepted.len();
        self.selected_files.extend(accepted);
        count
    }

    /// Replace the selection
    pub fn select_files<I>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.selected_files.clear();
        self.add_files(paths)
    }

    /// Change and persist the output directory
    pub fn set_output_dir(&mut self, dir: &Path) -> Result<bool, CommonError> {
        self.store.set_output_dir(&mut self.settings, dir)
    }

    /// Change and persist the loudness target (inclusive [-23, -14])
    pub fn set_target_lufs(&mut self, lufs: f64) -> Result<(), CommonError> {
        if !is_valid_target_lufs(lufs) {
            return Err(CommonError::InvalidInput(format!(
                "target loudness must be between {} and {} LUFS, got {}",
                MIN_TARGET_LUFS, MAX_TARGET_LUFS, lufs
            )));
        }
        if self.settings.target_lufs != lufs {
            self.settings.target_lufs = lufs;
            self.store.save(&self.settings)?;
        }
        Ok(())
    }

    /// Batch job for the current selection
    pub fn job(&self) -> NormalizeResult<BatchJob> {
        if self.selected_files.is_empty() {
            return Err(NormalizeError::NoInputFiles);
        }
        Ok(BatchJob::new(
            self.selected_files.clone(),
            self.settings.output_dir.clone(),
            self.settings.target_lufs,
        ))
    }

    /// Apply a worker event
    ///
    /// Events from a batch other than the active one are ignored once a
    /// batch has started.
    pub fn apply(&mut self, event: &NormalizeEvent) {
        if let NormalizeEvent::BatchStarted { batch_id, .. } = event {
            self.active_batch = Some(*batch_id);
            self.progress = 0.0;
            self.failures.clear();
            return;
        }

        if self.active_batch != Some(event.batch_id()) {
            return;
        }

        match event {
            NormalizeEvent::Progress { fraction, .. } => {
                if *fraction > self.progress {
                    self.progress = fraction.min(1.0);
                }
            }
            NormalizeEvent::FileCompleted {
                input,
                outcome: FileOutcome::Failed { reason },
                ..
            } => {
                self.failures.push((input.clone(), reason.clone()));
            }
            NormalizeEvent::BatchCompleted {
                succeeded,
                failed,
                output_dir,
                ..
            } => {
                self.progress = 1.0;
                self.active_batch = None;
                self.last_summary = Some(BatchSummary {
                    output_dir: output_dir.clone(),
                    succeeded: *succeeded,
                    failed: *failed,
                    failures: std::mem::take(&mut self.failures),
                });
            }
            _ => {}
        }
    }

    /// Back to zero after the completion notice
    pub fn reset_progress(&mut self) {
        self.progress = 0.0;
    }
}
