//! Event types for the batch worker
//!
//! The worker thread posts these to the interface thread over a channel. The
//! interface never reads worker state directly; everything it displays arrives
//! as one of these events.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Terminal result of one file's transcode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Output file exists on disk
    Succeeded,
    /// Output missing, or the transcoder could not be run
    Failed {
        /// Human-readable reason
        reason: String,
    },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Succeeded)
    }
}

/// Batch worker events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NormalizeEvent {
    /// Batch accepted and progress reset to zero
    BatchStarted {
        batch_id: Uuid,
        /// Number of input files
        total_files: usize,
        /// Output directory for the batch
        output_dir: PathBuf,
        /// Integrated loudness target (LUFS)
        target_lufs: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Transcode of one file started
    FileStarted {
        batch_id: Uuid,
        /// Position in the batch (0-based)
        index: usize,
        input: PathBuf,
        output: PathBuf,
    },

    /// Batch-wide fraction complete (0.0-1.0)
    Progress {
        batch_id: Uuid,
        fraction: f64,
    },

    /// Transcode of one file finished
    FileCompleted {
        batch_id: Uuid,
        /// Position in the batch (0-based)
        index: usize,
        input: PathBuf,
        output: PathBuf,
        outcome: FileOutcome,
    },

    /// Every file has been attempted; progress is 1.0
    BatchCompleted {
        batch_id: Uuid,
        succeeded: usize,
        failed: usize,
        output_dir: PathBuf,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl NormalizeEvent {
    /// Batch this event belongs to
    pub fn batch_id(&self) -> Uuid {
        match self {
            NormalizeEvent::BatchStarted { batch_id, .. }
            | NormalizeEvent::FileStarted { batch_id, .. }
            | NormalizeEvent::Progress { batch_id, .. }
            | NormalizeEvent::FileCompleted { batch_id, .. }
            | NormalizeEvent::BatchCompleted { batch_id, .. } => *batch_id,
        }
    }

    /// Event type name (matches the serialized `type` tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            NormalizeEvent::BatchStarted { .. } => "BatchStarted",
            NormalizeEvent::FileStarted { .. } => "FileStarted",
            NormalizeEvent::Progress { .. } => "Progress",
            NormalizeEvent::FileCompleted { .. } => "FileCompleted",
            NormalizeEvent::BatchCompleted { .. } => "BatchCompleted",
        }
    }
}
