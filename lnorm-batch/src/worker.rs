//! Background batch worker
//!
//! The batch runs on one blocking worker thread. It owns the transcoder
//! process and its stderr; the only thing it shares with the interface is the
//! event channel. The interface drains the channel on its own schedule.
//!
//! There is no cancellation: once spawned, a batch runs to completion.

use crate::error::{NormalizeError, NormalizeResult};
use crate::services::{BatchJob, BatchNormalizer, BatchObserver, BatchReport, FileTask, Transcoder};
use chrono::Utc;
use lnorm_common::events::{FileOutcome, NormalizeEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Forwards batch notifications to the event channel
struct EventForwarder {
    batch_id: Uuid,
    tx: mpsc::UnboundedSender<NormalizeEvent>,
}

impl EventForwarder {
    fn emit(&self, event: NormalizeEvent) {
        // Receiver gone means nobody is watching; the batch still finishes
        if self.tx.send(event).is_err() {
            debug!("Event receiver dropped for batch {}", self.batch_id);
        }
    }
}

impl BatchObserver for EventForwarder {
    fn progress(&mut self, fraction: f64) {
        self.emit(NormalizeEvent::Progress {
            batch_id: self.batch_id,
            fraction,
        });
    }

    fn file_started(&mut self, index: usize, task: &FileTask) {
        self.emit(NormalizeEvent::FileStarted {
            batch_id: self.batch_id,
            index,
            input: task.input.clone(),
            output: task.output.clone(),
        });
    }

    fn file_completed(&mut self, index: usize, task: &FileTask) {
        let outcome = task.outcome().unwrap_or_else(|| FileOutcome::Failed {
            reason: "not processed".to_string(),
        });
        self.emit(NormalizeEvent::FileCompleted {
            batch_id: self.batch_id,
            index,
            input: task.input.clone(),
            output: task.output.clone(),
            outcome,
        });
    }
}

/// Handle to a running batch
pub struct BatchHandle {
    pub batch_id: Uuid,
    join: JoinHandle<NormalizeResult<BatchReport>>,
}

impl BatchHandle {
    /// Wait for the worker to finish
    pub async fn wait(self) -> NormalizeResult<BatchReport> {
        self.join
            .await
            .map_err(|e| NormalizeError::Worker(e.to_string()))?
    }
}

/// Start a batch on a blocking worker thread
///
/// Preconditions are checked (and the output directory created) before the
/// worker starts, so those errors surface immediately. Returns the handle and
/// the receiving end of the event channel.
///
/// Must be called from within a tokio runtime.
pub fn spawn_batch<T>(
    normalizer: Arc<BatchNormalizer<T>>,
    job: BatchJob,
) -> NormalizeResult<(BatchHandle, mpsc::UnboundedReceiver<NormalizeEvent>)>
where
    T: Transcoder + 'static,
{
    let target = job.prepare()?;

    let batch_id = Uuid::new_v4();
    let (tx, rx) = mpsc::unbounded_channel();
    let mut forwarder = EventForwarder { batch_id, tx };

    forwarder.emit(NormalizeEvent::BatchStarted {
        batch_id,
        total_files: job.inputs.len(),
        output_dir: job.output_dir.clone(),
        target_lufs: target.lufs(),
        timestamp: Utc::now(),
    });
    info!("Batch {} started with {} file(s)", batch_id, job.inputs.len());

    let join = tokio::task::spawn_blocking(move || {
        let report = normalizer.run_observed(&job, &mut forwarder)?;

        forwarder.emit(NormalizeEvent::BatchCompleted {
            batch_id,
            succeeded: report.succeeded(),
            failed: report.failed(),
            output_dir: job.output_dir.clone(),
            timestamp: Utc::now(),
        });
        info!(
            "Batch {} complete: {} succeeded, {} failed",
            batch_id,
            report.succeeded(),
            report.failed()
        );

        Ok(report)
    });

    Ok((BatchHandle { batch_id, join }, rx))
}
