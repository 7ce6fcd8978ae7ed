//! Terminal interface
//!
//! The interface thread owns [`AppState`], starts the batch worker and drains
//! its events until the batch completes.

pub mod completion;
pub mod input_filter;
pub mod progress_view;

use crate::error::{NormalizeError, NormalizeResult};
use crate::services::{BatchNormalizer, BatchReport, Transcoder};
use crate::state::AppState;
use crate::worker::spawn_batch;
use completion::{completion_message, open_in_file_browser};
use progress_view::ProgressView;
use std::sync::Arc;
use tracing::warn;

/// Interface behavior switches
#[derive(Debug, Clone, Copy)]
pub struct InterfaceOptions {
    /// Open the output directory once the batch finishes
    pub open_output_dir: bool,
    /// Draw the progress bar
    pub show_progress: bool,
}

impl Default for InterfaceOptions {
    fn default() -> Self {
        Self {
            open_output_dir: true,
            show_progress: true,
        }
    }
}

/// Process the current selection and present the result
///
/// An empty selection is reported as a warning and nothing starts.
pub async fn run_batch<T>(
    state: &mut AppState,
    normalizer: Arc<BatchNormalizer<T>>,
    options: InterfaceOptions,
) -> NormalizeResult<BatchReport>
where
    T: Transcoder + 'static,
{
    let job = match state.job() {
        Ok(job) => job,
        Err(NormalizeError::NoInputFiles) => {
            eprintln!("No files selected. Please choose audio files to process.");
            return Err(NormalizeError::NoInputFiles);
        }
        Err(e) => return Err(e),
    };

    let (handle, mut events) = spawn_batch(normalizer, job)?;

    let mut view = if options.show_progress {
        ProgressView::new()
    } else {
        ProgressView::hidden()
    };

    while let Some(event) = events.recv().await {
        state.apply(&event);
        view.handle(&event);
    }

    let report = handle.wait().await?;

    if let Some(summary) = state.last_summary() {
        println!("{}", completion_message(summary));

        if options.open_output_dir {
            if let Err(e) = open_in_file_browser(&summary.output_dir) {
                warn!(
                    "Could not open {} in file browser: {}",
                    summary.output_dir.display(),
                    e
                );
            }
        }
    }
    state.reset_progress();

    Ok(report)
}
