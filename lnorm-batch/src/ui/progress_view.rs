//! Terminal progress display
//!
//! Renders worker events as a single progress bar with one line per finished
//! file. Driven entirely from the interface thread.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use lnorm_common::events::{FileOutcome, NormalizeEvent};
use std::path::Path;

/// Bar resolution (positions per batch)
const BAR_LENGTH: u64 = 1000;

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}% {msg}";

pub struct ProgressView {
    bar: ProgressBar,
    total_files: usize,
}

impl ProgressView {
    /// Progress bar drawn to stderr
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(BAR_LENGTH))
    }

    /// Progress bar that draws nothing
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::with_draw_target(
            Some(BAR_LENGTH),
            ProgressDrawTarget::hidden(),
        ))
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self {
            bar,
            total_files: 0,
        }
    }

    /// Current bar position as a fraction (0.0-1.0)
    pub fn fraction(&self) -> f64 {
        self.bar.position() as f64 / BAR_LENGTH as f64
    }

    pub fn handle(&mut self, event: &NormalizeEvent) {
        match event {
            NormalizeEvent::BatchStarted { total_files, .. } => {
                self.total_files = *total_files;
                self.bar.set_position(0);
                self.bar.set_message(format!("{} file(s) queued", total_files));
            }
            NormalizeEvent::FileStarted { index, input, .. } => {
                self.bar.set_message(format!(
                    "[{}/{}] {}",
                    index + 1,
                    self.total_files,
                    display_name(input)
                ));
            }
            NormalizeEvent::Progress { fraction, .. } => {
                let position = (fraction.clamp(0.0, 1.0) * BAR_LENGTH as f64).round() as u64;
                if position > self.bar.position() || *fraction == 0.0 {
                    self.bar.set_position(position);
                }
            }
            NormalizeEvent::FileCompleted {
                input,
                output,
                outcome,
                ..
            } => match outcome {
                FileOutcome::Succeeded => {
                    self.bar.println(format!("  ok    {}", output.display()));
                }
                FileOutcome::Failed { reason } => {
                    self.bar
                        .println(format!("  FAIL  {}: {}", display_name(input), reason));
                }
            },
            NormalizeEvent::BatchCompleted {
                succeeded, failed, ..
            } => {
                self.bar.set_position(BAR_LENGTH);
                self.bar.finish_with_message(format!(
                    "done: {} succeeded, {} failed",
                    succeeded, failed
                ));
            }
        }
    }
}

impl Default for ProgressView {
    fn default() -> Self {
        Self::new()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
