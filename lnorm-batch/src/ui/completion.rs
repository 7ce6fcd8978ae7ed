//! Completion notice
//!
//! Summarizes a finished batch and opens the output directory in the
//! platform file browser.

use crate::state::BatchSummary;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Text shown once a batch finishes
pub fn completion_message(summary: &BatchSummary) -> String {
    let mut message = format!(
        "Processing complete. Files saved to {}.",
        summary.output_dir.display()
    );

    if summary.failed > 0 {
        message.push_str(&format!(
            "\n{} of {} file(s) failed:",
            summary.failed,
            summary.succeeded + summary.failed
        ));
        for (input, reason) in &summary.failures {
            message.push_str(&format!("\n  {}: {}", input.display(), reason));
        }
    }

    message
}

fn file_browser_command() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Open `dir` in the OS file browser without waiting for it
pub fn open_in_file_browser(dir: &Path) -> io::Result<()> {
    Command::new(file_browser_command())
        .arg(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
