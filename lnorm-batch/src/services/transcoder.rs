//! External transcoder client
//!
//! One ffmpeg invocation per input file:
//! `ffmpeg -y -i <input> -af loudnorm=I=<target>:TP=-1:LRA=11 -acodec libmp3lame <output>`
//!
//! The process is run to completion on the calling thread. Its stderr is read
//! incrementally so progress can be reported while it runs.

use crate::error::{NormalizeError, NormalizeResult};
use crate::services::diagnostics::DiagnosticLines;
use crate::services::loudnorm::LoudnormFilter;
use std::ffi::OsString;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Output container extension
pub const TARGET_EXTENSION: &str = "mp3";

/// ffmpeg audio encoder for the output
pub const TARGET_CODEC: &str = "libmp3lame";

/// Binary name looked up on PATH when nothing else is configured
pub const DEFAULT_BINARY: &str = "ffmpeg";

/// Output path for an input: output directory + input stem + `.mp3`
///
/// The input extension is always replaced, whatever it was.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));

    let mut file_name = stem;
    file_name.push(".");
    file_name.push(TARGET_EXTENSION);
    output_dir.join(file_name)
}

/// One file's transcode parameters
#[derive(Debug, Clone)]
pub struct TranscodeRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub filter: LoudnormFilter,
}

impl TranscodeRequest {
    pub fn new(input: &Path, output: &Path, filter: LoudnormFilter) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            filter,
        }
    }

    /// Arguments following the binary name
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from("-y"),
            OsString::from("-i"),
            self.input.clone().into_os_string(),
            OsString::from("-af"),
            OsString::from(self.filter.to_string()),
            OsString::from("-acodec"),
            OsString::from(TARGET_CODEC),
            self.output.clone().into_os_string(),
        ]
    }
}

/// How the transcoder process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Exit code, `None` if terminated by a signal
    pub exit_code: Option<i32>,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// External-process seam for the batch normalizer
///
/// Implementations block until the transcode finishes, calling `on_line` for
/// each diagnostic line as it is produced.
pub trait Transcoder: Send + Sync {
    fn transcode(
        &self,
        request: &TranscodeRequest,
        on_line: &mut dyn FnMut(&str),
    ) -> NormalizeResult<RunSummary>;
}

/// ffmpeg process transcoder
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    binary: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Pick the transcoder binary
    ///
    /// Priority: explicit path, then a bundled `ffmpeg/ffmpeg` (`ffmpeg.exe`
    /// on Windows) under the working directory, then `ffmpeg` on PATH.
    pub fn locate(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }

        let bundled = bundled_binary_path();
        if bundled.is_file() {
            debug!("Using bundled transcoder {}", bundled.display());
            return Self::new(bundled);
        }

        Self::new(DEFAULT_BINARY)
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Verify the binary runs; returns the first line of `-version`
    pub fn probe(&self) -> NormalizeResult<String> {
        let output = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| NormalizeError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }
}

fn bundled_binary_path() -> PathBuf {
    let file_name = if cfg!(target_os = "windows") {
        "ffmpeg.exe"
    } else {
        "ffmpeg"
    };
    PathBuf::from("ffmpeg").join(file_name)
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(
        &self,
        request: &TranscodeRequest,
        on_line: &mut dyn FnMut(&str),
    ) -> NormalizeResult<RunSummary> {
        debug!(
            binary = %self.binary.display(),
            args = ?request.args(),
            "Starting transcoder"
        );

        let mut child = Command::new(&self.binary)
            .args(request.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| NormalizeError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        let Some(stderr) = child.stderr.take() else {
            // Reap the child before reporting
            let _ = child.kill();
            let _ = child.wait();
            return Err(NormalizeError::MissingDiagnosticStream);
        };

        for line in DiagnosticLines::new(BufReader::new(stderr)) {
            match line {
                Ok(line) => on_line(&line),
                Err(e) => {
                    warn!("Diagnostic stream read failed: {}", e);
                    break;
                }
            }
        }

        let status = child.wait().map_err(NormalizeError::Wait)?;
        Ok(RunSummary {
            exit_code: status.code(),
        })
    }
}
