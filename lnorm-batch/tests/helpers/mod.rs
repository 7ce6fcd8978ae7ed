//! Shared test helpers
//!
//! `ScriptedTranscoder` stands in for ffmpeg: each input file name maps to a
//! script of diagnostic lines, whether to create the output, and an exit code.

#![allow(dead_code)]

use lnorm_batch::services::{RunSummary, TranscodeRequest, Transcoder};
use lnorm_batch::{NormalizeError, NormalizeResult};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Scripted behavior for one input file
#[derive(Debug, Clone)]
pub struct Script {
    pub lines: Vec<String>,
    pub create_output: bool,
    pub exit_code: Option<i32>,
    pub spawn_fails: bool,
}

impl Script {
    /// Successful transcode emitting `lines`
    pub fn ok(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            create_output: true,
            exit_code: Some(0),
            spawn_fails: false,
        }
    }

    /// Successful transcode emitting pre-built `lines`
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            ..Self::ok(&[])
        }
    }

    /// Transcode that exits non-zero without creating the output
    pub fn no_output(lines: &[&str]) -> Self {
        Self {
            create_output: false,
            exit_code: Some(1),
            ..Self::ok(lines)
        }
    }

    /// Binary cannot be started
    pub fn spawn_failure() -> Self {
        Self {
            lines: Vec::new(),
            create_output: false,
            exit_code: None,
            spawn_fails: true,
        }
    }

    pub fn with_exit_code(mut self, exit_code: Option<i32>) -> Self {
        self.exit_code = exit_code;
        self
    }
}

/// Fake transcoder keyed by input file name
#[derive(Default)]
pub struct ScriptedTranscoder {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<TranscodeRequest>>,
}

impl ScriptedTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, input_name: &str, script: Script) -> Self {
        self.scripts.insert(input_name.to_string(), script);
        self
    }

    /// Requests received, in call order
    pub fn calls(&self) -> Vec<TranscodeRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_inputs(&self) -> Vec<PathBuf> {
        self.calls().into_iter().map(|r| r.input).collect()
    }
}

impl Transcoder for ScriptedTranscoder {
    fn transcode(
        &self,
        request: &TranscodeRequest,
        on_line: &mut dyn FnMut(&str),
    ) -> NormalizeResult<RunSummary> {
        self.calls.lock().unwrap().push(request.clone());

        let name = request
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let script = self
            .scripts
            .get(&name)
            .cloned()
            .unwrap_or_else(|| Script::ok(&[]));

        if script.spawn_fails {
            return Err(NormalizeError::Spawn {
                binary: PathBuf::from("ffmpeg"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }

        for line in &script.lines {
            on_line(line);
        }

        if script.create_output {
            std::fs::write(&request.output, b"ID3").unwrap();
        }

        Ok(RunSummary {
            exit_code: script.exit_code,
        })
    }
}

/// Typical ffmpeg stderr for a file of `duration` with status lines at `times`
pub fn ffmpeg_lines(duration: &str, times: &[&str]) -> Vec<String> {
    let mut lines = vec![
        "ffmpeg version 6.1 Copyright (c) 2000-2023 the FFmpeg developers".to_string(),
        "Input #0, wav, from 'in.wav':".to_string(),
        format!("  Duration: {}, bitrate: 1411 kb/s", duration),
        "Stream mapping:".to_string(),
    ];
    for time in times {
        lines.push(format!(
            "size=     256kB time={} bitrate= 128.0kbits/s speed=40.1x",
            time
        ));
    }
    lines
}
