//! Transcoder diagnostic stream parsing
//!
//! ffmpeg writes human-readable status to stderr. Two substrings carry the
//! progress signal:
//! - `Duration: HH:MM:SS.ss` in the input summary (total length)
//! - `time=HH:MM:SS.ss` in the periodic status line (position reached)
//!
//! The status line is rewritten in place with `\r`, so the stream is split on
//! both `\r` and `\n`.

use lnorm_common::timecode::parse_timecode;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{self, BufRead};

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Duration: (\d{2}:\d{2}:\d{2}\.\d{2})").expect("valid duration pattern")
});

static ELAPSED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time=(\d{2}:\d{2}:\d{2}\.\d{2})").expect("valid elapsed pattern")
});

/// Extract the total duration (seconds) from a `Duration:` line
pub fn parse_duration(line: &str) -> Option<f64> {
    captured_seconds(&DURATION_PATTERN, line)
}

/// Extract the elapsed position (seconds) from a `time=` line
pub fn parse_elapsed(line: &str) -> Option<f64> {
    captured_seconds(&ELAPSED_PATTERN, line)
}

fn captured_seconds(pattern: &Regex, line: &str) -> Option<f64> {
    let caps = pattern.captures(line)?;
    parse_timecode(caps.get(1)?.as_str())
}

/// Per-file diagnostic scanner
///
/// Remembers the first usable duration and turns later `time=` lines into a
/// fraction of that duration.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticScan {
    duration: Option<f64>,
}

impl DiagnosticScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total duration, once a `Duration:` line has been seen
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Feed one line; returns `elapsed / duration` for `time=` lines
    ///
    /// The fraction is not clamped: ffmpeg can report a position slightly past
    /// the container duration.
    pub fn observe(&mut self, line: &str) -> Option<f64> {
        if self.duration.is_none() {
            // A zero duration is no denominator; keep looking
            self.duration = parse_duration(line).filter(|d| *d > 0.0);
        }

        let duration = self.duration?;
        parse_elapsed(line).map(|elapsed| elapsed / duration)
    }
}

/// Line iterator that treats both `\r` and `\n` as terminators
///
/// Invalid UTF-8 is replaced rather than aborting the scan; blank lines are
/// skipped.
pub struct DiagnosticLines<R> {
    reader: R,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> DiagnosticLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            done: false,
        }
    }

    fn take_line(&mut self) -> String {
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        line
    }
}

impl<R: BufRead> Iterator for DiagnosticLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            if available.is_empty() {
                self.done = true;
                if self.buf.is_empty() {
                    return None;
                }
                return Some(Ok(self.take_line()));
            }

            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    self.buf.extend_from_slice(&available[..pos]);
                    self.reader.consume(pos + 1);
                    if !self.buf.is_empty() {
                        return Some(Ok(self.take_line()));
                    }
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}
