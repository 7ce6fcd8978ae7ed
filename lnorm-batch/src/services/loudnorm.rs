//! EBU R128 loudness normalization filter
//!
//! Builds the ffmpeg `loudnorm` audio filter argument. Only the integrated
//! loudness target varies; true peak and loudness range are fixed.

use crate::error::{NormalizeError, NormalizeResult};
use std::fmt;

/// True-peak ceiling (dBTP)
pub const TRUE_PEAK_DB: f64 = -1.0;

/// Loudness range target (LU)
pub const LOUDNESS_RANGE_LU: f64 = 11.0;

/// Validated integrated loudness target (finite, negative LUFS)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessTarget(f64);

impl LoudnessTarget {
    pub fn new(lufs: f64) -> NormalizeResult<Self> {
        if lufs.is_finite() && lufs < 0.0 {
            Ok(Self(lufs))
        } else {
            Err(NormalizeError::InvalidTargetLoudness(lufs))
        }
    }

    pub fn lufs(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for LoudnessTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} LUFS", self.0)
    }
}

/// `loudnorm` filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnormFilter {
    pub integrated: LoudnessTarget,
    pub true_peak: f64,
    pub loudness_range: f64,
}

impl LoudnormFilter {
    pub fn new(integrated: LoudnessTarget) -> Self {
        Self {
            integrated,
            true_peak: TRUE_PEAK_DB,
            loudness_range: LOUDNESS_RANGE_LU,
        }
    }
}

impl fmt::Display for LoudnormFilter {
    /// Renders as `loudnorm=I=<target>:TP=-1:LRA=11`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "loudnorm=I={}:TP={}:LRA={}",
            self.integrated.lufs(),
            self.true_peak,
            self.loudness_range
        )
    }
}
