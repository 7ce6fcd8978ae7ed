//! Batch-wide progress model
//!
//! File `i` of `N` owns the half-open slot `[i/N, (i+1)/N)`. Within the slot
//! progress is proportional to the file's elapsed/total duration. Reported
//! values never decrease during one batch run; only `finish` reaches 1.0.

/// Running fraction-complete for one batch
#[derive(Debug, Clone)]
pub struct BatchProgress {
    total_files: usize,
    current: f64,
}

impl BatchProgress {
    /// Start at 0.0 for a batch of `total_files`
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files: total_files.max(1),
            current: 0.0,
        }
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    /// Slot bounds `(lower, upper)` for the file at `index`
    pub fn slot(&self, index: usize) -> (f64, f64) {
        let n = self.total_files as f64;
        (index as f64 / n, (index + 1) as f64 / n)
    }

    /// Record progress within the file at `index`
    ///
    /// `file_fraction` is elapsed/duration for that file. Returns the new
    /// batch value when it advances, or `None` when it would move backwards or
    /// reach the end of the slot.
    pub fn advance(&mut self, index: usize, file_fraction: f64) -> Option<f64> {
        if !file_fraction.is_finite() {
            return None;
        }

        let n = self.total_files as f64;
        let fraction = file_fraction.clamp(0.0, 1.0);
        let (_, upper) = self.slot(index);
        let value = index as f64 / n + fraction / n;

        if value >= upper || value <= self.current {
            return None;
        }

        self.current = value;
        Some(value)
    }

    /// Force completion; always returns exactly 1.0
    pub fn finish(&mut self) -> f64 {
        self.current = 1.0;
        self.current
    }
}
