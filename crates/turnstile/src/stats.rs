//! # Frame Timing Ledger
//!
//! The draw loop records one [`FrameStats`] per presented frame; the
//! [`FrameLedger`] accumulates them for the whole run. Queryable while
//! running through a [`RuntimeHandle`].
//!
//! [`RuntimeHandle`]: crate::RuntimeHandle

/// Timing record for one presented frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frame number (0-based).
    pub frame: u64,
    /// Effective frame interval reported by the pacer, in microseconds.
    pub interval_us: u64,
    /// Time spent inside the draw callback and present, in microseconds.
    pub work_us: u64,
}

/// Accumulated timing for a run of frames.
#[derive(Clone, Debug)]
pub struct FrameLedger {
    /// Target frame interval in microseconds (the pacing budget).
    pub budget_us: u64,
    /// Frames recorded.
    pub frames: u64,
    /// Sum of frame intervals.
    pub interval_us_sum: u64,
    /// Shortest frame interval observed.
    pub min_interval_us: u64,
    /// Longest frame interval observed.
    pub max_interval_us: u64,
    /// Frames whose draw work alone exceeded the budget.
    pub frames_over_budget: u64,
}

impl FrameLedger {
    /// Creates an empty ledger for the given pacing budget.
    #[must_use]
    pub fn new(budget_us: u64) -> Self {
        Self {
            budget_us,
            frames: 0,
            interval_us_sum: 0,
            min_interval_us: u64::MAX,
            max_interval_us: 0,
            frames_over_budget: 0,
        }
    }

    /// Records one frame.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames += 1;
        self.interval_us_sum += stats.interval_us;
        self.min_interval_us = self.min_interval_us.min(stats.interval_us);
        self.max_interval_us = self.max_interval_us.max(stats.interval_us);
        if stats.work_us > self.budget_us {
            self.frames_over_budget += 1;
        }
    }

    /// Average frame interval in milliseconds.
    #[must_use]
    pub fn avg_interval_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        (self.interval_us_sum as f64 / self.frames as f64) / 1000.0
    }

    /// Average frames per second over the run.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_interval_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Fraction of frames whose draw work exceeded the budget.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames as f64
    }

    /// Renders a human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let min_ms = if self.frames == 0 {
            0.0
        } else {
            self.min_interval_us as f64 / 1000.0
        };
        format!(
            "frames: {}  avg: {:.3} ms ({:.1} fps)  min: {:.3} ms  max: {:.3} ms  \
             over budget: {} ({:.1}%)",
            self.frames,
            self.avg_interval_ms(),
            self.avg_fps(),
            min_ms,
            self.max_interval_us as f64 / 1000.0,
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0,
        )
    }
}
