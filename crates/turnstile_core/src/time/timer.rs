//! Per-loop delta measurement.

use std::time::Instant;

/// Measures elapsed wall-clock time between successive ticks of one loop.
///
/// Each loop owns its own timer; ticks are cheap (one monotonic clock
/// read).
pub struct TickTimer {
    last: Instant,
}

impl TickTimer {
    /// Creates a timer whose first tick measures from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Returns seconds elapsed since the previous tick (or since
    /// construction, on the first call) and restarts the measurement.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let delta = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        delta
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}
