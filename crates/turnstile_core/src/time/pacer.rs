//! Target-interval frame pacing.

use std::thread;
use std::time::Duration;

use super::TickTimer;

/// Paces a loop to a target wall-clock interval.
///
/// When the display is not already providing pacing (vsync), [`pace`]
/// busy-waits, yielding the thread on every spin, until the interval
/// since the previous frame reaches the target. Overshoot is carried
/// into the next frame's error term so the *average* interval converges
/// on the target under jitter.
///
/// Catch-up policy: the carried error is clamped non-negative and folded
/// modulo the target interval, so it never exceeds one interval. A
/// severely delayed frame drops whole missed intervals instead of
/// replaying them as a burst; it costs at most one shortened successor
/// frame.
///
/// [`pace`]: FramePacer::pace
pub struct FramePacer {
    /// Target frame interval in seconds.
    target: f64,
    /// Pacing error carried from the previous frame, in `[0, target)`.
    carry: f64,
    timer: TickTimer,
}

impl FramePacer {
    /// Creates a pacer for the given target interval.
    ///
    /// # Panics
    ///
    /// Panics if `target` is zero.
    #[must_use]
    pub fn new(target: Duration) -> Self {
        let target = target.as_secs_f64();
        assert!(target > 0.0, "frame interval must be nonzero");
        Self {
            target,
            carry: 0.0,
            timer: TickTimer::new(),
        }
    }

    /// Target frame interval.
    #[must_use]
    pub fn target(&self) -> Duration {
        Duration::from_secs_f64(self.target)
    }

    /// Error carried into the next frame, in seconds. Always in
    /// `[0, target)`.
    #[must_use]
    pub fn carry(&self) -> f64 {
        self.carry
    }

    /// Blocks until the target interval since the previous frame has
    /// elapsed and returns the effective delta for this frame in seconds.
    ///
    /// With `vsync_paced` the spin is skipped entirely: presentation is
    /// assumed to block on the display's refresh already.
    pub fn pace(&mut self, vsync_paced: bool) -> f64 {
        let mut delta = self.carry + self.timer.tick();

        if !vsync_paced {
            while delta < self.target {
                thread::yield_now();
                delta += self.timer.tick();
            }
        }

        self.carry = Self::fold(delta - self.target, self.target);
        delta
    }

    /// Folds a pacing error into `[0, target)`: negative error clamps to
    /// zero, whole missed intervals are dropped.
    fn fold(error: f64, target: f64) -> f64 {
        if error > 0.0 {
            error - target * (error / target).floor()
        } else {
            0.0
        }
    }
}
