//! # Loop Lifecycle Phases
//!
//! Each scheduler loop walks `Idle → Running → Stopping → Stopped`.
//! `Running → Stopping` happens when the shared running flag is observed
//! false at the top of the loop body; `Stopping → Stopped` after the
//! in-flight iteration completes (iterations are never interrupted).
//! Phases live in atomic cells so handles and tests can observe a loop
//! from other threads.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle phase of one scheduler loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LoopPhase {
    /// Not started yet.
    Idle = 0,
    /// Iterating.
    Running = 1,
    /// Observed the shutdown request; finishing the current iteration.
    Stopping = 2,
    /// Done. The loop's thread has exited its body.
    Stopped = 3,
}

impl LoopPhase {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Stopped,
        }
    }
}

/// An atomically observable [`LoopPhase`].
pub struct PhaseCell {
    raw: AtomicU8,
}

impl PhaseCell {
    /// Creates a cell in [`LoopPhase::Idle`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: AtomicU8::new(LoopPhase::Idle as u8),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn load(&self) -> LoopPhase {
        LoopPhase::from_raw(self.raw.load(Ordering::Acquire))
    }

    /// Moves the loop to `phase`.
    pub fn store(&self, phase: LoopPhase) {
        self.raw.store(phase as u8, Ordering::Release);
    }
}

impl Default for PhaseCell {
    fn default() -> Self {
        Self::new()
    }
}
