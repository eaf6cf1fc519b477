//! # Runtime Error Types
//!
//! All errors that can surface from the scheduler. Precondition
//! violations (double context bind, re-entrant state access) are debug
//! assertions, not errors; fatal lock-primitive failures abort the
//! process inside parking_lot and never reach this enum.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while constructing or running the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The configuration was rejected before the runtime started.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The OS refused to spawn a loop thread.
    #[error("failed to spawn {loop_name} loop thread: {source}")]
    Spawn {
        /// Which loop could not be started.
        loop_name: &'static str,
        /// The underlying OS error.
        source: std::io::Error,
    },

    /// A user callback panicked; the runtime wound its sibling loops down
    /// and joined them. `shutdown` was not invoked.
    #[error("{loop_name} loop panicked; runtime wound down")]
    LoopPanicked {
        /// Which loop's callback panicked.
        loop_name: &'static str,
    },

    /// The injected-event channel is at capacity.
    #[error("event channel full (capacity {capacity})")]
    EventChannelFull {
        /// The configured channel capacity.
        capacity: usize,
    },

    /// The shared loop state outlived `run` (a handle clone leaked into
    /// a loop callback), so the application could not be handed back.
    #[error("shared loop state leaked; cannot reclaim the application")]
    SharedStateLeaked,
}

/// Result alias for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
