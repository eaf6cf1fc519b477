//! # TURNSTILE Core
//!
//! Synchronization and timing primitives for the TURNSTILE multi-loop
//! runtime:
//!
//! - A **ticket queue**: fair, order-preserving mutual exclusion where
//!   waiters are served strictly in arrival order, built from chained
//!   hand-off rather than a wait-queue container.
//! - **Context ownership tracking**: a per-thread record of whether the
//!   calling thread currently has the (thread-affine) graphics context
//!   bound.
//! - **Loop phases**: the `Idle → Running → Stopping → Stopped` lifecycle
//!   of a scheduler loop, observable across threads.
//! - **Timing**: per-loop delta measurement and target-interval frame
//!   pacing with a carried error term.
//!
//! ## Architecture Rules
//!
//! 1. **No policy here** - this crate knows nothing about windows,
//!    rendering, or callbacks; it is the leaf of the workspace
//! 2. **O(1) hand-off** - lock transfer cost never depends on queue depth
//! 3. **Cooperative cancellation only** - nothing in this crate blocks
//!    forever unless its predecessor is never released

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod sync;
pub mod time;

pub use sync::{thread_owns_context, ContextClaim, LoopPhase, PhaseCell, Ticket, TicketQueue};
pub use time::{FramePacer, TickTimer};
