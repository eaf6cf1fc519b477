//! # Synchronization Primitives for the Multi-Loop Runtime
//!
//! ## The Problem
//!
//! ```text
//! Update thread:  wants the draw state, sometimes the context
//! Draw thread:    wants the context, then the draw state
//! Event pump:     wants the context and the event buffer
//!
//! Plain Mutex:    whoever the OS wakes first wins → starvation, jitter
//! ```
//!
//! ## The Solution: Ticket Hand-Off
//!
//! ```text
//!  acquire()      acquire()      acquire()
//!     │              │              │
//!     ▼              ▼              ▼
//!  ┌──────┐  one  ┌──────┐  one  ┌──────┐
//!  │ T1   │<──────│ T2   │<──────│ T3   │     each ticket waits on its
//!  │ held │ waits │ gate │ waits │ gate │     immediate predecessor only
//!  └──────┘       └──────┘       └──────┘
//!                                    ▲
//!                        queue tail ─┘  (weak, non-owning)
//! ```
//!
//! Ordering is structural: no FIFO container, no condvar broadcast, O(1)
//! per hand-off regardless of queue depth.

mod context;
mod phase;
mod ticket;

pub use context::{thread_owns_context, ContextClaim};
pub use phase::{LoopPhase, PhaseCell};
pub use ticket::{Ticket, TicketQueue};
