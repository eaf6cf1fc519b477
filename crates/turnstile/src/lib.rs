//! # TURNSTILE
//!
//! A fair multi-loop runtime: independent update, draw, and event loops,
//! each on its own thread, take turns owning one non-shareable rendering
//! context and keep draw frames paced to a target rate — with no central
//! dispatcher, only FIFO ticket queues.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                         TURNSTILE RUNTIME                         │
//! ├───────────────────────────────────────────────────────────────────┤
//! │                                                                   │
//! │  ┌──────────────┐      ┌──────────────┐      ┌────────────────┐   │
//! │  │ UPDATE loop  │      │  DRAW loop   │      │  EVENT pump    │   │
//! │  │ (own thread) │      │ (own thread) │      │ (main thread)  │   │
//! │  │              │      │              │      │                │   │
//! │  │ • unthrottled│      │ • FramePacer │      │ • backend poll │   │
//! │  │ • ctx only   │      │ • ctx+pipe   │      │ • ctx+events   │   │
//! │  │   on request │      │   tickets    │      │   tickets      │   │
//! │  └──────┬───────┘      └──────┬───────┘      └───────┬────────┘   │
//! │         │                     │                      │            │
//! │         ▼                     ▼                      ▼            │
//! │  ┌─────────────────────────────────────────────────────────────┐  │
//! │  │   TicketQueues: context │ draw pipeline │ event buffer      │  │
//! │  │   (FIFO hand-off; at most one context owner at any time)    │  │
//! │  └─────────────────────────────────────────────────────────────┘  │
//! │                                                                   │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `app`: the application callback trait and per-tick context
//! - `backend`: the opaque graphics collaborator boundary
//! - `config`: construction-time runtime configuration
//! - `events`: input events delivered to the application
//! - `runtime`: the scheduler itself
//! - `stats`: frame timing ledger
//!
//! ## Example
//!
//! ```rust,no_run
//! use turnstile::{App, HeadlessBackend, Runtime, RuntimeConfig, TickContext};
//!
//! struct Demo {
//!     frames: u64,
//! }
//!
//! impl App for Demo {
//!     fn init(&mut self, _ctx: &TickContext<'_>) {}
//!     fn update(&mut self, _ctx: &TickContext<'_>) {}
//!     fn draw(&mut self, ctx: &TickContext<'_>) {
//!         self.frames += 1;
//!         if self.frames == 600 {
//!             ctx.request_shutdown();
//!         }
//!     }
//! }
//!
//! let runtime = Runtime::new(
//!     Demo { frames: 0 },
//!     HeadlessBackend::new(),
//!     RuntimeConfig::default(),
//! )
//! .expect("config is valid");
//! let demo = runtime.run().expect("runtime failed");
//! assert_eq!(demo.frames, 600);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod runtime;
pub mod stats;

// Re-export the primitives crate the way applications will want it.
pub use turnstile_core as core;

pub use app::{App, TickContext};
pub use backend::{GraphicsBackend, HeadlessBackend};
pub use config::{ConfigError, RuntimeConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use events::InputEvent;
pub use runtime::{LoopId, Runtime, RuntimeHandle};
pub use stats::{FrameLedger, FrameStats};
