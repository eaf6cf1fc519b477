//! # Ticket-Guarded Shared State
//!
//! The application value and the pending-event buffer are shared by the
//! three loops but never accessed concurrently: every access path holds
//! the appropriate ticket first (context or draw-pipeline for the
//! application, the event ticket for the buffer). The cells below encode
//! that discipline — `UnsafeCell` storage, a debug-asserted re-entrancy
//! flag, and manual `Send`/`Sync` — instead of paying for a second layer
//! of locking that could never contend.

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::events::InputEvent;

use super::Control;

/// Clears an in-use flag when dropped, including during an unwind out
/// of a panicking callback.
struct InUse<'a>(&'a AtomicBool);

impl Drop for InUse<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// State shared between the runtime's loops.
///
/// ## Access rules
///
/// - `with_app` requires the caller to hold the context ticket or the
///   draw-pipeline ticket (the draw loop holds both).
/// - `with_events` requires the caller to hold the event ticket.
///
/// Violations are caught by debug assertions; in release builds the
/// ticket discipline alone carries the guarantee.
pub(crate) struct Shared<A, B> {
    control: Arc<Control>,
    backend: B,
    app: UnsafeCell<A>,
    app_in_use: AtomicBool,
    pending_events: UnsafeCell<Vec<InputEvent>>,
    events_in_use: AtomicBool,
}

// SAFETY: the cells are only entered under their tickets, which provide
// the mutual exclusion and the happens-before edges between threads.
unsafe impl<A: Send, B: Send + Sync> Send for Shared<A, B> {}
// SAFETY: as above.
unsafe impl<A: Send, B: Send + Sync> Sync for Shared<A, B> {}

impl<A, B> Shared<A, B> {
    pub(crate) fn new(control: Arc<Control>, app: A, backend: B) -> Self {
        Self {
            control,
            backend,
            app: UnsafeCell::new(app),
            app_in_use: AtomicBool::new(false),
            pending_events: UnsafeCell::new(Vec::new()),
            events_in_use: AtomicBool::new(false),
        }
    }

    pub(crate) fn control(&self) -> &Control {
        &self.control
    }

    pub(crate) fn control_arc(&self) -> Arc<Control> {
        Arc::clone(&self.control)
    }

    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs `f` with exclusive access to the application.
    ///
    /// Caller must hold the context or draw-pipeline ticket.
    pub(crate) fn with_app<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        debug_assert!(
            !self.app_in_use.swap(true, Ordering::AcqRel),
            "application state entered without holding a ticket"
        );
        let _in_use = InUse(&self.app_in_use);
        // SAFETY: exclusive access is guaranteed by the ticket held by
        // the caller; the flag above catches violations in debug builds.
        f(unsafe { &mut *self.app.get() })
    }

    /// Runs `f` with exclusive access to the pending-event buffer.
    ///
    /// Caller must hold the event ticket.
    pub(crate) fn with_events<R>(&self, f: impl FnOnce(&mut Vec<InputEvent>) -> R) -> R {
        debug_assert!(
            !self.events_in_use.swap(true, Ordering::AcqRel),
            "event buffer entered without holding the event ticket"
        );
        let _in_use = InUse(&self.events_in_use);
        // SAFETY: exclusive access is guaranteed by the event ticket.
        f(unsafe { &mut *self.pending_events.get() })
    }

    /// Consumes the shared state and hands the application back. Only
    /// reachable once every loop has dropped its reference.
    pub(crate) fn into_app(self) -> A {
        self.app.into_inner()
    }
}
