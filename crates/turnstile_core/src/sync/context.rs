//! # Thread-Affine Context Ownership
//!
//! The graphics context is an OS resource that may be bound to at most
//! one thread at a time, and only the owning thread may issue graphics
//! calls. The runtime passes ownership explicitly through the call stack
//! (a [`ContextClaim`] travels inside the scheduler's binding guard); the
//! thread-local flag exists so deeply nested user code can still ask
//! "do I currently own a context" where no parameter can carry it.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    /// Whether the current thread has the graphics context bound.
    static OWNS_CONTEXT: Cell<bool> = const { Cell::new(false) };
}

/// Returns true if the calling thread currently has the graphics context
/// bound.
///
/// Callable from arbitrarily deep user code, e.g. to assert that a
/// resource upload is legal from the current thread.
#[must_use]
pub fn thread_owns_context() -> bool {
    OWNS_CONTEXT.with(Cell::get)
}

/// Per-thread record that the calling thread owns the graphics context.
///
/// Created when the context is bound and dropped when it is unbound. The
/// claim is deliberately `!Send`: context ownership is thread-affine and
/// must end on the thread it began on.
pub struct ContextClaim {
    /// Context ownership cannot move between threads.
    _thread_affine: PhantomData<*const ()>,
}

impl ContextClaim {
    /// Records the calling thread as the context owner.
    ///
    /// Binding while already bound is a programmer error, reported via
    /// debug assertion.
    #[must_use]
    pub fn bind() -> Self {
        debug_assert!(
            !thread_owns_context(),
            "graphics context bound twice on the same thread"
        );
        OWNS_CONTEXT.with(|flag| flag.set(true));
        Self {
            _thread_affine: PhantomData,
        }
    }
}

impl Drop for ContextClaim {
    fn drop(&mut self) {
        OWNS_CONTEXT.with(|flag| flag.set(false));
    }
}
