//! # Graphics Backend Boundary
//!
//! The rendering context, window, and input source live behind
//! [`GraphicsBackend`]. The runtime only ever binds/unbinds the context,
//! presents frames, and drains events; everything else about graphics is
//! deliberately opaque.
//!
//! [`HeadlessBackend`] is the no-window configuration: every operation is
//! a counter bump, which makes it both the headless production variant
//! and the instrumented double the test suite asserts against.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::events::InputEvent;

/// The opaque, thread-affine graphics collaborator.
///
/// Implementations wrap whatever windowing/graphics API is in use. The
/// runtime guarantees:
///
/// - `bind_context` / `unbind_context` calls are paired, and only one
///   thread is between them at any instant (enforced by the context
///   ticket queue);
/// - `present` is only called with the context bound to the calling
///   thread;
/// - `poll_events` is only called from the event pump, with the event
///   ticket held.
pub trait GraphicsBackend: Send + Sync + 'static {
    /// Binds the rendering context to the calling thread.
    fn bind_context(&self);

    /// Releases the rendering context from the calling thread.
    fn unbind_context(&self);

    /// Presents the finished frame (buffer swap).
    fn present(&self);

    /// True when presentation already blocks on the display's refresh,
    /// in which case the draw loop skips its pacing spin.
    fn vsync(&self) -> bool {
        false
    }

    /// Drains pending input events into `out`.
    fn poll_events(&self, out: &mut Vec<InputEvent>) {
        let _ = out;
    }
}

/// A backend with no window and no GPU.
///
/// Bind/unbind/present become atomic counters, and the bind counter
/// doubles as an exclusivity check: a second bind before an unbind —
/// which would mean two threads own the context at once — panics.
/// Events can be scripted in ahead of time with [`queue_event`].
///
/// [`queue_event`]: HeadlessBackend::queue_event
pub struct HeadlessBackend {
    bound: AtomicBool,
    binds: AtomicU64,
    presents: AtomicU64,
    scripted: Mutex<VecDeque<InputEvent>>,
}

impl HeadlessBackend {
    /// Creates an idle headless backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bound: AtomicBool::new(false),
            binds: AtomicU64::new(0),
            presents: AtomicU64::new(0),
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// Queues an event to be returned by the next `poll_events`.
    pub fn queue_event(&self, event: InputEvent) {
        self.scripted.lock().push_back(event);
    }

    /// Total bind operations so far.
    #[must_use]
    pub fn binds(&self) -> u64 {
        self.binds.load(Ordering::Acquire)
    }

    /// Total presented frames so far.
    #[must_use]
    pub fn presents(&self) -> u64 {
        self.presents.load(Ordering::Acquire)
    }

    /// Whether some thread currently has the context bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn bind_context(&self) {
        let was_bound = self.bound.swap(true, Ordering::AcqRel);
        assert!(!was_bound, "context bound by two threads at once");
        self.binds.fetch_add(1, Ordering::AcqRel);
    }

    fn unbind_context(&self) {
        let was_bound = self.bound.swap(false, Ordering::AcqRel);
        assert!(was_bound, "context unbound while not bound");
    }

    fn present(&self) {
        assert!(
            self.bound.load(Ordering::Acquire),
            "present without the context bound"
        );
        self.presents.fetch_add(1, Ordering::AcqRel);
    }

    fn poll_events(&self, out: &mut Vec<InputEvent>) {
        out.extend(self.scripted.lock().drain(..));
    }
}
