//! # Application Callbacks
//!
//! The runtime's boundary with the embedding application is five
//! callbacks, each invoked with a [`TickContext`] view of the shared loop
//! state. Graphics and asset work happen inside these bodies; the runtime
//! treats them as opaque user code.

use crate::events::InputEvent;
use crate::runtime::Control;

/// Lifecycle callbacks driven by the runtime.
///
/// Invocation contract:
///
/// - [`init`]: once, on the main thread, context bound.
/// - [`update`]: every update tick, unthrottled. The context is bound
///   only if the application asked for it via
///   [`TickContext::set_update_wants_context`] on an earlier tick.
/// - [`draw`]: every paced draw tick, context bound and the draw
///   pipeline ticket held — update cannot mutate shared draw state
///   mid-frame.
/// - [`event`]: per input event on the event pump, context bound.
/// - [`shutdown`]: once, on the main thread, after every loop thread has
///   joined, context bound again.
///
/// A panicking callback terminates its loop and winds the runtime down;
/// there are no retries.
///
/// [`init`]: App::init
/// [`update`]: App::update
/// [`draw`]: App::draw
/// [`event`]: App::event
/// [`shutdown`]: App::shutdown
pub trait App: Send + 'static {
    /// Called once before any loop starts. Populate resources here.
    fn init(&mut self, ctx: &TickContext<'_>);

    /// Called every update tick with the elapsed delta in `ctx`.
    fn update(&mut self, ctx: &TickContext<'_>);

    /// Called every paced draw tick.
    fn draw(&mut self, ctx: &TickContext<'_>);

    /// Called for each pending input event.
    fn event(&mut self, event: &InputEvent, ctx: &TickContext<'_>) {
        let _ = (event, ctx);
    }

    /// Called once after all loops have stopped.
    fn shutdown(&mut self, ctx: &TickContext<'_>) {
        let _ = ctx;
    }
}

/// One tick's view of the shared loop state.
///
/// Carries the elapsed delta for the invoking loop and the control
/// operations a callback may perform. Everything here is safe to call
/// from any callback.
pub struct TickContext<'a> {
    control: &'a Control,
    delta: f64,
    has_context: bool,
}

impl<'a> TickContext<'a> {
    pub(crate) fn new(control: &'a Control, delta: f64, has_context: bool) -> Self {
        Self {
            control,
            delta,
            has_context,
        }
    }

    /// Seconds elapsed since this loop's previous tick.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Whether the graphics context is bound to the calling thread for
    /// the duration of this callback.
    ///
    /// Deeply nested code that cannot see this context may use
    /// [`turnstile_core::thread_owns_context`] instead.
    #[must_use]
    pub fn has_context(&self) -> bool {
        self.has_context
    }

    /// Whether a shutdown has been requested yet.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Asks every loop to stop after its current iteration. Idempotent.
    pub fn request_shutdown(&self) {
        self.control.stop();
    }

    /// Sets whether subsequent update ticks need the graphics context.
    ///
    /// With the flag clear (the default) the update loop takes the
    /// cheaper draw-pipeline ticket and must not issue graphics calls.
    pub fn set_update_wants_context(&self, wants: bool) {
        self.control.set_update_wants_context(wants);
    }

    /// Current value of the update-wants-context intent flag.
    #[must_use]
    pub fn update_wants_context(&self) -> bool {
        self.control.update_wants_context()
    }
}
