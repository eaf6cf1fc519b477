//! # Input Events
//!
//! Events delivered to [`App::event`]. The backend produces most of
//! these from its windowing system; [`InputEvent::User`] values arrive
//! through [`RuntimeHandle::push_event`] from arbitrary threads.
//!
//! [`App::event`]: crate::App::event
//! [`RuntimeHandle::push_event`]: crate::RuntimeHandle::push_event

/// One input event, dispatched on the event pump with the context bound
/// and the event ticket held.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// The user asked to end the program (window close, SIGINT, ...).
    ///
    /// Dispatched to the application first, then the runtime clears the
    /// running flag itself.
    CloseRequested,

    /// A keyboard key changed state.
    Key {
        /// Platform scancode.
        code: u32,
        /// True on press, false on release.
        pressed: bool,
    },

    /// The pointer moved, in surface pixels.
    PointerMoved {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },

    /// A pointer button changed state.
    PointerButton {
        /// Button index (0 = primary).
        button: u8,
        /// True on press, false on release.
        pressed: bool,
    },

    /// The drawable surface was resized.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },

    /// Application-defined payload injected through a runtime handle.
    User(u64),
}

impl InputEvent {
    /// True for events that end the run once dispatched.
    #[must_use]
    pub fn is_close_requested(&self) -> bool {
        matches!(self, Self::CloseRequested)
    }
}
