//! # Loop Timing
//!
//! Wall-clock delta measurement for the update loop and target-interval
//! pacing for the draw loop. The update loop runs unthrottled; the draw
//! loop spins (yielding each turn) until its target interval is met,
//! carrying pacing error into the next frame so the average frame rate
//! converges on the target even under jitter.

mod pacer;
mod timer;

pub use pacer::FramePacer;
pub use timer::TickTimer;
