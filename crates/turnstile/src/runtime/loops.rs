//! # Loop Bodies
//!
//! The update, draw, and event-pump iterations, plus the RAII pieces
//! that make the lock/bind protocol impossible to get out of order.
//!
//! Lock protocol per iteration:
//!
//! ```text
//! update (wants context):   context ─ bind ─ update() ─ unbind ─ release
//! update (default):         pipeline ─ update() ─ release
//! draw:                     context ─ bind ─ pipeline ─ draw() ─ release
//!                           pipeline ─ present ─ unbind ─ release context
//! event pump:               context ─ bind ─ events ─ collect ─
//!                           pipeline ─ dispatch ─ release
//! ```
//!
//! Every path that enters the application holds the context ticket or
//! the draw-pipeline ticket; dispatch pins the pipeline so the update
//! loop's cheap path cannot run concurrently with `App::event`. The
//! global acquisition order is context, then events, then pipeline —
//! no path acquires against that order.

use std::thread;
use std::time::{Duration, Instant};

use turnstile_core::{ContextClaim, FramePacer, LoopPhase, TickTimer, Ticket};

use crate::app::{App, TickContext};
use crate::backend::GraphicsBackend;
use crate::stats::FrameStats;

use super::shared::Shared;
use super::{Control, LoopId};

/// RAII binding of the graphics context to the current thread.
///
/// Holds the context ticket for the binding's duration. Drop order is
/// the protocol: the backend unbind runs first, then the thread's
/// ownership claim clears, then the ticket releases the queue slot —
/// so no successor can bind before this thread has let go.
pub(crate) struct ContextBinding<'a, B: GraphicsBackend> {
    backend: &'a B,
    _claim: ContextClaim,
    _ticket: Ticket,
}

impl<'a, B: GraphicsBackend> ContextBinding<'a, B> {
    pub(crate) fn bind(backend: &'a B, ticket: Ticket) -> Self {
        let claim = ContextClaim::bind();
        backend.bind_context();
        Self {
            backend,
            _claim: claim,
            _ticket: ticket,
        }
    }
}

impl<B: GraphicsBackend> Drop for ContextBinding<'_, B> {
    fn drop(&mut self) {
        self.backend.unbind_context();
    }
}

/// Marks a loop `Stopped` and clears the running flag when the loop body
/// exits — normally or by unwinding out of a panicking callback — so
/// sibling loops wind down instead of spinning against a dead partner.
struct WindDown<'a> {
    control: &'a Control,
    loop_id: LoopId,
}

impl Drop for WindDown<'_> {
    fn drop(&mut self) {
        self.control.stop();
        self.control.set_phase(self.loop_id, LoopPhase::Stopped);
    }
}

/// One update iteration: delta, lock, callback, release.
pub(crate) fn update_tick<A: App, B: GraphicsBackend>(shared: &Shared<A, B>, timer: &mut TickTimer) {
    let control = shared.control();
    let delta = timer.tick();

    if control.update_wants_context() {
        // Slower path: this tick may issue graphics calls.
        let ticket = control.context_queue.acquire();
        let _binding = ContextBinding::bind(shared.backend(), ticket);
        shared.with_app(|app| app.update(&TickContext::new(control, delta, true)));
    } else {
        // Cheap path: pin the draw state without a context switch.
        let _ticket = control.pipeline_queue.acquire();
        shared.with_app(|app| app.update(&TickContext::new(control, delta, false)));
    }
}

/// One draw iteration: pace, bind, freeze the pipeline, draw, present.
pub(crate) fn draw_tick<A: App, B: GraphicsBackend>(
    shared: &Shared<A, B>,
    pacer: &mut FramePacer,
    frame: &mut u64,
) {
    let control = shared.control();
    let delta = pacer.pace(shared.backend().vsync());

    let ticket = control.context_queue.acquire();
    let binding = ContextBinding::bind(shared.backend(), ticket);

    let work_start = Instant::now();
    {
        // Nested under the context ticket: update cannot touch draw
        // state until this frame is finished.
        let _pipeline = control.pipeline_queue.acquire();
        shared.with_app(|app| app.draw(&TickContext::new(control, delta, true)));
    }
    shared.backend().present();
    let work = work_start.elapsed();
    drop(binding);

    control.record_frame(FrameStats {
        frame: *frame,
        interval_us: Duration::from_secs_f64(delta).as_micros() as u64,
        work_us: work.as_micros() as u64,
    });
    *frame += 1;
}

/// One event-pump iteration: collect backend and injected events into
/// the ticket-guarded buffer, then dispatch them in arrival order.
pub(crate) fn event_pump<A: App, B: GraphicsBackend>(shared: &Shared<A, B>) {
    let control = shared.control();

    let ticket = control.context_queue.acquire();
    let _binding = ContextBinding::bind(shared.backend(), ticket);
    let _events_ticket = control.event_queue.acquire();

    let mut pending = shared.with_events(|buffer| {
        shared.backend().poll_events(buffer);
        while let Ok(event) = control.try_recv_injected() {
            buffer.push(event);
        }
        std::mem::take(buffer)
    });

    if !pending.is_empty() {
        // The update loop's cheap path holds only the pipeline ticket,
        // so dispatch must pin it too before entering the application.
        let _pipeline = control.pipeline_queue.acquire();
        for event in &pending {
            shared.with_app(|app| app.event(event, &TickContext::new(control, 0.0, true)));
            if event.is_close_requested() {
                control.stop();
            }
        }
    }

    // Hand the buffer back so its capacity is reused next pump.
    pending.clear();
    shared.with_events(|buffer| *buffer = pending);
}

/// The update loop: unthrottled iterations until shutdown is requested.
pub(crate) fn run_update<A: App, B: GraphicsBackend>(shared: &Shared<A, B>) {
    let control = shared.control();
    let _wind_down = WindDown {
        control,
        loop_id: LoopId::Update,
    };
    control.set_phase(LoopId::Update, LoopPhase::Running);

    let mut timer = TickTimer::new();
    loop {
        if !control.is_running() {
            control.set_phase(LoopId::Update, LoopPhase::Stopping);
            break;
        }
        update_tick(shared, &mut timer);
    }
}

/// The draw loop: paced iterations until shutdown is requested.
pub(crate) fn run_draw<A: App, B: GraphicsBackend>(shared: &Shared<A, B>, target: Duration) {
    let control = shared.control();
    let _wind_down = WindDown {
        control,
        loop_id: LoopId::Draw,
    };
    control.set_phase(LoopId::Draw, LoopPhase::Running);

    let mut pacer = FramePacer::new(target);
    let mut frame = 0u64;
    loop {
        if !control.is_running() {
            control.set_phase(LoopId::Draw, LoopPhase::Stopping);
            break;
        }
        draw_tick(shared, &mut pacer, &mut frame);
    }
}

/// The event pump loop, run on the main thread in multithreaded mode.
pub(crate) fn run_event_pump<A: App, B: GraphicsBackend>(shared: &Shared<A, B>) {
    let control = shared.control();
    let _wind_down = WindDown {
        control,
        loop_id: LoopId::Event,
    };
    control.set_phase(LoopId::Event, LoopPhase::Running);

    loop {
        if !control.is_running() {
            control.set_phase(LoopId::Event, LoopPhase::Stopping);
            break;
        }
        event_pump(shared);
        // Ticket fairness already shares the context; the yield just
        // keeps an empty pump from monopolizing a core.
        thread::yield_now();
    }
}
