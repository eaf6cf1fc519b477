//! # Runtime
//!
//! Orchestrates the three loops over ticket-guarded shared state.
//!
//! In multithreaded mode the main thread initializes the [`App`] with
//! the context bound, spawns the update and draw loops on named
//! threads, runs the event pump itself, joins the workers, and finally
//! runs the shutdown callback — again with the context bound. In
//! single-threaded mode the same loop bodies run round-robin on the
//! main thread; the tickets are uncontended and cost two atomic
//! operations each.
//!
//! Shutdown is level-triggered: any loop (or a [`RuntimeHandle`] on
//! any thread) clears the running flag, every loop observes it on its
//! next iteration and winds down, and `run` returns once all three
//! have reached [`LoopPhase::Stopped`].

mod loops;
mod shared;

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use turnstile_core::{FramePacer, LoopPhase, PhaseCell, TickTimer, TicketQueue};

use crate::app::{App, TickContext};
use crate::backend::GraphicsBackend;
use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, RuntimeResult};
use crate::events::InputEvent;
use crate::stats::{FrameLedger, FrameStats};

use loops::ContextBinding;
use shared::Shared;

/// Identifies one of the three runtime loops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopId {
    /// The unthrottled simulation loop.
    Update,
    /// The frame-paced render loop.
    Draw,
    /// The event pump.
    Event,
}

/// Shared flags, ticket queues, and channels the loops coordinate
/// through. One instance per [`Runtime`], behind an [`Arc`].
pub(crate) struct Control {
    running: AtomicBool,
    update_wants_context: AtomicBool,
    pub(crate) context_queue: TicketQueue,
    pub(crate) pipeline_queue: TicketQueue,
    pub(crate) event_queue: TicketQueue,
    update_phase: PhaseCell,
    draw_phase: PhaseCell,
    event_phase: PhaseCell,
    injected_tx: Sender<InputEvent>,
    injected_rx: Receiver<InputEvent>,
    event_capacity: usize,
    ledger: parking_lot::Mutex<FrameLedger>,
}

impl Control {
    fn new(config: &RuntimeConfig) -> Self {
        let (injected_tx, injected_rx) = bounded(config.event_capacity);
        let budget_us = config.target_frame_interval().as_micros() as u64;
        Self {
            running: AtomicBool::new(false),
            update_wants_context: AtomicBool::new(false),
            context_queue: TicketQueue::new(),
            pipeline_queue: TicketQueue::new(),
            event_queue: TicketQueue::new(),
            update_phase: PhaseCell::new(),
            draw_phase: PhaseCell::new(),
            event_phase: PhaseCell::new(),
            injected_tx,
            injected_rx,
            event_capacity: config.event_capacity,
            ledger: parking_lot::Mutex::new(FrameLedger::new(budget_us)),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    fn start(&self) {
        self.running.store(true, Ordering::Release);
    }

    pub(crate) fn set_update_wants_context(&self, wants: bool) {
        self.update_wants_context.store(wants, Ordering::Release);
    }

    pub(crate) fn update_wants_context(&self) -> bool {
        self.update_wants_context.load(Ordering::Acquire)
    }

    fn phase_cell(&self, loop_id: LoopId) -> &PhaseCell {
        match loop_id {
            LoopId::Update => &self.update_phase,
            LoopId::Draw => &self.draw_phase,
            LoopId::Event => &self.event_phase,
        }
    }

    pub(crate) fn set_phase(&self, loop_id: LoopId, phase: LoopPhase) {
        self.phase_cell(loop_id).store(phase);
    }

    pub(crate) fn phase(&self, loop_id: LoopId) -> LoopPhase {
        self.phase_cell(loop_id).load()
    }

    fn push_event(&self, event: InputEvent) -> RuntimeResult<()> {
        self.injected_tx
            .try_send(event)
            .map_err(|_| RuntimeError::EventChannelFull {
                capacity: self.event_capacity,
            })
    }

    pub(crate) fn try_recv_injected(&self) -> Result<InputEvent, TryRecvError> {
        self.injected_rx.try_recv()
    }

    pub(crate) fn record_frame(&self, stats: FrameStats) {
        let mut ledger = self.ledger.lock();
        if stats.work_us > ledger.budget_us {
            warn!(
                frame = stats.frame,
                work_us = stats.work_us,
                budget_us = ledger.budget_us,
                "frame work exceeded budget"
            );
        }
        ledger.record(stats);
    }

    fn ledger_snapshot(&self) -> FrameLedger {
        self.ledger.lock().clone()
    }
}

/// A cloneable remote control for a running [`Runtime`].
///
/// Handles are cheap to clone and safe to use from any thread while
/// `run` is in flight, or before it starts.
#[derive(Clone)]
pub struct RuntimeHandle {
    control: Arc<Control>,
}

impl RuntimeHandle {
    /// Whether the runtime's loops have been asked to keep going.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Asks every loop to wind down. Level-triggered and idempotent.
    pub fn request_shutdown(&self) {
        self.control.stop();
    }

    /// Injects an event into the pump, as if the backend had produced
    /// it. Dispatched on the next pump iteration, after backend events
    /// polled in the same pass.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::EventChannelFull`] if the bounded
    /// injection channel has no room.
    pub fn push_event(&self, event: InputEvent) -> RuntimeResult<()> {
        self.control.push_event(event)
    }

    /// Current phase of the named loop.
    #[must_use]
    pub fn phase(&self, loop_id: LoopId) -> LoopPhase {
        self.control.phase(loop_id)
    }

    /// Snapshot of the frame ledger accumulated so far.
    #[must_use]
    pub fn frame_ledger(&self) -> FrameLedger {
        self.control.ledger_snapshot()
    }
}

/// Owns the [`App`], the backend, and the loop machinery.
pub struct Runtime<A: App, B: GraphicsBackend> {
    shared: Arc<Shared<A, B>>,
    config: RuntimeConfig,
}

impl<A: App, B: GraphicsBackend> Runtime<A, B> {
    /// Builds a runtime from an application, backend, and validated
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Config`] when the configuration fails
    /// validation.
    pub fn new(app: A, backend: B, config: RuntimeConfig) -> RuntimeResult<Self> {
        config.validate()?;
        let control = Arc::new(Control::new(&config));
        Ok(Self {
            shared: Arc::new(Shared::new(control, app, backend)),
            config,
        })
    }

    /// A handle usable from other threads while `run` is in flight.
    #[must_use]
    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            control: self.shared.control_arc(),
        }
    }

    /// Runs init, the three loops, and shutdown; returns the app.
    ///
    /// Blocks the calling thread until every loop has stopped. In
    /// multithreaded mode the calling thread becomes the event pump.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::Spawn`] if a loop thread cannot be created.
    /// - [`RuntimeError::LoopPanicked`] if a callback panicked on a
    ///   loop thread; the shutdown callback is skipped since the app
    ///   state may be torn.
    /// - [`RuntimeError::SharedStateLeaked`] if a [`RuntimeHandle`]
    ///   clone somehow kept the shared state alive past the join.
    pub fn run(self) -> RuntimeResult<A> {
        let Self { shared, config } = self;
        let control = shared.control_arc();

        info!(
            target_fps = config.target_fps,
            multithreaded = config.multithreaded,
            vsync = config.vsync,
            "runtime starting"
        );

        {
            let ticket = control.context_queue.acquire();
            let _binding = ContextBinding::bind(shared.backend(), ticket);
            shared.with_app(|app| app.init(&TickContext::new(&control, 0.0, true)));
        }

        control.start();
        let panicked = if config.multithreaded {
            Self::run_threaded(&shared, &config)?
        } else {
            Self::run_single_threaded(&shared, &config);
            None
        };

        if let Some(loop_name) = panicked {
            // The app state may be torn mid-callback; skip shutdown.
            info!("runtime stopped");
            drop(control);
            drop(shared);
            return Err(RuntimeError::LoopPanicked { loop_name });
        }

        {
            let ticket = control.context_queue.acquire();
            let _binding = ContextBinding::bind(shared.backend(), ticket);
            shared.with_app(|app| app.shutdown(&TickContext::new(&control, 0.0, true)));
        }

        info!("runtime stopped");
        drop(control);
        let shared = Arc::try_unwrap(shared).map_err(|_| RuntimeError::SharedStateLeaked)?;
        Ok(shared.into_app())
    }

    /// Spawns the update and draw loops, pumps events on the current
    /// thread, then joins. Returns the name of a loop whose thread
    /// panicked, if any did.
    fn run_threaded(
        shared: &Arc<Shared<A, B>>,
        config: &RuntimeConfig,
    ) -> RuntimeResult<Option<&'static str>> {
        let control = shared.control_arc();
        let target = config.target_frame_interval();

        let update_shared = Arc::clone(shared);
        let update = thread::Builder::new()
            .name("turnstile-update".into())
            .spawn(move || loops::run_update(&*update_shared))
            .map_err(|source| RuntimeError::Spawn {
                loop_name: "update",
                source,
            })?;

        let draw_shared = Arc::clone(shared);
        let draw = match thread::Builder::new()
            .name("turnstile-draw".into())
            .spawn(move || loops::run_draw(&*draw_shared, target))
        {
            Ok(handle) => handle,
            Err(source) => {
                // Wind down the loop we did manage to start before
                // reporting the failure.
                control.stop();
                let _ = update.join();
                return Err(RuntimeError::Spawn {
                    loop_name: "draw",
                    source,
                });
            }
        };

        debug!("update and draw loops spawned, pumping events");
        // The pump must not unwind past the join below, or the workers
        // would be detached. Its wind-down guard has already cleared the
        // running flag by the time the panic is caught here; the
        // ticket-guarded cells reset their flags on unwind, so resuming
        // with them is sound.
        let pump = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            loops::run_event_pump(&**shared);
        }));

        let mut panicked = None;
        if pump.is_err() {
            warn!(loop_name = "event", "event pump panicked");
            panicked = Some("event");
        }
        for (name, handle) in [("update", update), ("draw", draw)] {
            if handle.join().is_err() {
                warn!(loop_name = name, "loop thread panicked");
                panicked.get_or_insert(name);
            }
        }
        Ok(panicked)
    }

    /// Runs all three loop bodies round-robin on the current thread.
    fn run_single_threaded(shared: &Shared<A, B>, config: &RuntimeConfig) {
        let control = shared.control();
        for id in [LoopId::Update, LoopId::Draw, LoopId::Event] {
            control.set_phase(id, LoopPhase::Running);
        }

        let mut timer = TickTimer::new();
        let mut pacer = FramePacer::new(config.target_frame_interval());
        let mut frame = 0u64;
        while control.is_running() {
            loops::event_pump(shared);
            if !control.is_running() {
                break;
            }
            loops::draw_tick(shared, &mut pacer, &mut frame);
            loops::update_tick(shared, &mut timer);
        }

        for id in [LoopId::Update, LoopId::Draw, LoopId::Event] {
            control.set_phase(id, LoopPhase::Stopped);
        }
    }
}
