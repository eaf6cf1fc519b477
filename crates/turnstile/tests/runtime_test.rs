//! End-to-end runtime tests: full lifecycles over the headless backend,
//! in both threading modes, with the backend's bind assertions acting
//! as the context-exclusivity oracle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use turnstile::core::LoopPhase;
use turnstile::{
    App, HeadlessBackend, InputEvent, LoopId, Runtime, RuntimeConfig, RuntimeError, TickContext,
};

/// Counts every callback and stops itself after a fixed number of draws.
struct CountingApp {
    inits: u64,
    updates: u64,
    draws: u64,
    events: Vec<InputEvent>,
    shutdowns: u64,
    stop_after_draws: u64,
}

impl CountingApp {
    fn new(stop_after_draws: u64) -> Self {
        Self {
            inits: 0,
            updates: 0,
            draws: 0,
            events: Vec::new(),
            shutdowns: 0,
            stop_after_draws,
        }
    }
}

impl App for CountingApp {
    fn init(&mut self, ctx: &TickContext<'_>) {
        assert!(ctx.has_context(), "init must run with the context bound");
        self.inits += 1;
    }

    fn update(&mut self, ctx: &TickContext<'_>) {
        assert!(ctx.delta() >= 0.0);
        self.updates += 1;
    }

    fn draw(&mut self, ctx: &TickContext<'_>) {
        assert!(ctx.has_context(), "draw must run with the context bound");
        self.draws += 1;
        if self.draws >= self.stop_after_draws {
            ctx.request_shutdown();
        }
    }

    fn event(&mut self, event: &InputEvent, _ctx: &TickContext<'_>) {
        self.events.push(event.clone());
    }

    fn shutdown(&mut self, ctx: &TickContext<'_>) {
        assert!(ctx.has_context(), "shutdown must run with the context bound");
        self.shutdowns += 1;
    }
}

fn fast_config(multithreaded: bool) -> RuntimeConfig {
    RuntimeConfig {
        target_fps: 500,
        multithreaded,
        vsync: false,
        event_capacity: 16,
    }
}

#[test]
fn test_single_threaded_lifecycle() {
    let runtime = Runtime::new(CountingApp::new(20), HeadlessBackend::new(), fast_config(false))
        .expect("valid config");
    let handle = runtime.handle();

    let app = runtime.run().expect("clean run");

    assert_eq!(app.inits, 1);
    assert_eq!(app.shutdowns, 1);
    assert!(app.draws >= 20);
    assert!(app.updates >= 1, "round-robin must reach the update tick");
    for id in [LoopId::Update, LoopId::Draw, LoopId::Event] {
        assert_eq!(handle.phase(id), LoopPhase::Stopped);
    }
    assert!(!handle.is_running());
}

#[test]
fn test_multithreaded_lifecycle() {
    let backend = HeadlessBackend::new();
    let runtime =
        Runtime::new(CountingApp::new(30), backend, fast_config(true)).expect("valid config");
    let handle = runtime.handle();

    let app = runtime.run().expect("clean run");

    assert_eq!(app.inits, 1);
    assert_eq!(app.shutdowns, 1);
    assert!(app.draws >= 30);
    assert!(app.updates > 0);
    for id in [LoopId::Update, LoopId::Draw, LoopId::Event] {
        assert_eq!(handle.phase(id), LoopPhase::Stopped);
    }
}

/// The headless backend panics on a double bind, so surviving a run with
/// the update loop demanding the context on every tick is the
/// exclusivity proof.
#[test]
fn test_context_exclusive_with_update_contention() {
    struct Contender {
        draws: u64,
    }

    impl App for Contender {
        fn init(&mut self, ctx: &TickContext<'_>) {
            ctx.set_update_wants_context(true);
        }

        fn update(&mut self, ctx: &TickContext<'_>) {
            assert!(ctx.has_context());
        }

        fn draw(&mut self, ctx: &TickContext<'_>) {
            self.draws += 1;
            if self.draws >= 50 {
                ctx.request_shutdown();
            }
        }
    }

    let runtime = Runtime::new(Contender { draws: 0 }, HeadlessBackend::new(), fast_config(true))
        .expect("valid config");
    let app = runtime.run().expect("clean run");
    assert!(app.draws >= 50);
}

#[test]
fn test_close_requested_stops_the_run() {
    let backend = HeadlessBackend::new();
    backend.queue_event(InputEvent::Key {
        code: 42,
        pressed: true,
    });
    backend.queue_event(InputEvent::CloseRequested);

    // Never stops on its own; only the close event can end this run.
    let runtime = Runtime::new(CountingApp::new(u64::MAX), backend, fast_config(true))
        .expect("valid config");
    let app = runtime.run().expect("clean run");

    assert_eq!(
        app.events,
        vec![
            InputEvent::Key {
                code: 42,
                pressed: true
            },
            InputEvent::CloseRequested,
        ],
        "events must be dispatched in arrival order"
    );
    assert_eq!(app.shutdowns, 1);
}

#[test]
fn test_injected_events_reach_the_app() {
    let runtime = Runtime::new(CountingApp::new(u64::MAX), HeadlessBackend::new(), fast_config(true))
        .expect("valid config");
    let handle = runtime.handle();

    let pusher = {
        let handle = handle.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle
                .push_event(InputEvent::User(7))
                .expect("channel has room");
            thread::sleep(Duration::from_millis(20));
            handle.request_shutdown();
        })
    };

    let app = runtime.run().expect("clean run");
    pusher.join().expect("pusher thread");

    assert!(app.events.contains(&InputEvent::User(7)));
    assert_eq!(app.shutdowns, 1);
}

#[test]
fn test_push_event_rejects_when_channel_full() {
    let config = RuntimeConfig {
        event_capacity: 2,
        ..fast_config(true)
    };
    let runtime =
        Runtime::new(CountingApp::new(1), HeadlessBackend::new(), config).expect("valid config");
    let handle = runtime.handle();

    // Not running yet, so nothing drains the channel.
    handle.push_event(InputEvent::User(0)).expect("room");
    handle.push_event(InputEvent::User(1)).expect("room");
    match handle.push_event(InputEvent::User(2)) {
        Err(RuntimeError::EventChannelFull { capacity: 2 }) => {}
        other => panic!("expected EventChannelFull, got {other:?}"),
    }
}

#[test]
fn test_update_panic_surfaces_as_error() {
    struct Exploder {
        updates: Arc<AtomicU64>,
    }

    impl App for Exploder {
        fn init(&mut self, _ctx: &TickContext<'_>) {}

        fn update(&mut self, _ctx: &TickContext<'_>) {
            if self.updates.fetch_add(1, Ordering::Relaxed) >= 10 {
                panic!("induced failure");
            }
        }

        fn draw(&mut self, _ctx: &TickContext<'_>) {}

        fn shutdown(&mut self, _ctx: &TickContext<'_>) {
            panic!("shutdown must not run after a loop panic");
        }
    }

    let updates = Arc::new(AtomicU64::new(0));
    let runtime = Runtime::new(
        Exploder {
            updates: Arc::clone(&updates),
        },
        HeadlessBackend::new(),
        fast_config(true),
    )
    .expect("valid config");
    let handle = runtime.handle();

    match runtime.run() {
        Err(RuntimeError::LoopPanicked { loop_name }) => assert_eq!(loop_name, "update"),
        other => panic!("expected LoopPanicked, got {:?}", other.map(|_| ())),
    }
    assert!(updates.load(Ordering::Relaxed) >= 10);
    assert_eq!(handle.phase(LoopId::Update), LoopPhase::Stopped);
    assert_eq!(handle.phase(LoopId::Draw), LoopPhase::Stopped);
}

/// `App::event` and `App::update` both take `&mut` to the application,
/// so no interleaving of the pump with the update loop's cheap path may
/// ever overlap them. Slow callbacks plus a continuous injector keep
/// both paths busy inside the application at once if the exclusion is
/// broken.
#[test]
fn test_event_dispatch_excludes_update() {
    struct SlowApp {
        inside: Arc<AtomicU64>,
        overlaps: Arc<AtomicU64>,
        events: u64,
    }

    impl SlowApp {
        fn occupy(&self) {
            if self.inside.fetch_add(1, Ordering::SeqCst) != 0 {
                self.overlaps.fetch_add(1, Ordering::SeqCst);
            }
            thread::sleep(Duration::from_millis(2));
            self.inside.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl App for SlowApp {
        fn init(&mut self, _ctx: &TickContext<'_>) {}

        fn update(&mut self, _ctx: &TickContext<'_>) {
            self.occupy();
        }

        fn draw(&mut self, _ctx: &TickContext<'_>) {}

        fn event(&mut self, _event: &InputEvent, _ctx: &TickContext<'_>) {
            self.events += 1;
            self.occupy();
        }
    }

    let inside = Arc::new(AtomicU64::new(0));
    let overlaps = Arc::new(AtomicU64::new(0));
    let runtime = Runtime::new(
        SlowApp {
            inside: Arc::clone(&inside),
            overlaps: Arc::clone(&overlaps),
            events: 0,
        },
        HeadlessBackend::new(),
        fast_config(true),
    )
    .expect("valid config");
    let handle = runtime.handle();

    let injector = {
        let handle = handle.clone();
        thread::spawn(move || {
            let deadline = Instant::now() + Duration::from_millis(300);
            while Instant::now() < deadline {
                let _ = handle.push_event(InputEvent::User(0));
                thread::sleep(Duration::from_millis(1));
            }
            handle.request_shutdown();
        })
    };

    let app = runtime.run().expect("clean run");
    injector.join().expect("injector thread");

    assert!(app.events > 0, "injector never reached the app");
    assert_eq!(
        overlaps.load(Ordering::SeqCst),
        0,
        "event dispatch overlapped an update callback"
    );
}

/// A panic in the event callback unwinds the pump on the main thread;
/// the workers must still be joined and the panic reported like any
/// other loop failure.
#[test]
fn test_event_panic_is_reported_after_join() {
    struct EventExploder;

    impl App for EventExploder {
        fn init(&mut self, _ctx: &TickContext<'_>) {}

        fn update(&mut self, _ctx: &TickContext<'_>) {}

        fn draw(&mut self, _ctx: &TickContext<'_>) {}

        fn event(&mut self, _event: &InputEvent, _ctx: &TickContext<'_>) {
            panic!("induced failure");
        }

        fn shutdown(&mut self, _ctx: &TickContext<'_>) {
            panic!("shutdown must not run after a loop panic");
        }
    }

    let backend = HeadlessBackend::new();
    backend.queue_event(InputEvent::User(1));

    let runtime =
        Runtime::new(EventExploder, backend, fast_config(true)).expect("valid config");
    let handle = runtime.handle();

    match runtime.run() {
        Err(RuntimeError::LoopPanicked { loop_name }) => assert_eq!(loop_name, "event"),
        other => panic!("expected LoopPanicked, got {:?}", other.map(|_| ())),
    }
    for id in [LoopId::Update, LoopId::Draw, LoopId::Event] {
        assert_eq!(handle.phase(id), LoopPhase::Stopped);
    }
}

#[test]
fn test_draw_pacing_holds_near_target() {
    let config = RuntimeConfig {
        target_fps: 100,
        ..fast_config(true)
    };
    let runtime =
        Runtime::new(CountingApp::new(30), HeadlessBackend::new(), config).expect("valid config");
    let handle = runtime.handle();

    let started = Instant::now();
    let app = runtime.run().expect("clean run");
    let elapsed = started.elapsed();

    // 30 frames at 10 ms nominal is 300 ms. Allow a wide band for
    // loaded CI machines; the point is that pacing neither free-runs
    // nor stalls.
    assert!(app.draws >= 30);
    assert!(elapsed >= Duration::from_millis(200), "draw loop free-ran");
    assert!(elapsed < Duration::from_secs(3), "draw loop stalled");

    let ledger = handle.frame_ledger();
    assert_eq!(ledger.frames, app.draws);
    assert!(ledger.avg_interval_ms() >= 8.0, "paced under the target");
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
    let config = RuntimeConfig {
        target_fps: 0,
        ..RuntimeConfig::default()
    };
    match Runtime::new(CountingApp::new(1), HeadlessBackend::new(), config) {
        Err(RuntimeError::Config(_)) => {}
        other => panic!("expected Config error, got {:?}", other.map(|_| ())),
    }
}
