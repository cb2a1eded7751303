use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use steward_core::{BoxedError, Label, LifecycleState, ProcessContext};
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::test_util::RecordingBridge;
use crate::{ControlAction, LifecycleContext, Service, ServiceHost};

#[derive(Default)]
struct Counters {
    pause: AtomicUsize,
    resume: AtomicUsize,
    stop: AtomicUsize,
    shutdown: AtomicUsize,
}

/// Runs until stopped; records when run started and what it saw.
struct StoppableService {
    accepts_pause_resume: bool,
    init_delay: Duration,
    stop_delay: Duration,
    stopped: Notify,
    counters: Arc<Counters>,
    run_started: Arc<Mutex<Option<(Instant, bool)>>>,
}

impl StoppableService {
    fn new(accepts_pause_resume: bool) -> Self {
        Self {
            accepts_pause_resume,
            init_delay: Duration::ZERO,
            stop_delay: Duration::ZERO,
            stopped: Notify::new(),
            counters: Default::default(),
            run_started: Default::default(),
        }
    }
}

#[async_trait::async_trait]
impl Service for StoppableService {
    fn label() -> Label {
        "com.test.host".parse().unwrap()
    }

    async fn initialize(&self, _context: LifecycleContext) -> Result<bool, BoxedError> {
        tokio::time::sleep(self.init_delay).await;
        Ok(self.accepts_pause_resume)
    }

    async fn run(&self, context: LifecycleContext) -> Result<(), BoxedError> {
        *self.run_started.lock().unwrap() = Some((Instant::now(), context.accepts_pause_resume()));
        self.stopped.notified().await;
        Ok(())
    }

    async fn pause(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        self.counters.pause.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        self.counters.resume.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        self.counters.stop.fetch_add(1, Ordering::SeqCst);
        self.stopped.notify_one();
        tokio::time::sleep(self.stop_delay).await;
        Ok(())
    }

    async fn shutdown(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        self.counters.shutdown.fetch_add(1, Ordering::SeqCst);
        self.stopped.notify_one();
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_initialize_runs_after_timeout() {
    let mut service = StoppableService::new(true);
    service.init_delay = Duration::from_millis(5000);
    let run_started = service.run_started.clone();

    let host = ServiceHost::new(Vec::<String>::new());
    let events = Arc::new(RecordingBridge::new());
    let client = host.client();
    let mut state = host.state();
    let lifecycle = host
        .lifecycle_builder(service)
        .with_initialize_timeout(Duration::from_millis(2000))
        .with_event_reporter(events.clone())
        .build_in(&ProcessContext::new())
        .unwrap();
    let context = lifecycle.context().clone();
    let bridge = host.bridge();
    let mut completions = bridge.subscribe();

    let start = Instant::now();
    let running = tokio::spawn(host.run(lifecycle));

    state.wait_for(|s| *s == LifecycleState::Running).await.unwrap();
    let (run_at, accepted_at_run) = run_started_when_set(&run_started).await;
    assert_eq!(Duration::from_millis(2000), run_at - start);
    assert!(!accepted_at_run);
    assert!(!context.accepts_pause_resume());
    assert!(
        events
            .events()
            .iter()
            .any(|(_, message)| message == "Initialization did not complete within 2000 ms")
    );

    // Initialize keeps going, reports when its hook returns and its late
    // result still lands
    assert_eq!(ControlAction::Initialize, completions.recv().await.unwrap());
    assert_eq!(Duration::from_millis(5000), Instant::now() - start);
    assert!(context.accepts_pause_resume());
    assert!(bridge.accepts_pause_resume());

    client.stop();
    running.await.unwrap();
    assert_eq!(LifecycleState::Terminated, *state.borrow());
}

async fn run_started_when_set(
    run_started: &Arc<Mutex<Option<(Instant, bool)>>>,
) -> (Instant, bool) {
    loop {
        if let Some(started) = *run_started.lock().unwrap() {
            return started;
        }
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_pause_resume_forwarded_when_accepted() {
    let service = StoppableService::new(true);
    let counters = service.counters.clone();
    let host = ServiceHost::new(["--verbose"]);
    let client = host.client();
    let mut state = host.state();
    let lifecycle = host
        .lifecycle_builder(service)
        .build_in(&ProcessContext::new())
        .unwrap();
    assert_eq!(vec!["--verbose"], lifecycle.context().startup_arguments());
    let running = tokio::spawn(host.run(lifecycle));

    state.wait_for(|s| *s == LifecycleState::Running).await.unwrap();
    client.pause();
    state.wait_for(|s| *s == LifecycleState::Paused).await.unwrap();
    client.resume();
    state.wait_for(|s| *s == LifecycleState::Running).await.unwrap();
    client.stop();
    running.await.unwrap();

    assert_eq!(1, counters.pause.load(Ordering::SeqCst));
    assert_eq!(1, counters.resume.load(Ordering::SeqCst));
    assert_eq!(1, counters.stop.load(Ordering::SeqCst));
    assert_eq!(LifecycleState::Terminated, *state.borrow());
}

#[tokio::test(start_paused = true)]
async fn test_pause_resume_dropped_when_not_accepted() {
    let service = StoppableService::new(false);
    let counters = service.counters.clone();
    let host = ServiceHost::new(Vec::<String>::new());
    let client = host.client();
    let mut state = host.state();
    let lifecycle = host
        .lifecycle_builder(service)
        .build_in(&ProcessContext::new())
        .unwrap();
    let running = tokio::spawn(host.run(lifecycle));

    state.wait_for(|s| *s == LifecycleState::Running).await.unwrap();
    client.pause();
    client.resume();
    client.stop();
    running.await.unwrap();

    assert_eq!(0, counters.pause.load(Ordering::SeqCst));
    assert_eq!(0, counters.resume.load(Ordering::SeqCst));
    assert_eq!(1, counters.stop.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_slow_stop_reported_not_cancelled() {
    let mut service = StoppableService::new(false);
    service.stop_delay = Duration::from_millis(300);
    let counters = service.counters.clone();
    let host = ServiceHost::new(Vec::<String>::new());
    let client = host.client();
    let mut state = host.state();
    let events = Arc::new(RecordingBridge::new());
    let lifecycle = host
        .lifecycle_builder(service)
        .with_stop_timeout(Duration::from_millis(100))
        .with_event_reporter(events.clone())
        .build_in(&ProcessContext::new())
        .unwrap();
    let bridge = host.bridge();
    let mut completions = bridge.subscribe();
    let running = tokio::spawn(host.run(lifecycle));

    state.wait_for(|s| *s == LifecycleState::Running).await.unwrap();
    let start = Instant::now();
    client.stop();
    running.await.unwrap();
    assert!(
        events
            .events()
            .iter()
            .any(|(_, message)| message == "stop did not complete within 100 ms")
    );

    // The handler wasn't killed, its completion still arrives
    loop {
        if completions.recv().await.unwrap() == crate::ControlAction::Stop {
            break;
        }
    }
    assert_eq!(Duration::from_millis(300), Instant::now() - start);
    assert_eq!(1, counters.stop.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_initialize() {
    let mut service = StoppableService::new(true);
    service.init_delay = Duration::from_millis(500);
    let counters = service.counters.clone();
    let host = ServiceHost::new(Vec::<String>::new());
    let client = host.client();
    let state = host.state();
    let lifecycle = host
        .lifecycle_builder(service)
        .build_in(&ProcessContext::new())
        .unwrap();

    client.shutdown();
    host.run(lifecycle).await;

    assert_eq!(1, counters.shutdown.load(Ordering::SeqCst));
    assert_eq!(LifecycleState::Terminated, *state.borrow());
}
