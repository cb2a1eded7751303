use std::time::Duration;

use integration_tests::DemoService;
use steward::core::{LifecycleState, ProcessContext};
use steward::server::ServiceHost;
use steward::server::test_util::RecordingBridge;
use std::sync::Arc;

#[tokio::test(start_paused = true)]
async fn test_pause_and_resume_demo() {
    let host = ServiceHost::new(["--flag"]);
    let client = host.client();
    let mut state = host.state();
    let lifecycle = host
        .lifecycle_builder(DemoService::new(Duration::from_millis(100), None, true))
        .build_in(&ProcessContext::new())
        .unwrap();
    let service = lifecycle.service().clone();
    let running = tokio::spawn(host.run(lifecycle));

    state.wait_for(|s| *s == LifecycleState::Running).await.unwrap();
    assert!(client.pause());
    state.wait_for(|s| *s == LifecycleState::Paused).await.unwrap();
    assert!(service.is_paused());
    assert!(client.resume());
    state.wait_for(|s| *s == LifecycleState::Running).await.unwrap();
    assert!(!service.is_paused());

    assert!(client.stop());
    running.await.unwrap();
    assert_eq!(LifecycleState::Terminated, *state.borrow());
    assert!(!client.stop());
}

#[tokio::test(start_paused = true)]
async fn test_run_returns_on_its_own() {
    let host = ServiceHost::new(Vec::<String>::new());
    let events = Arc::new(RecordingBridge::new());
    let state = host.state();
    let lifecycle = host
        .lifecycle_builder(DemoService::new(
            Duration::from_millis(3000),
            Some(Duration::from_millis(500)),
            false,
        ))
        .with_initialize_timeout(Duration::from_millis(1000))
        .with_event_reporter(events.clone())
        .build_in(&ProcessContext::new())
        .unwrap();

    let start = tokio::time::Instant::now();
    host.run(lifecycle).await;

    assert_eq!(Duration::from_millis(1500), start.elapsed());
    assert_eq!(LifecycleState::Terminated, *state.borrow());
    let messages: Vec<_> = events.events().into_iter().map(|(_, m)| m).collect();
    assert_eq!(
        vec![
            "Initialization did not complete within 1000 ms".to_owned(),
            "Demo service finished running".to_owned(),
        ],
        messages
    );
}
