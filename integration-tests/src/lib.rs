use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use steward::core::{BoxedError, Label};
use steward::server::{LifecycleContext, Service, async_trait};
use tokio::sync::Notify;

pub fn label() -> Label {
    "com.test.steward_test".parse().unwrap()
}

/// Service with configurable timing, used by `test_app` and the tests.
#[derive(Default)]
pub struct DemoService {
    pub init_delay: Duration,
    pub run_for: Option<Duration>,
    pub accepts_pause_resume: bool,
    paused: AtomicBool,
    stopped: Notify,
}

impl DemoService {
    pub fn new(
        init_delay: Duration,
        run_for: Option<Duration>,
        accepts_pause_resume: bool,
    ) -> Self {
        Self {
            init_delay,
            run_for,
            accepts_pause_resume,
            ..Default::default()
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Service for DemoService {
    fn label() -> Label {
        label()
    }

    async fn initialize(&self, context: LifecycleContext) -> Result<bool, BoxedError> {
        tokio::time::sleep(self.init_delay).await;
        context.log_info("Demo service initialized");
        Ok(self.accepts_pause_resume)
    }

    async fn run(&self, context: LifecycleContext) -> Result<(), BoxedError> {
        let arguments = context.startup_arguments();
        println!("running with arguments: {}", arguments.join(" "));
        match self.run_for {
            Some(run_for) => {
                tokio::select! {
                    _ = tokio::time::sleep(run_for) => {}
                    _ = self.stopped.notified() => {}
                }
            }
            None => self.stopped.notified().await,
        }
        context.log_info("Demo service finished running");
        Ok(())
    }

    async fn pause(&self, context: LifecycleContext) -> Result<(), BoxedError> {
        self.paused.store(true, Ordering::SeqCst);
        context.log_info("Demo service paused");
        Ok(())
    }

    async fn resume(&self, context: LifecycleContext) -> Result<(), BoxedError> {
        self.paused.store(false, Ordering::SeqCst);
        context.log_info("Demo service resumed");
        Ok(())
    }

    async fn stop(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        self.stopped.notify_one();
        Ok(())
    }

    async fn shutdown(&self, _context: LifecycleContext) -> Result<(), BoxedError> {
        self.stopped.notify_one();
        Ok(())
    }
}
