use std::time::Duration;

use confique::Config;
use steward_logging::UserConfig;

/// Everything an operator can tune about a service without rebuilding it.
#[derive(Debug, Clone, Default, Config)]
pub struct ServiceConfig {
    #[config(nested)]
    pub timeouts: TimeoutConfig,
    #[config(nested)]
    pub logging: UserConfig,
}

/// How long the service manager waits for each control request before
/// reporting it as late. Shutdown is bounded by the OS and can't be set.
#[derive(Debug, Clone, PartialEq, Eq, Config)]
pub struct TimeoutConfig {
    /// Milliseconds to wait for initialization before the service is run anyway
    #[config(default = 10000, env = "STEWARD_INITIALIZE_TIMEOUT_MS")]
    pub initialize_ms: u64,
    #[config(default = 10000, env = "STEWARD_PAUSE_TIMEOUT_MS")]
    pub pause_ms: u64,
    #[config(default = 10000, env = "STEWARD_RESUME_TIMEOUT_MS")]
    pub resume_ms: u64,
    #[config(default = 10000, env = "STEWARD_STOP_TIMEOUT_MS")]
    pub stop_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            initialize_ms: 10000,
            pause_ms: 10000,
            resume_ms: 10000,
            stop_ms: 10000,
        }
    }
}

impl TimeoutConfig {
    pub fn initialize(&self) -> Duration {
        Duration::from_millis(self.initialize_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn resume(&self) -> Duration {
        Duration::from_millis(self.resume_ms)
    }

    pub fn stop(&self) -> Duration {
        Duration::from_millis(self.stop_ms)
    }
}

impl AsRef<UserConfig> for ServiceConfig {
    fn as_ref(&self) -> &UserConfig {
        &self.logging
    }
}

impl AsRef<TimeoutConfig> for ServiceConfig {
    fn as_ref(&self) -> &TimeoutConfig {
        &self.timeouts
    }
}
