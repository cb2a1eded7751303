use std::ops::Deref;
use std::str::FromStr;

use tracing::Level;
use tracing::metadata::{LevelFilter, ParseLevelError};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct LogLevel(pub Level);

impl LogLevel {
    pub(crate) fn to_level_filter(self) -> LevelFilter {
        LevelFilter::from_level(self.0)
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel(Level::INFO)
    }
}

impl Deref for LogLevel {
    type Target = Level;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_str(s).map(LogLevel)
    }
}

#[cfg(feature = "config")]
impl<'de> serde::Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let val = String::deserialize(deserializer)?;
        val.parse().map_err(serde::de::Error::custom)
    }
}

/// The logging settings an operator can change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(confique::Config))]
pub struct UserConfig {
    /// Minimum level written by every output (`trace`, `debug`, `info`,
    /// `warn` or `error`)
    #[cfg_attr(
        feature = "config",
        config(default = "info", env = "STEWARD_LOG_LEVEL")
    )]
    pub log_level: LogLevel,
}

#[cfg(test)]
#[path = "./log_level_test.rs"]
mod log_level_test;
