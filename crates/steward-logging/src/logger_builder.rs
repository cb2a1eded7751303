use std::io::{stderr, stdout};
#[cfg(feature = "file")]
use std::path::PathBuf;
use std::sync::OnceLock;

use steward_core::Label;
use time::UtcOffset;
use time::format_description::well_known::{self, Rfc3339};
use tracing::Subscriber;
use tracing::metadata::LevelFilter;
use tracing_appender::non_blocking::NonBlockingBuilder;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer as SubscriberLayer};

use crate::{LoggerGuard, Timezone, UserConfig};

static LOCAL_TIME: OnceLock<Result<OffsetTime<Rfc3339>, time::error::IndeterminateOffset>> =
    OnceLock::new();

// The local offset can only be read safely while the process is single-threaded
#[ctor::ctor]
fn init_time() {
    LOCAL_TIME.set(OffsetTime::local_rfc_3339()).ok();
}

#[derive(thiserror::Error, Debug)]
pub enum LoggerCreationError {
    #[cfg(feature = "linux-journald")]
    #[error("Error creating journald logging layer: {0}")]
    JournaldFailure(std::io::Error),
    #[cfg(feature = "file")]
    #[error("Error creating file logging layer: Unable to locate a home directory")]
    NoHomeDir,
}

#[cfg(feature = "file")]
#[derive(Debug, Clone)]
enum FileOutput {
    Disabled,
    CacheDir,
    Custom(PathBuf),
}

#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    label: Label,
    #[cfg(feature = "file")]
    file_output: FileOutput,
    #[cfg(feature = "file")]
    file_rotation_period: tracing_appender::rolling::Rotation,
    #[cfg(feature = "linux-journald")]
    journald: bool,
    timezone: Timezone,
    output_buffer_limit: usize,
    user_config: UserConfig,
    env_filter_directives: Vec<Directive>,
    log_to_stdout: bool,
    log_to_stderr: bool,
}

impl LoggerBuilder {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            #[cfg(feature = "file")]
            file_output: FileOutput::Disabled,
            #[cfg(feature = "file")]
            file_rotation_period: tracing_appender::rolling::Rotation::HOURLY,
            #[cfg(feature = "linux-journald")]
            journald: false,
            timezone: Timezone::Local,
            // Services log little, a small buffer keeps memory use down
            output_buffer_limit: 256,
            user_config: Default::default(),
            env_filter_directives: vec![],
            log_to_stdout: false,
            log_to_stderr: true,
        }
    }

    /// Writes `<application>.log` files into `dir`.
    #[cfg(feature = "file")]
    pub fn with_file_output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file_output = FileOutput::Custom(dir.into());
        self
    }

    /// Writes `<application>.log` files into the label's cache directory.
    #[cfg(feature = "file")]
    pub fn with_default_file_output(mut self) -> Self {
        self.file_output = FileOutput::CacheDir;
        self
    }

    #[cfg(feature = "file")]
    pub fn with_file_rotation_period(
        mut self,
        rotation: tracing_appender::rolling::Rotation,
    ) -> Self {
        self.file_rotation_period = rotation;
        self
    }

    #[cfg(feature = "linux-journald")]
    pub fn with_journald(mut self, journald: bool) -> Self {
        self.journald = journald;
        self
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_log_to_stdout(mut self, log_to_stdout: bool) -> Self {
        self.log_to_stdout = log_to_stdout;
        self
    }

    pub fn with_log_to_stderr(mut self, log_to_stderr: bool) -> Self {
        self.log_to_stderr = log_to_stderr;
        self
    }

    pub fn with_output_buffer_limit(mut self, output_buffer_limit: usize) -> Self {
        self.output_buffer_limit = output_buffer_limit;
        self
    }

    pub fn with_config(mut self, config: UserConfig) -> Self {
        self.user_config = config;
        self
    }

    pub fn with_env_filter_directive(mut self, directive: Directive) -> Self {
        self.env_filter_directives.push(directive);
        self
    }

    fn level_filter(&self) -> EnvFilter {
        EnvFilter::from_default_env()
            .add_directive(self.user_config.log_level.to_level_filter().into())
    }

    fn output_filter(&self, enabled: bool) -> EnvFilter {
        if enabled {
            self.level_filter()
        } else {
            EnvFilter::from_default_env().add_directive(LevelFilter::OFF.into())
        }
    }

    fn offset(&self) -> OffsetTime<Rfc3339> {
        match (self.timezone, LOCAL_TIME.get()) {
            (Timezone::Local, Some(Ok(offset))) => offset.clone(),
            (Timezone::Local, Some(Err(e))) => {
                eprintln!("Error getting local time, falling back to UTC: {e}");
                OffsetTime::new(UtcOffset::UTC, well_known::Rfc3339)
            }
            _ => OffsetTime::new(UtcOffset::UTC, well_known::Rfc3339),
        }
    }

    #[cfg(feature = "file")]
    fn log_dir(&self) -> Result<Option<PathBuf>, LoggerCreationError> {
        match &self.file_output {
            FileOutput::Disabled => Ok(None),
            FileOutput::Custom(dir) => Ok(Some(dir.clone())),
            FileOutput::CacheDir => directories::ProjectDirs::from(
                &self.label.qualifier,
                &self.label.organization,
                &self.label.application,
            )
            .map(|dirs| Some(dirs.cache_dir().to_owned()))
            .ok_or(LoggerCreationError::NoHomeDir),
        }
    }

    pub fn build(
        self,
    ) -> Result<
        (
            impl SubscriberInitExt + Subscriber + for<'a> LookupSpan<'a>,
            LoggerGuard,
        ),
        LoggerCreationError,
    > {
        let offset = self.offset();

        let mut env_filter = self.level_filter();
        for directive in &self.env_filter_directives {
            env_filter = env_filter.add_directive(directive.clone());
        }

        let collector = tracing_subscriber::registry().with(env_filter);
        let mut guard = LoggerGuard::default();

        #[cfg(feature = "file")]
        let collector = {
            let file_layer = match self.log_dir()? {
                Some(log_dir) => {
                    let file_appender = tracing_appender::rolling::RollingFileAppender::new(
                        self.file_rotation_period.clone(),
                        log_dir,
                        format!("{}.log", self.label.application),
                    );
                    let (non_blocking_file, file_guard) = NonBlockingBuilder::default()
                        .buffered_lines_limit(self.output_buffer_limit)
                        .finish(file_appender);
                    guard.add_guard(file_guard);
                    Some(
                        Layer::new()
                            .with_timer(offset.clone())
                            .with_thread_ids(true)
                            .with_thread_names(true)
                            .with_ansi(false)
                            .with_writer(non_blocking_file)
                            .with_filter(self.level_filter()),
                    )
                }
                None => None,
            };
            collector.with(file_layer)
        };

        let (non_blocking_stdout, stdout_guard) = NonBlockingBuilder::default()
            .buffered_lines_limit(self.output_buffer_limit)
            .finish(stdout());
        guard.add_guard(stdout_guard);

        let (non_blocking_stderr, stderr_guard) = NonBlockingBuilder::default()
            .buffered_lines_limit(self.output_buffer_limit)
            .finish(stderr());
        guard.add_guard(stderr_guard);

        let collector = collector
            .with(
                Layer::new()
                    .pretty()
                    .with_timer(offset.clone())
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_writer(non_blocking_stdout)
                    .with_filter(self.output_filter(self.log_to_stdout)),
            )
            .with(
                Layer::new()
                    .pretty()
                    .with_timer(offset)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_writer(non_blocking_stderr)
                    .with_filter(self.output_filter(self.log_to_stderr)),
            )
            .with(tracing_error::ErrorLayer::default());

        #[cfg(all(target_os = "linux", feature = "linux-journald"))]
        let collector = collector.with(if self.journald {
            Some(
                tracing_journald::layer()
                    .map_err(LoggerCreationError::JournaldFailure)?
                    .with_syslog_identifier(self.label.application.clone())
                    .with_filter(self.level_filter()),
            )
        } else {
            None
        });

        Ok((collector, guard))
    }
}

#[cfg(test)]
#[path = "./logger_builder_test.rs"]
mod logger_builder_test;
