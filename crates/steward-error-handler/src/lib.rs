use std::error::Error;
use std::fmt;
use std::sync::OnceLock;

use color_eyre::Report;
use color_eyre::config::HookBuilder;
pub use color_eyre::config::Theme;
use steward_core::Label;
use tracing::error;

pub use color_eyre;

static INSTALLED: OnceLock<ErrorHandler> = OnceLock::new();

#[derive(thiserror::Error, Debug)]
pub enum HookInstallError {
    #[error("An error handler was already installed for {0}")]
    AlreadyInstalled(Label),
    #[error("Unable to install the error report hook: {0}")]
    ReportHook(String),
}

/// Where fatal output goes. A service usually has no terminal, so the log
/// is often the only place it can be seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Outputs {
    stdout: bool,
    stderr: bool,
    log: bool,
}

/// Formats panics and fatal errors with `color-eyre`, tagged with the
/// service they came from.
#[derive(Clone)]
pub struct ErrorHandler {
    label: Label,
    theme: Theme,
    outputs: Outputs,
}

impl ErrorHandler {
    pub fn new(label: Label) -> Self {
        Self {
            label,
            theme: Theme::dark(),
            outputs: Outputs {
                stdout: false,
                stderr: true,
                log: false,
            },
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_write_to_stdout(mut self, stdout: bool) -> Self {
        self.outputs.stdout = stdout;
        self
    }

    pub fn with_write_to_stderr(mut self, stderr: bool) -> Self {
        self.outputs.stderr = stderr;
        self
    }

    pub fn with_log(mut self, log: bool) -> Self {
        self.outputs.log = log;
        self
    }

    /// The handler installed in this process, if any.
    pub fn installed() -> Option<&'static ErrorHandler> {
        INSTALLED.get()
    }

    /// Installs the panic and report hooks. Only the first handler per
    /// process is installed, later calls fail without touching the hooks.
    pub fn install(self) -> Result<(), HookInstallError> {
        // Building the hooks sets a global theme, so claim the slot first
        if INSTALLED.set(self.clone()).is_err() {
            let current = INSTALLED.get().map(|h| h.label.clone()).unwrap_or_default();
            return Err(HookInstallError::AlreadyInstalled(current));
        }

        let (panic_hook, eyre_hook) = HookBuilder::default()
            .add_default_filters()
            .theme(self.theme.clone())
            .into_hooks();
        eyre_hook
            .install()
            .map_err(|e| HookInstallError::ReportHook(e.to_string()))?;

        std::panic::set_hook(Box::new(move |info| {
            self.emit(panic_hook.panic_report(info));
        }));
        Ok(())
    }

    fn emit(&self, output: impl fmt::Display) {
        if self.outputs.log {
            error!(service = %self.label, "{output}");
        }
        if self.outputs.stdout {
            println!("{output}");
        }
        if self.outputs.stderr {
            eprintln!("{output}");
        }
    }
}

/// Error type for `main`. Returning it prints the report through the
/// installed [`ErrorHandler`], or to stderr when none was installed.
pub struct ErrorSink {
    report: Report,
}

impl ErrorSink {
    pub fn new(source: impl Into<Report>) -> Self {
        Self {
            report: source.into(),
        }
    }

    pub fn from_error(source: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self::new(color_eyre::eyre::eyre!(source))
    }

    pub fn report(&self) -> &Report {
        &self.report
    }
}

impl<R: Into<Report>> From<R> for ErrorSink {
    fn from(value: R) -> Self {
        Self::new(value)
    }
}

// `main` prints its error with `{:?}`
impl fmt::Debug for ErrorSink {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = format!("{:?}", self.report);
        match ErrorHandler::installed() {
            Some(handler) => handler.emit(report),
            None => eprintln!("{report}"),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "./lib_test.rs"]
mod lib_test;
