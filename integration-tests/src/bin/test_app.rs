use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use integration_tests::DemoService;
use steward::config::{AppConfig, ConfigDir, ServiceConfig};
use steward::error_handler::{ErrorHandler, ErrorSink};
use steward::logging::LoggerBuilder;
use steward::logging::tracing_subscriber::util::SubscriberInitExt;
use steward::server::ServiceHost;
use steward::signals::SignalListener;

#[derive(Parser, Debug)]
struct Cli {
    /// How long initialization takes
    #[arg(long, default_value_t = 0)]
    init_millis: u64,
    /// Return from run after this long instead of waiting for a stop request
    #[arg(long)]
    run_millis: Option<u64>,
    /// Accept pause and resume requests
    #[arg(long)]
    pause_resume: bool,
    /// Build a second service after the first one, which aborts the process
    #[arg(long)]
    duplicate: bool,
    /// Directory holding config.toml
    #[arg(long)]
    config: Option<PathBuf>,
    /// Passed to the service as its startup arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), ErrorSink> {
    let cli = Cli::parse();
    let label = integration_tests::label();
    ErrorHandler::new(label.clone()).with_log(true).install()?;

    let config = AppConfig::<ServiceConfig>::builder(match cli.config {
        Some(dir) => ConfigDir::Custom(dir),
        None => ConfigDir::ProjectDir(label.clone()),
    })
    .build()?
    .snapshot();

    let (logger, _guard) = LoggerBuilder::new(label)
        .with_config(config.logging.clone())
        .build()?;
    logger.init();

    let host = ServiceHost::new(cli.args);
    let service = DemoService::new(
        Duration::from_millis(cli.init_millis),
        cli.run_millis.map(Duration::from_millis),
        cli.pause_resume,
    );
    let lifecycle = host
        .lifecycle_builder(service)
        .with_timeout_config(&config.timeouts)
        .build_or_abort();
    if cli.duplicate {
        host.lifecycle_builder(DemoService::default()).build_or_abort();
    }

    let signals = tokio::spawn(SignalListener::all(host.client())?.run());
    let state = host.state();
    host.run(lifecycle).await;
    signals.abort();

    println!("final state: {}", *state.borrow());
    Ok(())
}
