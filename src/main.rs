//! cronhook - cron-scheduled webhook dispatcher
//!
//! Main entry point for the cronhook CLI and daemon.

mod bootstrap;
mod cli;
mod cmd_check;
mod cmd_events;
mod cmd_run;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cronhook_config::{ConfigLoader, LoggingConfig};

use crate::cli::{Cli, Commands};

fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let file_layer = match logging.resolved_directory() {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("cronhook")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // The guard flushes buffered lines on drop, keep it for the process lifetime.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(&cli.config)?;
    config.validate()?;

    init_tracing(&config.logging)?;

    match cli.command {
        None | Some(Commands::Run) => cmd_run::run(config).await,
        Some(Commands::Events { action }) => cmd_events::handle_events_command(action, &config).await,
        Some(Commands::Check { expression, count }) => cmd_check::check(&expression, count),
    }
}
