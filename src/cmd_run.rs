//! The `run` command: schedule stored events and dispatch until interrupted.

use std::sync::Arc;

use tracing::{info, warn};

use cronhook_config::Config;
use cronhook_core::Scheduler;
use cronhook_protocols::TimerEngine;
use cronhook_timer::CronTimerEngine;

use crate::bootstrap::{build_transport, open_repository};

pub(crate) async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting cronhook v{}", env!("CARGO_PKG_VERSION"));

    let repository = open_repository(&config).await?;
    let transport = build_transport(&config)?;
    let engine = Arc::new(CronTimerEngine::new());
    let scheduler = Scheduler::new(engine.clone(), transport);

    engine.start();
    let scheduled = scheduler.schedule_all(repository.as_ref()).await?;
    if scheduled == 0 {
        warn!("No events to schedule, waiting anyway");
    }
    info!(scheduled, "cronhook running. Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down...");

    let stopped = scheduler.shutdown();
    engine.shutdown();
    info!(stopped, "cronhook stopped");

    Ok(())
}
