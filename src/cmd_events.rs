//! Event subcommand handlers.

use cronhook_config::Config;
use cronhook_protocols::{Event, EventId, EventQuery, EventStore};
use cronhook_store::EventRepository;
use cronhook_timer::CronTimerEngine;

use crate::bootstrap::open_repository;
use crate::cli::{AddEventArgs, EventsAction};

/// Handle event subcommands.
pub(crate) async fn handle_events_command(
    action: EventsAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if config.store.backend == "memory" {
        return Err("event management needs a persistent store; set [store] backend = \"file\"".into());
    }

    match action {
        EventsAction::List { url_prefix } => list(config, url_prefix).await,
        EventsAction::Add(args) => add(config, args).await,
        EventsAction::Remove { id } => remove(config, id).await,
    }
}

async fn list(config: &Config, url_prefix: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let repository = open_repository(config).await?;
    let mut query = EventQuery::default();
    if let Some(prefix) = url_prefix {
        query = query.with_url_prefix(prefix);
    }

    let events = repository.find_events(&query).await?;
    if events.is_empty() {
        println!("No events found.");
        return Ok(());
    }

    println!(
        "{:<8} {:<20} {:<8} {:<8} {:<20} URL",
        "ID", "EXPRESSION", "RETRIES", "DELAY", "NEXT FIRE (UTC)"
    );
    println!("{}", "-".repeat(90));
    for event in events {
        let next = CronTimerEngine::upcoming(&event.expression, 1)
            .ok()
            .and_then(|times| times.into_iter().next())
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "invalid".to_string());
        println!(
            "{:<8} {:<20} {:<8} {:<8} {:<20} {}",
            event.id,
            event.expression,
            event.max_retries,
            format!("{}s", event.retry_timeout),
            next,
            event.url
        );
    }
    Ok(())
}

async fn add(config: &Config, args: AddEventArgs) -> Result<(), Box<dyn std::error::Error>> {
    let event = Event::new(args.id, args.expression, args.url).with_retries(args.max_retries, args.retry_timeout);
    event.validate()?;
    CronTimerEngine::validate(&event.expression)?;
    let event = config.scheduler.prepare(event)?;

    let repository = open_repository(config).await?;
    if !args.replace && repository.load(event.id).await?.is_some() {
        return Err(format!("event {} already exists; pass --replace to overwrite it", event.id).into());
    }

    repository.save(&event).await?;
    println!("Saved event {} ({} -> {})", event.id, event.expression, event.url);
    Ok(())
}

async fn remove(config: &Config, id: u64) -> Result<(), Box<dyn std::error::Error>> {
    let repository = open_repository(config).await?;
    if repository.delete(EventId::new(id)).await? {
        println!("Removed event {}", id);
        Ok(())
    } else {
        Err(format!("event {} not found", id).into())
    }
}
