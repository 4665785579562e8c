//! Construction of the store and transport from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use cronhook_config::Config;
use cronhook_store::{EventRepository, FileEventStore, MemoryEventStore};
use cronhook_transport::HttpTransport;

/// Open the configured event repository.
///
/// The memory backend is seeded with the static `[[events]]` table. The
/// file backend ignores it.
pub(crate) async fn open_repository(
    config: &Config,
) -> Result<Arc<dyn EventRepository>, Box<dyn std::error::Error>> {
    match config.store.backend.as_str() {
        "memory" => {
            let events = config.static_events()?;
            info!(count = events.len(), "Using in-memory event store");
            Ok(Arc::new(MemoryEventStore::with_events(events)))
        }
        _ => {
            let path = config.store.resolved_path();
            if !config.events.is_empty() {
                warn!(
                    count = config.events.len(),
                    "Static [[events]] are only used by the memory backend, ignoring"
                );
            }
            info!(path = %path.display(), "Using file event store");
            Ok(Arc::new(FileEventStore::new(path).await?))
        }
    }
}

/// Build the HTTP transport from the `[transport]` section.
pub(crate) fn build_transport(config: &Config) -> Result<Arc<HttpTransport>, Box<dyn std::error::Error>> {
    let transport = HttpTransport::new(config.transport.clone())?;
    Ok(Arc::new(transport))
}
