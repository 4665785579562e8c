//! File system event store: one `<id>.json` document per event.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use cronhook_protocols::{Event, EventId, EventQuery, EventStore, StoreError};

use crate::EventRepository;

/// Directory-backed event store.
pub struct FileEventStore {
    events_dir: PathBuf,
}

impl FileEventStore {
    /// Open a store rooted at `events_dir`, creating the directory if needed.
    pub async fn new(events_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let events_dir = events_dir.into();

        fs::create_dir_all(&events_dir).await.map_err(|e| {
            StoreError::Unavailable(format!(
                "Failed to create events directory {}: {}",
                events_dir.display(),
                e
            ))
        })?;

        debug!("FileEventStore initialized at {:?}", events_dir);

        Ok(Self { events_dir })
    }

    pub fn events_dir(&self) -> &Path {
        &self.events_dir
    }

    fn event_path(&self, id: EventId) -> PathBuf {
        self.events_dir.join(format!("{}.json", id))
    }

    async fn read_event(path: &Path) -> Result<Event, StoreError> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl EventStore for FileEventStore {
    async fn find_events(&self, query: &EventQuery) -> Result<Vec<Event>, StoreError> {
        let mut entries = fs::read_dir(&self.events_dir).await.map_err(|e| {
            StoreError::Unavailable(format!(
                "Failed to read events directory {}: {}",
                self.events_dir.display(),
                e
            ))
        })?;

        let mut events = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.extension().is_some_and(|ext| ext == "json") {
                continue;
            }

            match Self::read_event(&path).await {
                Ok(event) if query.matches(&event) => events.push(event),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable event file {:?}: {}", path, e),
            }
        }

        events.sort_by_key(|e| e.id);
        debug!("Loaded {} events from {:?}", events.len(), self.events_dir);
        Ok(events)
    }
}

#[async_trait]
impl EventRepository for FileEventStore {
    async fn save(&self, event: &Event) -> Result<(), StoreError> {
        let path = self.event_path(event.id);
        let content = serde_json::to_string_pretty(event)?;
        fs::write(&path, content).await?;

        debug!("Saved event {} to {:?}", event.id, path);
        Ok(())
    }

    async fn load(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        let path = self.event_path(id);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        Self::read_event(&path).await.map(Some)
    }

    async fn delete(&self, id: EventId) -> Result<bool, StoreError> {
        let path = self.event_path(id);
        if !fs::try_exists(&path).await? {
            return Ok(false);
        }

        fs::remove_file(&path).await?;
        debug!("Deleted event {} from {:?}", id, path);
        Ok(true)
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
