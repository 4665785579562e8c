//! In-memory event store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cronhook_protocols::{Event, EventId, EventQuery, EventStore, StoreError};

use crate::EventRepository;

/// In-memory event store, ordered by ID.
pub struct MemoryEventStore {
    events: RwLock<BTreeMap<EventId, Event>>,
}

impl MemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            events: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a store seeded with events. Later duplicates replace earlier ones.
    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: RwLock::new(events.into_iter().map(|e| (e.id, e)).collect()),
        }
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn find_events(&self, query: &EventQuery) -> Result<Vec<Event>, StoreError> {
        let events = self.events.read().await;
        Ok(events.values().filter(|e| query.matches(e)).cloned().collect())
    }
}

#[async_trait]
impl EventRepository for MemoryEventStore {
    async fn save(&self, event: &Event) -> Result<(), StoreError> {
        self.events.write().await.insert(event.id, event.clone());
        Ok(())
    }

    async fn load(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: EventId) -> Result<bool, StoreError> {
        Ok(self.events.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: u64) -> Event {
        Event::new(id, "0 * * * * *", format!("https://example.com/{}", id))
    }

    #[tokio::test]
    async fn test_memory_event_store() {
        let store = MemoryEventStore::new();
        store.save(&event(1)).await.unwrap();

        let loaded = store.load(EventId::new(1)).await.unwrap();
        assert_eq!(loaded.unwrap().url, "https://example.com/1");

        let all = store.find_events(&EventQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);

        assert!(store.delete(EventId::new(1)).await.unwrap());
        assert!(!store.delete(EventId::new(1)).await.unwrap());
        assert!(store.load(EventId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_with_events_sorted_and_filtered() {
        let store = MemoryEventStore::with_events(vec![event(3), event(1), event(2)]);

        let all = store.find_events(&EventQuery::default()).await.unwrap();
        let ids: Vec<u64> = all.iter().map(|e| e.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let query = EventQuery::default().with_ids([EventId::new(2)]);
        let some = store.find_events(&query).await.unwrap();
        assert_eq!(some.len(), 1);
        assert_eq!(some[0].id, EventId::new(2));
    }
}
