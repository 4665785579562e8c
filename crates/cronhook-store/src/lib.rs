//! # cronhook Store
//!
//! Event stores used to bootstrap the scheduler and to manage events from
//! the command line.

mod file;
mod memory;

use async_trait::async_trait;

use cronhook_protocols::{Event, EventId, EventStore, StoreError};

pub use file::FileEventStore;
pub use memory::MemoryEventStore;

/// Event store that can also be written to.
#[async_trait]
pub trait EventRepository: EventStore {
    /// Insert or replace an event.
    async fn save(&self, event: &Event) -> Result<(), StoreError>;

    /// Load an event by ID.
    async fn load(&self, id: EventId) -> Result<Option<Event>, StoreError>;

    /// Delete an event. Returns whether it existed.
    async fn delete(&self, id: EventId) -> Result<bool, StoreError>;
}
