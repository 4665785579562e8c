//! Event store protocol.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::event::{Event, EventQuery};

/// Source of persisted events.
///
/// The registry only reads from it, once, at bootstrap.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// List every event matching the query.
    async fn find_events(&self, query: &EventQuery) -> Result<Vec<Event>, StoreError>;
}
