//! Trigger registry.
//!
//! Maps event IDs to live timer registrations. All access to the map goes
//! through a single reader/writer lock, and no lock is ever held across an
//! await point.
//!
//! A trigger is stopped (its dispatch token cancelled and its timer entry
//! halted) before it leaves the map, so no registration outlives its slot.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use cronhook_protocols::{
    Event, EventId, EventQuery, EventStore, RetryPolicy, SchedulerError, TimerEngine, TimerEntry,
    Transport,
};

use crate::dispatcher::Dispatcher;

/// A live trigger. Owned by the registry and never handed out.
struct Trigger {
    event: Event,
    entry: Box<dyn TimerEntry>,
    cancel: CancellationToken,
    created_at: DateTime<Utc>,
}

impl Trigger {
    fn stop(&self) {
        self.cancel.cancel();
        self.entry.stop();
    }

    fn info(&self) -> TriggerInfo {
        TriggerInfo {
            id: self.event.id,
            expression: self.entry.expression().to_string(),
            url: self.event.url.clone(),
            retry_policy: self.event.retry_policy(),
            created_at: self.created_at,
            active: self.entry.is_active() && !self.cancel.is_cancelled(),
            next_fire_time: self.entry.next_fire_time(),
            fire_count: self.entry.fire_count(),
        }
    }
}

/// Read-only view of a live trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerInfo {
    pub id: EventId,
    pub expression: String,
    pub url: String,
    pub retry_policy: RetryPolicy,
    pub created_at: DateTime<Utc>,
    pub active: bool,
    pub next_fire_time: Option<DateTime<Utc>>,
    pub fire_count: u64,
}

/// Registry of scheduled events.
///
/// Construct one at startup and share it behind an `Arc`.
pub struct Scheduler {
    engine: Arc<dyn TimerEngine>,
    transport: Arc<dyn Transport>,
    triggers: RwLock<HashMap<EventId, Trigger>>,
}

impl Scheduler {
    /// Create an empty registry on top of a timer engine and a transport.
    pub fn new(engine: Arc<dyn TimerEngine>, transport: Arc<dyn Transport>) -> Self {
        Self {
            engine,
            transport,
            triggers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a trigger for a new event.
    ///
    /// Fails with `EventAlreadyScheduled` if the ID is live; the existing
    /// trigger is left untouched. Use [`Scheduler::update`] to replace one.
    pub fn create(&self, event: &Event) -> Result<(), SchedulerError> {
        event.validate()?;

        let mut triggers = self.triggers.write();
        if triggers.contains_key(&event.id) {
            return Err(SchedulerError::EventAlreadyScheduled(event.id));
        }

        let trigger = self.build_trigger(event)?;
        triggers.insert(event.id, trigger);

        info!(
            event_id = %event.id,
            expression = %event.expression,
            url = %event.url,
            "Event scheduled"
        );
        Ok(())
    }

    /// Replace the trigger of an existing event.
    ///
    /// Fails with `EventNotFound` if the ID is not live. The replacement is
    /// registered before the old trigger is stopped, so a rejected expression
    /// leaves the old trigger running.
    pub fn update(&self, event: &Event) -> Result<(), SchedulerError> {
        event.validate()?;

        let mut triggers = self.triggers.write();
        if !triggers.contains_key(&event.id) {
            return Err(SchedulerError::EventNotFound(event.id));
        }

        let replacement = self.build_trigger(event)?;
        if let Some(previous) = triggers.get(&event.id) {
            previous.stop();
        }
        triggers.insert(event.id, replacement);

        info!(
            event_id = %event.id,
            expression = %event.expression,
            url = %event.url,
            "Event rescheduled"
        );
        Ok(())
    }

    /// Stop and remove a trigger.
    ///
    /// No tick for this ID starts a delivery after this returns, and an
    /// in-flight run is abandoned at its next retry delay.
    pub fn delete(&self, id: EventId) -> Result<(), SchedulerError> {
        let mut triggers = self.triggers.write();
        let trigger = triggers.get(&id).ok_or(SchedulerError::EventNotFound(id))?;

        trigger.stop();
        triggers.remove(&id);

        info!(event_id = %id, "Event unscheduled");
        Ok(())
    }

    /// Look up a live trigger.
    pub fn find(&self, id: EventId) -> Result<TriggerInfo, SchedulerError> {
        let triggers = self.triggers.read();
        let info = triggers
            .get(&id)
            .map(Trigger::info)
            .ok_or(SchedulerError::EventNotFound(id))?;

        debug!(event_id = %id, "Trigger found");
        Ok(info)
    }

    /// Create a trigger for every persisted event.
    ///
    /// Stops at the first failure and returns it. Triggers created before the
    /// failure stay live. Returns the number of triggers created.
    pub async fn schedule_all<S>(&self, store: &S) -> Result<usize, SchedulerError>
    where
        S: EventStore + ?Sized,
    {
        let events = store.find_events(&EventQuery::default()).await?;
        info!(count = events.len(), "Scheduling persisted events");

        for (created, event) in events.iter().enumerate() {
            if let Err(e) = self.create(event) {
                warn!(
                    event_id = %event.id,
                    created,
                    error = %e,
                    "Bulk scheduling halted"
                );
                return Err(e);
            }
        }

        Ok(events.len())
    }

    /// Stop and remove every trigger.
    pub fn shutdown(&self) -> usize {
        let mut triggers = self.triggers.write();
        for trigger in triggers.values() {
            trigger.stop();
        }
        let count = triggers.len();
        triggers.clear();

        if count > 0 {
            info!(count, "All triggers stopped");
        }
        count
    }

    /// Whether a trigger is live for `id`.
    pub fn contains(&self, id: EventId) -> bool {
        self.triggers.read().contains_key(&id)
    }

    /// IDs of all live triggers, ascending.
    pub fn ids(&self) -> Vec<EventId> {
        let mut ids: Vec<EventId> = self.triggers.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.triggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.read().is_empty()
    }

    fn build_trigger(&self, event: &Event) -> Result<Trigger, SchedulerError> {
        let cancel = CancellationToken::new();
        let job = Dispatcher::new(event, self.transport.clone()).into_job(cancel.clone());
        let entry = self.engine.add_job(&event.expression, job)?;

        Ok(Trigger {
            event: event.clone(),
            entry,
            cancel,
            created_at: Utc::now(),
        })
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for trigger in self.triggers.get_mut().values() {
            trigger.stop();
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
