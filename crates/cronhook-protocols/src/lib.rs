//! # cronhook Protocols
//!
//! Core definitions shared by every cronhook crate.
//! Contains only data types and interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`TimerEngine`] - Cron expression evaluation and tick delivery
//! - [`TimerEntry`] - A single stoppable timer registration
//! - [`EventStore`] - Source of persisted events for bootstrap
//! - [`Transport`] - Outbound delivery of a notification

pub mod error;
pub mod event;
pub mod store;
pub mod timer;
pub mod transport;

pub use error::{SchedulerError, StoreError, TimerError, TransportError};
pub use event::{Event, EventId, EventQuery, RetryPolicy};
pub use store::EventStore;
pub use timer::{TimerEngine, TimerEntry, TimerJob};
pub use transport::{Transport, TransportConfig};
