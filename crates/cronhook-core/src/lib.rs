//! # cronhook Core
//!
//! The trigger registry and the dispatch/retry engine.
//!
//! - [`Scheduler`] maps event IDs to live timer registrations and owns their
//!   creation, replacement and teardown.
//! - [`Dispatcher`] runs one delivery sequence per tick: an attempt, then up
//!   to `max_retries` more, a fixed delay apart.

pub mod dispatcher;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use registry::{Scheduler, TriggerInfo};

// Re-export CancellationToken for convenience
pub use tokio_util::sync::CancellationToken;
