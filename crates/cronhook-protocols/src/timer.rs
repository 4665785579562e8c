//! Timer engine protocol.
//!
//! A timer engine owns cron expression evaluation. It accepts an expression
//! and a job, and invokes the job at every matching instant until the
//! returned [`TimerEntry`] is stopped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;

use crate::error::TimerError;

/// Job invoked on every tick. Each invocation runs as its own task.
pub type TimerJob = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// A single registration with a timer engine.
pub trait TimerEntry: Send + Sync {
    /// The expression this entry was registered with.
    fn expression(&self) -> &str;

    /// Halt further ticks. Idempotent.
    fn stop(&self);

    /// Whether the entry can still tick.
    fn is_active(&self) -> bool;

    /// Next instant the entry will tick, if any.
    fn next_fire_time(&self) -> Option<DateTime<Utc>>;

    /// Number of ticks delivered so far.
    fn fire_count(&self) -> u64;
}

/// Cron-style timer engine.
pub trait TimerEngine: Send + Sync {
    /// Begin delivering ticks. Entries added earlier stay idle until this is called.
    fn start(&self);

    /// Register a job for an expression.
    ///
    /// Fails with [`TimerError::InvalidExpression`] when the expression is rejected.
    fn add_job(&self, expression: &str, job: TimerJob) -> Result<Box<dyn TimerEntry>, TimerError>;
}
