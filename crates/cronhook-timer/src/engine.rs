//! CronTimerEngine - spawns one [`CronTimer`] task per registration.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cron::Schedule;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use cronhook_protocols::{TimerEngine, TimerEntry, TimerError, TimerJob};

use crate::cron_timer::{CronTimer, CronTimerHandle};

/// Timer engine backed by tokio tasks.
///
/// Registrations must happen inside a tokio runtime. Timers added before
/// [`TimerEngine::start`] wait for it before their first tick.
pub struct CronTimerEngine {
    started: watch::Sender<bool>,
    shutdown: CancellationToken,
    timers: DashMap<Uuid, Arc<CronTimer>>,
}

impl Default for CronTimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CronTimerEngine {
    /// Create a stopped engine.
    pub fn new() -> Self {
        let (started, _) = watch::channel(false);
        Self {
            started,
            shutdown: CancellationToken::new(),
            timers: DashMap::new(),
        }
    }

    /// Parse an expression without registering anything.
    pub fn parse(expression: &str) -> Result<Schedule, TimerError> {
        Schedule::from_str(expression).map_err(|e| TimerError::InvalidExpression {
            expression: expression.to_string(),
            reason: e.to_string(),
        })
    }

    /// Check that an expression is accepted.
    pub fn validate(expression: &str) -> Result<(), TimerError> {
        Self::parse(expression).map(|_| ())
    }

    /// The next `count` instants matching an expression.
    pub fn upcoming(expression: &str, count: usize) -> Result<Vec<DateTime<Utc>>, TimerError> {
        Ok(Self::parse(expression)?.upcoming(Utc).take(count).collect())
    }

    /// Whether [`TimerEngine::start`] has been called.
    pub fn is_started(&self) -> bool {
        *self.started.borrow()
    }

    /// Number of timers that can still fire.
    pub fn active_timers(&self) -> usize {
        self.timers.iter().filter(|t| t.is_active()).count()
    }

    /// Stop every timer and refuse new registrations.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        let count = self.timers.len();
        self.timers.clear();
        info!(count, "Timer engine shut down");
    }
}

impl TimerEngine for CronTimerEngine {
    fn start(&self) {
        if !self.started.send_replace(true) {
            info!("Timer engine started");
        }
    }

    fn add_job(&self, expression: &str, job: TimerJob) -> Result<Box<dyn TimerEntry>, TimerError> {
        if self.shutdown.is_cancelled() {
            return Err(TimerError::ShutDown);
        }

        let schedule = Self::parse(expression)?;
        let timer = Arc::new(CronTimer::new(
            expression,
            schedule,
            self.shutdown.child_token(),
        ));

        self.timers.retain(|_, t| t.is_active());
        self.timers.insert(timer.id(), timer.clone());

        debug!(
            timer_id = %timer.id(),
            expression = %expression,
            "CronTimer registered"
        );
        tokio::spawn(timer.clone().run(job, self.started.subscribe()));

        Ok(Box::new(CronTimerHandle(timer)))
    }
}

impl Drop for CronTimerEngine {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
