//! CronTimer - one cron registration driven by its own tokio task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use cronhook_protocols::{TimerEntry, TimerJob};

/// A single cron registration.
///
/// The timer sleeps until the next matching instant, spawns its job and
/// repeats. Every tick gets its own task, so a slow job never delays or
/// suppresses the next tick.
pub struct CronTimer {
    /// Timer ID.
    id: Uuid,

    /// Parsed schedule.
    schedule: Schedule,

    /// Expression string (for display).
    expression: String,

    /// Cancelled when the timer is stopped or the engine shuts down.
    cancel: CancellationToken,

    /// Fire count.
    fire_count: AtomicU64,
}

impl CronTimer {
    pub(crate) fn new(expression: &str, schedule: Schedule, cancel: CancellationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            schedule,
            expression: expression.to_string(),
            cancel,
            fire_count: AtomicU64::new(0),
        }
    }

    /// Get the timer ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the cron expression.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Check if the timer can still fire.
    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Get the fire count.
    pub fn fire_count(&self) -> u64 {
        self.fire_count.load(Ordering::Relaxed)
    }

    /// Cancel the timer. No tick is delivered afterwards.
    pub fn cancel(&self) {
        self.cancel.cancel();
        debug!(timer_id = %self.id, "CronTimer cancelled");
    }

    /// Get the next scheduled time.
    pub fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        if !self.is_active() {
            return None;
        }
        self.schedule.upcoming(Utc).next()
    }

    /// Tick loop. Waits for the engine's start gate, then fires until cancelled.
    pub(crate) async fn run(self: Arc<Self>, job: TimerJob, mut started: watch::Receiver<bool>) {
        let gate = async { started.wait_for(|s| *s).await.is_ok() };
        tokio::select! {
            _ = self.cancel.cancelled() => return,
            open = gate => {
                if !open {
                    debug!(timer_id = %self.id, "Timer engine dropped before start");
                    return;
                }
            }
        }

        let mut last = Utc::now();
        loop {
            // Slots missed while the task was stalled are skipped, not replayed.
            let from = last.max(Utc::now());
            let Some(next) = self.schedule.after(&from).next() else {
                debug!(timer_id = %self.id, "CronTimer has no upcoming schedule");
                break;
            };

            let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(wait) => {}
            }
            if self.cancel.is_cancelled() {
                break;
            }

            last = next;
            let count = self.fire_count.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(
                timer_id = %self.id,
                expression = %self.expression,
                scheduled_for = %next.to_rfc3339(),
                fire_count = count,
                "CronTimer fired"
            );
            tokio::spawn(job());
        }
    }
}

/// Handle returned to callers of the engine.
pub(crate) struct CronTimerHandle(pub(crate) Arc<CronTimer>);

impl TimerEntry for CronTimerHandle {
    fn expression(&self) -> &str {
        self.0.expression()
    }

    fn stop(&self) {
        self.0.cancel();
    }

    fn is_active(&self) -> bool {
        self.0.is_active()
    }

    fn next_fire_time(&self) -> Option<DateTime<Utc>> {
        self.0.next_fire_time()
    }

    fn fire_count(&self) -> u64 {
        self.0.fire_count()
    }
}
