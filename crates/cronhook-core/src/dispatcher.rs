//! Dispatch runs: one delivery attempt per tick plus bounded linear retries.
//!
//! A dispatch run is started by every timer tick. Runs for the same event
//! are never coalesced; a run that is still waiting out a retry delay when
//! the next tick arrives keeps going alongside the new one.

use std::sync::Arc;

use cronhook_protocols::{Event, EventId, RetryPolicy, TimerJob, Transport};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

/// How a dispatch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// An attempt succeeded.
    Delivered { attempts: u64 },
    /// Every allowed attempt failed.
    Exhausted { attempts: u64 },
    /// The owning trigger was removed before the run finished.
    Cancelled { attempts: u64 },
}

impl DispatchOutcome {
    pub fn attempts(&self) -> u64 {
        match *self {
            Self::Delivered { attempts }
            | Self::Exhausted { attempts }
            | Self::Cancelled { attempts } => attempts,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

/// Delivery logic bound to one event.
pub struct Dispatcher {
    event_id: EventId,
    url: String,
    policy: RetryPolicy,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    /// Create a dispatcher closed over the event's URL and retry policy.
    pub fn new(event: &Event, transport: Arc<dyn Transport>) -> Self {
        Self {
            event_id: event.id,
            url: event.url.clone(),
            policy: event.retry_policy(),
            transport,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Execute one dispatch run.
    ///
    /// The run stops early once `cancel` fires: no new attempt is started and
    /// a pending retry delay is abandoned.
    pub async fn run(&self, cancel: &CancellationToken) -> DispatchOutcome {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "dispatch",
            event_id = %self.event_id,
            run_id = %run_id,
        );
        self.run_attempts(cancel).instrument(span).await
    }

    async fn run_attempts(&self, cancel: &CancellationToken) -> DispatchOutcome {
        let mut retries_left = self.policy.max_retries;
        let mut attempts = 0u64;

        loop {
            if cancel.is_cancelled() {
                info!(attempts, "Dispatch cancelled, trigger removed");
                return DispatchOutcome::Cancelled { attempts };
            }

            attempts += 1;
            debug!(url = %self.url, attempt = attempts, "Sending event");

            let err = match self.transport.get(&self.url).await {
                Ok(()) => {
                    info!(url = %self.url, attempts, "Event sent");
                    return DispatchOutcome::Delivered { attempts };
                }
                Err(e) => e,
            };

            if retries_left == 0 {
                error!(
                    url = %self.url,
                    attempts,
                    error = %err,
                    "Max retries reached, giving up"
                );
                return DispatchOutcome::Exhausted { attempts };
            }

            warn!(
                url = %self.url,
                retries_left,
                delay_secs = self.policy.delay.as_secs(),
                error = %err,
                "Delivery failed, retrying"
            );

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(attempts, "Dispatch cancelled during retry delay");
                    return DispatchOutcome::Cancelled { attempts };
                }
                _ = tokio::time::sleep(self.policy.delay) => {}
            }

            retries_left -= 1;
        }
    }

    /// Turn the dispatcher into a timer job. Every tick starts a fresh run.
    pub fn into_job(self, cancel: CancellationToken) -> TimerJob {
        let dispatcher = Arc::new(self);
        Arc::new(move || {
            let dispatcher = dispatcher.clone();
            let cancel = cancel.clone();
            Box::pin(async move {
                dispatcher.run(&cancel).await;
            })
        })
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
