//! Event definition, retry policy and query filter.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::SchedulerError;

/// Stable, non-zero identifier of a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u64);

impl EventId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EventId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recurring outbound notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID.
    pub id: EventId,
    /// Cron expression (6 fields including seconds).
    pub expression: String,
    /// Target URL for delivery attempts.
    pub url: String,
    /// Retries allowed after the first failed attempt.
    #[serde(default)]
    pub max_retries: u32,
    /// Fixed delay between retries, in seconds.
    #[serde(default)]
    pub retry_timeout: u64,
}

impl Event {
    /// Create a new event with no retries.
    pub fn new(id: impl Into<EventId>, expression: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            expression: expression.into(),
            url: url.into(),
            max_retries: 0,
            retry_timeout: 0,
        }
    }

    /// Set the retry policy.
    pub fn with_retries(mut self, max_retries: u32, retry_timeout_seconds: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_timeout = retry_timeout_seconds;
        self
    }

    /// The bounded linear backoff this event asks for.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            delay: Duration::from_secs(self.retry_timeout),
        }
    }

    /// Check the fields the registry relies on.
    ///
    /// Expression syntax is left to the timer engine.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.id.get() == 0 {
            return Err(SchedulerError::InvalidEvent("id must be non-zero".to_string()));
        }
        if self.expression.trim().is_empty() {
            return Err(SchedulerError::InvalidEvent(format!(
                "event {} has an empty expression",
                self.id
            )));
        }
        let url = Url::parse(&self.url).map_err(|e| {
            SchedulerError::InvalidEvent(format!("event {} has invalid url '{}': {}", self.id, self.url, e))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(SchedulerError::InvalidEvent(format!(
                "event {} uses unsupported scheme '{}'",
                self.id, other
            ))),
        }
    }
}

/// Bounded linear backoff: at most `max_retries + 1` attempts, `delay` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Upper bound on delivery attempts per dispatch run.
    pub fn max_attempts(&self) -> u64 {
        u64::from(self.max_retries) + 1
    }
}

/// Filter applied by event stores. The default matches every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    /// Restrict to these IDs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<EventId>>,
    /// Restrict to URLs starting with this prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_prefix: Option<String>,
}

impl EventQuery {
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = EventId>) -> Self {
        self.ids = Some(ids.into_iter().collect());
        self
    }

    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = Some(prefix.into());
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ref ids) = self.ids {
            if !ids.contains(&event.id) {
                return false;
            }
        }
        if let Some(ref prefix) = self.url_prefix {
            if !event.url.starts_with(prefix.as_str()) {
                return false;
            }
        }
        true
    }
}
