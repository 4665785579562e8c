//! Registry errors.

use thiserror::Error;

use super::{StoreError, TimerError};
use crate::event::EventId;

/// Errors returned synchronously by registry operations.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("Event already scheduled: {0}")]
    EventAlreadyScheduled(EventId),

    #[error("Invalid schedule '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Event store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Timer engine is shut down")]
    EngineShutDown,
}

impl From<TimerError> for SchedulerError {
    fn from(err: TimerError) -> Self {
        match err {
            TimerError::InvalidExpression { expression, reason } => {
                Self::InvalidSchedule { expression, reason }
            }
            TimerError::ShutDown => Self::EngineShutDown,
        }
    }
}

impl SchedulerError {
    /// Whether the error means the id is unknown to the registry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EventNotFound(_))
    }
}
