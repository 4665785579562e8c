//! Timer engine errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("Invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("Timer engine is shut down")]
    ShutDown,
}
