//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::Config;

const VALID_BACKENDS: [&str; 2] = ["file", "memory"];

impl Config {
    /// Reject values the daemon cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_transport()?;
        self.validate_store()?;
        self.validate_events()
    }

    fn validate_transport(&self) -> Result<(), ConfigError> {
        if self.transport.timeout_seconds == 0 {
            return Err(ConfigError::invalid_value(
                "transport.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
        if self.transport.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "transport.user_agent",
                "user_agent cannot be empty",
            ));
        }
        Ok(())
    }

    fn validate_store(&self) -> Result<(), ConfigError> {
        if !VALID_BACKENDS.contains(&self.store.backend.as_str()) {
            return Err(ConfigError::invalid_value(
                "store.backend",
                format!(
                    "unknown backend '{}', valid values: {:?}",
                    self.store.backend, VALID_BACKENDS
                ),
            ));
        }
        Ok(())
    }

    fn validate_events(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, event) in self.events.iter().enumerate() {
            let field = format!("events[{}]", index);
            if !seen.insert(event.id) {
                return Err(ConfigError::invalid_value(
                    field,
                    format!("duplicate event id {}", event.id),
                ));
            }
            event
                .validate()
                .and_then(|_| self.scheduler.prepare(event.clone()).map(|_| ()))
                .map_err(|e| ConfigError::invalid_value(field, e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
