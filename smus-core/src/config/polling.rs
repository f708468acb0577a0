//! Wait budgets for eventually consistent catalog operations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Publish changeset polling.
///
/// Status is checked at a fixed interval, with no backoff, until the
/// listing reaches a terminal state or `timeout` has elapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between status checks
    pub interval: Duration,
    /// Wall-clock budget per changeset
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(300),
        }
    }
}

impl PollConfig {
    /// Creates a poll config with defaults (1s interval, 300s timeout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the polling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Builder method to set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the polling configuration.
    ///
    /// # Errors
    /// Returns error if the interval is zero or longer than the timeout
    pub fn validate(&self) -> crate::Result<()> {
        if self.interval.is_zero() {
            return Err(crate::error::SmusError::configuration(
                "poll interval must be greater than 0",
            ));
        }
        if self.timeout < self.interval {
            return Err(crate::error::SmusError::configuration(
                "poll timeout must not be shorter than the poll interval",
            ));
        }
        Ok(())
    }
}

/// Glossary settling after creation.
///
/// Newly created glossaries take a moment to show up in search. After the
/// initial `delay` the loader re-lists up to `max_attempts` times, waiting
/// `retry_interval` between lists, until every submitted name resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleConfig {
    /// Fixed wait before the first listing
    pub delay: Duration,
    /// Number of listings to try (at least 1)
    pub max_attempts: u32,
    /// Wait between listings
    pub retry_interval: Duration,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            max_attempts: 3,
            retry_interval: Duration::from_secs(2),
        }
    }
}

impl SettleConfig {
    /// Creates a settle config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the initial delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Builder method to set the number of listing attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Builder method to set the wait between listings.
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// Validates the settle configuration.
    ///
    /// # Errors
    /// Returns error if no listing attempt is allowed
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_attempts == 0 {
            return Err(crate::error::SmusError::configuration(
                "max_attempts must be at least 1",
            ));
        }
        Ok(())
    }
}
