//! Session configuration.
//!
//! Timing and retry policy for every managed lock. Defaults come from
//! [`crate::constants`]; bounds are validated so a bad configuration fails
//! at bootstrap rather than as mysterious runtime flakiness.

use crate::{
    Result,
    constants::{
        DEFAULT_ATTEMPT_TIMEOUT_MS, DEFAULT_BACKOFF_BASE_MS, DEFAULT_MAX_ATTEMPTS,
        DEFAULT_SCAN_INTERVAL_SECS, DEFAULT_SETTLE_DELAY_MS, MIN_ATTEMPT_TIMEOUT_MS,
        MIN_SCAN_INTERVAL_SECS,
    },
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and retry policy for a lock session.
///
/// # Example
///
/// ```
/// use latchkey_core::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig {
///     scan_interval: Duration::from_secs(120),
///     ..SessionConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Interval between periodic status polls.
    pub scan_interval: Duration,

    /// Pause after a device becomes reachable (or is woken through a
    /// relay) before trusting a read from it.
    pub settle_delay: Duration,

    /// Deadline for a single radio primitive attempt.
    pub attempt_timeout: Duration,

    /// Radio attempts per operation before escalating to unreachable.
    pub max_attempts: u32,

    /// Base delay of the increasing retry backoff; attempt `n` waits
    /// `n * base` before the next try.
    pub backoff_base: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_secs(DEFAULT_SCAN_INTERVAL_SECS),
            settle_delay: Duration::from_millis(DEFAULT_SETTLE_DELAY_MS),
            attempt_timeout: Duration::from_millis(DEFAULT_ATTEMPT_TIMEOUT_MS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_base: Duration::from_millis(DEFAULT_BACKOFF_BASE_MS),
        }
    }
}

impl SessionConfig {
    /// Validate the configuration against documented bounds.
    ///
    /// # Errors
    /// Returns `Error::Config` if any value is outside its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.scan_interval < Duration::from_secs(MIN_SCAN_INTERVAL_SECS) {
            return Err(Error::config(format!(
                "scan_interval must be at least {MIN_SCAN_INTERVAL_SECS}s, got {:?}",
                self.scan_interval
            )));
        }
        if self.attempt_timeout < Duration::from_millis(MIN_ATTEMPT_TIMEOUT_MS) {
            return Err(Error::config(format!(
                "attempt_timeout must be at least {MIN_ATTEMPT_TIMEOUT_MS}ms, got {:?}",
                self.attempt_timeout
            )));
        }
        if self.max_attempts == 0 {
            return Err(Error::config("max_attempts must be at least 1"));
        }
        Ok(())
    }
}
