//! Error types for radio transport operations.
//!
//! Every failure a transport can report falls into one of two recovery
//! classes: transient (disconnect, busy, timeout) failures are retried by
//! the session with backoff, fatal (authentication, encoding) failures are
//! surfaced immediately and never retried.

/// Result type alias for radio transport operations.
pub type RadioResult<T> = std::result::Result<T, RadioError>;

/// Errors that can occur during a radio primitive attempt.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RadioError {
    /// Connection to the device dropped mid-operation.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// The device refused the connection because it is busy with another
    /// session.
    #[error("Device busy: {device}")]
    Busy { device: String },

    /// The attempt exceeded its deadline.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The lock rejected our credentials.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// A frame could not be encoded or decoded.
    #[error("Encoding error: {message}")]
    Encoding { message: String },
}

impl RadioError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new busy error.
    pub fn busy(device: impl Into<String>) -> Self {
        Self::Busy {
            device: device.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
        }
    }

    /// Create a new encoding error.
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    /// Whether a retry with backoff is worthwhile.
    ///
    /// Disconnects, busy devices, and timeouts clear on their own;
    /// authentication and encoding failures will fail identically on every
    /// retry and must be surfaced instead.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Disconnected { .. } | Self::Busy { .. } | Self::Timeout { .. }
        )
    }
}
