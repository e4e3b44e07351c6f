//! Error taxonomy for lock session management.
//!
//! The variants map directly onto the recovery paths of the session core:
//! unreachable devices are recoverable and absorbed by polling, transient
//! radio failures feed the retry policy, and protocol failures are
//! surfaced immediately and never retried.

use thiserror::Error;

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by lock sessions and their schedulers.
#[derive(Debug, Error)]
pub enum Error {
    /// The device could not be resolved to a live handle, even after the
    /// wake-relay retry. Recoverable; availability reflects it.
    #[error("Device unreachable: {address}")]
    DeviceUnreachable { address: String },

    /// A transient radio failure (disconnect, busy, per-attempt timeout).
    /// Retried internally; escalates to [`Error::DeviceUnreachable`] once
    /// the attempt bound is exhausted.
    #[error("Transient radio failure: {message}")]
    RadioTransient { message: String },

    /// Authentication or encoding failure at the radio layer. Never
    /// retried.
    #[error("Protocol failure: {message}")]
    ProtocolFatal { message: String },

    /// The operation is not supported by this lock's capabilities.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Internal scheduling invariant violation. Should never occur in
    /// correct operation.
    #[error("Scheduling invariant violated: {message}")]
    Scheduling { message: String },

    /// Invalid session configuration.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Malformed device address.
    #[error("Invalid device address: {message}")]
    InvalidAddress { message: String },
}

impl Error {
    /// Create a new device-unreachable error.
    pub fn unreachable(address: impl Into<String>) -> Self {
        Self::DeviceUnreachable {
            address: address.into(),
        }
    }

    /// Create a new transient radio error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::RadioTransient {
            message: message.into(),
        }
    }

    /// Create a new fatal protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolFatal {
            message: message.into(),
        }
    }

    /// Create a new unsupported-operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new scheduling error.
    pub fn scheduling(message: impl Into<String>) -> Self {
        Self::Scheduling {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid-address error.
    pub fn invalid_address(message: impl Into<String>) -> Self {
        Self::InvalidAddress {
            message: message.into(),
        }
    }

    /// Whether the failure is expected to clear on its own (the device was
    /// simply out of range or asleep).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DeviceUnreachable { .. } | Self::RadioTransient { .. }
        )
    }
}
