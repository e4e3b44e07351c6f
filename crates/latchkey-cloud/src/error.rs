//! Error types for account provisioning.

/// Result type alias for account operations.
pub type CloudResult<T> = std::result::Result<T, CloudError>;

/// Errors reported by an account backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CloudError {
    /// The account rejected the supplied credentials.
    #[error("Invalid credentials for {email}")]
    InvalidCredentials { email: String },

    /// The backend could not be reached.
    #[error("Connection failed: {message}")]
    Connection { message: String },

    /// The account authenticated but has no locks provisioned.
    #[error("No devices registered to this account")]
    NoDevices,
}

impl CloudError {
    /// Create a new invalid-credentials error.
    pub fn invalid_credentials(email: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            email: email.into(),
        }
    }

    /// Create a new connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }
}
