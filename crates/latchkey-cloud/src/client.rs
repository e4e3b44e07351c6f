//! Account client abstraction.
//!
//! Locks are provisioned through the vendor's account service: after a
//! credential login the account lists every lock it owns, along with the
//! addresses and capability flags the radio layer needs. The session layer
//! never talks to the account service again after provisioning; everything
//! at runtime is local radio traffic.

use crate::error::CloudResult;
use latchkey_core::{Capabilities, LockIdentity};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Opaque bearer token returned by a successful login.
///
/// The token is only ever echoed back to the same backend; nothing in this
/// crate inspects its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One lock as the account service describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionedLock {
    /// Stable identity: primary address, optional wake relay, name, model.
    pub identity: LockIdentity,

    /// Capability flags reported for this model.
    pub capabilities: Capabilities,
}

impl ProvisionedLock {
    /// Create a provisioned lock record.
    pub fn new(identity: LockIdentity, capabilities: Capabilities) -> Self {
        Self {
            identity,
            capabilities,
        }
    }
}

/// Backend that authenticates an account and lists its locks.
///
/// Methods return explicit `Send` futures so provisioning can run inside
/// spawned setup tasks.
pub trait AccountClient: Send + Sync + 'static {
    /// Authenticate with email and password.
    ///
    /// # Errors
    /// `CloudError::InvalidCredentials` if the account rejects the pair,
    /// `CloudError::Connection` if the backend is unreachable.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = CloudResult<AuthToken>> + Send;

    /// List every lock provisioned to the authenticated account.
    ///
    /// # Errors
    /// `CloudError::NoDevices` if the account owns no locks,
    /// `CloudError::Connection` if the backend is unreachable.
    fn get_all_devices(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = CloudResult<Vec<ProvisionedLock>>> + Send;
}
