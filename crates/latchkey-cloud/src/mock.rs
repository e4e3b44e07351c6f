//! Scriptable mock account backend.

use crate::{
    client::{AccountClient, AuthToken, ProvisionedLock},
    error::{CloudError, CloudResult},
};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug)]
struct AccountState {
    email: String,
    password: String,
    token: AuthToken,
    devices: Vec<ProvisionedLock>,
    offline: bool,
    login_count: usize,
}

/// Mock account backend for testing and development.
///
/// Accepts one email/password pair, hands out a fixed token, and lists a
/// scripted device inventory through the paired [`MockAccountHandle`].
///
/// # Examples
///
/// ```
/// use latchkey_cloud::{AccountClient, MockAccount};
///
/// #[tokio::main]
/// async fn main() {
///     let (account, _ctl) = MockAccount::new("user@example.com", "hunter2");
///     let token = account.login("user@example.com", "hunter2").await.unwrap();
///     assert!(account.get_all_devices(&token).await.is_err()); // empty inventory
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockAccount {
    shared: Arc<Mutex<AccountState>>,
}

impl MockAccount {
    /// Create a mock account accepting the given credentials, and its
    /// controller handle.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> (Self, MockAccountHandle) {
        let shared = Arc::new(Mutex::new(AccountState {
            email: email.into(),
            password: password.into(),
            token: AuthToken::new("mock-session-token"),
            devices: Vec::new(),
            offline: false,
            login_count: 0,
        }));

        (
            Self {
                shared: Arc::clone(&shared),
            },
            MockAccountHandle { shared },
        )
    }
}

impl AccountClient for MockAccount {
    async fn login(&self, email: &str, password: &str) -> CloudResult<AuthToken> {
        let mut state = self.shared.lock().expect("mock account state poisoned");
        if state.offline {
            return Err(CloudError::connection("backend offline"));
        }
        state.login_count += 1;
        if email != state.email || password != state.password {
            debug!(email, "mock account rejected credentials");
            return Err(CloudError::invalid_credentials(email));
        }
        Ok(state.token.clone())
    }

    async fn get_all_devices(&self, token: &AuthToken) -> CloudResult<Vec<ProvisionedLock>> {
        let state = self.shared.lock().expect("mock account state poisoned");
        if state.offline {
            return Err(CloudError::connection("backend offline"));
        }
        if *token != state.token {
            return Err(CloudError::invalid_credentials(&state.email));
        }
        if state.devices.is_empty() {
            return Err(CloudError::NoDevices);
        }
        Ok(state.devices.clone())
    }
}

/// Controller for a [`MockAccount`].
#[derive(Debug, Clone)]
pub struct MockAccountHandle {
    shared: Arc<Mutex<AccountState>>,
}

impl MockAccountHandle {
    /// Add a lock to the account's inventory.
    pub fn add_device(&self, device: ProvisionedLock) {
        self.shared
            .lock()
            .expect("mock account state poisoned")
            .devices
            .push(device);
    }

    /// Make every subsequent call fail with `CloudError::Connection`.
    pub fn set_offline(&self, offline: bool) {
        self.shared
            .lock()
            .expect("mock account state poisoned")
            .offline = offline;
    }

    /// Number of login attempts observed, successful or not.
    pub fn login_count(&self) -> usize {
        self.shared
            .lock()
            .expect("mock account state poisoned")
            .login_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_core::{Capabilities, DeviceAddress, LockIdentity};
    use std::time::Duration;

    fn lock_record() -> ProvisionedLock {
        let address = DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap();
        ProvisionedLock::new(
            LockIdentity::new(address, "Front Door", "UL3-2B"),
            Capabilities::with_autolock(Duration::from_secs(5)),
        )
    }

    #[tokio::test]
    async fn test_login_and_inventory() {
        let (account, ctl) = MockAccount::new("user@example.com", "hunter2");
        ctl.add_device(lock_record());

        let token = account.login("user@example.com", "hunter2").await.unwrap();
        let devices = account.get_all_devices(&token).await.unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].identity.name, "Front Door");
        assert_eq!(ctl.login_count(), 1);
    }

    #[tokio::test]
    async fn test_bad_credentials_rejected() {
        let (account, _ctl) = MockAccount::new("user@example.com", "hunter2");
        assert!(matches!(
            account.login("user@example.com", "wrong").await,
            Err(CloudError::InvalidCredentials { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_inventory_is_an_error() {
        let (account, _ctl) = MockAccount::new("user@example.com", "hunter2");
        let token = account.login("user@example.com", "hunter2").await.unwrap();
        assert!(matches!(
            account.get_all_devices(&token).await,
            Err(CloudError::NoDevices)
        ));
    }

    #[tokio::test]
    async fn test_offline_backend() {
        let (account, ctl) = MockAccount::new("user@example.com", "hunter2");
        ctl.set_offline(true);
        assert!(matches!(
            account.login("user@example.com", "hunter2").await,
            Err(CloudError::Connection { .. })
        ));
    }

    #[tokio::test]
    async fn test_stale_token_rejected() {
        let (account, ctl) = MockAccount::new("user@example.com", "hunter2");
        ctl.add_device(lock_record());
        let stale = AuthToken::new("expired");
        assert!(matches!(
            account.get_all_devices(&stale).await,
            Err(CloudError::InvalidCredentials { .. })
        ));
    }
}
