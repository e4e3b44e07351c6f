//! Account provisioning for Latchkey.
//!
//! One-time setup boundary: authenticate against the vendor account
//! service and list the locks it has provisioned, with the addresses and
//! capability flags the radio and session layers consume. After
//! provisioning, operation is fully local; nothing here is on the runtime
//! path.
//!
//! # Components
//!
//! - [`AccountClient`] — the backend abstraction (login, list devices).
//! - [`MockAccount`] — scriptable in-memory backend for tests and demos.
//!
//! # Example
//!
//! ```
//! use latchkey_cloud::{AccountClient, MockAccount, ProvisionedLock};
//! use latchkey_core::{Capabilities, DeviceAddress, LockIdentity};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (account, ctl) = MockAccount::new("user@example.com", "hunter2");
//!     let address = DeviceAddress::new("AA:BB:CC:DD:EE:FF")?;
//!     ctl.add_device(ProvisionedLock::new(
//!         LockIdentity::new(address, "Front Door", "UL3-2B"),
//!         Capabilities::none(),
//!     ));
//!
//!     let token = account.login("user@example.com", "hunter2").await?;
//!     for lock in account.get_all_devices(&token).await? {
//!         println!("{} ({})", lock.identity.name, lock.identity.address);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod mock;

pub use client::{AccountClient, AuthToken, ProvisionedLock};
pub use error::{CloudError, CloudResult};
pub use mock::{MockAccount, MockAccountHandle};
