//! Core domain types for the Latchkey smart-lock session manager.
//!
//! This crate defines the identity, capability, and state model shared by
//! every other Latchkey crate, together with the error taxonomy and the
//! session configuration. It contains no async code and no transport
//! knowledge; resolving and talking to an actual lock lives in
//! `latchkey-radio` and `latchkey-session`.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::SessionConfig;
pub use error::{Error, Result};
pub use types::{Capabilities, DeviceAddress, LockIdentity, LockState, LockStatus};

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
