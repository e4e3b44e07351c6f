//! Radio transport abstraction for Latchkey.
//!
//! This crate defines the seam between the session core and the actual
//! short-range radio stack: resolving a stable [`DeviceAddress`] to a
//! transient [`DeviceHandle`], the four lock primitives (`lock`, `unlock`,
//! `query_status`, `wake`), and the presence/absence event feed produced by
//! the discovery layer.
//!
//! The raw packet encoding of the proprietary lock protocol is out of
//! scope; implementations of [`RadioTransport`] are expected to wrap a real
//! BLE stack. The [`mock`] module provides scriptable in-memory
//! implementations for development and testing without hardware.
//!
//! # Design
//!
//! - **Async-first**: all I/O is asynchronous; trait methods return
//!   `Send` futures so sessions can be polled from spawned tasks.
//! - **Classification at the edge**: [`RadioError::is_transient`] decides
//!   which failures feed the session's retry policy and which are fatal.
//! - **Resolution is not an error**: [`DeviceLocator::resolve`] returns
//!   `Option`; an absent device is an expected outcome, not a failure.
//!
//! [`DeviceAddress`]: latchkey_core::DeviceAddress

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use error::{RadioError, RadioResult};
pub use traits::{DeviceLocator, RadioTransport};
pub use types::{DeviceHandle, Presence, PresenceEvent};
