//! Transport trait definitions.
//!
//! These traits establish the contract between the session core and the
//! radio stack, enabling substitution between mock implementations (for
//! development and testing) and a real BLE backend.
//!
//! Methods return explicit `impl Future + Send` rather than `async fn` so
//! that generic session code can spawn polling tasks onto a multithreaded
//! runtime; plain RPITIT `async fn` would leave the futures without a
//! `Send` bound.

use crate::{RadioResult, types::DeviceHandle};
use latchkey_core::DeviceAddress;
use std::future::Future;

/// Resolves a stable device address to a live transport handle.
///
/// Resolution is a pure lookup against the discovery layer's current view:
/// no retry, no blocking beyond the single attempt. An unresolved address
/// is an expected outcome (the lock is asleep or out of range), not an
/// error; recovery paths such as the wake relay belong to the session, not
/// the locator.
pub trait DeviceLocator: Send + Sync + 'static {
    /// Look up a currently-reachable device for `address`.
    ///
    /// `connectable` requests a handle suitable for initiating a
    /// connection, as opposed to one backed only by a passive
    /// advertisement.
    fn resolve(
        &self,
        address: &DeviceAddress,
        connectable: bool,
    ) -> impl Future<Output = Option<DeviceHandle>> + Send;
}

/// The proprietary lock protocol, reduced to four primitives.
///
/// Each primitive performs one complete exchange against the device behind
/// `handle` and classifies its failures per [`RadioError`]: transient
/// failures are retried by the session, fatal ones surfaced immediately.
///
/// [`RadioError`]: crate::RadioError
pub trait RadioTransport: Send + Sync + 'static {
    /// Extend the bolt.
    fn lock(&self, handle: &DeviceHandle) -> impl Future<Output = RadioResult<()>> + Send;

    /// Retract the bolt.
    fn unlock(&self, handle: &DeviceHandle) -> impl Future<Output = RadioResult<()>> + Send;

    /// Read the raw bolt status code (0 = unlocked, 1 = locked).
    fn query_status(&self, handle: &DeviceHandle) -> impl Future<Output = RadioResult<u8>> + Send;

    /// Rouse a sleeping lock through its wake relay.
    ///
    /// Sent to the *relay* handle, not the lock itself. The lock starts
    /// advertising shortly afterwards; callers should allow a settle delay
    /// before re-resolving.
    fn wake(&self, handle: &DeviceHandle) -> impl Future<Output = RadioResult<()>> + Send;
}
