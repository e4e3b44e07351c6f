//! Mock presence/absence subscription feed.

use crate::{RadioError, RadioResult, types::PresenceEvent};
use latchkey_core::DeviceAddress;
use tokio::sync::mpsc;

/// Create a mock presence feed.
///
/// Returns the controller handle and the receiver half that stands in for
/// the discovery layer's subscription. Events injected through the handle
/// arrive on the receiver in order.
///
/// # Examples
///
/// ```
/// use latchkey_radio::mock::presence_feed;
/// use latchkey_radio::Presence;
/// use latchkey_core::DeviceAddress;
///
/// #[tokio::main]
/// async fn main() {
///     let (handle, mut feed) = presence_feed(16);
///     let addr = DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap();
///
///     handle.report_present(addr.clone()).await.unwrap();
///
///     let event = feed.recv().await.unwrap();
///     assert_eq!(event.address, addr);
///     assert_eq!(event.presence, Presence::Present);
/// }
/// ```
pub fn presence_feed(capacity: usize) -> (PresenceFeedHandle, mpsc::Receiver<PresenceEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (PresenceFeedHandle { tx }, rx)
}

/// Controller half of a mock presence feed.
#[derive(Debug, Clone)]
pub struct PresenceFeedHandle {
    tx: mpsc::Sender<PresenceEvent>,
}

impl PresenceFeedHandle {
    /// Report that `address` came into range.
    ///
    /// # Errors
    /// Returns an error if the subscriber has been dropped.
    pub async fn report_present(&self, address: DeviceAddress) -> RadioResult<()> {
        self.send(PresenceEvent::present(address)).await
    }

    /// Report that `address` went out of range or timed out.
    ///
    /// # Errors
    /// Returns an error if the subscriber has been dropped.
    pub async fn report_absent(&self, address: DeviceAddress) -> RadioResult<()> {
        self.send(PresenceEvent::absent(address)).await
    }

    async fn send(&self, event: PresenceEvent) -> RadioResult<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| RadioError::disconnected("presence feed closed"))
    }
}
