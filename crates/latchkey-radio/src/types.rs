use latchkey_core::DeviceAddress;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transient handle to a currently-reachable device.
///
/// Produced by [`DeviceLocator::resolve`] and consumed by the transport
/// primitives. A handle is a snapshot: the device may go out of range at
/// any time after resolution, in which case the next primitive fails with
/// a transient error.
///
/// [`DeviceLocator::resolve`]: crate::traits::DeviceLocator::resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    /// Address the handle was resolved from.
    address: DeviceAddress,

    /// Advertised local name, if the advertisement carried one.
    name: Option<String>,
}

impl DeviceHandle {
    /// Create a handle for a resolved device.
    pub fn new(address: DeviceAddress) -> Self {
        Self {
            address,
            name: None,
        }
    }

    /// Attach the advertised local name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Address this handle was resolved from.
    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    /// Advertised local name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.address, name),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Reachability of a device as reported by the discovery layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Advertisements are being received for the device.
    Present,

    /// The device has not been seen within the discovery timeout.
    Absent,
}

/// One item of the discovery layer's presence subscription feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceEvent {
    /// Address the event refers to.
    pub address: DeviceAddress,

    /// New reachability.
    pub presence: Presence,
}

impl PresenceEvent {
    /// Event for a device that came into range.
    pub fn present(address: DeviceAddress) -> Self {
        Self {
            address,
            presence: Presence::Present,
        }
    }

    /// Event for a device that went out of range or timed out.
    pub fn absent(address: DeviceAddress) -> Self {
        Self {
            address,
            presence: Presence::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> DeviceAddress {
        DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap()
    }

    #[test]
    fn test_handle_display() {
        let handle = DeviceHandle::new(addr());
        assert_eq!(handle.to_string(), "AA:BB:CC:DD:EE:FF");

        let named = DeviceHandle::new(addr()).with_name("U-Bolt Pro");
        assert_eq!(named.to_string(), "AA:BB:CC:DD:EE:FF (U-Bolt Pro)");
        assert_eq!(named.name(), Some("U-Bolt Pro"));
    }

    #[test]
    fn test_presence_event_constructors() {
        assert_eq!(PresenceEvent::present(addr()).presence, Presence::Present);
        assert_eq!(PresenceEvent::absent(addr()).presence, Presence::Absent);
    }
}
