use crate::{
    Result,
    constants::{ADDRESS_GROUPS, ADDRESS_LENGTH},
    error::Error,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Stable radio address of a device (`AA:BB:CC:DD:EE:FF`).
///
/// Identifies a physical lock or wake relay independently of whether it is
/// currently reachable. Addresses are normalized to uppercase on
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Create a new device address with validation.
    ///
    /// The address is normalized (trimmed and converted to uppercase)
    /// before validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidAddress` if the address is not six
    /// colon-separated hex octet pairs.
    pub fn new(address: &str) -> Result<Self> {
        let address = address.trim().to_uppercase();

        if address.len() != ADDRESS_LENGTH {
            return Err(Error::invalid_address(format!(
                "Address must be {ADDRESS_LENGTH} chars, got {}",
                address.len()
            )));
        }

        let groups: Vec<&str> = address.split(':').collect();
        if groups.len() != ADDRESS_GROUPS
            || groups
                .iter()
                .any(|g| g.len() != 2 || !g.chars().all(|c| c.is_ascii_hexdigit()))
        {
            return Err(Error::invalid_address(format!(
                "Address must be {ADDRESS_GROUPS} hex octet pairs: {address}"
            )));
        }

        Ok(DeviceAddress(address))
    }

    /// Get the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DeviceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DeviceAddress::new(s)
    }
}

/// Immutable identity of a known lock.
///
/// Created once at bootstrap from the account inventory and read-only
/// thereafter. The optional wake address names a secondary relay beacon
/// that can rouse a lock whose own radio is asleep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockIdentity {
    /// Primary radio address of the lock.
    pub address: DeviceAddress,

    /// Optional relay/wake beacon address.
    pub wake_address: Option<DeviceAddress>,

    /// Display name of the lock.
    pub name: String,

    /// Model tag as reported by the account inventory.
    pub model: String,
}

impl LockIdentity {
    /// Create a lock identity without a wake relay.
    pub fn new(address: DeviceAddress, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            address,
            wake_address: None,
            name: name.into(),
            model: model.into(),
        }
    }

    /// Attach a wake relay address.
    #[must_use]
    pub fn with_wake_address(mut self, wake_address: DeviceAddress) -> Self {
        self.wake_address = Some(wake_address);
        self
    }

    /// Stable unique identifier for this lock (address + model).
    #[must_use]
    pub fn unique_id(&self) -> String {
        format!("{}_{}", self.address, self.model)
    }
}

/// Immutable capability flags of a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// The lock mechanically relocks itself after an unlock.
    pub supports_autolock: bool,

    /// The lock supports the `open` command (treated as unlock).
    pub supports_open: bool,

    /// Delay after which the mechanical autolock engages.
    pub autolock_delay: Duration,
}

impl Capabilities {
    /// Capabilities of a plain lock: no autolock, no open.
    pub fn none() -> Self {
        Self {
            supports_autolock: false,
            supports_open: false,
            autolock_delay: Duration::ZERO,
        }
    }

    /// Capabilities with mechanical autolock after `delay`.
    pub fn with_autolock(delay: Duration) -> Self {
        Self {
            supports_autolock: true,
            supports_open: false,
            autolock_delay: delay,
        }
    }

    /// Enable the `open` command.
    #[must_use]
    pub fn with_open(mut self) -> Self {
        self.supports_open = true;
        self
    }
}

/// Bolt position as last confirmed by the lock.
///
/// Terminal values (`Locked`, `Unlocked`) are only ever set after a
/// confirmed operation result or poll, never speculatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    /// No confirmed reading yet.
    Unknown,

    /// Bolt confirmed extended.
    Locked,

    /// Bolt confirmed retracted.
    Unlocked,

    /// Lock command in flight.
    Locking,

    /// Unlock command in flight.
    Unlocking,
}

impl LockStatus {
    /// Map the proprietary status code to a bolt position.
    ///
    /// Code 0 means unlocked and 1 means locked; anything else is reported
    /// as [`LockStatus::Unknown`] rather than guessed.
    #[must_use]
    pub fn from_raw(code: u8) -> Self {
        match code {
            0 => LockStatus::Unlocked,
            1 => LockStatus::Locked,
            _ => LockStatus::Unknown,
        }
    }

    /// Whether this is a confirmed terminal position.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, LockStatus::Locked | LockStatus::Unlocked)
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LockStatus::Unknown => "Unknown",
            LockStatus::Locked => "Locked",
            LockStatus::Unlocked => "Unlocked",
            LockStatus::Locking => "Locking",
            LockStatus::Unlocking => "Unlocking",
        };
        write!(f, "{}", s)
    }
}

/// Operational state of a managed lock.
///
/// Mutated only by the session after a confirmed operation or poll result;
/// availability transitions never touch the last-known status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    /// Last confirmed bolt position.
    pub status: LockStatus,

    /// Whether the device is currently believed reachable.
    pub available: bool,

    /// When the status was last confirmed.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for LockState {
    fn default() -> Self {
        Self {
            status: LockStatus::Unknown,
            available: false,
            updated_at: None,
        }
    }
}

impl LockState {
    /// Record a confirmed bolt position, refreshing the timestamp.
    pub fn confirm(&mut self, status: LockStatus, at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = Some(at);
    }
}
