//! Mock device locator.

use crate::{traits::DeviceLocator, types::DeviceHandle};
use latchkey_core::DeviceAddress;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct LocatorState {
    reachable: HashSet<DeviceAddress>,
    resolves: HashMap<DeviceAddress, usize>,
}

/// Mock locator for testing and development.
///
/// Resolution succeeds for exactly the addresses marked reachable through
/// the paired [`MockLocatorHandle`]; everything else resolves to `None`,
/// the expected outcome for an asleep or out-of-range device.
///
/// # Examples
///
/// ```
/// use latchkey_radio::mock::MockLocator;
/// use latchkey_radio::DeviceLocator;
/// use latchkey_core::DeviceAddress;
///
/// #[tokio::main]
/// async fn main() {
///     let (locator, handle) = MockLocator::new();
///     let addr = DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap();
///
///     assert!(locator.resolve(&addr, true).await.is_none());
///
///     handle.set_reachable(addr.clone(), true);
///     assert!(locator.resolve(&addr, true).await.is_some());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockLocator {
    shared: Arc<Mutex<LocatorState>>,
}

impl MockLocator {
    /// Create a mock locator and its controller handle.
    pub fn new() -> (Self, MockLocatorHandle) {
        let shared = Arc::new(Mutex::new(LocatorState::default()));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MockLocatorHandle { shared },
        )
    }
}

impl DeviceLocator for MockLocator {
    fn resolve(
        &self,
        address: &DeviceAddress,
        _connectable: bool,
    ) -> impl Future<Output = Option<DeviceHandle>> + Send {
        let mut state = self.shared.lock().expect("mock locator state poisoned");
        *state.resolves.entry(address.clone()).or_insert(0) += 1;
        let handle = state
            .reachable
            .contains(address)
            .then(|| DeviceHandle::new(address.clone()));
        std::future::ready(handle)
    }
}

/// Controller for a [`MockLocator`].
#[derive(Debug, Clone)]
pub struct MockLocatorHandle {
    shared: Arc<Mutex<LocatorState>>,
}

impl MockLocatorHandle {
    /// Mark `address` reachable or unreachable.
    pub fn set_reachable(&self, address: DeviceAddress, reachable: bool) {
        let mut state = self.shared.lock().expect("mock locator state poisoned");
        if reachable {
            state.reachable.insert(address);
        } else {
            state.reachable.remove(&address);
        }
    }

    /// Number of resolution attempts recorded for `address`.
    pub fn resolve_count(&self, address: &DeviceAddress) -> usize {
        self.shared
            .lock()
            .expect("mock locator state poisoned")
            .resolves
            .get(address)
            .copied()
            .unwrap_or(0)
    }
}
