//! Periodic status poll scheduling.
//!
//! The scheduler maintains at most one pending poll task per lock
//! (single-flight). Two things arm it: completion of the previous poll
//! (after the configured scan interval) and availability recovery (after
//! the settle delay, via the availability tracker). Arming always cancels
//! the previous pending task first, so an availability flap inside the
//! settle window leaves only the most recent task alive.

use crate::{session::LockSession, task::ScheduledTask};
use latchkey_core::{Result, error::Error};
use latchkey_radio::{DeviceLocator, RadioTransport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug)]
struct SchedulerInner {
    scan_interval: Duration,
    pending: Mutex<Option<ScheduledTask>>,
    in_flight: AtomicBool,
    detached: AtomicBool,
}

/// Single-flight poll scheduler for one lock.
///
/// Cheap to clone; clones share the pending slot, so whoever arms last
/// wins and earlier pending polls are cancelled.
///
/// # Examples
///
/// ```
/// use latchkey_core::{Capabilities, DeviceAddress, LockIdentity, SessionConfig};
/// use latchkey_radio::mock::{MockLocator, MockRadio};
/// use latchkey_session::{LockSession, UpdateScheduler};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> latchkey_core::Result<()> {
///     let address = DeviceAddress::new("AA:BB:CC:DD:EE:FF")?;
///     let identity = LockIdentity::new(address.clone(), "Front Door", "UL3-2B");
///     let (locator, locator_ctl) = MockLocator::new();
///     let (radio, _) = MockRadio::new();
///     locator_ctl.set_reachable(address, true);
///
///     let session = LockSession::new(
///         identity,
///         Capabilities::none(),
///         SessionConfig::default(),
///         locator,
///         radio,
///     )?;
///
///     let scheduler = UpdateScheduler::new(session.config().scan_interval);
///     scheduler.arm(Duration::from_secs(1), &session)?;
///     assert!(scheduler.is_armed());
///
///     scheduler.detach();
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    inner: Arc<SchedulerInner>,
}

impl UpdateScheduler {
    /// Create a scheduler that re-arms completed polls after
    /// `scan_interval`.
    pub fn new(scan_interval: Duration) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                scan_interval,
                pending: Mutex::new(None),
                in_flight: AtomicBool::new(false),
                detached: AtomicBool::new(false),
            }),
        }
    }

    /// Arm a poll of `session` after `delay`, cancelling any prior
    /// pending poll.
    ///
    /// # Errors
    /// Returns `Error::Scheduling` if the pending slot is poisoned.
    pub fn arm<L, T>(&self, delay: Duration, session: &LockSession<L, T>) -> Result<()>
    where
        L: DeviceLocator,
        T: RadioTransport,
    {
        let scheduler = self.clone();
        let session = session.clone();
        let task = ScheduledTask::once(delay, async move {
            scheduler.run_poll(session).await;
        });
        self.store(task)
    }

    /// Cancel the pending poll, if any. Idempotent; never affects other
    /// locks' schedulers.
    pub fn cancel(&self) {
        if let Ok(mut slot) = self.inner.pending.lock()
            && let Some(task) = slot.take()
        {
            task.cancel();
        }
    }

    /// Permanently stop polling; used at lock teardown. Cancels the
    /// pending poll and suppresses any future re-arm from an in-flight
    /// poll completing afterwards.
    pub fn detach(&self) {
        self.inner.detached.store(true, Ordering::SeqCst);
        self.cancel();
    }

    /// Whether a poll is currently pending.
    pub fn is_armed(&self) -> bool {
        self.inner
            .pending
            .lock()
            .map(|slot| slot.as_ref().is_some_and(ScheduledTask::is_pending))
            .unwrap_or(false)
    }

    /// Whether a poll is executing right now.
    pub fn poll_in_flight(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    fn store(&self, task: ScheduledTask) -> Result<()> {
        let mut slot = self
            .inner
            .pending
            .lock()
            .map_err(|_| Error::scheduling("poll slot poisoned"))?;
        if let Some(prev) = slot.replace(task) {
            prev.cancel();
        }
        Ok(())
    }

    async fn run_poll<L, T>(self, session: LockSession<L, T>)
    where
        L: DeviceLocator,
        T: RadioTransport,
    {
        if self.inner.detached.load(Ordering::SeqCst) {
            debug!(lock = %session.identity().name, "scheduler detached, skipping poll");
            return;
        }

        if self.inner.in_flight.swap(true, Ordering::SeqCst) {
            debug!(lock = %session.identity().name, "poll already in flight, skipping");
        } else {
            if let Err(e) = session.query_status().await {
                // Only protocol failures reach here; unreachable devices
                // are absorbed by the session.
                warn!(lock = %session.identity().name, error = %e, "status poll failed");
            }
            self.inner.in_flight.store(false, Ordering::SeqCst);
        }

        if self.inner.detached.load(Ordering::SeqCst) {
            return;
        }

        // Re-arm the periodic poll. Replacing this task's own handle in
        // the slot is safe: it has fired, so the cancel is a no-op.
        if let Err(e) = self.arm(self.inner.scan_interval, &session) {
            warn!(lock = %session.identity().name, error = %e, "failed to re-arm poll");
        }
    }
}
