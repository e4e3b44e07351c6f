//! Presence/absence tracking.
//!
//! The discovery layer reports presence transitions for device addresses;
//! this tracker folds the events for one lock into its session state and
//! drives the poll scheduler: recovery schedules a near-immediate poll
//! (after the settle delay), loss cancels the pending poll. The tracker
//! itself never performs radio I/O; it only mutates lightweight state and
//! (re)schedules tasks.

use crate::{scheduler::UpdateScheduler, session::LockSession};
use latchkey_radio::{DeviceLocator, Presence, PresenceEvent, RadioTransport};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Consumes a presence feed for one lock.
///
/// Transitions:
/// - `Unavailable → Available`: cancel any pending poll, then schedule a
///   poll after the settle delay (reading mid-handshake returns garbage).
/// - `Available → Unavailable`: cancel the pending poll; the last-known
///   lock status is never touched.
///
/// Events for other addresses on the same feed are ignored.
#[derive(Debug)]
pub struct AvailabilityTracker {
    handle: JoinHandle<()>,
}

impl AvailabilityTracker {
    /// Spawn a tracker consuming `events` on behalf of `session`.
    ///
    /// The settle delay comes from the session's configuration.
    pub fn spawn<L, T>(
        session: LockSession<L, T>,
        scheduler: UpdateScheduler,
        events: mpsc::Receiver<PresenceEvent>,
    ) -> Self
    where
        L: DeviceLocator,
        T: RadioTransport,
    {
        let handle = tokio::spawn(Self::run(session, scheduler, events));
        Self { handle }
    }

    /// Stop consuming events.
    pub fn shutdown(self) {
        self.handle.abort();
    }

    async fn run<L, T>(
        session: LockSession<L, T>,
        scheduler: UpdateScheduler,
        mut events: mpsc::Receiver<PresenceEvent>,
    ) where
        L: DeviceLocator,
        T: RadioTransport,
    {
        let settle_delay = session.config().settle_delay;

        while let Some(event) = events.recv().await {
            if event.address != *session.address() {
                trace!(address = %event.address, "presence event for another device");
                continue;
            }

            match event.presence {
                Presence::Present => {
                    if session.is_available() {
                        continue;
                    }
                    debug!(lock = %session.identity().name, "device recovered");
                    session.set_available(true);
                    scheduler.cancel();
                    if let Err(e) = scheduler.arm(settle_delay, &session) {
                        debug!(lock = %session.identity().name, error = %e, "recovery poll not armed");
                    }
                }
                Presence::Absent => {
                    if !session.is_available() {
                        continue;
                    }
                    debug!(lock = %session.identity().name, "device lost");
                    session.set_available(false);
                    scheduler.cancel();
                }
            }
        }

        debug!(lock = %session.identity().name, "presence feed closed");
    }
}
