//! Auto-relock reconciliation timer.
//!
//! Locks with the autolock capability relock themselves mechanically a
//! fixed delay after an unlock; no radio command is involved. This timer
//! only reconciles the *displayed* state with what the hardware is about
//! to do on its own.

use crate::task::ScheduledTask;
use latchkey_core::{Result, error::Error};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

/// One-shot timer arming a state reconciliation after a successful unlock.
///
/// At most one instance is pending per lock: re-arming (e.g. a rapid
/// double unlock) cancels the prior timer so only the latest delay counts.
#[derive(Debug, Default)]
pub struct AutoRelockTimer {
    pending: Mutex<Option<ScheduledTask>>,
}

impl AutoRelockTimer {
    /// Create an unarmed timer.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
        }
    }

    /// Arm the timer to run `reconcile` once after `delay`.
    ///
    /// Implicitly cancels any prior pending instance.
    ///
    /// # Errors
    /// Returns `Error::Scheduling` if the pending slot is poisoned; this
    /// indicates a panic inside the scheduling machinery itself and should
    /// never occur in correct operation.
    pub fn arm<F>(&self, delay: Duration, reconcile: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let task = ScheduledTask::once(delay, reconcile);
        let mut slot = self
            .pending
            .lock()
            .map_err(|_| Error::scheduling("auto-relock slot poisoned"))?;
        if let Some(prev) = slot.replace(task) {
            prev.cancel();
        }
        Ok(())
    }

    /// Cancel any pending instance. Idempotent.
    pub fn cancel(&self) {
        if let Ok(mut slot) = self.pending.lock()
            && let Some(task) = slot.take()
        {
            task.cancel();
        }
    }

    /// Whether a reconciliation is currently pending.
    pub fn is_armed(&self) -> bool {
        self.pending
            .lock()
            .map(|slot| slot.as_ref().is_some_and(ScheduledTask::is_pending))
            .unwrap_or(false)
    }
}
