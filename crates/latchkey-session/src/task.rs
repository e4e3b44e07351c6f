//! One-shot cancellable timer tasks.
//!
//! Both the update scheduler and the auto-relock timer own at most one
//! pending [`ScheduledTask`] at a time; arming a new one replaces (and
//! cancels) the previous one. Cancellation is idempotent and becomes a
//! no-op once the task has fired, so replacing the handle of a task that
//! is already running its work never interrupts that work.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Handle to a one-shot timer task.
///
/// The task sleeps for its delay, marks itself fired, then runs its work
/// future. [`cancel`](ScheduledTask::cancel) aborts the task only while it
/// is still pending; after the fire point the work is allowed to finish.
///
/// # Examples
///
/// ```
/// use latchkey_session::ScheduledTask;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let task = ScheduledTask::once(Duration::from_secs(60), async {
///         // never reached in this example
///     });
///     assert!(task.is_pending());
///     task.cancel();
///     // Cancelling twice is a no-op.
///     task.cancel();
/// }
/// ```
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
    fired: Arc<AtomicBool>,
    fire_at: Instant,
}

impl ScheduledTask {
    /// Spawn a task that runs `work` once after `delay`.
    pub fn once<F>(delay: Duration, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let fire_at = Instant::now() + delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(fire_at).await;
            flag.store(true, Ordering::SeqCst);
            work.await;
        });

        Self {
            handle,
            fired,
            fire_at,
        }
    }

    /// Cancel the task if it has not fired yet.
    ///
    /// Idempotent: cancelling a task that already fired, or cancelling
    /// twice, is a no-op and never affects any other task.
    pub fn cancel(&self) {
        if !self.fired.load(Ordering::SeqCst) {
            self.handle.abort();
        }
    }

    /// Whether the timer has reached its fire point.
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Whether the task is still waiting to fire.
    pub fn is_pending(&self) -> bool {
        !self.has_fired() && !self.handle.is_finished()
    }

    /// When the task is (or was) scheduled to fire.
    pub fn fire_at(&self) -> Instant {
        self.fire_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let task = ScheduledTask::once(Duration::from_secs(5), async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        assert!(task.is_pending());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(task.has_fired());
        assert!(!task.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_fire() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let task = ScheduledTask::once(Duration::from_secs(5), async move {
            c.fetch_add(1, Ordering::SeqCst);
        });
        task.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let task = ScheduledTask::once(Duration::from_secs(5), async {});
        task.cancel();
        task.cancel();
        task.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_is_noop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let task = ScheduledTask::once(Duration::from_secs(1), async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(task.has_fired());
        task.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_does_not_affect_other_tasks() {
        let count = Arc::new(AtomicUsize::new(0));

        let c1 = Arc::clone(&count);
        let doomed = ScheduledTask::once(Duration::from_secs(5), async move {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&count);
        let survivor = ScheduledTask::once(Duration::from_secs(5), async move {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        doomed.cancel();
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(survivor.has_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_at_reflects_delay() {
        let before = Instant::now();
        let task = ScheduledTask::once(Duration::from_secs(30), async {});
        assert_eq!(task.fire_at(), before + Duration::from_secs(30));
        task.cancel();
    }
}
