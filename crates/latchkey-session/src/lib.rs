//! Lock session lifecycle management for Latchkey.
//!
//! This crate coordinates everything that happens between "we know this
//! lock exists" and "the user sees a trustworthy lock state": resolving
//! the stable identity to a transient radio handle, waking sleeping locks
//! through their relay beacon, issuing commands with bounded retry,
//! tracking presence, polling periodically, and reconciling the displayed
//! state after a mechanical auto-relock.
//!
//! # Components
//!
//! - [`LockSession`] — owns one lock's operational state and performs all
//!   radio operations with retry/backoff and failure classification.
//! - [`UpdateScheduler`] — at most one pending status poll per lock,
//!   re-armed after each completed poll and on availability recovery.
//! - [`AvailabilityTracker`] — folds the discovery layer's presence feed
//!   into the session state and drives the scheduler.
//! - [`AutoRelockTimer`] — one-shot reconciliation after an unlock on
//!   locks that relock themselves mechanically.
//! - [`ScheduledTask`] — the cancellable timer handle underlying both the
//!   scheduler and the auto-relock timer.
//!
//! # Wiring
//!
//! ```no_run
//! use latchkey_core::{Capabilities, DeviceAddress, LockIdentity, SessionConfig};
//! use latchkey_radio::mock::{MockLocator, MockRadio, presence_feed};
//! use latchkey_session::{AvailabilityTracker, LockSession, UpdateScheduler};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> latchkey_core::Result<()> {
//!     let address = DeviceAddress::new("AA:BB:CC:DD:EE:FF")?;
//!     let identity = LockIdentity::new(address, "Front Door", "UL3-2B");
//!     let capabilities = Capabilities::with_autolock(Duration::from_secs(5));
//!
//!     let (locator, _locator_ctl) = MockLocator::new();
//!     let (radio, _radio_ctl) = MockRadio::new();
//!     let (_feed_ctl, feed) = presence_feed(16);
//!
//!     let config = SessionConfig::default();
//!     let session = LockSession::new(identity, capabilities, config, locator, radio)?;
//!
//!     let scheduler = UpdateScheduler::new(session.config().scan_interval);
//!     let tracker = AvailabilityTracker::spawn(session.clone(), scheduler.clone(), feed);
//!
//!     // Presentation layer issues commands and watches state.
//!     let mut states = session.subscribe();
//!     session.unlock().await?;
//!     states.changed().await.ok();
//!
//!     // Teardown.
//!     tracker.shutdown();
//!     scheduler.detach();
//!     session.shutdown();
//!     Ok(())
//! }
//! ```

pub mod autorelock;
pub mod availability;
pub mod scheduler;
pub mod session;
pub mod task;

pub use autorelock::AutoRelockTimer;
pub use availability::AvailabilityTracker;
pub use scheduler::UpdateScheduler;
pub use session::LockSession;
pub use task::ScheduledTask;
