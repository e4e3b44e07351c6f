//! Per-lock operational session.
//!
//! A [`LockSession`] owns one lock's operational state and performs every
//! radio operation against it: resolve the device, optionally wake it
//! through its relay, issue the primitive with a bounded per-attempt
//! timeout, retry transient failures with increasing backoff, and publish
//! every confirmed state change through a watch channel.
//!
//! # Operation flow
//!
//! ```text
//! Idle ──► Resolving ──► Operating ──► Idle      (confirmed result)
//!              │             │
//!              │             └──────► Idle        (unreachable, state kept)
//!              └────────────────────► Idle        (fatal, surfaced)
//! ```
//!
//! # Concurrency
//!
//! A per-lock gate serializes operations: concurrent commands on the same
//! lock queue in FIFO order and never overlap. Operations across different
//! locks are fully independent.

use crate::autorelock::AutoRelockTimer;
use chrono::Utc;
use latchkey_core::{
    Capabilities, DeviceAddress, LockIdentity, LockState, LockStatus, Result, SessionConfig,
    error::Error,
};
use latchkey_radio::{DeviceHandle, DeviceLocator, RadioTransport};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

/// Radio primitive selected by a session operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RadioCommand {
    Lock,
    Unlock,
    QueryStatus,
}

impl fmt::Display for RadioCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RadioCommand::Lock => "lock",
            RadioCommand::Unlock => "unlock",
            RadioCommand::QueryStatus => "query_status",
        };
        write!(f, "{}", s)
    }
}

struct SessionInner<L, T> {
    identity: LockIdentity,
    capabilities: Capabilities,
    config: SessionConfig,
    locator: L,
    transport: T,
    state_tx: watch::Sender<LockState>,
    op_gate: Mutex<()>,
    autorelock: AutoRelockTimer,
}

/// Operational session for one known lock.
///
/// Cheap to clone; clones share the same state, gate, and timers, so the
/// scheduler and availability tracker can hold their own copies.
///
/// # Examples
///
/// ```
/// use latchkey_core::{Capabilities, DeviceAddress, LockIdentity, SessionConfig};
/// use latchkey_radio::mock::{MockLocator, MockRadio};
/// use latchkey_session::LockSession;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> latchkey_core::Result<()> {
///     let address = DeviceAddress::new("AA:BB:CC:DD:EE:FF")?;
///     let identity = LockIdentity::new(address.clone(), "Front Door", "UL3-2B");
///     let capabilities = Capabilities::with_autolock(Duration::from_secs(5));
///
///     let (locator, locator_ctl) = MockLocator::new();
///     let (radio, _radio_ctl) = MockRadio::new();
///     locator_ctl.set_reachable(address, true);
///
///     let session = LockSession::new(
///         identity,
///         capabilities,
///         SessionConfig::default(),
///         locator,
///         radio,
///     )?;
///
///     session.unlock().await?;
///     assert!(session.autolock_armed());
///     Ok(())
/// }
/// ```
pub struct LockSession<L, T> {
    inner: Arc<SessionInner<L, T>>,
}

impl<L, T> Clone for LockSession<L, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L, T> LockSession<L, T>
where
    L: DeviceLocator,
    T: RadioTransport,
{
    /// Create a session for a known lock.
    ///
    /// # Errors
    /// Returns `Error::Config` if the configuration fails validation.
    pub fn new(
        identity: LockIdentity,
        capabilities: Capabilities,
        config: SessionConfig,
        locator: L,
        transport: T,
    ) -> Result<Self> {
        config.validate()?;
        debug!(lock = %identity.name, address = %identity.address, "creating lock session");

        let (state_tx, _) = watch::channel(LockState::default());

        Ok(Self {
            inner: Arc::new(SessionInner {
                identity,
                capabilities,
                config,
                locator,
                transport,
                state_tx,
                op_gate: Mutex::new(()),
                autorelock: AutoRelockTimer::new(),
            }),
        })
    }

    /// Identity of the managed lock.
    pub fn identity(&self) -> &LockIdentity {
        &self.inner.identity
    }

    /// Primary radio address of the managed lock.
    pub fn address(&self) -> &DeviceAddress {
        &self.inner.identity.address
    }

    /// Capability flags of the managed lock.
    pub fn capabilities(&self) -> &Capabilities {
        &self.inner.capabilities
    }

    /// Session timing and retry policy.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Snapshot of the current operational state.
    pub fn state(&self) -> LockState {
        self.inner.state_tx.borrow().clone()
    }

    /// Whether the device is currently believed reachable.
    pub fn is_available(&self) -> bool {
        self.inner.state_tx.borrow().available
    }

    /// Subscribe to state changes.
    ///
    /// The receiver is notified on every state mutation: confirmed
    /// operation results, poll results, availability transitions, and
    /// auto-relock reconciliations.
    pub fn subscribe(&self) -> watch::Receiver<LockState> {
        self.inner.state_tx.subscribe()
    }

    /// Whether an auto-relock reconciliation is currently pending.
    pub fn autolock_armed(&self) -> bool {
        self.inner.autorelock.is_armed()
    }

    /// Extend the bolt.
    ///
    /// The state transitions to `Locked` only after the radio confirms the
    /// operation.
    ///
    /// # Errors
    /// `Error::DeviceUnreachable` if the device cannot be resolved (even
    /// via the wake relay) or transient retries are exhausted;
    /// `Error::ProtocolFatal` on an authentication or encoding failure.
    pub async fn lock(&self) -> Result<()> {
        self.run_command(RadioCommand::Lock, LockStatus::Locking, LockStatus::Locked)
            .await
    }

    /// Retract the bolt.
    ///
    /// On success, if the lock has the autolock capability, arms the
    /// auto-relock timer with the capability's delay; a second unlock
    /// before it fires re-arms it.
    ///
    /// # Errors
    /// Same taxonomy as [`LockSession::lock`].
    pub async fn unlock(&self) -> Result<()> {
        self.run_command(
            RadioCommand::Unlock,
            LockStatus::Unlocking,
            LockStatus::Unlocked,
        )
        .await?;

        if self.inner.capabilities.supports_autolock {
            self.arm_autorelock()?;
        }
        Ok(())
    }

    /// Open the lock. Alias for [`LockSession::unlock`] on locks that
    /// support it.
    ///
    /// # Errors
    /// `Error::Unsupported` if the lock lacks the open capability;
    /// otherwise the same taxonomy as [`LockSession::unlock`].
    pub async fn open(&self) -> Result<()> {
        if !self.inner.capabilities.supports_open {
            return Err(Error::unsupported("open"));
        }
        self.unlock().await
    }

    /// Read the bolt status and fold it into the state.
    ///
    /// An unreachable device is an expected outcome of periodic polling:
    /// it is logged at low severity, the last-known status is preserved,
    /// and availability flips to false. Only protocol failures surface.
    ///
    /// # Errors
    /// `Error::ProtocolFatal` on an authentication or encoding failure.
    pub async fn query_status(&self) -> Result<()> {
        let _gate = self.inner.op_gate.lock().await;

        match self.with_device(RadioCommand::QueryStatus).await {
            Ok(code) => {
                let status = LockStatus::from_raw(code);
                debug!(lock = %self.inner.identity.name, code, %status, "status poll confirmed");
                self.confirm(status);
                Ok(())
            }
            Err(e @ Error::DeviceUnreachable { .. }) => {
                debug!(lock = %self.inner.identity.name, error = %e, "status poll absorbed");
                self.mark_unreachable();
                Ok(())
            }
            Err(e) => {
                error!(lock = %self.inner.identity.name, error = %e, "status poll failed");
                Err(e)
            }
        }
    }

    /// Refresh the displayed state. Presentation-layer alias for
    /// [`LockSession::query_status`].
    pub async fn refresh(&self) -> Result<()> {
        self.query_status().await
    }

    /// Cancel pending timers owned by this session.
    pub fn shutdown(&self) {
        debug!(lock = %self.inner.identity.name, "session shutdown");
        self.inner.autorelock.cancel();
    }

    /// Mark the device reachable or unreachable without touching the
    /// last-known status.
    pub(crate) fn set_available(&self, available: bool) {
        self.inner.state_tx.send_if_modified(|state| {
            if state.available == available {
                false
            } else {
                state.available = available;
                true
            }
        });
    }

    async fn run_command(
        &self,
        command: RadioCommand,
        transitional: LockStatus,
        terminal: LockStatus,
    ) -> Result<()> {
        let _gate = self.inner.op_gate.lock().await;
        info!(lock = %self.inner.identity.name, %command, "issuing command");

        let prior = self.inner.state_tx.borrow().status;
        self.set_status(transitional);

        match self.with_device(command).await {
            Ok(_) => {
                info!(lock = %self.inner.identity.name, %command, "command confirmed");
                self.confirm(terminal);
                Ok(())
            }
            Err(e) => {
                warn!(lock = %self.inner.identity.name, %command, error = %e, "command failed");
                // Never left speculatively set; restore what was last confirmed.
                self.set_status(prior);
                if matches!(e, Error::DeviceUnreachable { .. }) {
                    self.mark_unreachable();
                }
                Err(e)
            }
        }
    }

    /// Resolve the device and run one primitive with bounded retries.
    ///
    /// Implements the full recovery ladder: direct resolution, wake-relay
    /// retry, per-attempt timeout, increasing backoff for transient
    /// failures, and escalation to `DeviceUnreachable` once the attempt
    /// bound is exhausted. Fatal protocol failures are surfaced on the
    /// first occurrence.
    async fn with_device(&self, command: RadioCommand) -> Result<u8> {
        let handle = self.resolve_device().await?;
        let config = &self.inner.config;

        let mut attempt = 1u32;
        loop {
            let outcome =
                tokio::time::timeout(config.attempt_timeout, self.dispatch(command, &handle)).await;

            let transient = match outcome {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) if !e.is_transient() => {
                    error!(device = %handle, %command, error = %e, "fatal radio failure");
                    return Err(Error::protocol(e.to_string()));
                }
                Ok(Err(e)) => Error::transient(e.to_string()),
                Err(_) => Error::transient(format!(
                    "attempt timed out after {}ms",
                    config.attempt_timeout.as_millis()
                )),
            };

            if attempt >= config.max_attempts {
                warn!(
                    device = %handle,
                    %command,
                    attempts = attempt,
                    "retry bound exhausted, escalating to unreachable"
                );
                return Err(Error::unreachable(self.inner.identity.address.as_str()));
            }

            let backoff = config.backoff_base * attempt;
            debug!(
                device = %handle,
                %command,
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                error = %transient,
                "transient radio failure, backing off"
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }

    /// Resolve the primary address, falling back to the wake-relay path.
    ///
    /// If the primary does not resolve and a relay is configured, exactly
    /// one `wake` is sent through the relay, followed by a settle delay
    /// and exactly one resolution retry.
    async fn resolve_device(&self) -> Result<DeviceHandle> {
        let identity = &self.inner.identity;

        if let Some(handle) = self.inner.locator.resolve(&identity.address, true).await {
            return Ok(handle);
        }

        let Some(wake_address) = &identity.wake_address else {
            debug!(address = %identity.address, "device unresolved, no wake relay configured");
            return Err(Error::unreachable(identity.address.as_str()));
        };

        let Some(relay) = self.inner.locator.resolve(wake_address, true).await else {
            debug!(address = %identity.address, relay = %wake_address, "wake relay unresolved");
            return Err(Error::unreachable(identity.address.as_str()));
        };

        debug!(address = %identity.address, relay = %relay, "waking device through relay");
        if let Err(e) = self.inner.transport.wake(&relay).await {
            // Best effort: the relay may have roused the lock before failing.
            warn!(relay = %relay, error = %e, "wake primitive failed");
        }
        tokio::time::sleep(self.inner.config.settle_delay).await;

        self.inner
            .locator
            .resolve(&identity.address, true)
            .await
            .ok_or_else(|| {
                debug!(address = %identity.address, "device still unresolved after wake");
                Error::unreachable(identity.address.as_str())
            })
    }

    async fn dispatch(
        &self,
        command: RadioCommand,
        handle: &DeviceHandle,
    ) -> latchkey_radio::RadioResult<u8> {
        match command {
            RadioCommand::Lock => self.inner.transport.lock(handle).await.map(|()| 0),
            RadioCommand::Unlock => self.inner.transport.unlock(handle).await.map(|()| 0),
            RadioCommand::QueryStatus => self.inner.transport.query_status(handle).await,
        }
    }

    fn arm_autorelock(&self) -> Result<()> {
        let delay = self.inner.capabilities.autolock_delay;
        let name = self.inner.identity.name.clone();
        let state_tx = self.inner.state_tx.clone();

        debug!(lock = %name, delay_ms = delay.as_millis() as u64, "arming auto-relock timer");
        self.inner.autorelock.arm(delay, async move {
            // Reconciliation only: the hardware relocks itself, no radio
            // command is issued here.
            debug!(lock = %name, "auto-relock fired, reconciling state to locked");
            state_tx.send_modify(|state| state.confirm(LockStatus::Locked, Utc::now()));
        })
    }

    /// Record a confirmed result: status, timestamp, and reachability.
    fn confirm(&self, status: LockStatus) {
        self.inner.state_tx.send_modify(|state| {
            state.confirm(status, Utc::now());
            // The device just answered; it is reachable.
            state.available = true;
        });
    }

    /// Mutate only the status field, leaving the timestamp alone.
    fn set_status(&self, status: LockStatus) {
        self.inner
            .state_tx
            .send_if_modified(|state| {
                if state.status == status {
                    false
                } else {
                    state.status = status;
                    true
                }
            });
    }

    fn mark_unreachable(&self) {
        self.set_available(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_radio::RadioError;
    use latchkey_radio::mock::{
        MockLocator, MockLocatorHandle, MockRadio, MockRadioHandle, RadioOp,
    };
    use std::time::Duration;

    fn address() -> DeviceAddress {
        DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap()
    }

    fn session_with(
        capabilities: Capabilities,
    ) -> (
        LockSession<MockLocator, MockRadio>,
        MockLocatorHandle,
        MockRadioHandle,
    ) {
        let identity = LockIdentity::new(address(), "Front Door", "UL3-2B");
        let (locator, locator_ctl) = MockLocator::new();
        let (radio, radio_ctl) = MockRadio::new();
        let session = LockSession::new(
            identity,
            capabilities,
            SessionConfig::default(),
            locator,
            radio,
        )
        .unwrap();
        (session, locator_ctl, radio_ctl)
    }

    #[tokio::test]
    async fn test_lock_confirms_terminal_state() {
        let (session, locator_ctl, radio_ctl) = session_with(Capabilities::none());
        locator_ctl.set_reachable(address(), true);

        session.lock().await.unwrap();

        let state = session.state();
        assert_eq!(state.status, LockStatus::Locked);
        assert!(state.available);
        assert!(state.updated_at.is_some());
        assert_eq!(radio_ctl.count(RadioOp::Lock), 1);
    }

    #[tokio::test]
    async fn test_unlock_without_autolock_leaves_timer_unarmed() {
        let (session, locator_ctl, _radio_ctl) = session_with(Capabilities::none());
        locator_ctl.set_reachable(address(), true);

        session.unlock().await.unwrap();
        assert_eq!(session.state().status, LockStatus::Unlocked);
        assert!(!session.autolock_armed());
    }

    #[tokio::test]
    async fn test_open_requires_capability() {
        let (session, locator_ctl, radio_ctl) = session_with(Capabilities::none());
        locator_ctl.set_reachable(address(), true);

        assert!(matches!(
            session.open().await,
            Err(Error::Unsupported { .. })
        ));
        assert_eq!(radio_ctl.count(RadioOp::Unlock), 0);

        let (session, locator_ctl, radio_ctl) =
            session_with(Capabilities::none().with_open());
        locator_ctl.set_reachable(address(), true);
        session.open().await.unwrap();
        assert_eq!(radio_ctl.count(RadioOp::Unlock), 1);
    }

    #[tokio::test]
    async fn test_query_status_maps_raw_code() {
        let (session, locator_ctl, radio_ctl) = session_with(Capabilities::none());
        locator_ctl.set_reachable(address(), true);

        radio_ctl.set_status_code(0);
        session.query_status().await.unwrap();
        assert_eq!(session.state().status, LockStatus::Unlocked);

        radio_ctl.set_status_code(1);
        session.query_status().await.unwrap();
        assert_eq!(session.state().status, LockStatus::Locked);

        radio_ctl.set_status_code(42);
        session.query_status().await.unwrap();
        assert_eq!(session.state().status, LockStatus::Unknown);
    }

    #[tokio::test]
    async fn test_protocol_failure_surfaces_without_retry() {
        let (session, locator_ctl, radio_ctl) = session_with(Capabilities::none());
        locator_ctl.set_reachable(address(), true);
        radio_ctl.enqueue_error(RadioOp::Lock, RadioError::authentication("bad session key"));

        assert!(matches!(
            session.lock().await,
            Err(Error::ProtocolFatal { .. })
        ));
        // No retry on fatal failures.
        assert_eq!(radio_ctl.count(RadioOp::Lock), 1);
        assert_eq!(session.state().status, LockStatus::Unknown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_retries_then_succeeds() {
        let (session, locator_ctl, radio_ctl) = session_with(Capabilities::none());
        locator_ctl.set_reachable(address(), true);
        radio_ctl.enqueue_error(RadioOp::Lock, RadioError::busy("AA:BB:CC:DD:EE:FF"));

        session.lock().await.unwrap();
        assert_eq!(radio_ctl.count(RadioOp::Lock), 2);
        assert_eq!(session.state().status, LockStatus::Locked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_commands_queue_fifo() {
        let (session, locator_ctl, radio_ctl) = session_with(Capabilities::none());
        locator_ctl.set_reachable(address(), true);
        radio_ctl.set_latency(Duration::from_millis(100));

        let s1 = session.clone();
        let s2 = session.clone();
        let first = tokio::spawn(async move { s1.lock().await });
        let second = tokio::spawn(async move { s2.unlock().await });

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let calls = radio_ctl.calls();
        assert_eq!(calls.len(), 2);
        // Serialized: the unlock only started after the lock finished.
        assert_eq!(session.state().status, LockStatus::Unlocked);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let identity = LockIdentity::new(address(), "Front Door", "UL3-2B");
        let (locator, _) = MockLocator::new();
        let (radio, _) = MockRadio::new();
        let config = SessionConfig {
            max_attempts: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            LockSession::new(identity, Capabilities::none(), config, locator, radio),
            Err(Error::Config { .. })
        ));
    }
}
