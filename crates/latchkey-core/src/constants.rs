//! Shared constants for lock session management.
//!
//! These values centralize the timing and retry policy applied to every
//! managed lock. They are deliberately conservative: BLE locks sleep
//! aggressively and a status read issued too early after a wake or a
//! presence transition tends to observe a half-established session.

// ============================================================================
// Polling
// ============================================================================

/// Default interval between periodic status polls (seconds).
///
/// Each completed poll re-arms the next one after this interval. The value
/// trades battery drain on the lock against staleness of the displayed
/// state.
///
/// # Value: 60 seconds
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 60;

/// Minimum allowed scan interval (seconds).
///
/// Polling faster than this keeps the radio session effectively permanent
/// and drains the lock battery within days.
pub const MIN_SCAN_INTERVAL_SECS: u64 = 5;

// ============================================================================
// Settle delay
// ============================================================================

/// Delay between a device becoming reachable and the first status read
/// (milliseconds).
///
/// Reading immediately after a presence transition or a relay wake races
/// the lock's own connection handshake and returns garbage or a transient
/// disconnect. Two seconds is enough for every lock model observed so far.
///
/// # Value: 2000ms
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2000;

// ============================================================================
// Radio attempts
// ============================================================================

/// Per-attempt timeout for a single radio primitive (milliseconds).
///
/// An attempt that exceeds this deadline is counted as a transient failure
/// and feeds the retry policy.
///
/// # Value: 20000ms (20 seconds)
pub const DEFAULT_ATTEMPT_TIMEOUT_MS: u64 = 20_000;

/// Minimum allowed per-attempt timeout (milliseconds).
///
/// BLE connection establishment alone routinely takes 2-3 seconds; values
/// below this produce spurious transient failures.
pub const MIN_ATTEMPT_TIMEOUT_MS: u64 = 1_000;

/// Maximum radio attempts per operation before escalating to unreachable.
///
/// # Value: 3
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay for the increasing retry backoff (milliseconds).
///
/// Attempt `n` waits `n * base` before retrying, so the default schedule
/// is 500ms, 1000ms between the three attempts.
///
/// # Value: 500ms
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

// ============================================================================
// Addressing
// ============================================================================

/// Length of a textual radio address (`AA:BB:CC:DD:EE:FF`).
pub const ADDRESS_LENGTH: usize = 17;

/// Number of colon-separated octet groups in a radio address.
pub const ADDRESS_GROUPS: usize = 6;
