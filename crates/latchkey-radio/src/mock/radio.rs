//! Scriptable mock radio transport.

use crate::{
    RadioError, RadioResult,
    traits::RadioTransport,
    types::DeviceHandle,
};
use latchkey_core::DeviceAddress;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Which primitive a [`RadioCall`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RadioOp {
    /// `lock` primitive.
    Lock,

    /// `unlock` primitive.
    Unlock,

    /// `query_status` primitive.
    QueryStatus,

    /// `wake` primitive.
    Wake,
}

/// One recorded primitive invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioCall {
    /// Primitive that was invoked.
    pub op: RadioOp,

    /// Address of the handle it was invoked against.
    pub address: DeviceAddress,
}

#[derive(Debug)]
struct RadioScript {
    status_code: u8,
    latency: Duration,
    lock_errors: VecDeque<RadioError>,
    unlock_errors: VecDeque<RadioError>,
    status_errors: VecDeque<RadioError>,
    wake_errors: VecDeque<RadioError>,
    calls: Vec<RadioCall>,
}

impl RadioScript {
    fn queue_for(&mut self, op: RadioOp) -> &mut VecDeque<RadioError> {
        match op {
            RadioOp::Lock => &mut self.lock_errors,
            RadioOp::Unlock => &mut self.unlock_errors,
            RadioOp::QueryStatus => &mut self.status_errors,
            RadioOp::Wake => &mut self.wake_errors,
        }
    }
}

/// Mock radio transport for testing and development.
///
/// Every primitive succeeds by default; failures are injected per-op
/// through the paired [`MockRadioHandle`], which also records every call
/// for assertions about retry and wake behavior.
///
/// # Examples
///
/// ```
/// use latchkey_radio::mock::{MockRadio, RadioOp};
/// use latchkey_radio::{DeviceHandle, RadioTransport};
/// use latchkey_core::DeviceAddress;
///
/// #[tokio::main]
/// async fn main() {
///     let (radio, handle) = MockRadio::new();
///     handle.set_status_code(1);
///
///     let addr = DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap();
///     let device = DeviceHandle::new(addr);
///
///     assert_eq!(radio.query_status(&device).await.unwrap(), 1);
///     assert_eq!(handle.count(RadioOp::QueryStatus), 1);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockRadio {
    shared: Arc<Mutex<RadioScript>>,
}

impl MockRadio {
    /// Create a mock radio and its controller handle.
    pub fn new() -> (Self, MockRadioHandle) {
        let shared = Arc::new(Mutex::new(RadioScript {
            status_code: 1,
            latency: Duration::ZERO,
            lock_errors: VecDeque::new(),
            unlock_errors: VecDeque::new(),
            status_errors: VecDeque::new(),
            wake_errors: VecDeque::new(),
            calls: Vec::new(),
        }));

        (
            Self {
                shared: Arc::clone(&shared),
            },
            MockRadioHandle { shared },
        )
    }

    /// Record the call and dequeue any scripted failure.
    fn begin(&self, op: RadioOp, handle: &DeviceHandle) -> (Duration, Option<RadioError>) {
        let mut script = self.shared.lock().expect("mock radio state poisoned");
        script.calls.push(RadioCall {
            op,
            address: handle.address().clone(),
        });
        let error = script.queue_for(op).pop_front();
        (script.latency, error)
    }

    fn run(
        &self,
        op: RadioOp,
        handle: &DeviceHandle,
    ) -> impl Future<Output = RadioResult<()>> + Send {
        let (latency, error) = self.begin(op, handle);
        async move {
            if latency > Duration::ZERO {
                tokio::time::sleep(latency).await;
            }
            match error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }
    }
}

impl RadioTransport for MockRadio {
    fn lock(&self, handle: &DeviceHandle) -> impl Future<Output = RadioResult<()>> + Send {
        self.run(RadioOp::Lock, handle)
    }

    fn unlock(&self, handle: &DeviceHandle) -> impl Future<Output = RadioResult<()>> + Send {
        self.run(RadioOp::Unlock, handle)
    }

    fn query_status(&self, handle: &DeviceHandle) -> impl Future<Output = RadioResult<u8>> + Send {
        let (latency, error) = self.begin(RadioOp::QueryStatus, handle);
        let code = self.shared.lock().expect("mock radio state poisoned").status_code;
        async move {
            if latency > Duration::ZERO {
                tokio::time::sleep(latency).await;
            }
            match error {
                Some(e) => Err(e),
                None => Ok(code),
            }
        }
    }

    fn wake(&self, handle: &DeviceHandle) -> impl Future<Output = RadioResult<()>> + Send {
        self.run(RadioOp::Wake, handle)
    }
}

/// Controller for a [`MockRadio`].
#[derive(Debug, Clone)]
pub struct MockRadioHandle {
    shared: Arc<Mutex<RadioScript>>,
}

impl MockRadioHandle {
    /// Set the raw status code returned by `query_status`.
    pub fn set_status_code(&self, code: u8) {
        self.shared.lock().expect("mock radio state poisoned").status_code = code;
    }

    /// Add artificial latency to every primitive. Combined with a paused
    /// test clock this drives per-attempt timeout paths.
    pub fn set_latency(&self, latency: Duration) {
        self.shared.lock().expect("mock radio state poisoned").latency = latency;
    }

    /// Script the next invocation of `op` to fail with `error`.
    ///
    /// Scripted failures are consumed in FIFO order; once the queue is
    /// empty the primitive succeeds again.
    pub fn enqueue_error(&self, op: RadioOp, error: RadioError) {
        self.shared
            .lock()
            .expect("mock radio state poisoned")
            .queue_for(op)
            .push_back(error);
    }

    /// Script the next `times` invocations of `op` to fail with `error`.
    pub fn enqueue_errors(&self, op: RadioOp, error: RadioError, times: usize) {
        let mut script = self.shared.lock().expect("mock radio state poisoned");
        for _ in 0..times {
            script.queue_for(op).push_back(error.clone());
        }
    }

    /// Snapshot of all recorded calls, in invocation order.
    pub fn calls(&self) -> Vec<RadioCall> {
        self.shared
            .lock()
            .expect("mock radio state poisoned")
            .calls
            .clone()
    }

    /// Number of recorded invocations of `op`.
    pub fn count(&self, op: RadioOp) -> usize {
        self.shared
            .lock()
            .expect("mock radio state poisoned")
            .calls
            .iter()
            .filter(|c| c.op == op)
            .count()
    }

    /// Discard the recorded call log.
    pub fn clear_calls(&self) {
        self.shared
            .lock()
            .expect("mock radio state poisoned")
            .calls
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceHandle {
        DeviceHandle::new(DeviceAddress::new("AA:BB:CC:DD:EE:FF").unwrap())
    }

    #[tokio::test]
    async fn test_defaults_succeed() {
        let (radio, handle) = MockRadio::new();

        radio.lock(&device()).await.unwrap();
        radio.unlock(&device()).await.unwrap();
        assert_eq!(radio.query_status(&device()).await.unwrap(), 1);
        radio.wake(&device()).await.unwrap();

        assert_eq!(handle.calls().len(), 4);
        assert_eq!(handle.count(RadioOp::Wake), 1);
    }

    #[tokio::test]
    async fn test_scripted_failures_consumed_in_order() {
        let (radio, handle) = MockRadio::new();
        handle.enqueue_error(RadioOp::Lock, RadioError::busy("AA:BB:CC:DD:EE:FF"));
        handle.enqueue_error(RadioOp::Lock, RadioError::disconnected("AA:BB:CC:DD:EE:FF"));

        assert!(matches!(
            radio.lock(&device()).await,
            Err(RadioError::Busy { .. })
        ));
        assert!(matches!(
            radio.lock(&device()).await,
            Err(RadioError::Disconnected { .. })
        ));
        // Queue drained; back to success.
        radio.lock(&device()).await.unwrap();
        assert_eq!(handle.count(RadioOp::Lock), 3);
    }

    #[tokio::test]
    async fn test_status_code_scripting() {
        let (radio, handle) = MockRadio::new();
        handle.set_status_code(0);
        assert_eq!(radio.query_status(&device()).await.unwrap(), 0);
        handle.set_status_code(1);
        assert_eq!(radio.query_status(&device()).await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_applied() {
        let (radio, handle) = MockRadio::new();
        handle.set_latency(Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        radio.lock(&device()).await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }
}
