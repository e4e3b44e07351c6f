//! Mock transport implementations for testing and development.
//!
//! Each mock follows the same pattern: the device half implements the
//! transport trait and is handed to the session, while the controller
//! handle stays with the test and scripts behavior (reachability, failure
//! injection, presence events) and exposes call logs for assertions.

mod locator;
mod presence;
mod radio;

pub use locator::{MockLocator, MockLocatorHandle};
pub use presence::{PresenceFeedHandle, presence_feed};
pub use radio::{MockRadio, MockRadioHandle, RadioCall, RadioOp};
