//! Single-worker actors.
//!
//! An [`Actor`] owns one value and one dedicated worker thread. Callers
//! submit closures over the value and get a [`ResultHandle`] back; the
//! worker runs submissions one at a time, so the value is never accessed
//! concurrently and callers never lock it themselves.
//!
//! ```
//! use solo_worker::Actor;
//!
//! #[derive(Default)]
//! struct Counter {
//! 	x: i32,
//! }
//!
//! let counter = Actor::<Counter>::default();
//! let _ = counter.call(|c| c.x += 3);
//! let _ = counter.call(|c| c.x += 4);
//! assert_eq!(counter.inspect_blockable(|c| c.x).get(), Ok(7));
//! ```

mod actor;
mod error;
mod handle;
mod mailbox;
mod spawn;
mod submission;
mod task;
mod worker;

#[cfg(test)]
mod panic_tests;

use std::any::Any;

pub use actor::{Actor, ActorRef, ActorSpec};
pub use error::{CallError, ShutdownError, SpawnError};
pub use handle::ResultHandle;
pub use worker::ShutdownMode;

/// Renders a panic payload as text.
///
/// Handles the `&'static str` and `String` payloads produced by `panic!`.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&'static str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"<non-string panic payload>".to_string()
	}
}
