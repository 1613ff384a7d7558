use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::error::CallError;
use crate::panic_message;

/// Worker-owned state, erased so the queue does not depend on the actor type.
pub(crate) type State = dyn Any + Send;

/// One queued unit of work. Runs at most once, on the owning worker thread.
pub(crate) type Task = Box<dyn FnOnce(&mut State) + Send>;

/// Receiving half of a packaged call.
pub(crate) type Reply<R> = oneshot::Receiver<Result<R, CallError>>;

/// Packages `op` into a [`Task`] that downcasts the worker state to `T`.
///
/// Panics raised by `op` are caught and delivered as [`CallError::Panicked`].
/// The state is not poisoned afterwards; later tasks see whatever `op` left.
pub(crate) fn package<T, R, F>(actor: Arc<str>, op: F) -> (Task, Reply<R>)
where
	T: Any + Send,
	R: Send + 'static,
	F: FnOnce(&mut T) -> R + Send + 'static,
{
	let (tx, rx) = oneshot::channel();
	let task: Task = Box::new(move |state: &mut State| {
		let Some(state) = state.downcast_mut::<T>() else {
			tracing::error!(actor = %actor, expected = std::any::type_name::<T>(), "worker.task.state_mismatch");
			return;
		};
		let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| op(state))).map_err(|payload| {
			let message = panic_message(payload.as_ref());
			tracing::warn!(actor = %actor, %message, "worker.task.panicked");
			CallError::Panicked {
				actor: actor.to_string(),
				message,
			}
		});
		if tx.send(outcome).is_err() {
			tracing::trace!(actor = %actor, "worker.task.result_unclaimed");
		}
	});
	(task, rx)
}
