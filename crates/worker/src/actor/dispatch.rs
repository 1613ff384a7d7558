//! Call packaging and the two submission policies.
//!
//! Every call becomes one boxed task closure over the actor's
//! value. Blockable calls are enqueued on the calling thread before the call
//! returns; unblockable calls hand the enqueue to a detached helper job.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::handle::ResultHandle;
use crate::submission::Submission;
use crate::task;
use crate::worker::WorkerPort;

/// Cloneable reference to an actor, used to submit calls.
///
/// An `ActorRef` does not keep the actor alive. Calls made after the owning
/// [`Actor`](super::Actor) began shutting down resolve to
/// [`CallError::Abandoned`](crate::CallError::Abandoned).
pub struct ActorRef<T> {
	port: WorkerPort,
	_state: PhantomData<fn() -> T>,
}

impl<T> Clone for ActorRef<T> {
	fn clone(&self) -> Self {
		Self {
			port: self.port.clone(),
			_state: PhantomData,
		}
	}
}

impl<T> std::fmt::Debug for ActorRef<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ActorRef")
			.field("name", &self.port.name())
			.field("pending", &self.port.pending())
			.finish()
	}
}

impl<T> ActorRef<T>
where
	T: Send + 'static,
{
	pub(crate) fn new(port: WorkerPort) -> Self {
		Self { port, _state: PhantomData }
	}

	/// Actor name, also used as the worker thread name.
	pub fn name(&self) -> &str {
		self.port.name()
	}

	/// Number of calls queued and not yet started.
	pub fn pending(&self) -> usize {
		self.port.pending()
	}

	/// Returns `true` once the actor has begun shutting down.
	pub fn is_closed(&self) -> bool {
		self.port.is_closed()
	}

	/// Shorthand for [`Self::call_blockable`].
	pub fn call<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&mut T) -> R + Send + 'static,
	{
		self.call_blockable(op)
	}

	/// Enqueues `op` before returning.
	///
	/// Blockable calls from one thread run in the order they were made. The
	/// caller only waits for the queue lock, never for `op` itself.
	pub fn call_blockable<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&mut T) -> R + Send + 'static,
	{
		self.dispatch(Submission::Blockable, op)
	}

	/// Hands `op` to a helper job and returns without touching the queue.
	///
	/// No ordering is guaranteed against any other call, including earlier
	/// calls from the same thread.
	pub fn call_unblockable<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&mut T) -> R + Send + 'static,
	{
		self.dispatch(Submission::Unblockable, op)
	}

	/// Read-only form of [`Self::call_blockable`].
	pub fn inspect_blockable<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&T) -> R + Send + 'static,
	{
		self.call_blockable(move |state: &mut T| op(&*state))
	}

	/// Read-only form of [`Self::call_unblockable`].
	pub fn inspect_unblockable<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&T) -> R + Send + 'static,
	{
		self.call_unblockable(move |state: &mut T| op(&*state))
	}

	fn dispatch<R, F>(&self, submission: Submission, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&mut T) -> R + Send + 'static,
	{
		let name = Arc::clone(self.port.name());
		let (task, rx) = task::package::<T, R, F>(Arc::clone(&name), op);
		match submission {
			Submission::Blockable => {
				self.port.submit(task);
			}
			Submission::Unblockable => self.port.submit_detached(task),
		}
		ResultHandle::new(rx, name, self.port.thread())
	}
}
