//! Actors: one owned value served by one dedicated worker thread.
//!
//! The value is only ever touched by calls running on that thread, so
//! concurrent callers are serialized without locking the value itself.

pub mod dispatch;
pub mod spec;


pub use dispatch::ActorRef;
pub use spec::ActorSpec;

use crate::error::ShutdownError;
use crate::handle::ResultHandle;
use crate::worker::Worker;

/// Owner of a value of type `T` and of the worker thread that serves it.
///
/// Dropping the actor stops and joins its worker according to its
/// [`ShutdownMode`](crate::ShutdownMode), then drops the value.
pub struct Actor<T> {
	handle: ActorRef<T>,
	worker: Worker,
}

impl<T> std::fmt::Debug for Actor<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Actor").field("handle", &self.handle).finish_non_exhaustive()
	}
}

impl<T> Actor<T>
where
	T: Send + 'static,
{
	/// Spawns an actor owning `value`, with a generated name.
	///
	/// # Panics
	///
	/// Panics if the OS cannot start the worker thread. Use
	/// [`ActorSpec::spawn`] to get the error instead.
	pub fn new(value: T) -> Self {
		ActorSpec::default().spawn(value).unwrap_or_else(|err| panic!("{err}"))
	}

	/// Spawns an actor whose value is built in place by `factory`.
	///
	/// Constructor arguments are forwarded by capturing them in `factory`,
	/// which runs on the new worker thread.
	///
	/// # Panics
	///
	/// Panics if the worker thread cannot start or `factory` panics. Use
	/// [`ActorSpec::spawn_with`] to get the error instead.
	pub fn with<F>(factory: F) -> Self
	where
		F: FnOnce() -> T + Send + 'static,
	{
		ActorSpec::default().spawn_with(factory).unwrap_or_else(|err| panic!("{err}"))
	}

	pub(crate) fn from_worker(worker: Worker) -> Self {
		Self {
			handle: ActorRef::new(worker.port().clone()),
			worker,
		}
	}

	/// Returns a cloneable reference for submitting calls from elsewhere,
	/// including from other actors.
	pub fn handle(&self) -> ActorRef<T> {
		self.handle.clone()
	}

	/// Actor name, also used as the worker thread name.
	pub fn name(&self) -> &str {
		self.handle.name()
	}

	/// Number of calls queued and not yet started.
	pub fn pending(&self) -> usize {
		self.handle.pending()
	}

	/// See [`ActorRef::call`].
	pub fn call<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&mut T) -> R + Send + 'static,
	{
		self.handle.call(op)
	}

	/// See [`ActorRef::call_blockable`].
	pub fn call_blockable<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&mut T) -> R + Send + 'static,
	{
		self.handle.call_blockable(op)
	}

	/// See [`ActorRef::call_unblockable`].
	pub fn call_unblockable<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&mut T) -> R + Send + 'static,
	{
		self.handle.call_unblockable(op)
	}

	/// See [`ActorRef::inspect_blockable`].
	pub fn inspect_blockable<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&T) -> R + Send + 'static,
	{
		self.handle.inspect_blockable(op)
	}

	/// See [`ActorRef::inspect_unblockable`].
	pub fn inspect_unblockable<R, F>(&self, op: F) -> ResultHandle<R>
	where
		R: Send + 'static,
		F: FnOnce(&T) -> R + Send + 'static,
	{
		self.handle.inspect_unblockable(op)
	}

	/// Stops the worker and returns the owned value.
	///
	/// Blocks until the worker thread exits. Queued calls are run or
	/// abandoned per the actor's [`ShutdownMode`](crate::ShutdownMode).
	pub fn shutdown(self) -> Result<T, ShutdownError> {
		let name = self.handle.name().to_string();
		let state = self.worker.join()?;
		match state.downcast::<T>() {
			Ok(value) => Ok(*value),
			Err(_) => {
				tracing::error!(actor = %name, expected = std::any::type_name::<T>(), "actor.shutdown.state_mismatch");
				Err(ShutdownError::WorkerPanicked { name })
			}
		}
	}
}

impl<T> Default for Actor<T>
where
	T: Default + Send + 'static,
{
	fn default() -> Self {
		Self::with(T::default)
	}
}
