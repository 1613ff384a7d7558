use std::sync::atomic::{AtomicU64, Ordering};

use super::Actor;
use crate::error::SpawnError;
use crate::task::State;
use crate::worker::{ShutdownMode, Worker, WorkerConfig};

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

/// Builder for spawning actors with explicit configuration.
///
/// ```
/// use solo_worker::{ActorSpec, ShutdownMode};
///
/// let counter = ActorSpec::new("counter").shutdown(ShutdownMode::Discard).spawn(0u32).unwrap();
/// assert_eq!(counter.call(|n| *n + 1).get(), Ok(1));
/// ```
#[derive(Debug, Clone)]
pub struct ActorSpec {
	config: WorkerConfig,
}

impl ActorSpec {
	/// Creates a spec whose worker thread is named `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			config: WorkerConfig {
				name: name.into(),
				shutdown: ShutdownMode::default(),
				stack_size: None,
			},
		}
	}

	/// Sets what happens to queued calls when the actor stops.
	#[must_use]
	pub fn shutdown(mut self, mode: ShutdownMode) -> Self {
		self.config.shutdown = mode;
		self
	}

	/// Sets the worker thread's stack size in bytes.
	///
	/// # Panics
	///
	/// Panics if `bytes` is zero.
	#[must_use]
	pub fn stack_size(mut self, bytes: usize) -> Self {
		assert!(bytes > 0, "stack size must be > 0");
		self.config.stack_size = Some(bytes);
		self
	}

	/// Returns the configured actor name.
	pub fn name(&self) -> &str {
		&self.config.name
	}

	/// Spawns an actor that takes ownership of `value`.
	pub fn spawn<T>(&self, value: T) -> Result<Actor<T>, SpawnError>
	where
		T: Send + 'static,
	{
		self.spawn_with(move || value)
	}

	/// Spawns an actor whose value is built by `factory` on the worker thread.
	///
	/// Blocks until `factory` returns. A panicking factory yields
	/// [`SpawnError::Construct`].
	pub fn spawn_with<T, F>(&self, factory: F) -> Result<Actor<T>, SpawnError>
	where
		T: Send + 'static,
		F: FnOnce() -> T + Send + 'static,
	{
		let worker = Worker::spawn(&self.config, move || -> Box<State> { Box::new(factory()) })?;
		Ok(Actor::from_worker(worker))
	}

	/// Spawns an actor over `T::default()`.
	pub fn spawn_default<T>(&self) -> Result<Actor<T>, SpawnError>
	where
		T: Default + Send + 'static,
	{
		self.spawn_with(T::default)
	}
}

impl Default for ActorSpec {
	/// Uses a generated `actor-<n>` name.
	fn default() -> Self {
		let id = NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed);
		Self::new(format!("actor-{id}"))
	}
}
