//! Error types for actor calls and worker lifecycles.

use thiserror::Error;

/// Failure delivered through a [`ResultHandle`](crate::ResultHandle) instead of a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
	/// The operation panicked while running on the actor's worker.
	///
	/// The worker survives; later calls on the same actor keep running.
	#[error("operation on actor `{actor}` panicked: {message}")]
	Panicked {
		/// Name of the actor whose operation failed.
		actor: String,
		/// Panic payload rendered as text.
		message: String,
	},

	/// The call was dropped without running.
	///
	/// Happens when the call was submitted after shutdown began, or was still
	/// queued when a worker in [`ShutdownMode::Discard`](crate::ShutdownMode::Discard) stopped.
	#[error("call on actor `{actor}` was abandoned before it ran")]
	Abandoned {
		/// Name of the actor the call was submitted to.
		actor: String,
	},

	/// `get` was called from the actor's own worker on a call that has not run yet.
	///
	/// Blocking there would wait on the very thread that has to run the call.
	#[error("blocking on actor `{actor}` from its own worker would deadlock")]
	WouldDeadlock {
		/// Name of the actor.
		actor: String,
	},
}

/// Errors starting a worker.
#[derive(Debug, Error)]
pub enum SpawnError {
	/// The OS refused to start the worker thread.
	#[error("failed to spawn worker thread `{name}`: {source}")]
	Thread {
		/// Requested thread name.
		name: String,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// Building the owned value on the worker thread panicked.
	#[error("constructing state for actor `{name}` panicked: {message}")]
	Construct {
		/// Actor name.
		name: String,
		/// Panic payload rendered as text.
		message: String,
	},
}

/// Errors stopping a worker and reclaiming its owned value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShutdownError {
	/// The worker thread itself panicked, so its state is gone.
	#[error("worker thread of actor `{name}` panicked")]
	WorkerPanicked {
		/// Actor name.
		name: String,
	},

	/// Shutdown was requested from inside the worker being shut down.
	#[error("actor `{name}` cannot be joined from its own worker")]
	JoinedFromWorker {
		/// Actor name.
		name: String,
	},
}
