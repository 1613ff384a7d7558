use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::{JoinHandle, ThreadId};

use crate::error::{ShutdownError, SpawnError};
use crate::mailbox::Mailbox;
use crate::spawn::{spawn_detached, spawn_named_thread};
use crate::submission::Submission;
use crate::task::{State, Task};
use crate::panic_message;

#[cfg(test)]
mod tests;

/// What a stopping worker does with calls that are still queued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShutdownMode {
	/// Run every call queued before shutdown began, then stop.
	#[default]
	Drain,
	/// Finish the call in flight and drop the rest.
	///
	/// Dropped calls resolve to [`CallError::Abandoned`](crate::CallError::Abandoned).
	Discard,
}

/// Startup parameters for one worker thread.
#[derive(Debug, Clone)]
pub(crate) struct WorkerConfig {
	pub name: String,
	pub shutdown: ShutdownMode,
	pub stack_size: Option<usize>,
}

/// Cloneable submit side of a worker.
#[derive(Clone)]
pub(crate) struct WorkerPort {
	mailbox: Arc<Mailbox<Task>>,
	name: Arc<str>,
	thread: ThreadId,
}

impl WorkerPort {
	pub fn name(&self) -> &Arc<str> {
		&self.name
	}

	/// Id of the thread running the worker loop.
	pub fn thread(&self) -> ThreadId {
		self.thread
	}

	/// Returns `true` when called from the worker loop's own thread.
	pub fn is_worker_thread(&self) -> bool {
		std::thread::current().id() == self.thread
	}

	/// Number of queued tasks, not counting one in flight.
	pub fn pending(&self) -> usize {
		self.mailbox.len()
	}

	/// Returns `true` once the worker has begun shutting down.
	pub fn is_closed(&self) -> bool {
		self.mailbox.is_closed()
	}

	/// Enqueues `task` on the calling thread.
	///
	/// Returns `false` if the worker is shutting down; the task is dropped.
	pub fn submit(&self, task: Task) -> bool {
		self.submit_as(Submission::Blockable, task)
	}

	/// Enqueues `task` from a detached helper job and returns at once.
	pub fn submit_detached(&self, task: Task) {
		let port = self.clone();
		spawn_detached(&self.name, move || {
			port.submit_as(Submission::Unblockable, task);
		});
	}

	fn submit_as(&self, submission: Submission, task: Task) -> bool {
		match self.mailbox.push(task) {
			Ok(pending) => {
				tracing::trace!(actor = %self.name, submission = submission.as_str(), pending, "worker.submit");
				true
			}
			Err(task) => {
				tracing::warn!(actor = %self.name, submission = submission.as_str(), "worker.submit.rejected");
				drop(task);
				false
			}
		}
	}
}

/// Owner of one dedicated worker thread and the state it serves.
///
/// Dropping the worker closes its mailbox and joins the thread.
pub(crate) struct Worker {
	port: WorkerPort,
	thread: Option<JoinHandle<Box<State>>>,
}

impl Worker {
	/// Starts the worker thread and builds its state there with `init`.
	///
	/// Returns once `init` has finished, so no task can observe a worker
	/// without state.
	pub fn spawn<I>(config: &WorkerConfig, init: I) -> Result<Self, SpawnError>
	where
		I: FnOnce() -> Box<State> + Send + 'static,
	{
		let mailbox = Arc::new(Mailbox::new());
		let name: Arc<str> = Arc::from(config.name.as_str());
		let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);

		let loop_mailbox = Arc::clone(&mailbox);
		let loop_name = Arc::clone(&name);
		let mode = config.shutdown;
		let thread = spawn_named_thread(&config.name, config.stack_size, move || {
			let state = match std::panic::catch_unwind(AssertUnwindSafe(init)) {
				Ok(state) => {
					let _ = ready_tx.send(Ok(()));
					state
				}
				Err(payload) => {
					let _ = ready_tx.send(Err(panic_message(payload.as_ref())));
					std::panic::resume_unwind(payload);
				}
			};
			run(&loop_name, &loop_mailbox, mode, state)
		})
		.map_err(|source| SpawnError::Thread {
			name: config.name.clone(),
			source,
		})?;

		let ready = ready_rx.recv().unwrap_or_else(|_| Err("worker exited during construction".to_string()));
		if let Err(message) = ready {
			mailbox.close();
			let _ = thread.join();
			tracing::warn!(actor = %name, %message, "worker.spawn.construct_failed");
			return Err(SpawnError::Construct {
				name: config.name.clone(),
				message,
			});
		}

		tracing::debug!(actor = %name, mode = ?config.shutdown, "worker.spawn");
		let port = WorkerPort {
			mailbox,
			name,
			thread: thread.thread().id(),
		};
		Ok(Self { port, thread: Some(thread) })
	}

	pub fn port(&self) -> &WorkerPort {
		&self.port
	}

	/// Stops the worker and hands back its state.
	pub fn join(mut self) -> Result<Box<State>, ShutdownError> {
		self.stop().unwrap_or_else(|| {
			Err(ShutdownError::WorkerPanicked {
				name: self.port.name.to_string(),
			})
		})
	}

	/// Closes the mailbox and joins the thread. `None` if already stopped.
	fn stop(&mut self) -> Option<Result<Box<State>, ShutdownError>> {
		let thread = self.thread.take()?;
		self.port.mailbox.close();
		let name = self.port.name.to_string();

		if self.port.is_worker_thread() {
			// Joining here would wait on ourselves; the loop exits once the
			// current task returns.
			tracing::warn!(actor = %name, "worker.stop.from_worker");
			return Some(Err(ShutdownError::JoinedFromWorker { name }));
		}

		tracing::debug!(actor = %name, pending = self.port.pending(), "worker.stop.join");
		Some(thread.join().map_err(|_| ShutdownError::WorkerPanicked { name }))
	}
}

impl Drop for Worker {
	fn drop(&mut self) {
		if let Some(Err(err)) = self.stop() {
			tracing::warn!(error = %err, "worker.drop");
		}
	}
}

fn run(name: &str, mailbox: &Mailbox<Task>, mode: ShutdownMode, mut state: Box<State>) -> Box<State> {
	tracing::debug!(actor = name, ?mode, "worker.loop.start");
	let mut executed = 0u64;
	while let Some(task) = mailbox.recv(mode) {
		task(state.as_mut());
		executed = executed.wrapping_add(1);
	}

	let discarded = mailbox.take_remaining();
	let dropped = discarded.len();
	drop(discarded);
	tracing::debug!(actor = name, executed, dropped, "worker.loop.stop");
	state
}
