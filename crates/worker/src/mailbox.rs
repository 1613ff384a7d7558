use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::worker::ShutdownMode;

struct MailboxState<M> {
	queue: VecDeque<M>,
	closed: bool,
}

/// Unbounded FIFO task queue shared by one worker thread and its submitters.
///
/// The closed flag lives under the same lock as the queue, so a receiver
/// can never check it, miss a concurrent `close`, and then sleep forever.
pub(crate) struct Mailbox<M> {
	state: Mutex<MailboxState<M>>,
	wake: Condvar,
}

impl<M> Default for Mailbox<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M> Mailbox<M> {
	/// Creates an open, empty mailbox.
	pub fn new() -> Self {
		Self {
			state: Mutex::new(MailboxState {
				queue: VecDeque::new(),
				closed: false,
			}),
			wake: Condvar::new(),
		}
	}

	/// Appends one message and wakes the receiver.
	///
	/// Returns the queue length after the push, or hands the message back if
	/// the mailbox is closed.
	pub fn push(&self, msg: M) -> Result<usize, M> {
		let mut state = self.state.lock();
		if state.closed {
			return Err(msg);
		}
		state.queue.push_back(msg);
		let len = state.queue.len();
		drop(state);
		self.wake.notify_one();
		Ok(len)
	}

	/// Closes the mailbox and wakes every waiter.
	///
	/// Returns `true` if this call performed the transition.
	pub fn close(&self) -> bool {
		let mut state = self.state.lock();
		let was_open = !state.closed;
		state.closed = true;
		drop(state);
		self.wake.notify_all();
		was_open
	}

	/// Returns `true` once [`Self::close`] has been called.
	pub fn is_closed(&self) -> bool {
		self.state.lock().closed
	}

	/// Returns the number of queued messages.
	pub fn len(&self) -> usize {
		self.state.lock().queue.len()
	}

	/// Blocks until a message is available or the mailbox stops yielding.
	///
	/// After close, [`ShutdownMode::Drain`] keeps yielding queued messages
	/// until the queue is empty, while [`ShutdownMode::Discard`] stops at once.
	pub fn recv(&self, mode: ShutdownMode) -> Option<M> {
		let mut state = self.state.lock();
		loop {
			if state.closed && mode == ShutdownMode::Discard {
				return None;
			}
			if let Some(msg) = state.queue.pop_front() {
				return Some(msg);
			}
			if state.closed {
				return None;
			}
			self.wake.wait(&mut state);
		}
	}

	/// Removes every queued message. The caller drops them outside the lock.
	pub fn take_remaining(&self) -> Vec<M> {
		self.state.lock().queue.drain(..).collect()
	}
}
