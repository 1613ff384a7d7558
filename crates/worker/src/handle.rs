use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::thread::ThreadId;

use tokio::sync::oneshot::error::TryRecvError;

use crate::error::CallError;
use crate::task::Reply;

/// One-shot handle to the result of an actor call.
///
/// Consuming methods take `self`, so a result can only be claimed once.
/// Dropping the handle discards the result; the call still runs.
pub struct ResultHandle<R> {
	rx: Reply<R>,
	actor: Arc<str>,
	worker: ThreadId,
}

impl<R> std::fmt::Debug for ResultHandle<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResultHandle").field("actor", &self.actor).finish_non_exhaustive()
	}
}

impl<R> ResultHandle<R> {
	pub(crate) fn new(rx: Reply<R>, actor: Arc<str>, worker: ThreadId) -> Self {
		Self { rx, actor, worker }
	}

	/// Name of the actor this call was submitted to.
	pub fn actor(&self) -> &str {
		&self.actor
	}

	/// Blocks until the call has run and returns its result.
	///
	/// Called from the actor's own worker, this returns
	/// [`CallError::WouldDeadlock`] unless the call has already completed.
	///
	/// # Panics
	///
	/// Panics when called inside an asynchronous execution context. Async
	/// callers `.await` the handle instead.
	pub fn get(self) -> Result<R, CallError> {
		if std::thread::current().id() == self.worker {
			return match self.try_get() {
				Ok(result) => result,
				Err(pending) => Err(CallError::WouldDeadlock {
					actor: pending.actor.to_string(),
				}),
			};
		}
		let Self { rx, actor, .. } = self;
		match rx.blocking_recv() {
			Ok(result) => result,
			Err(_) => Err(CallError::Abandoned { actor: actor.to_string() }),
		}
	}

	/// Returns the result if the call has finished, or the handle back if not.
	pub fn try_get(mut self) -> Result<Result<R, CallError>, Self> {
		match self.rx.try_recv() {
			Ok(result) => Ok(result),
			Err(TryRecvError::Closed) => Ok(Err(self.abandoned())),
			Err(TryRecvError::Empty) => Err(self),
		}
	}

	fn abandoned(&self) -> CallError {
		CallError::Abandoned {
			actor: self.actor.to_string(),
		}
	}
}

impl<R> Future for ResultHandle<R> {
	type Output = Result<R, CallError>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let polled = Pin::new(&mut self.rx).poll(cx);
		polled.map(|res| res.unwrap_or_else(|_| Err(self.abandoned())))
	}
}
