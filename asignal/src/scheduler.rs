//! The executor seam a [`Signal`](crate::Signal) hands deferred work to.

use std::{future::Future, pin::Pin, sync::Arc};

/// A unit of deferred listener work.
pub type Task = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A cooperative executor the signal can spawn detached tasks onto.
///
/// Implemented for any `Fn(Task)` closure, so an executor's spawn handle plugs
/// in directly:
///
/// ```
/// use asignal::{Signal, Task};
///
/// let signal = Signal::new(|task: Task| {
/// 	// hand `task` to the host executor, e.g. `spawner.spawn(task)`
/// 	let _ = task;
/// });
/// ```
pub trait Scheduler: Send + Sync {
	/// Runs `task` to completion independently of the caller.
	///
	/// Fire-and-forget: the signal neither awaits the task nor observes its
	/// fate. If the executor shuts down first, abandoning the task is the
	/// executor's call.
	fn spawn(&self, task: Task);
}

impl<F> Scheduler for F
where
	F: Fn(Task) + Send + Sync,
{
	fn spawn(&self, task: Task) {
		self(task);
	}
}

/// A shared [`Scheduler`], as stored by every signal bound to it.
pub type SchedulerHandle = Arc<dyn Scheduler>;
