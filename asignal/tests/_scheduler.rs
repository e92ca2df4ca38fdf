use std::sync::{Arc, Mutex};

use asignal::{Scheduler, SchedulerHandle, Task};

/// Queues spawned tasks until the test drives them.
pub struct TestScheduler(Mutex<Vec<Task>>);

impl TestScheduler {
	pub fn new() -> Arc<Self> {
		Arc::new(Self(Mutex::new(Vec::new())))
	}

	pub fn handle(self: &Arc<Self>) -> SchedulerHandle {
		Arc::clone(self) as SchedulerHandle
	}

	pub fn queued(&self) -> usize {
		self.0.lock().unwrap().len()
	}

	/// Runs every queued task to completion; returns how many ran.
	pub fn run(&self) -> usize {
		let tasks: Vec<Task> = self.0.lock().unwrap().drain(..).collect();
		let count = tasks.len();
		for task in tasks {
			futures_lite::future::block_on(task);
		}
		count
	}
}

impl Scheduler for TestScheduler {
	fn spawn(&self, task: Task) {
		self.0.lock().unwrap().push(task);
	}
}
