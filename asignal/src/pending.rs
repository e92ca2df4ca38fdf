//! The single-slot rendezvous behind "await the next emission".

use std::{
	fmt::{self, Debug, Formatter},
	future::Future,
	mem,
	pin::Pin,
	sync::Arc,
	task::{Context, Poll, Waker},
};

use parking_lot::Mutex;

use crate::EmitArgs;

/// A one-shot completion cell. Every waiter of one emission window holds the
/// same cell and observes the same resolution; a resolved cell is never
/// mutated again, the signal installs a fresh one for later waiters instead.
pub(crate) struct WaitCell {
	state: Mutex<State>,
}

enum State {
	Pending(Vec<Waker>),
	Resolved(EmitArgs),
}

impl WaitCell {
	pub(crate) fn unresolved() -> Self {
		Self {
			state: Mutex::new(State::Pending(Vec::new())),
		}
	}

	/// The construction-time cell: already resolved, holding no arguments.
	pub(crate) fn pre_resolved() -> Self {
		Self {
			state: Mutex::new(State::Resolved(EmitArgs::new())),
		}
	}

	pub(crate) fn is_resolved(&self) -> bool {
		matches!(*self.state.lock(), State::Resolved(_))
	}

	/// Resolves the cell with `args` and releases all waiters. A second
	/// resolution is a no-op; the stored value is final.
	pub(crate) fn resolve(&self, args: EmitArgs) {
		let wakers = {
			let mut state = self.state.lock();
			match &mut *state {
				State::Resolved(_) => return,
				State::Pending(wakers) => {
					let wakers = mem::take(wakers);
					*state = State::Resolved(args);
					wakers
				}
			}
		};
		// Woken outside the lock; a waiter may poll immediately.
		for waker in wakers {
			waker.wake();
		}
	}
}

/// Resolves to the packaged arguments of its signal's next emission.
///
/// Returned by [`Signal::next`](crate::Signal::next) and by awaiting
/// `&Signal` directly.
pub struct NextEmission {
	cell: Arc<WaitCell>,
}

impl NextEmission {
	pub(crate) fn new(cell: Arc<WaitCell>) -> Self {
		Self { cell }
	}
}

impl Future for NextEmission {
	type Output = EmitArgs;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let mut state = self.cell.state.lock();
		match &mut *state {
			State::Resolved(args) => Poll::Ready(args.clone()),
			State::Pending(wakers) => {
				if !wakers.iter().any(|waker| waker.will_wake(cx.waker())) {
					wakers.push(cx.waker().clone());
				}
				Poll::Pending
			}
		}
	}
}

impl Debug for NextEmission {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("NextEmission")
			.field("resolved", &self.cell.is_resolved())
			.finish()
	}
}
