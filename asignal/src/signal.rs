use std::{
	collections::HashSet,
	fmt::{self, Debug, Formatter},
	future::IntoFuture,
	sync::Arc,
};

use parking_lot::Mutex;
use saferef::SafeRef;
use tracing::trace;

use crate::{
	error::EmitError,
	listener::{Continuation, Listener, ListenerError},
	pending::{NextEmission, WaitCell},
	scheduler::{Scheduler, SchedulerHandle},
	EmitArgs,
};

/// Signature of a method connectable with [`Signal::connect_method`].
///
/// A plain `fn` item rather than a closure, so that the (owner, method) pair
/// has a stable identity for deduplication and disconnection.
pub type MethodFn<O> = fn(&O, EmitArgs) -> Result<Continuation, ListenerError>;

/// A broadcast signal: listeners connect to it, [`Signal::emit`] fans one set
/// of arguments out to all of them, and awaiting `&Signal` resolves with the
/// next emission's packaged arguments.
///
/// Listeners connect weakly by default ([`Signal::connect`]): the signal does
/// not keep them alive, and a listener whose last owner went away is skipped
/// and dropped from the registry. [`Signal::connect_strong`] creates an
/// ownership edge instead. Membership is a set in both cases; connecting the
/// same listener twice is a no-op.
///
/// All operations assume one cooperative scheduler drives the signal's users;
/// the signal never blocks and `emit` never suspends.
pub struct Signal {
	scheduler: SchedulerHandle,
	inner: Mutex<Inner>,
}

struct Inner {
	strong: Vec<Arc<dyn Listener>>,
	weak: HashSet<SafeRef<dyn Listener>>,
	pending: Arc<WaitCell>,
}

/// Listener identity is the referenced allocation; vtable pointers may differ
/// between unsizings of one `Arc`, so only the data address is compared.
fn same_listener(a: &Arc<dyn Listener>, b: &Arc<dyn Listener>) -> bool {
	Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

impl Signal {
	/// Creates a signal bound to `scheduler` for the rest of its life.
	pub fn new(scheduler: impl Scheduler + 'static) -> Self {
		Self::with_handle(Arc::new(scheduler))
	}

	/// Creates a signal sharing an existing scheduler handle.
	#[must_use]
	pub fn with_handle(scheduler: SchedulerHandle) -> Self {
		Self {
			scheduler,
			inner: Mutex::new(Inner {
				strong: Vec::new(),
				weak: HashSet::new(),
				pending: Arc::new(WaitCell::pre_resolved()),
			}),
		}
	}

	/// The scheduler this signal hands deferred listener work to.
	#[must_use]
	pub fn scheduler(&self) -> &SchedulerHandle {
		&self.scheduler
	}

	/// Registers `listener` for future emissions without keeping it alive.
	///
	/// Once the last strong [`Arc`] to the listener is dropped elsewhere, the
	/// registration expires: the listener is skipped by later emissions and
	/// its entry is discarded. Connecting an already-connected listener is a
	/// no-op.
	pub fn connect(&self, listener: &Arc<dyn Listener>) {
		let mut inner = self.inner.lock();
		if inner.weak.insert(SafeRef::new(listener)) {
			trace!("connected weak listener");
		}
	}

	/// Registers `listener` and keeps it alive until disconnected.
	pub fn connect_strong(&self, listener: Arc<dyn Listener>) {
		let mut inner = self.inner.lock();
		if !inner.strong.iter().any(|held| same_listener(held, &listener)) {
			inner.strong.push(listener);
			trace!("connected strong listener");
		}
	}

	/// Registers `method`, bound to `owner`, without keeping `owner` alive.
	///
	/// The registration lives exactly as long as `owner` does. Reconnecting
	/// the same (owner, method) pair is a no-op.
	pub fn connect_method<O>(&self, owner: &Arc<O>, method: MethodFn<O>)
	where
		O: Send + Sync + 'static,
	{
		let reference = method_ref(owner, method);
		let mut inner = self.inner.lock();
		if inner.weak.insert(reference) {
			trace!("connected bound method");
		}
	}

	/// Removes `listener` however it was connected: the strong registration if
	/// one exists, otherwise the weak one. Disconnecting a listener that is
	/// not connected (or already expired) is a silent no-op.
	pub fn disconnect(&self, listener: &Arc<dyn Listener>) {
		let mut inner = self.inner.lock();
		if let Some(index) = inner
			.strong
			.iter()
			.position(|held| same_listener(held, listener))
		{
			inner.strong.swap_remove(index);
			trace!("disconnected strong listener");
		} else if inner.weak.remove(&SafeRef::new(listener)) {
			trace!("disconnected weak listener");
		}
	}

	/// Removes a bound-method registration; a silent no-op if absent.
	pub fn disconnect_method<O>(&self, owner: &Arc<O>, method: MethodFn<O>)
	where
		O: Send + Sync + 'static,
	{
		let mut inner = self.inner.lock();
		if inner.weak.remove(&method_ref(owner, method)) {
			trace!("disconnected bound method");
		}
	}

	/// Broadcasts `args` to every connected listener, then resolves the
	/// pending-wait cell if anyone is awaiting.
	///
	/// Strongly connected listeners are invoked first in connection order,
	/// then the live weakly connected ones; no fan-out order is guaranteed.
	/// A [`Continuation::Deferred`] result is handed to the scheduler and not
	/// awaited. The first synchronous listener failure aborts the remaining
	/// fan-out and is returned; listeners already invoked are not undone, and
	/// waiters keep waiting for a later, successful emission.
	///
	/// Emitting with no listeners and no waiter returns without any work.
	pub fn emit(&self, args: EmitArgs) -> Result<(), EmitError> {
		let live = {
			let mut inner = self.inner.lock();
			if inner.strong.is_empty() && inner.weak.is_empty() && inner.pending.is_resolved() {
				return Ok(());
			}
			let mut live = inner.strong.clone();
			// Resolving doubles as pruning: an expired reference means the
			// listener's owner is gone, so the registration goes with it.
			inner.weak.retain(|reference| match reference.resolve() {
				Some(listener) => {
					live.push(listener);
					true
				}
				None => {
					trace!("pruned expired weak listener");
					false
				}
			});
			live
		};
		// The lock is not held during fan-out; listeners may reentrantly
		// connect, disconnect, or emit.
		trace!(listeners = live.len(), "emitting");
		for listener in live {
			match listener.invoke(args.clone()).map_err(EmitError::listener)? {
				Continuation::Ready => (),
				Continuation::Deferred(task) => self.scheduler.spawn(task),
			}
		}
		let pending = Arc::clone(&self.inner.lock().pending);
		pending.resolve(args);
		Ok(())
	}

	/// The next emission, as a future.
	///
	/// Waiters that start while an earlier resolution is still in place get a
	/// fresh cell, so they always observe a future emission. Waiters that
	/// start within the same window share one cell and resolve together.
	pub fn next(&self) -> NextEmission {
		let mut inner = self.inner.lock();
		if inner.pending.is_resolved() {
			inner.pending = Arc::new(WaitCell::unresolved());
		}
		NextEmission::new(Arc::clone(&inner.pending))
	}
}

impl IntoFuture for &Signal {
	type Output = EmitArgs;
	type IntoFuture = NextEmission;

	fn into_future(self) -> Self::IntoFuture {
		self.next()
	}
}

impl Debug for Signal {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let inner = self.inner.lock();
		f.debug_struct("Signal")
			.field("strong", &inner.strong.len())
			.field("weak", &inner.weak.len())
			.field("awaited", &!inner.pending.is_resolved())
			.finish_non_exhaustive()
	}
}

fn method_ref<O>(owner: &Arc<O>, method: MethodFn<O>) -> SafeRef<dyn Listener>
where
	O: Send + Sync + 'static,
{
	SafeRef::bound(owner, method as usize, move |owner: Arc<O>| {
		Arc::new(BoundMethod { owner, method }) as Arc<dyn Listener>
	})
}

struct BoundMethod<O> {
	owner: Arc<O>,
	method: MethodFn<O>,
}

impl<O: Send + Sync> Listener for BoundMethod<O> {
	fn invoke(&self, args: EmitArgs) -> Result<Continuation, ListenerError> {
		(self.method)(&self.owner, args)
	}
}
