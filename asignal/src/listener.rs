//! The callable side of a [`Signal`](crate::Signal): the [`Listener`] trait
//! and constructors for the common listener shapes.

use std::{
	error::Error,
	fmt::{self, Debug, Formatter},
	future::Future,
	sync::Arc,
};

use futures_lite::FutureExt;

use crate::{scheduler::Task, EmitArgs};

/// The error type listeners fail with; forwarded unmodified to the emitter.
pub type ListenerError = Box<dyn Error + Send + Sync>;

/// What a listener produced when invoked.
pub enum Continuation {
	/// The listener completed synchronously.
	Ready,
	/// The listener has deferred work left. The signal hands it to its
	/// scheduler and does not wait for it; its eventual outcome is not
	/// attributed back to the emission.
	Deferred(Task),
}

impl Debug for Continuation {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Ready => f.write_str("Ready"),
			Self::Deferred(_) => f.write_str("Deferred"),
		}
	}
}

/// A callable registered with a signal.
///
/// Invoked once per emission with a clone of that emission's arguments.
/// Connection identity is the `Arc` allocation holding the listener, so the
/// same `Arc` connects (and disconnects) as the same listener, however often
/// it is cloned.
pub trait Listener: Send + Sync {
	fn invoke(&self, args: EmitArgs) -> Result<Continuation, ListenerError>;
}

/// Wraps an infallible synchronous closure.
pub fn from_fn<F>(f: F) -> Arc<dyn Listener>
where
	F: Fn(EmitArgs) + Send + Sync + 'static,
{
	struct FromFn<F>(F);

	impl<F> Listener for FromFn<F>
	where
		F: Fn(EmitArgs) + Send + Sync,
	{
		fn invoke(&self, args: EmitArgs) -> Result<Continuation, ListenerError> {
			(self.0)(args);
			Ok(Continuation::Ready)
		}
	}

	Arc::new(FromFn(f))
}

/// Wraps a fallible synchronous closure. An `Err` aborts the emission's
/// remaining fan-out and reaches the emitter.
pub fn try_from_fn<F>(f: F) -> Arc<dyn Listener>
where
	F: Fn(EmitArgs) -> Result<(), ListenerError> + Send + Sync + 'static,
{
	struct TryFromFn<F>(F);

	impl<F> Listener for TryFromFn<F>
	where
		F: Fn(EmitArgs) -> Result<(), ListenerError> + Send + Sync,
	{
		fn invoke(&self, args: EmitArgs) -> Result<Continuation, ListenerError> {
			(self.0)(args).map(|()| Continuation::Ready)
		}
	}

	Arc::new(TryFromFn(f))
}

/// Wraps a closure whose returned future is run by the signal's scheduler,
/// detached from the emission that spawned it.
pub fn deferring<F, Fut>(f: F) -> Arc<dyn Listener>
where
	F: Fn(EmitArgs) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = ()> + Send + 'static,
{
	struct Deferring<F>(F);

	impl<F, Fut> Listener for Deferring<F>
	where
		F: Fn(EmitArgs) -> Fut + Send + Sync,
		Fut: Future<Output = ()> + Send + 'static,
	{
		fn invoke(&self, args: EmitArgs) -> Result<Continuation, ListenerError> {
			Ok(Continuation::Deferred((self.0)(args).boxed()))
		}
	}

	Arc::new(Deferring(f))
}
