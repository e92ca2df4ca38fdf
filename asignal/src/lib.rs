#![warn(clippy::pedantic)]
//! Awaitable broadcast signals with weakly tracked listeners.
//!
//! A [`Signal`] fans every [`emit`](Signal::emit) out to its connected
//! listeners, synchronously and without isolation, and doubles as an
//! awaitable: `(&signal).await` resolves with the next emission's packaged
//! arguments. Listeners connect weakly by default, so a registration never
//! keeps its listener's owner alive.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use asignal::{listener, EmitArgs, Signal, Task};
//!
//! let signal = Signal::new(|task: Task| futures_lite::future::block_on(task));
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let listener = listener::from_fn({
//! 	let seen = Arc::clone(&seen);
//! 	move |args: EmitArgs| {
//! 		let value = *args.get(0).unwrap().downcast_ref::<i32>().unwrap();
//! 		seen.lock().unwrap().push(value);
//! 	}
//! });
//! signal.connect_strong(Arc::clone(&listener));
//!
//! let next = signal.next();
//! signal.emit(EmitArgs::new().arg(1).named("source", "doc")).unwrap();
//! signal.emit(EmitArgs::new().arg(2)).unwrap();
//!
//! assert_eq!(*seen.lock().unwrap(), [1, 2]);
//! let first = futures_lite::future::block_on(next);
//! assert_eq!(first.get_named("source").unwrap().downcast_ref::<&str>(), Some(&"doc"));
//! ```

mod args;
pub use args::{EmitArgs, Key, Value};

mod error;
pub use error::EmitError;

pub mod listener;
pub use listener::{Continuation, Listener, ListenerError};

mod pending;
pub use pending::NextEmission;

mod scheduler;
pub use scheduler::{Scheduler, SchedulerHandle, Task};

mod signal;
pub use signal::{MethodFn, Signal};
