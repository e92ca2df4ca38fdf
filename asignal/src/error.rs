use thiserror::Error;

use crate::listener::ListenerError;

/// A listener failed synchronously during an emission's fan-out.
///
/// The failing listener's error is the [`source`](std::error::Error::source);
/// listeners later in the iteration were skipped for that emission, and any
/// pending waiters were left waiting.
#[derive(Debug, Error)]
#[error("listener failed during emission")]
pub struct EmitError(#[source] ListenerError);

impl EmitError {
	pub(crate) fn listener(source: ListenerError) -> Self {
		Self(source)
	}

	/// Recovers the failing listener's error.
	#[must_use]
	pub fn into_listener_error(self) -> ListenerError {
		self.0
	}
}
