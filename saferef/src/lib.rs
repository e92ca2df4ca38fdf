#![warn(clippy::pedantic)]
//! Weak references to callables that stay hashable after their target is gone.
//!
//! A [`SafeRef`] points at a callable of type `T` without keeping it alive. Two
//! flavors exist: a plain reference to an `Arc`-held callable, and a reference
//! to a method *bound* to an owner, where only the owner's liveness matters and
//! the callable adapter is rebuilt on demand. Equality and hashing are stable
//! across repeated wrapping of the same target and keep working after the
//! target has been dropped, so a `HashSet<SafeRef<T>>` can deduplicate
//! registrations, find an entry from a fresh wrap, and discard expired entries.

use std::{
	any::Any,
	fmt::{self, Debug, Formatter},
	hash::{Hash, Hasher},
	sync::{Arc, Weak},
};

/// An indirect reference to a callable of type `T`.
///
/// Created with [`SafeRef::new`] for plain callables or [`SafeRef::bound`] for
/// methods bound to an owner. [`SafeRef::resolve`] yields the live callable, or
/// [`None`] once the target (for bound references: the owner) was destroyed.
pub enum SafeRef<T: ?Sized> {
	/// Directly tracked callable.
	Simple(Weak<T>),
	/// Method bound to a weakly tracked owner.
	Bound(BoundRef<T>),
}

/// The bound-method flavor of [`SafeRef`].
///
/// Identity is the pair of owner address and method key; the adapter produced
/// by resolving is transient, like the bound-method objects it stands in for.
pub struct BoundRef<T: ?Sized> {
	owner: Weak<dyn Any + Send + Sync>,
	method: usize,
	bind: Arc<dyn Fn(Arc<dyn Any + Send + Sync>) -> Arc<T> + Send + Sync>,
}

impl<T: ?Sized> SafeRef<T> {
	/// Creates a reference to `target` that expires when the last strong
	/// [`Arc`] to it is dropped.
	#[must_use]
	pub fn new(target: &Arc<T>) -> Self {
		Self::Simple(Arc::downgrade(target))
	}

	/// Creates a reference to a method bound to `owner`.
	///
	/// `method` is an identity key (conventionally the method's function
	/// pointer address) that, together with the owner's address, makes
	/// repeated wraps of the same binding compare equal. `bind` rebuilds the
	/// callable adapter from a revived owner and is not part of the identity.
	///
	/// The reference expires when `owner` is destroyed, regardless of how many
	/// adapters were created from it in the meantime.
	#[must_use]
	pub fn bound<O>(
		owner: &Arc<O>,
		method: usize,
		bind: impl Fn(Arc<O>) -> Arc<T> + Send + Sync + 'static,
	) -> Self
	where
		O: Send + Sync + 'static,
	{
		let owner = Arc::downgrade(&(Arc::clone(owner) as Arc<dyn Any + Send + Sync>));
		Self::Bound(BoundRef {
			owner,
			method,
			bind: Arc::new(move |any: Arc<dyn Any + Send + Sync>| {
				bind(any.downcast::<O>().expect("unreachable"))
			}),
		})
	}

	/// Returns the live callable, or [`None`] if the target is gone.
	///
	/// Resolving a bound reference allocates a fresh adapter each time.
	#[must_use]
	pub fn resolve(&self) -> Option<Arc<T>> {
		match self {
			Self::Simple(target) => target.upgrade(),
			Self::Bound(bound) => bound.owner.upgrade().map(|owner| (bound.bind)(owner)),
		}
	}

	/// Whether the referenced target was destroyed.
	#[must_use]
	pub fn is_expired(&self) -> bool {
		match self {
			Self::Simple(target) => target.strong_count() == 0,
			Self::Bound(bound) => bound.owner.strong_count() == 0,
		}
	}

	/// Whether this is a bound-method reference.
	///
	/// Lets callers avoid re-wrapping a reference that already is one.
	#[must_use]
	pub fn is_bound(&self) -> bool {
		matches!(self, Self::Bound(_))
	}

	fn address(&self) -> *const () {
		match self {
			Self::Simple(target) => target.as_ptr().cast::<()>(),
			Self::Bound(bound) => bound.owner.as_ptr().cast::<()>(),
		}
	}
}

impl<T: ?Sized> Clone for SafeRef<T> {
	fn clone(&self) -> Self {
		match self {
			Self::Simple(target) => Self::Simple(Weak::clone(target)),
			Self::Bound(bound) => Self::Bound(BoundRef {
				owner: Weak::clone(&bound.owner),
				method: bound.method,
				bind: Arc::clone(&bound.bind),
			}),
		}
	}
}

// Comparison goes through the thin data address rather than `Weak::ptr_eq`,
// since unsizing may attach distinct vtable pointers to the same allocation.
impl<T: ?Sized> PartialEq for SafeRef<T> {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Simple(_), Self::Simple(_)) => self.address() == other.address(),
			(Self::Bound(a), Self::Bound(b)) => {
				a.method == b.method && self.address() == other.address()
			}
			_ => false,
		}
	}
}

impl<T: ?Sized> Eq for SafeRef<T> {}

impl<T: ?Sized> Hash for SafeRef<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		match self {
			Self::Simple(_) => {
				0u8.hash(state);
				(self.address() as usize).hash(state);
			}
			Self::Bound(bound) => {
				1u8.hash(state);
				(self.address() as usize).hash(state);
				bound.method.hash(state);
			}
		}
	}
}

impl<T: ?Sized> Debug for SafeRef<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Simple(_) => f
				.debug_struct("SafeRef::Simple")
				.field("target", &self.address())
				.field("expired", &self.is_expired())
				.finish(),
			Self::Bound(bound) => f
				.debug_struct("SafeRef::Bound")
				.field("owner", &self.address())
				.field("method", &bound.method)
				.field("expired", &self.is_expired())
				.finish(),
		}
	}
}
