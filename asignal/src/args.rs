//! The ordered argument mapping carried by one emission.

use std::{
	any::{type_name, Any},
	borrow::Cow,
	fmt::{self, Debug, Formatter},
	sync::Arc,
};

/// A dynamically typed argument value.
///
/// Cheap to clone; equality is target identity, so clones of one emission's
/// values compare equal while equal-looking values from distinct emissions do
/// not.
#[derive(Clone)]
pub struct Value {
	inner: Arc<dyn Any + Send + Sync>,
	type_name: &'static str,
}

impl Value {
	#[must_use]
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self {
			inner: Arc::new(value),
			type_name: type_name::<T>(),
		}
	}

	#[must_use]
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.inner.downcast_ref()
	}

	#[must_use]
	pub fn is<T: Any>(&self) -> bool {
		self.inner.is::<T>()
	}

	/// The type name captured at construction, for diagnostics only.
	#[must_use]
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for Value {}

impl Debug for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Value").field(&self.type_name).finish()
	}
}

/// A key in the packaged argument mapping: an integer position or an argument
/// name. The two namespaces are distinct, so a name that happens to spell a
/// numeral can never collide with a position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
	Index(usize),
	Name(Cow<'static, str>),
}

/// The arguments of one emission: positional values followed by named values.
///
/// Listeners receive a clone of this mapping, and it is also what resolves the
/// pending-wait cell, ordered positions first and then names in insertion
/// order:
///
/// ```
/// use asignal::{EmitArgs, Key};
///
/// let args = EmitArgs::new().arg(1).arg(2).named("b", 3);
/// let keys: Vec<Key> = args.iter().map(|(key, _)| key).collect();
/// assert_eq!(keys, [Key::Index(0), Key::Index(1), Key::Name("b".into())]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitArgs {
	positional: Vec<Value>,
	named: Vec<(Cow<'static, str>, Value)>,
}

impl EmitArgs {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a positional argument.
	#[must_use]
	pub fn arg<T: Any + Send + Sync>(mut self, value: T) -> Self {
		self.positional.push(Value::new(value));
		self
	}

	/// Adds a named argument. A repeated name overwrites the earlier entry in
	/// place, keeping its position in iteration order.
	#[must_use]
	pub fn named<T: Any + Send + Sync>(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: T,
	) -> Self {
		let name = name.into();
		let value = Value::new(value);
		if let Some(entry) = self.named.iter_mut().find(|(key, _)| *key == name) {
			entry.1 = value;
		} else {
			self.named.push((name, value));
		}
		self
	}

	#[must_use]
	pub fn get(&self, index: usize) -> Option<&Value> {
		self.positional.get(index)
	}

	#[must_use]
	pub fn get_named(&self, name: &str) -> Option<&Value> {
		self.named
			.iter()
			.find_map(|(key, value)| (key == name).then_some(value))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.positional.len() + self.named.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.positional.is_empty() && self.named.is_empty()
	}

	/// All entries as the packaged ordered mapping.
	pub fn iter(&self) -> impl Iterator<Item = (Key, &Value)> {
		self.positional
			.iter()
			.enumerate()
			.map(|(index, value)| (Key::Index(index), value))
			.chain(
				self.named
					.iter()
					.map(|(name, value)| (Key::Name(name.clone()), value)),
			)
	}
}
