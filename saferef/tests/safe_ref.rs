use std::{collections::HashSet, sync::Arc};

use saferef::SafeRef;

type Callable = dyn Fn(i32) -> i32 + Send + Sync;

#[test]
fn simple_resolves_until_target_drops() {
	let target: Arc<Callable> = Arc::new(|x| x + 1);
	let reference = SafeRef::new(&target);

	assert!(!reference.is_expired());
	assert_eq!(reference.resolve().map(|f| f(1)), Some(2));

	drop(target);
	assert!(reference.is_expired());
	assert!(reference.resolve().is_none());
}

#[test]
fn rewrapping_the_same_target_is_equal() {
	let target: Arc<Callable> = Arc::new(|x| x);
	let other: Arc<Callable> = Arc::new(|x| x);

	assert_eq!(SafeRef::new(&target), SafeRef::new(&Arc::clone(&target)));
	assert_ne!(SafeRef::new(&target), SafeRef::new(&other));

	let mut set = HashSet::new();
	assert!(set.insert(SafeRef::new(&target)));
	assert!(!set.insert(SafeRef::new(&target)));
	assert!(set.insert(SafeRef::new(&other)));
	assert!(set.remove(&SafeRef::new(&target)));
	assert_eq!(set.len(), 1);
}

#[test]
fn equality_survives_expiry() {
	let target: Arc<Callable> = Arc::new(|x| x);
	let a = SafeRef::new(&target);
	let b = a.clone();

	let mut set = HashSet::new();
	set.insert(a);

	drop(target);
	// The entry is expired but still findable through its surviving twin.
	assert!(set.remove(&b));
}

struct Counter {
	base: i32,
}

fn add(counter: &Counter, x: i32) -> i32 {
	counter.base + x
}

fn mul(counter: &Counter, x: i32) -> i32 {
	counter.base * x
}

fn bound_to(owner: &Arc<Counter>, method: fn(&Counter, i32) -> i32) -> SafeRef<Callable> {
	SafeRef::bound(owner, method as usize, move |owner: Arc<Counter>| {
		Arc::new(move |x| method(&owner, x)) as Arc<Callable>
	})
}

#[test]
fn bound_resolves_through_its_owner() {
	let owner = Arc::new(Counter { base: 10 });
	let reference = bound_to(&owner, add);

	assert!(reference.is_bound());
	assert_eq!(reference.resolve().map(|f| f(5)), Some(15));

	// Adapters are transient; dropping one does not expire the reference.
	drop(reference.resolve());
	assert!(!reference.is_expired());

	drop(owner);
	assert!(reference.is_expired());
	assert!(reference.resolve().is_none());
}

#[test]
fn bound_identity_is_owner_plus_method() {
	let owner = Arc::new(Counter { base: 0 });
	let twin = Arc::new(Counter { base: 0 });

	assert_eq!(bound_to(&owner, add), bound_to(&owner, add));
	assert_ne!(bound_to(&owner, add), bound_to(&owner, mul));
	assert_ne!(bound_to(&owner, add), bound_to(&twin, add));

	let mut set = HashSet::new();
	assert!(set.insert(bound_to(&owner, add)));
	assert!(!set.insert(bound_to(&owner, add)));
	assert!(set.insert(bound_to(&owner, mul)));
	assert!(set.remove(&bound_to(&owner, add)));
}

#[test]
fn simple_and_bound_never_compare_equal() {
	let owner = Arc::new(Counter { base: 0 });
	let target: Arc<Callable> = Arc::new(|x| x);

	assert_ne!(SafeRef::new(&target), bound_to(&owner, add));
}
