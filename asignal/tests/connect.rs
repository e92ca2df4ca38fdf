use std::sync::Arc;

use asignal::{listener, Continuation, EmitArgs, Listener, ListenerError, Signal, Task};

use _validator::Validator;

fn recorder(v: &Arc<Validator<i32>>, tag: i32) -> Arc<dyn Listener> {
	let v = Arc::clone(v);
	listener::from_fn(move |_args| v.push(tag))
}

fn discarding() -> Signal {
	Signal::new(|_task: Task| {})
}

#[test]
fn duplicate_strong_connect_is_deduplicated() {
	let v = Arc::new(Validator::new());
	let signal = discarding();

	let l = recorder(&v, 1);
	signal.connect_strong(Arc::clone(&l));
	signal.connect_strong(Arc::clone(&l));

	signal.emit(EmitArgs::new()).unwrap();
	v.expect([1]);
}

#[test]
fn duplicate_weak_connect_is_deduplicated() {
	let v = Arc::new(Validator::new());
	let signal = discarding();

	let l = recorder(&v, 1);
	signal.connect(&l);
	signal.connect(&l);

	signal.emit(EmitArgs::new()).unwrap();
	v.expect([1]);
}

#[test]
fn strong_and_weak_registrations_are_independent() {
	let v = Arc::new(Validator::new());
	let signal = discarding();

	let l = recorder(&v, 1);
	signal.connect_strong(Arc::clone(&l));
	signal.connect(&l);

	signal.emit(EmitArgs::new()).unwrap();
	v.expect([1, 1]);

	// One disconnect removes the strong registration only.
	signal.disconnect(&l);
	signal.emit(EmitArgs::new()).unwrap();
	v.expect([1]);

	// The second falls back to the weak one.
	signal.disconnect(&l);
	signal.emit(EmitArgs::new()).unwrap();
	v.expect([]);
}

#[test]
fn disconnecting_unknown_listeners_is_a_no_op() {
	let v = Arc::new(Validator::new());
	let signal = discarding();

	let stranger = recorder(&v, 9);
	signal.disconnect(&stranger);

	let l = recorder(&v, 1);
	signal.connect_strong(Arc::clone(&l));
	signal.disconnect(&l);
	signal.disconnect(&l);

	signal.emit(EmitArgs::new()).unwrap();
	v.expect([]);
}

struct Owner {
	v: Arc<Validator<i32>>,
}

fn on_emit(owner: &Owner, _args: EmitArgs) -> Result<Continuation, ListenerError> {
	owner.v.push(7);
	Ok(Continuation::Ready)
}

#[test]
fn bound_methods_connect_and_disconnect_by_owner_and_method() {
	let v = Arc::new(Validator::new());
	let signal = discarding();

	let owner = Arc::new(Owner { v: Arc::clone(&v) });
	signal.connect_method(&owner, on_emit);
	signal.connect_method(&owner, on_emit);

	signal.emit(EmitArgs::new()).unwrap();
	v.expect([7]);

	signal.disconnect_method(&owner, on_emit);
	signal.emit(EmitArgs::new()).unwrap();
	v.expect([]);
}

#[test]
fn listeners_may_disconnect_reentrantly() {
	let v = Arc::new(Validator::new());
	let signal = Arc::new(discarding());

	let follower = recorder(&v, 2);
	let saboteur = listener::from_fn({
		let signal = Arc::clone(&signal);
		let follower = Arc::clone(&follower);
		move |_args| signal.disconnect(&follower)
	});
	signal.connect_strong(saboteur);
	signal.connect_strong(Arc::clone(&follower));

	// The fan-out snapshot still includes the follower this round.
	signal.emit(EmitArgs::new()).unwrap();
	v.expect([2]);

	signal.emit(EmitArgs::new()).unwrap();
	v.expect([]);
}
