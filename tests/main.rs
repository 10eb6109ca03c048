use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use rivulet::{derived, eager, Derived, GraphError, Input, Source};


use mock::{Probe, SharedProbe};

#[test]
fn addition_with_update() {
	let a = Source::new(1);
	let b = Source::new(1);

	let sum = derived!((a, b) [a, b] => *a.get() + *b.get()).unwrap();

	assert_eq!(*sum.get(), 2);

	a.set(5);
	assert_eq!(*sum.get(), 6);
}

#[test]
fn lazy_until_read_then_cached() {
	let a = Source::new(10u64);
	let probe = SharedProbe::new();

	let b = Derived::new(
		vec![Input::from(&a)],
		Box::new({
			let a = a.clone();
			let probe = probe.clone();
			move || {
				let value = *a.get() + 1;
				probe.get().materialized(value);
				value
			}
		}),
	)
	.unwrap();

	// A write alone never computes.
	probe.get().expect_materialized().times(0).return_const(());
	a.set(20);
	probe.get().checkpoint();

	// The first read computes once; the second hits the cache.
	probe.get().expect_materialized().times(1).return_const(());
	assert_eq!(*b.get(), 21);
	assert_eq!(*b.get(), 21);
	probe.get().checkpoint();
}

#[test]
fn nested_lazy_chain() {
	let times = Source::new(1u32);
	let text = Source::new(String::from("cat"));

	let tt =
		derived!((text, times) [text, times] => text.get().repeat(*times.get() as usize)).unwrap();
	let scale = derived!((times) [times, times] => *times.get() * *times.get()).unwrap();
	let ttt = derived!((tt, scale) [tt, scale] => tt.get().repeat(*scale.get() as usize)).unwrap();

	assert_eq!(*ttt.get(), "cat");

	times.set(2);
	text.set(String::from("dog"));

	assert_eq!(*ttt.get(), "dogdogdogdogdogdogdogdog");
}

#[test]
fn eager_fires_on_write() {
	let a = Source::new(1u64);
	let probe = SharedProbe::new();

	// Construction alone does not materialize.
	probe.get().expect_materialized().times(0).return_const(());
	let e = eager!((a, probe) [a] => probe.get().materialized(*a.get())).unwrap();
	probe.get().checkpoint();

	// The write itself runs the compute, before `set` returns.
	probe
		.get()
		.expect_materialized()
		.withf(|value| *value == 5)
		.times(1)
		.return_const(());
	a.set(5);
	probe.get().checkpoint();

	// Already clean; reading does not recompute.
	probe.get().expect_materialized().times(0).return_const(());
	e.get();
	probe.get().checkpoint();
}

#[test]
fn eager_observes_writes_in_program_order() {
	let a = Source::new(1i32);
	let b = Source::new(10i32);
	let log = Rc::new(RefCell::new(Vec::new()));

	let _e = eager!((a, b, log) [a, b] => log.borrow_mut().push((*a.get(), *b.get()))).unwrap();

	a.set(2);
	b.set(20);

	assert_eq!(*log.borrow(), vec![(2, 10), (2, 20)]);
}

#[test]
fn zero_inputs_is_an_error() {
	let result = Derived::new(Vec::<Input>::new(), Box::new(|| 0u32));
	assert!(matches!(result, Err(GraphError::NoUpstreams)));
}

#[test]
fn failed_recompute_stays_dirty() {
	let a = Source::new(1u32);
	let fail = Rc::new(Cell::new(true));

	let b = Derived::new(
		vec![Input::from(&a)],
		Box::new({
			let a = a.clone();
			let fail = fail.clone();
			move || {
				if fail.get() {
					panic!("recompute refused");
				}
				*a.get() * 2
			}
		}),
	)
	.unwrap();

	let caught = catch_unwind(AssertUnwindSafe(|| *b.get()));
	assert!(caught.is_err());

	// The channel stayed dirty, so the next read retries.
	fail.set(false);
	assert_eq!(*b.get(), 2);
}

#[test]
fn source_update_signals() {
	let a = Source::new(vec![1, 2]);
	let total = derived!((a) [a] => a.get().iter().sum::<i32>()).unwrap();

	assert_eq!(*total.get(), 3);

	a.update(|items| items.push(3));
	assert_eq!(*total.get(), 6);
}

#[test]
fn source_map() {
	let a = Source::new(3u32);
	let squared = a.map(|value| value * value);

	assert_eq!(*squared.get(), 9);

	a.set(5);
	assert_eq!(*squared.get(), 25);
}
