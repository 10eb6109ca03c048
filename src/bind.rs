use std::cell::RefCell;
use std::rc::Rc;

use crate::key::Key;
use crate::region::Region;
use crate::seq::{splice_cache, SeqSource};
use crate::{Derived, Op};

/// Target tree mutated by an eager binding.
pub trait Sink<T> {
	/// Replaces the whole rendered range.
	fn rebuild(&mut self, items: &[T]);

	/// Sets one slot, appending when `index` is one past the end.
	fn apply(&mut self, index: usize, item: &T);
}

/// Keeps an eager channel mirroring a sequence into a sink alive. Once
/// [`Binder::refresh`] has run, every source mutation reaches the sink
/// before the mutating call returns, in program order.
#[must_use = "dropping the binder disconnects the sink"]
pub struct Binder<T> {
	channel: Derived<Vec<T>>,
}

impl<T> Binder<T>
where
	T: 'static,
{
	/// Performs the initial materialization, rebuilding the sink.
	pub fn refresh(&self) {
		self.channel.update();
	}
}

/// Binds `source` to `sink` through an eager mirror channel. Targeted
/// writes and grow-only splices become one-slot `apply` calls; everything
/// else rebuilds the sink.
pub fn bind<T, S>(source: &SeqSource<T>, sink: Rc<RefCell<S>>) -> Binder<T>
where
	T: Clone + 'static,
	S: Sink<T> + 'static,
{
	let compute = {
		let source = source.clone();
		let sink = sink.clone();
		move || {
			let items = source.get().clone();
			sink.borrow_mut().rebuild(&items);
			items
		}
	};
	let patch = {
		let source = source.clone();
		move |cache: &mut Vec<T>, key: &Key| {
			let index = match key {
				Key::Index(index) => *index,
				Key::Name(_) => return,
			};
			let items = source.get();
			match items.get(index) {
				Some(item) => {
					sink.borrow_mut().apply(index, item);
					if index < cache.len() {
						cache[index] = item.clone();
					} else {
						cache.push(item.clone());
					}
				}
				None => cache.truncate(index),
			}
		}
	};
	let channel = Derived::<Vec<T>>::build()
		.pull_with(source.link(), |op: &Op, cache: &mut Option<Vec<T>>| {
			match op {
				Op::Clear(region) | Op::Dirty(region) => region.clone(),
				Op::Splice {
					start,
					delete: 0,
					insert,
				} => splice_cache(cache, *start, 0, *insert),
				// Shrinking and reordering have no one-slot rendition.
				_ => Region::All,
			}
		})
		.patch_with(patch)
		.eager()
		.finish(Box::new(compute));

	Binder { channel }
}
