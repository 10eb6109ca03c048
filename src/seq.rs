use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::edge::Edges;
use crate::key::Key;
use crate::region::Region;
use crate::value::{Input, Ref};
use crate::{Derived, Feed, Op, Sub};

/// An ordered sequence source. Structural mutations emit precise regions
/// so mapped channels repatch only the affected slots.
pub struct SeqSource<T> {
	body: Rc<SeqBody<T>>,
}

pub struct SeqBody<T> {
	items: RefCell<Vec<T>>,
	inner: RefCell<SeqInner>,
}

struct SeqInner {
	edges: Edges,
}

impl<T> Clone for SeqSource<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T> SeqSource<T>
where
	T: 'static,
{
	pub fn new(items: Vec<T>) -> Self {
		SeqSource {
			body: Rc::new(SeqBody {
				items: RefCell::new(items),
				inner: RefCell::new(SeqInner {
					edges: Edges::default(),
				}),
			}),
		}
	}

	#[inline]
	pub fn get(&self) -> Ref<'_, Vec<T>> {
		Ref::new(self.body.items.borrow())
	}

	pub fn len(&self) -> usize {
		self.body.items.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.body.items.borrow().is_empty()
	}

	/// Replaces the whole sequence.
	pub fn set(&self, items: Vec<T>) {
		*self.body.items.borrow_mut() = items;
		self.body.emit(&Op::Clear(Region::All));
	}

	/// Overwrites one slot. Out-of-range indices panic, as on `Vec`.
	pub fn set_item(&self, index: usize, value: T) {
		self.body.items.borrow_mut()[index] = value;
		self.body.emit(&Op::Clear(Region::key(index)));
	}

	pub fn push(&self, value: T) {
		let start = {
			let mut items = self.body.items.borrow_mut();
			items.push(value);
			items.len() - 1
		};
		self.body.emit(&Op::Splice {
			start,
			delete: 0,
			insert: 1,
		});
	}

	/// Splices one element in. Every slot from `index` to the new end goes
	/// stale downstream: inserting shifts all later elements by one.
	pub fn insert(&self, index: usize, value: T) {
		self.body.items.borrow_mut().insert(index, value);
		self.body.emit(&Op::Splice {
			start: index,
			delete: 0,
			insert: 1,
		});
	}

	pub fn remove(&self, index: usize) -> T {
		let value = self.body.items.borrow_mut().remove(index);
		self.body.emit(&Op::Splice {
			start: index,
			delete: 1,
			insert: 0,
		});
		value
	}

	pub fn swap(&self, a: usize, b: usize) {
		self.body.items.borrow_mut().swap(a, b);
		self.body.emit(&Op::Swap(a, b));
	}

	pub fn move_item(&self, from: usize, to: usize) {
		{
			let mut items = self.body.items.borrow_mut();
			let value = items.remove(from);
			items.insert(to, value);
		}
		self.body.emit(&Op::Move { from, to });
	}

	/// Handle for wiring this channel as an input of a derived channel.
	pub fn link(&self) -> Input {
		Input::new(self.body.clone())
	}

	/// Elementwise mapping that honors fine-grained updates: after
	/// `set_item(i, v)` only `func` at `i` runs on the next read.
	pub fn map<F, R>(&self, func: F) -> Derived<Vec<R>>
	where
		F: Fn(&T) -> R + 'static,
		R: Clone + 'static,
	{
		let func = Rc::new(func);
		let compute = {
			let this = self.clone();
			let func = func.clone();
			move || this.get().iter().map(|item| func(item)).collect()
		};
		let patch = {
			let this = self.clone();
			let func = func.clone();
			move |cache: &mut Vec<R>, key: &Key| {
				let index = match key {
					Key::Index(index) => *index,
					Key::Name(_) => return,
				};
				let items = this.get();
				match items.get(index) {
					Some(item) => {
						let value = func(item);
						if index < cache.len() {
							cache[index] = value;
						} else {
							cache.push(value);
						}
					}
					// The upstream shrank past this slot.
					None => cache.truncate(index),
				}
			}
		};
		Derived::<Vec<R>>::build()
			.pull_with(self.link(), mirror)
			.patch_with(patch)
			.finish(Box::new(compute))
	}
}

impl<T> SeqBody<T>
where
	T: 'static,
{
	fn emit(&self, op: &Op) {
		let edges = self.inner.borrow().edges.clone();
		edges.emit(op);
	}
}

impl<T> Feed for SeqBody<T>
where
	T: 'static,
{
	fn attach(&self, sub: Weak<dyn Sub>, position: usize) {
		self.inner.borrow_mut().edges.attach(sub, position);
	}
}

impl<T: 'static> From<&SeqSource<T>> for Input {
	fn from(source: &SeqSource<T>) -> Input {
		source.link()
	}
}

/// Connector for one-to-one sequence mirrors: regions pass through
/// unchanged and structural operations realign the mirrored list in place
/// before the patched slots are marked dirty.
pub(crate) fn mirror<R: Clone>(op: &Op, cache: &mut Option<Vec<R>>) -> Region {
	match op {
		Op::Clear(region) | Op::Dirty(region) => region.clone(),
		Op::Splice {
			start,
			delete,
			insert,
		} => splice_cache(cache, *start, *delete, *insert),
		Op::Swap(a, b) => {
			let items = match cache {
				Some(items) => items,
				None => return Region::All,
			};
			if *a >= items.len() || *b >= items.len() {
				return Region::All;
			}
			items.swap(*a, *b);
			Region::keys([*a, *b])
		}
		Op::Move { from, to } => {
			let items = match cache {
				Some(items) => items,
				None => return Region::All,
			};
			if *from >= items.len() || *to >= items.len() {
				return Region::All;
			}
			let value = items.remove(*from);
			items.insert(*to, value);
			let (low, high) = if from <= to { (*from, *to) } else { (*to, *from) };
			Region::keys(low..=high)
		}
	}
}

/// Splices the mirrored list the same way its source was spliced. Inserted
/// slots are clone-filled placeholders; the patch pass overwrites every
/// slot in the returned region.
pub(crate) fn splice_cache<R: Clone>(
	cache: &mut Option<Vec<R>>,
	start: usize,
	delete: usize,
	insert: usize,
) -> Region {
	let items = match cache {
		Some(items) => items,
		None => return Region::All,
	};
	let start = start.min(items.len());
	let end = (start + delete).min(items.len());
	items.drain(start..end);
	for _ in 0..insert {
		if items.is_empty() {
			// Nothing to clone from; the patch pass appends the new slots.
			break;
		}
		let donor = start.min(items.len() - 1);
		let dup = items[donor].clone();
		items.insert(start.min(items.len()), dup);
	}
	Region::keys(start..items.len().max(start + insert))
}
