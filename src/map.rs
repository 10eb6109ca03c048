use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::derived::passthrough;
use crate::edge::Edges;
use crate::key::Key;
use crate::region::Region;
use crate::value::{Input, Ref};
use crate::{Derived, Feed, Op, Sub};

/// A keyed mapping source. Writes to one key emit that key's region so
/// mapped channels repatch a single entry.
pub struct MapSource<V> {
	body: Rc<MapBody<V>>,
}

pub struct MapBody<V> {
	entries: RefCell<BTreeMap<Rc<str>, V>>,
	inner: RefCell<MapInner>,
}

struct MapInner {
	edges: Edges,
}

impl<V> Clone for MapSource<V> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<V> MapSource<V>
where
	V: 'static,
{
	pub fn new<K, I>(entries: I) -> Self
	where
		K: Into<Rc<str>>,
		I: IntoIterator<Item = (K, V)>,
	{
		MapSource {
			body: Rc::new(MapBody {
				entries: RefCell::new(
					entries
						.into_iter()
						.map(|(key, value)| (key.into(), value))
						.collect(),
				),
				inner: RefCell::new(MapInner {
					edges: Edges::default(),
				}),
			}),
		}
	}

	#[inline]
	pub fn get(&self) -> Ref<'_, BTreeMap<Rc<str>, V>> {
		Ref::new(self.body.entries.borrow())
	}

	pub fn len(&self) -> usize {
		self.body.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.body.entries.borrow().is_empty()
	}

	/// Inserts or overwrites one entry.
	pub fn set(&self, key: impl Into<Rc<str>>, value: V) {
		let key: Rc<str> = key.into();
		self.body.entries.borrow_mut().insert(key.clone(), value);
		self.body.emit(&Op::Clear(Region::key(key)));
	}

	/// Removes one entry. The downstream key set changes, which a key list
	/// cannot express, so this invalidates everything.
	pub fn remove(&self, key: &str) -> Option<V> {
		let removed = self.body.entries.borrow_mut().remove(key);
		if removed.is_some() {
			self.body.emit(&Op::Clear(Region::All));
		}
		removed
	}

	/// Replaces the whole mapping.
	pub fn replace(&self, entries: BTreeMap<Rc<str>, V>) {
		*self.body.entries.borrow_mut() = entries;
		self.body.emit(&Op::Clear(Region::All));
	}

	/// Handle for wiring this channel as an input of a derived channel.
	pub fn link(&self) -> Input {
		Input::new(self.body.clone())
	}

	pub fn keys(&self) -> Derived<Vec<Rc<str>>> {
		let this = self.clone();
		Derived::<Vec<Rc<str>>>::build()
			.pull(self.link())
			.finish(Box::new(move || this.get().keys().cloned().collect()))
	}

	pub fn values(&self) -> Derived<Vec<V>>
	where
		V: Clone,
	{
		let this = self.clone();
		Derived::<Vec<V>>::build()
			.pull(self.link())
			.finish(Box::new(move || this.get().values().cloned().collect()))
	}

	pub fn entries(&self) -> Derived<Vec<(Rc<str>, V)>>
	where
		V: Clone,
	{
		let this = self.clone();
		Derived::<Vec<(Rc<str>, V)>>::build()
			.pull(self.link())
			.finish(Box::new(move || {
				this.get()
					.iter()
					.map(|(key, value)| (key.clone(), value.clone()))
					.collect()
			}))
	}

	/// Entrywise mapping that honors fine-grained updates: after
	/// `set(k, v)` only `func` at `k` runs on the next read.
	pub fn map<F, R>(&self, func: F) -> Derived<BTreeMap<Rc<str>, R>>
	where
		F: Fn(&V) -> R + 'static,
		R: 'static,
	{
		let func = Rc::new(func);
		let compute = {
			let this = self.clone();
			let func = func.clone();
			move || {
				this.get()
					.iter()
					.map(|(key, value)| (key.clone(), func(value)))
					.collect()
			}
		};
		let patch = {
			let this = self.clone();
			let func = func.clone();
			move |cache: &mut BTreeMap<Rc<str>, R>, key: &Key| {
				let name = match key {
					Key::Name(name) => name.clone(),
					Key::Index(_) => return,
				};
				let entries = this.get();
				match entries.get(name.as_ref()) {
					Some(value) => {
						cache.insert(name, func(value));
					}
					None => {
						cache.remove(name.as_ref());
					}
				}
			}
		};
		Derived::<BTreeMap<Rc<str>, R>>::build()
			.pull_with(self.link(), passthrough)
			.patch_with(patch)
			.finish(Box::new(compute))
	}
}

impl<V> MapBody<V>
where
	V: 'static,
{
	fn emit(&self, op: &Op) {
		let edges = self.inner.borrow().edges.clone();
		edges.emit(op);
	}
}

impl<V> Feed for MapBody<V>
where
	V: 'static,
{
	fn attach(&self, sub: Weak<dyn Sub>, position: usize) {
		self.inner.borrow_mut().edges.attach(sub, position);
	}
}

impl<V: 'static> From<&MapSource<V>> for Input {
	fn from(source: &MapSource<V>) -> Input {
		source.link()
	}
}
