use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use crate::edge::Edges;
use crate::value::{Input, Ref};
use crate::{Feed, Op, Region, Sub};

/// A writable channel; the root of data flow.
pub struct Source<T> {
	body: Rc<SourceBody<T>>,
}

pub struct SourceBody<T> {
	value: RefCell<T>,
	inner: RefCell<SourceInner>,
}

struct SourceInner {
	edges: Edges,
}

impl<T> Clone for Source<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

impl<T> Default for Source<T>
where
	T: Default + 'static,
{
	fn default() -> Self {
		Source::new(Default::default())
	}
}

impl<T> Source<T>
where
	T: 'static,
{
	pub fn new(value: T) -> Self {
		Source {
			body: Rc::new(SourceBody {
				value: RefCell::new(value),
				inner: RefCell::new(SourceInner {
					edges: Edges::default(),
				}),
			}),
		}
	}

	#[inline]
	pub fn get(&self) -> Ref<'_, T> {
		self.body.get()
	}

	/// Replaces the value and signals every outgoing edge. A write of an
	/// equal value still signals: eager subscribers observe every write.
	#[inline]
	pub fn set(&self, value: T) {
		let _ = self.replace(value);
	}

	pub fn replace(&self, value: T) -> T {
		let old = std::mem::replace(&mut *self.body.value.borrow_mut(), value);
		self.body.emit(&Op::Clear(Region::All));
		old
	}

	pub fn update(&self, func: impl FnOnce(&mut T)) {
		func(&mut self.body.value.borrow_mut());
		self.body.emit(&Op::Clear(Region::All));
	}

	/// Handle for wiring this channel as an input of a derived channel.
	pub fn link(&self) -> Input {
		Input::new(self.body.clone())
	}

	pub fn map<F, R>(&self, func: F) -> crate::Derived<R>
	where
		F: Fn(&T) -> R + 'static,
		R: 'static,
	{
		let this = self.clone();
		crate::Derived::<R>::build()
			.pull(self.link())
			.finish(Box::new(move || func(&*this.get())))
	}
}

impl<T> SourceBody<T>
where
	T: 'static,
{
	fn get(&self) -> Ref<'_, T> {
		Ref::new(self.value.borrow())
	}

	fn emit(&self, op: &Op) {
		let edges = self.inner.borrow().edges.clone();
		edges.emit(op);
	}
}

impl<T> Feed for SourceBody<T>
where
	T: 'static,
{
	fn attach(&self, sub: Weak<dyn Sub>, position: usize) {
		self.inner.borrow_mut().edges.attach(sub, position);
	}
}

impl<T: 'static> From<&Source<T>> for Input {
	fn from(source: &Source<T>) -> Input {
		source.link()
	}
}

impl<T> Debug for Source<T>
where
	T: 'static + Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.get().fmt(f)
	}
}
