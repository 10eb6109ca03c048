use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::edge::Edges;
use crate::error::GraphError;
use crate::key::Key;
use crate::region::{KeyList, Region};
use crate::value::{Input, Ref};
use crate::{Feed, Op, Sub};

/// Translates an operation arriving on one input edge into the region of
/// this channel's cache it invalidates. Structural operations may realign
/// the cache in place before the region is merged.
pub type Connector<T> = Box<dyn Fn(&Op, &mut Option<T>) -> Region>;

pub type ComputeFn<T> = Box<dyn Fn() -> T>;
pub type PatchFn<T> = Box<dyn Fn(&mut T, &Key)>;

/// Connector that forwards the upstream region unchanged. The upstream key
/// space must match this channel's key space.
pub fn passthrough<T>(op: &Op, _cache: &mut Option<T>) -> Region {
	match op {
		Op::Clear(region) | Op::Dirty(region) => region.clone(),
		_ => Region::All,
	}
}

/// Default connector: any operation invalidates the whole cache.
fn fallback<T>(op: &Op, _cache: &mut Option<T>) -> Region {
	match op {
		Op::Clear(region) | Op::Dirty(region) if region.is_empty() => Region::Empty,
		_ => Region::All,
	}
}

/// A read-only channel whose value is computed from its upstreams.
pub struct Derived<T> {
	body: Rc<DerivedBody<T>>,
}

impl<T> Clone for Derived<T> {
	fn clone(&self) -> Self {
		Self {
			body: self.body.clone(),
		}
	}
}

pub struct DerivedBody<T> {
	cache: RefCell<Option<T>>,
	inner: RefCell<DerivedInner<T>>,
}

struct DerivedInner<T> {
	dirty: Region,
	compute: ComputeFn<T>,
	patch: Option<PatchFn<T>>,
	connectors: Vec<Option<Connector<T>>>,
	edges: Edges,
	eager: bool,
}

enum Recompute {
	Skip,
	Patch(KeyList),
	Full,
}

impl<T> Derived<T>
where
	T: 'static,
{
	/// Wires a derived channel over `inputs` with the default connectors.
	/// The compute closure owns its upstream handles and pulls them when
	/// the channel is read.
	pub fn new(
		inputs: impl IntoIterator<Item = Input>,
		compute: ComputeFn<T>,
	) -> Result<Self, GraphError> {
		let mut builder = Derived::build();
		for input in inputs {
			builder = builder.pull(input);
		}
		builder.compute_boxed(compute)
	}

	#[must_use]
	pub fn build() -> DerivedBuilder<T> {
		DerivedBuilder {
			inputs: Vec::new(),
			patch: None,
			eager: false,
		}
	}

	#[inline]
	pub fn get(&self) -> Ref<'_, T> {
		self.body.get()
	}

	/// Forces materialization without borrowing the result.
	#[inline]
	pub fn update(&self) {
		self.body.update()
	}

	/// Handle for wiring this channel as an input of another derived
	/// channel.
	pub fn link(&self) -> Input {
		Input::new(self.body.clone())
	}
}

/// Builder for derived channels that need custom connectors, a per-key
/// patch function, or the eager hook.
pub struct DerivedBuilder<T> {
	inputs: Vec<(Input, Option<Connector<T>>)>,
	patch: Option<PatchFn<T>>,
	eager: bool,
}

impl<T> DerivedBuilder<T>
where
	T: 'static,
{
	/// Adds an input with the default whole-cache connector.
	pub fn pull(mut self, input: Input) -> Self {
		self.inputs.push((input, None));
		self
	}

	/// Adds an input with a custom connector.
	pub fn pull_with(
		mut self,
		input: Input,
		connector: impl Fn(&Op, &mut Option<T>) -> Region + 'static,
	) -> Self {
		self.inputs.push((input, Some(Box::new(connector))));
		self
	}

	/// Per-key recompute. When the dirty set is a finite key list and a
	/// cache exists, reading runs this for each dirty key instead of the
	/// whole-value compute.
	pub fn patch_with(mut self, patch: impl Fn(&mut T, &Key) + 'static) -> Self {
		self.patch = Some(Box::new(patch));
		self
	}

	/// Marks the channel eager: every incoming invalidation forces its own
	/// materialization after downstream propagation, so side-effecting
	/// compute closures observe source mutations synchronously.
	pub fn eager(mut self) -> Self {
		self.eager = true;
		self
	}

	pub fn compute(self, compute: impl Fn() -> T + 'static) -> Result<Derived<T>, GraphError> {
		self.compute_boxed(Box::new(compute))
	}

	pub fn compute_boxed(self, compute: ComputeFn<T>) -> Result<Derived<T>, GraphError> {
		if self.inputs.is_empty() {
			return Err(GraphError::NoUpstreams);
		}
		Ok(self.finish(compute))
	}

	pub(crate) fn finish(self, compute: ComputeFn<T>) -> Derived<T> {
		let (inputs, connectors): (Vec<Input>, Vec<Option<Connector<T>>>) =
			self.inputs.into_iter().unzip();

		let body = Rc::new(DerivedBody {
			cache: RefCell::new(None),
			inner: RefCell::new(DerivedInner {
				dirty: Region::All,
				compute,
				patch: self.patch,
				connectors,
				edges: Edges::default(),
				eager: self.eager,
			}),
		});

		for (position, input) in inputs.iter().enumerate() {
			input.attach(Rc::downgrade(&body) as Weak<dyn Sub>, position);
		}

		Derived { body }
	}
}

impl<T> DerivedBody<T>
where
	T: 'static,
{
	pub fn get(&self) -> Ref<'_, T> {
		self.update();
		Ref::new(std::cell::Ref::map(self.cache.borrow(), |cache| {
			cache.as_ref().unwrap()
		}))
	}

	pub fn update(&self) {
		let mode = {
			let inner = self.inner.borrow();
			if inner.dirty.is_empty() {
				Recompute::Skip
			} else {
				match (&inner.dirty, &inner.patch, self.cache.borrow().as_ref()) {
					(Region::Keys(keys), Some(_), Some(_)) => Recompute::Patch(keys.clone()),
					_ => Recompute::Full,
				}
			}
		};

		// The dirty set is cleared only after the user closure returns, so
		// a panicking compute leaves the channel dirty and a later read
		// retries.
		match mode {
			Recompute::Skip => {}
			Recompute::Patch(keys) => {
				trace!(keys = keys.len(), "patching cache at dirty keys");
				{
					let inner = self.inner.borrow();
					let patch = inner.patch.as_ref().unwrap();
					let mut cache = self.cache.borrow_mut();
					let value = cache.as_mut().unwrap();
					for key in &keys {
						patch(value, key);
					}
				}
				self.inner.borrow_mut().dirty = Region::Empty;
			}
			Recompute::Full => {
				trace!("recomputing");
				let value = {
					let inner = self.inner.borrow();
					(inner.compute)()
				};
				*self.cache.borrow_mut() = Some(value);
				self.inner.borrow_mut().dirty = Region::Empty;
			}
		}
	}

	fn mark_dirty(&self, region: Region) {
		if region.is_empty() {
			return;
		}

		let (edges, eager) = {
			let mut inner = self.inner.borrow_mut();
			let merged = std::mem::replace(&mut inner.dirty, Region::Empty).merge(region.clone());
			inner.dirty = merged;
			(inner.edges.clone(), inner.eager)
		};

		// Downstream channels observe the dirty flag before any eager
		// materialization runs.
		edges.emit(&Op::Dirty(region));

		if eager {
			self.update();
		}
	}
}

impl<T> Sub for DerivedBody<T>
where
	T: 'static,
{
	fn receive(self: Rc<Self>, position: usize, op: &Op) {
		let region = {
			let inner = self.inner.borrow();
			let mut cache = self.cache.borrow_mut();
			match inner.connectors.get(position).and_then(Option::as_ref) {
				Some(connector) => connector(op, &mut cache),
				None => fallback(op, &mut cache),
			}
		};
		self.mark_dirty(region);
	}
}

impl<T> Feed for DerivedBody<T>
where
	T: 'static,
{
	fn attach(&self, sub: Weak<dyn Sub>, position: usize) {
		self.inner.borrow_mut().edges.attach(sub, position);
	}
}

impl<T: 'static> From<&Derived<T>> for Input {
	fn from(derived: &Derived<T>) -> Input {
		derived.link()
	}
}
