use std::cell;
use std::fmt::Debug;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::{Feed, Sub};

/// Borrow of a channel's current value.
pub struct Ref<'a, T> {
	inner: cell::Ref<'a, T>,
}

impl<'a, T> Ref<'a, T> {
	pub(crate) fn new(inner: cell::Ref<'a, T>) -> Self {
		Ref { inner }
	}
}

impl<'a, T> Deref for Ref<'a, T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		self.inner.deref()
	}
}

impl<'a, T> Debug for Ref<'a, T>
where
	T: Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.inner.fmt(f)
	}
}

/// Type-erased upstream handle used when wiring a derived channel.
pub struct Input {
	feed: Rc<dyn Feed>,
}

impl Input {
	pub fn new(feed: Rc<dyn Feed>) -> Self {
		Input { feed }
	}

	pub(crate) fn attach(&self, sub: Weak<dyn Sub>, position: usize) {
		self.feed.attach(sub, position);
	}
}

impl Clone for Input {
	fn clone(&self) -> Self {
		Input {
			feed: self.feed.clone(),
		}
	}
}
