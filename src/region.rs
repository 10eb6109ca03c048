use fxhash::FxHashSet;
use smallvec::{smallvec, SmallVec};

use crate::key::Key;

/// Keys backing a finite region. Dirty sets are almost always tiny.
pub type KeyList = SmallVec<[Key; 4]>;

/// Describes which portion of a collection-valued cache an update touches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Region {
	/// The entire value.
	All,
	/// Nothing.
	Empty,
	/// A finite key list, deduplicated, in first-occurrence order.
	Keys(KeyList),
}

impl Region {
	/// Builds a finite region, deduplicating keys and collapsing an empty
	/// list into [`Region::Empty`].
	pub fn keys<I>(keys: I) -> Region
	where
		I: IntoIterator,
		I::Item: Into<Key>,
	{
		let mut seen = FxHashSet::default();
		let mut list = KeyList::new();
		for key in keys {
			let key = key.into();
			if seen.insert(key.clone()) {
				list.push(key);
			}
		}
		Region::Keys(list).normalize()
	}

	/// Region covering a single key.
	pub fn key(key: impl Into<Key>) -> Region {
		Region::Keys(smallvec![key.into()])
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Region::All => false,
			Region::Empty => true,
			Region::Keys(keys) => keys.is_empty(),
		}
	}

	pub fn has(&self, key: &Key) -> bool {
		match self {
			Region::All => true,
			Region::Empty => false,
			Region::Keys(keys) => keys.contains(key),
		}
	}

	/// Collapses an empty key list into [`Region::Empty`].
	#[must_use]
	pub fn normalize(self) -> Region {
		if self.is_empty() {
			Region::Empty
		} else {
			self
		}
	}

	/// Union of two regions. `All` absorbs, `Empty` is the identity; key
	/// lists concatenate, keeping the first occurrence of each key.
	#[must_use]
	pub fn merge(self, other: Region) -> Region {
		match (self.normalize(), other.normalize()) {
			(Region::All, _) | (_, Region::All) => Region::All,
			(Region::Empty, other) => other,
			(this, Region::Empty) => this,
			(Region::Keys(a), Region::Keys(b)) => {
				let mut seen = FxHashSet::default();
				let mut list = KeyList::with_capacity(a.len() + b.len());
				for key in a.into_iter().chain(b) {
					if seen.insert(key.clone()) {
						list.push(key);
					}
				}
				Region::Keys(list)
			}
		}
	}
}
