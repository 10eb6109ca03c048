use std::rc::Weak;

use smallvec::SmallVec;

use crate::{Op, Sub};

/// One outgoing connection: the subscriber and the input position this
/// channel occupies on it.
#[derive(Clone)]
pub(crate) struct Edge {
	sub: Weak<dyn Sub>,
	position: usize,
}

/// Outgoing edges in insertion order. Duplicates are legal: the same
/// channel may feed two input positions of one subscriber.
#[derive(Clone, Default)]
pub(crate) struct Edges {
	list: SmallVec<[Edge; 2]>,
}

impl Edges {
	pub(crate) fn attach(&mut self, sub: Weak<dyn Sub>, position: usize) {
		self.list.push(Edge { sub, position });
	}

	/// Delivers `op` to every live subscriber in insertion order.
	pub(crate) fn emit(&self, op: &Op) {
		for edge in &self.list {
			if let Some(sub) = edge.sub.upgrade() {
				sub.receive(edge.position, op);
			}
		}
	}
}
