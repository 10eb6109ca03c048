use crate::region::Region;

/// Change description carried along a graph edge.
///
/// Sources emit `Clear` and the structural variants; between derived
/// channels only `Dirty` travels. The structural variants exist so a
/// connector can realign a downstream cache in place (a mirrored list must
/// be spliced the same way its source was) before the dirty region is
/// merged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
	/// Values at `Region` changed; no structural change.
	Clear(Region),
	/// Sequence splice: at `start`, `delete` elements were removed and
	/// `insert` elements were added.
	Splice { start: usize, delete: usize, insert: usize },
	/// Two elements exchanged places.
	Swap(usize, usize),
	/// One element relocated.
	Move { from: usize, to: usize },
	/// Propagated invalidation of `Region`.
	Dirty(Region),
}
