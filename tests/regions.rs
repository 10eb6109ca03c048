use std::collections::BTreeSet;

use proptest::prelude::*;
use rivulet::{Key, Region};

#[test]
fn membership() {
	let region = Region::keys([1usize, 2, 3]);
	assert!(region.has(&Key::from(2usize)));
	assert!(!region.has(&Key::from(5usize)));
	assert!(Region::All.has(&Key::from(9usize)));
	assert!(!Region::Empty.has(&Key::from(0usize)));
}

#[test]
fn merge_keeps_first_occurrence_order() {
	let merged = Region::keys([1usize, 2, 3]).merge(Region::keys([2usize, 3, 4]));
	assert_eq!(merged, Region::keys([1usize, 2, 3, 4]));
}

#[test]
fn empty_key_list_normalizes() {
	assert_eq!(Region::keys(Vec::<usize>::new()), Region::Empty);
	assert!(Region::keys(Vec::<usize>::new()).is_empty());
}

#[test]
fn all_absorbs() {
	assert_eq!(Region::All.merge(Region::keys([1usize])), Region::All);
	assert_eq!(Region::keys([1usize]).merge(Region::All), Region::All);
}

#[test]
fn name_and_index_keys_coexist() {
	let region = Region::keys([Key::from(0usize), Key::from("total")]);
	assert!(region.has(&Key::from(0usize)));
	assert!(region.has(&Key::from("total")));
	assert!(!region.has(&Key::from(1usize)));
}

fn regions() -> impl Strategy<Value = Region> {
	prop_oneof![
		Just(Region::All),
		Just(Region::Empty),
		prop::collection::vec(0usize..12, 0..8).prop_map(|keys| Region::keys(keys)),
	]
}

fn as_set(region: &Region) -> Option<BTreeSet<Key>> {
	match region {
		Region::All => None,
		Region::Empty => Some(BTreeSet::new()),
		Region::Keys(keys) => Some(keys.iter().cloned().collect()),
	}
}

proptest! {
	#[test]
	fn merge_commutes_up_to_order(a in regions(), b in regions()) {
		let ab = a.clone().merge(b.clone());
		let ba = b.merge(a);
		prop_assert_eq!(as_set(&ab), as_set(&ba));
	}

	#[test]
	fn merge_is_associative(a in regions(), b in regions(), c in regions()) {
		let left = a.clone().merge(b.clone()).merge(c.clone());
		let right = a.merge(b.merge(c));
		prop_assert_eq!(left, right);
	}

	#[test]
	fn merge_is_idempotent(a in regions()) {
		prop_assert_eq!(a.clone().merge(a.clone()), a.normalize());
	}

	#[test]
	fn empty_is_identity(a in regions()) {
		prop_assert_eq!(Region::Empty.merge(a.clone()), a.clone().normalize());
		prop_assert_eq!(a.clone().merge(Region::Empty), a.normalize());
	}
}
