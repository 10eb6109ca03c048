use std::collections::BTreeMap;
use std::rc::Rc;

use crate::map::MapSource;
use crate::seq::SeqSource;
use crate::source::Source;
use crate::Derived;

/// Recursive resolver: replaces every channel inside a nested value with
/// its current data. Recursion terminates at scalars.
pub trait Unravel {
	type Output;

	fn unravel(&self) -> Self::Output;
}

/// Collapses a nested structure of channels into a plain value tree.
pub fn unravel<T: Unravel>(value: &T) -> T::Output {
	value.unravel()
}

impl<T> Unravel for Source<T>
where
	T: Unravel + 'static,
{
	type Output = T::Output;

	fn unravel(&self) -> Self::Output {
		self.get().unravel()
	}
}

impl<T> Unravel for Derived<T>
where
	T: Unravel + 'static,
{
	type Output = T::Output;

	fn unravel(&self) -> Self::Output {
		self.get().unravel()
	}
}

impl<T> Unravel for SeqSource<T>
where
	T: Unravel + 'static,
{
	type Output = Vec<T::Output>;

	fn unravel(&self) -> Self::Output {
		self.get().unravel()
	}
}

impl<V> Unravel for MapSource<V>
where
	V: Unravel + 'static,
{
	type Output = BTreeMap<Rc<str>, V::Output>;

	fn unravel(&self) -> Self::Output {
		self.get().unravel()
	}
}

impl<T> Unravel for Vec<T>
where
	T: Unravel,
{
	type Output = Vec<T::Output>;

	fn unravel(&self) -> Self::Output {
		self.iter().map(Unravel::unravel).collect()
	}
}

impl<V> Unravel for BTreeMap<Rc<str>, V>
where
	V: Unravel,
{
	type Output = BTreeMap<Rc<str>, V::Output>;

	fn unravel(&self) -> Self::Output {
		self.iter()
			.map(|(key, value)| (key.clone(), value.unravel()))
			.collect()
	}
}

impl<T> Unravel for Option<T>
where
	T: Unravel,
{
	type Output = Option<T::Output>;

	fn unravel(&self) -> Self::Output {
		self.as_ref().map(Unravel::unravel)
	}
}

impl<T1> Unravel for (T1,)
where
	T1: Unravel,
{
	type Output = (T1::Output,);

	fn unravel(&self) -> Self::Output {
		(self.0.unravel(),)
	}
}

impl<T1, T2> Unravel for (T1, T2)
where
	T1: Unravel,
	T2: Unravel,
{
	type Output = (T1::Output, T2::Output);

	fn unravel(&self) -> Self::Output {
		(self.0.unravel(), self.1.unravel())
	}
}

impl<T1, T2, T3> Unravel for (T1, T2, T3)
where
	T1: Unravel,
	T2: Unravel,
	T3: Unravel,
{
	type Output = (T1::Output, T2::Output, T3::Output);

	fn unravel(&self) -> Self::Output {
		(self.0.unravel(), self.1.unravel(), self.2.unravel())
	}
}

macro_rules! terminal {
	($($ty:ty),* $(,)?) => {$(
		impl Unravel for $ty {
			type Output = $ty;

			fn unravel(&self) -> Self::Output {
				self.clone()
			}
		}
	)*};
}

terminal!(
	bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
	Rc<str>,
);
