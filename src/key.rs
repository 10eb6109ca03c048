use std::fmt;
use std::rc::Rc;

/// Opaque collection key: a position in a sequence or a name in a mapping.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
	Index(usize),
	Name(Rc<str>),
}

impl Key {
	pub fn index(&self) -> Option<usize> {
		match self {
			Key::Index(index) => Some(*index),
			Key::Name(_) => None,
		}
	}

	pub fn name(&self) -> Option<&str> {
		match self {
			Key::Index(_) => None,
			Key::Name(name) => Some(name),
		}
	}
}

impl From<usize> for Key {
	fn from(index: usize) -> Key {
		Key::Index(index)
	}
}

impl From<&str> for Key {
	fn from(name: &str) -> Key {
		Key::Name(Rc::from(name))
	}
}

impl From<String> for Key {
	fn from(name: String) -> Key {
		Key::Name(Rc::from(name))
	}
}

impl From<Rc<str>> for Key {
	fn from(name: Rc<str>) -> Key {
		Key::Name(name)
	}
}

impl fmt::Debug for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Key::Index(index) => write!(f, "{index}"),
			Key::Name(name) => write!(f, "{name:?}"),
		}
	}
}
