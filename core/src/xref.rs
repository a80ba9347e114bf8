use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum RefError {
	#[error("ID 0 is reserved for 'no {kind}' and cannot be registered")]
	Null {
		kind: &'static str,
	},
	#[error("{kind} ID {id} registered after ID {last}")]
	OutOfOrder {
		kind: &'static str,
		id: u32,
		last: u32,
	},
	#[error("Unknown {kind} ID {id}")]
	Unknown {
		kind: &'static str,
		id: u32,
	},
}

/// Table resolving per-file IDs to objects decoded earlier in the same file.
///
/// IDs are registered in increasing order, so lookup is a binary search over
/// the ID column. ID 0 always stands for "no reference".
#[derive(Clone, Debug, PartialEq)]
pub struct RefTable<T> {
	kind: &'static str,
	ids: Vec<u32>,
	items: Vec<T>,
}

impl<T> RefTable<T> {
	/// Creates an empty table. `kind` names the referenced objects in errors.
	pub fn new(kind: &'static str) -> RefTable<T> {
		RefTable {
			kind: kind,
			ids: vec![],
			items: vec![],
		}
	}

	pub fn register(&mut self, id: u32, item: T) -> Result<(), RefError> {
		if id == 0 {
			return Err(RefError::Null { kind: self.kind });
		}
		if let Some(&last) = self.ids.last() {
			if id <= last {
				return Err(RefError::OutOfOrder { kind: self.kind, id: id, last: last });
			}
		}

		self.ids.push(id);
		self.items.push(item);
		Ok(())
	}

	/// Looks up a reference. ID 0 resolves to `None` without a lookup.
	pub fn resolve(&self, id: u32) -> Result<Option<&T>, RefError> {
		if id == 0 {
			return Ok(None);
		}

		match self.ids.binary_search(&id) {
			Ok(i) => Ok(Some(&self.items[i])),
			Err(_) => Err(RefError::Unknown { kind: self.kind, id: id }),
		}
	}

	pub fn kind(&self) -> &'static str {
		self.kind
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_resolve() {
		let mut table = RefTable::new("sprite");
		table.register(2, 'a').unwrap();
		table.register(5, 'b').unwrap();

		assert_eq!(table.resolve(0), Ok(None));
		assert_eq!(table.resolve(2), Ok(Some(&'a')));
		assert_eq!(table.resolve(5), Ok(Some(&'b')));
		assert_eq!(table.resolve(3), Err(RefError::Unknown { kind: "sprite", id: 3 }));
		assert_eq!(table.resolve(6), Err(RefError::Unknown { kind: "sprite", id: 6 }));
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn test_null_resolves_without_entries() {
		let table: RefTable<u32> = RefTable::new("text");
		assert!(table.is_empty());
		assert_eq!(table.resolve(0), Ok(None));
	}

	#[test]
	fn test_register_order() {
		let mut table = RefTable::new("text");
		assert_eq!(table.register(0, ()), Err(RefError::Null { kind: "text" }));
		table.register(4, ()).unwrap();
		assert_eq!(table.register(4, ()), Err(RefError::OutOfOrder { kind: "text", id: 4, last: 4 }));
		assert_eq!(table.register(1, ()), Err(RefError::OutOfOrder { kind: "text", id: 1, last: 4 }));
		assert_eq!(table.len(), 1);
	}
}
