use std::{
	any::Any,
	collections::BTreeMap,
	fmt::Debug,
	io::Read
};

use pk_core::{
	tag,
	Tag
};

use crate::{
	block::BlockHeader,
	error::RcdImportError,
	refs::FileRefs
};

/// Block tags of game-object types decoded outside this crate
pub static TYPE_TAGS: [Tag; 8] = [
	tag!(b"SHOP"),
	tag!(b"FGTR"),
	tag!(b"RCST"),
	tag!(b"RIEE"),
	tag!(b"SCNY"),
	tag!(b"TRCK"),
	tag!(b"CSPL"),
	tag!(b"CARS"),
];

/// A decoded game-object type, such as a shop or a coaster
pub trait GameType: Any + Debug {
	/// Name identifying the type among those with the same tag
	fn name(&self) -> &str;

	fn as_any(&self) -> &dyn Any;
}

/// Piece of a coaster track, referenced by later blocks of the same file
pub trait TrackPiece: Any + Debug {
	fn as_any(&self) -> &dyn Any;
}

/// Result of an external decoder
#[derive(Debug)]
pub enum Decoded {
	Type(Box<dyn GameType>),
	TrackPiece(Box<dyn TrackPiece>),
}

/// Decoder for the payload of one game-object type block.
///
/// `buf` holds exactly the block payload; bytes left unread fail the block.
/// References to sprites, texts and track pieces are resolved through `refs`.
pub trait TypeDecoder {
	fn tag(&self) -> Tag;

	fn version(&self) -> u32;

	fn decode(&self, header: &BlockHeader, buf: &mut dyn Read, refs: &FileRefs) -> Result<Decoded, RcdImportError>;
}

/// Long-lived store of decoded game-object types, keyed by tag and name
#[derive(Debug, Default)]
pub struct TypeRegistry {
	types: BTreeMap<(Tag, String), Box<dyn GameType>>,
}

impl TypeRegistry {
	pub fn new() -> TypeRegistry {
		TypeRegistry::default()
	}

	/// Adds a type, replacing an earlier one of the same tag and name.
	pub fn insert(&mut self, tag: Tag, game_type: Box<dyn GameType>) -> Option<Box<dyn GameType>> {
		let key = (tag, game_type.name().to_string());
		self.types.insert(key, game_type)
	}

	pub fn get(&self, tag: Tag, name: &str) -> Option<&dyn GameType> {
		self.types.get(&(tag, name.to_string())).map(|t| t.as_ref())
	}

	/// Looks up a type and downcasts it to its concrete type.
	pub fn get_as<T: GameType>(&self, tag: Tag, name: &str) -> Option<&T> {
		self.get(tag, name)?.as_any().downcast_ref::<T>()
	}

	/// All types with the given tag, ordered by name
	pub fn of_tag(&self, tag: Tag) -> impl Iterator<Item = &dyn GameType> + '_ {
		self.types
			.range((tag, String::new())..)
			.take_while(move |((t, _), _)| *t == tag)
			.map(|(_, v)| v.as_ref())
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, PartialEq)]
	struct Shop {
		name: String,
		price: u32,
	}

	impl GameType for Shop {
		fn name(&self) -> &str {
			&self.name
		}

		fn as_any(&self) -> &dyn Any {
			self
		}
	}

	fn shop(name: &str, price: u32) -> Box<dyn GameType> {
		Box::new(Shop { name: name.to_string(), price: price })
	}

	#[test]
	fn test_registry() {
		let mut reg = TypeRegistry::new();
		assert!(reg.insert(tag!(b"SHOP"), shop("Ice cream", 2)).is_none());
		assert!(reg.insert(tag!(b"SHOP"), shop("Balloons", 3)).is_none());
		assert!(reg.insert(tag!(b"SCNY"), shop("Tree", 0)).is_none());
		assert!(reg.insert(tag!(b"SHOP"), shop("Ice cream", 4)).is_some());

		assert_eq!(reg.len(), 3);
		assert_eq!(reg.get_as::<Shop>(tag!(b"SHOP"), "Ice cream").map(|s| s.price), Some(4));
		assert!(reg.get(tag!(b"SCNY"), "Ice cream").is_none());

		let names: Vec<&str> = reg.of_tag(tag!(b"SHOP")).map(|t| t.name()).collect();
		assert_eq!(names, vec!["Balloons", "Ice cream"]);
	}
}
