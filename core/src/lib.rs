#[cfg(feature = "io_ext")]
pub mod io_ext;
pub mod pushback;
pub mod xref;

use std::fmt;

/// Four-character block name as stored in the stream.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub [u8; 4]);

impl Tag {
	/// Builds a tag from a block name, which must be exactly 4 bytes long.
	pub fn from_name(name: &str) -> Option<Tag> {
		let bytes: [u8; 4] = name.as_bytes().try_into().ok()?;
		Some(Tag(bytes))
	}

	pub const fn as_bytes(&self) -> &[u8; 4] {
		&self.0
	}
}

impl fmt::Display for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for b in self.0.iter() {
			if b.is_ascii_graphic() || *b == b' ' {
				write!(f, "{}", *b as char)?;
			} else {
				write!(f, "\\x{:02x}", b)?;
			}
		}

		Ok(())
	}
}

impl fmt::Debug for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Tag(\"{}\")", self)
	}
}

/// Converts a 4-byte string into a [`Tag`].
/// Byte strings longer than 4 bytes are truncated.
#[macro_export]
macro_rules! tag {
	($b4: literal) => {
		$crate::Tag([$b4[0], $b4[1], $b4[2], $b4[3]])
	}
}

#[cfg(test)]
mod tests {
	use super::Tag;

	#[test]
	fn test_tag_display() {
		assert_eq!(tag!(b"SURF").to_string(), "SURF");
		assert_eq!(Tag([b'A', 0, b'B', b'C']).to_string(), "A\\x00BC");
	}

	#[test]
	fn test_tag_from_name() {
		assert_eq!(Tag::from_name("TEXT"), Some(tag!(b"TEXT")));
		assert_eq!(Tag::from_name("PLAYER"), None);
		assert_eq!(Tag::from_name("ABC"), None);
	}
}
