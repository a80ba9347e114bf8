use byteorder::{
	LE,
	ReadBytesExt
};

use pk_core::xref::RefTable;

use crate::error::RcdImportError;

/// Index of an image in the catalog's image arena
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct SpriteId(pub usize);

/// Index of a text table in the catalog's text arena
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct TextId(pub usize);

/// Index of a frame set in the catalog's frame-set arena
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct FrameSetId(pub usize);

/// Index of a track piece in the catalog's track-piece arena
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct TrackPieceId(pub usize);

/// Cross-reference tables of one container file, keyed by block ordinal.
///
/// Rebuilt for every file and dropped when it finishes loading; only the
/// arena ids it hands out survive.
#[derive(Clone, Debug, PartialEq)]
pub struct FileRefs {
	pub sprites: RefTable<SpriteId>,
	pub texts: RefTable<TextId>,
	pub frame_sets: RefTable<FrameSetId>,
	pub track_pieces: RefTable<TrackPieceId>,
}

impl Default for FileRefs {
	fn default() -> Self {
		FileRefs {
			sprites: RefTable::new("sprite"),
			texts: RefTable::new("text"),
			frame_sets: RefTable::new("frame set"),
			track_pieces: RefTable::new("track piece"),
		}
	}
}

impl FileRefs {
	pub fn new() -> FileRefs {
		FileRefs::default()
	}

	/// Reads a sprite reference; 0 is no sprite.
	pub fn read_sprite<R>(&self, buf: &mut R) -> Result<Option<SpriteId>, RcdImportError>
	where
		R: ReadBytesExt + ?Sized,
	{
		let id = buf.read_u32::<LE>()?;
		Ok(self.sprites.resolve(id)?.copied())
	}

	/// Reads `N` consecutive sprite references.
	pub fn read_sprites<R, const N: usize>(&self, buf: &mut R) -> Result<[Option<SpriteId>; N], RcdImportError>
	where
		R: ReadBytesExt + ?Sized,
	{
		let mut out = [None; N];
		for slot in out.iter_mut() {
			*slot = self.read_sprite(buf)?;
		}
		Ok(out)
	}

	pub fn read_text<R>(&self, buf: &mut R) -> Result<Option<TextId>, RcdImportError>
	where
		R: ReadBytesExt + ?Sized,
	{
		let id = buf.read_u32::<LE>()?;
		Ok(self.texts.resolve(id)?.copied())
	}

	pub fn read_frame_set<R>(&self, buf: &mut R) -> Result<Option<FrameSetId>, RcdImportError>
	where
		R: ReadBytesExt + ?Sized,
	{
		let id = buf.read_u32::<LE>()?;
		Ok(self.frame_sets.resolve(id)?.copied())
	}

	pub fn read_track_piece<R>(&self, buf: &mut R) -> Result<Option<TrackPieceId>, RcdImportError>
	where
		R: ReadBytesExt + ?Sized,
	{
		let id = buf.read_u32::<LE>()?;
		Ok(self.track_pieces.resolve(id)?.copied())
	}
}

#[cfg(test)]
mod tests {
	use pk_core::xref::RefError;

	use super::*;

	#[test]
	fn test_read_refs() {
		let mut refs = FileRefs::new();
		refs.sprites.register(1, SpriteId(0)).unwrap();
		refs.sprites.register(3, SpriteId(1)).unwrap();

		let mut buf = &b"\x03\x00\x00\x00\x00\x00\x00\x00\x01\x00\x00\x00"[..];
		let got: [Option<SpriteId>; 3] = refs.read_sprites(&mut buf).unwrap();
		assert_eq!(got, [Some(SpriteId(1)), None, Some(SpriteId(0))]);
	}

	#[test]
	fn test_unknown_ref() {
		let refs = FileRefs::new();
		let mut buf = &b"\x02\x00\x00\x00"[..];
		let err = refs.read_text(&mut buf).unwrap_err();
		assert!(matches!(err, RcdImportError::Reference {
			source: RefError::Unknown { kind: "text", id: 2 }
		}));
	}

	#[test]
	fn test_tables_are_separate() {
		let mut refs = FileRefs::new();
		refs.frame_sets.register(5, FrameSetId(0)).unwrap();

		assert!(refs.read_sprite(&mut &b"\x05\x00\x00\x00"[..]).is_err());
		assert_eq!(refs.read_frame_set(&mut &b"\x05\x00\x00\x00"[..]).unwrap(), Some(FrameSetId(0)));
	}
}
