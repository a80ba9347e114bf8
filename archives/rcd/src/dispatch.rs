use std::io::Read;

use log::{
	debug,
	info,
	warn
};

use pk_core::{
	tag,
	Tag
};

use crate::{
	anim::{
		Animation,
		AnimationSprites
	},
	block::{
		BlockHeader,
		BlockSize,
		RcdReader
	},
	catalog::{
		Catalog,
		LoadStats
	},
	error::RcdImportError,
	frames::{
		FrameSet,
		TimedAnimation
	},
	gui::{
		GuiSprites,
		MainMenu,
		SlopeSelection
	},
	image::{
		self,
		ImageData,
		GEOMETRY_SIZE
	},
	refs::{
		FileRefs,
		FrameSetId,
		SpriteId,
		TextId,
		TrackPieceId
	},
	sprites::{
		BuildArrows,
		Fence,
		Foundation,
		PathDecoration,
		PathSprites,
		Platform,
		Support,
		Surface,
		TileCorners,
		TileSelection
	},
	text::{
		self,
		TextData
	},
	types::{
		Decoded,
		TYPE_TAGS
	}
};

/// Meta data block, never interpreted
pub const INFO: Tag = tag!(b"INFO");

/// Block kinds decoded by the catalog itself
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BlockKind {
	PalettedImage,
	RgbaImage,
	Surface,
	TileSelection,
	TileCorners,
	Path,
	PathDecoration,
	Fence,
	Foundation,
	Platform,
	Support,
	BuildArrows,
	Animation,
	AnimationSprites,
	Text,
	FrameSet,
	TimedAnimation,
	GuiBorder,
	GuiCheckable,
	GuiSlider,
	GuiScrollbar,
	GuiSlopeSelection,
	MainMenu,
}

/// Tag, supported version and accepted payload length of every block kind
static BLOCK_KINDS: [(Tag, BlockKind, u32, BlockSize); 23] = [
	(image::PALETTED_TAG, BlockKind::PalettedImage, image::PALETTED_VERSION, BlockSize::AtLeast(GEOMETRY_SIZE)),
	(image::RGBA_TAG, BlockKind::RgbaImage, image::RGBA_VERSION, BlockSize::AtLeast(GEOMETRY_SIZE)),
	(tag!(b"SURF"), BlockKind::Surface, Surface::VERSION, BlockSize::Exact(Surface::SIZE)),
	(tag!(b"TSEL"), BlockKind::TileSelection, TileSelection::VERSION, BlockSize::Exact(TileSelection::SIZE)),
	(tag!(b"TCOR"), BlockKind::TileCorners, TileCorners::VERSION, BlockSize::Exact(TileCorners::SIZE)),
	(tag!(b"PATH"), BlockKind::Path, PathSprites::VERSION, BlockSize::Exact(PathSprites::SIZE)),
	(tag!(b"PDEC"), BlockKind::PathDecoration, PathDecoration::VERSION, BlockSize::Exact(PathDecoration::SIZE)),
	(tag!(b"FENC"), BlockKind::Fence, Fence::VERSION, BlockSize::Exact(Fence::SIZE)),
	(tag!(b"FUND"), BlockKind::Foundation, Foundation::VERSION, BlockSize::Exact(Foundation::SIZE)),
	(tag!(b"PLAT"), BlockKind::Platform, Platform::VERSION, BlockSize::Exact(Platform::SIZE)),
	(tag!(b"SUPP"), BlockKind::Support, Support::VERSION, BlockSize::Exact(Support::SIZE)),
	(tag!(b"BDIR"), BlockKind::BuildArrows, BuildArrows::VERSION, BlockSize::Exact(BuildArrows::SIZE)),
	(tag!(b"ANIM"), BlockKind::Animation, Animation::VERSION, BlockSize::AtLeast(Animation::BASE_SIZE)),
	(tag!(b"ANSP"), BlockKind::AnimationSprites, AnimationSprites::VERSION, BlockSize::AtLeast(AnimationSprites::BASE_SIZE)),
	(tag!(b"TEXT"), BlockKind::Text, text::VERSION, BlockSize::AtLeast(0)),
	(tag!(b"FSET"), BlockKind::FrameSet, FrameSet::VERSION, BlockSize::AtLeast(FrameSet::BASE_SIZE)),
	(tag!(b"TIMA"), BlockKind::TimedAnimation, TimedAnimation::VERSION, BlockSize::AtLeast(TimedAnimation::BASE_SIZE)),
	(tag!(b"GBOR"), BlockKind::GuiBorder, GuiSprites::BORDER_VERSION, BlockSize::Exact(GuiSprites::BORDER_SIZE)),
	(tag!(b"GCHK"), BlockKind::GuiCheckable, GuiSprites::CHECKABLE_VERSION, BlockSize::Exact(GuiSprites::CHECKABLE_SIZE)),
	(tag!(b"GSLI"), BlockKind::GuiSlider, GuiSprites::SLIDER_VERSION, BlockSize::Exact(GuiSprites::SLIDER_SIZE)),
	(tag!(b"GSCL"), BlockKind::GuiScrollbar, GuiSprites::SCROLLBAR_VERSION, BlockSize::Exact(GuiSprites::SCROLLBAR_SIZE)),
	(tag!(b"GSLP"), BlockKind::GuiSlopeSelection, SlopeSelection::VERSION, BlockSize::Exact(SlopeSelection::SIZE)),
	(tag!(b"MENU"), BlockKind::MainMenu, MainMenu::VERSION, BlockSize::Exact(MainMenu::SIZE)),
];

impl BlockKind {
	pub fn from_tag(tag: Tag) -> Option<BlockKind> {
		BLOCK_KINDS.iter().find(|(t, _, _, _)| *t == tag).map(|(_, kind, _, _)| *kind)
	}

	fn entry(self) -> &'static (Tag, BlockKind, u32, BlockSize) {
		let idx = BLOCK_KINDS.iter().position(|(_, kind, _, _)| *kind == self).unwrap_or(0);
		&BLOCK_KINDS[idx]
	}

	pub fn tag(self) -> Tag {
		self.entry().0
	}

	/// The only version of the block that can be decoded
	pub fn version(self) -> u32 {
		self.entry().2
	}

	/// Payload length accepted before any of the payload is read
	pub fn size(self) -> BlockSize {
		self.entry().3
	}
}

/// Fails when a decoder left part of the payload unread.
fn expect_consumed(header: &BlockHeader, rest: &[u8]) -> Result<(), RcdImportError> {
	if !rest.is_empty() {
		return Err(RcdImportError::Trailing { tag: header.tag, count: rest.len() });
	}

	Ok(())
}

impl Catalog {
	/// Loads all blocks of a container from a stream.
	///
	/// Block ordinals start at 1 and count every block, skipped ones
	/// included. Unknown tags are skipped; any other failure stops loading,
	/// leaving the blocks before it in the catalog.
	pub fn load_from<R: Read>(&mut self, rd: R) -> Result<LoadStats, RcdImportError> {
		let mut rd = RcdReader::new(rd)?;
		let mut refs = FileRefs::new();
		let mut stats = LoadStats::default();

		while let Some(header) = rd.next_header()? {
			stats.blocks += 1;
			let ordinal = stats.blocks;

			if header.tag == INFO {
				rd.skip_payload(&header)?;
				continue;
			}

			let known = BlockKind::from_tag(header.tag);
			if known.is_none() && !self.decoders.contains_key(&header.tag) {
				if TYPE_TAGS.contains(&header.tag) {
					debug!("Skipping {} block #{}, no decoder registered", header.tag, ordinal);
				} else {
					warn!("Skipping unknown block {} #{} (version {}, {} bytes)",
						header.tag, ordinal, header.version, header.length);
				}
				rd.skip_payload(&header)?;
				stats.skipped += 1;
				continue;
			}

			self.check_header(known, &header)
				.map_err(|e| e.in_block(header.tag, ordinal))?;
			let payload = rd.read_payload(&header)
				.map_err(|e| e.in_block(header.tag, ordinal))?;
			let decoded = match known {
				Some(kind) => self.decode_block(kind, &header, &payload, ordinal, &mut refs),
				None => self.decode_external(&header, &payload, ordinal, &mut refs),
			};
			decoded.map_err(|e| e.in_block(header.tag, ordinal))?;

			debug!("Loaded {} block #{} ({} bytes)", header.tag, ordinal, header.length);
		}

		info!("Loaded {} blocks, {} skipped, {} sprites, {} texts",
			stats.blocks, stats.skipped, refs.sprites.len(), refs.texts.len());
		Ok(stats)
	}

	/// Checks version and payload length from the header alone, so a bad
	/// header never has its payload read.
	fn check_header(&self, known: Option<BlockKind>, header: &BlockHeader) -> Result<(), RcdImportError> {
		match known {
			Some(kind) => {
				header.expect_version(kind.version())?;
				header.expect_block_size(kind.size())
			},
			None => match self.decoders.get(&header.tag) {
				Some(decoder) => header.expect_version(decoder.version()),
				None => Ok(()),
			},
		}
	}

	fn decode_block(&mut self, kind: BlockKind, header: &BlockHeader, payload: &[u8], ordinal: u32, refs: &mut FileRefs) -> Result<(), RcdImportError> {
		let mut buf = payload;

		match kind {
			BlockKind::PalettedImage | BlockKind::RgbaImage => {
				let image = ImageData::read(header, &mut buf)?;
				expect_consumed(header, buf)?;
				refs.sprites.register(ordinal, SpriteId(self.images.len()))?;
				self.images.push(image);
			},
			BlockKind::Surface => {
				let surf = Surface::read(header, &mut buf, refs)?;
				let idx = surf.ground.index();
				let store = self.store_mut(surf.width)?;
				store.surfaces[idx] = Some(surf);
			},
			BlockKind::TileSelection => {
				let tsel = TileSelection::read(header, &mut buf, refs)?;
				let store = self.store_mut(tsel.width)?;
				store.tile_select = Some(tsel);
			},
			BlockKind::TileCorners => {
				let tcor = TileCorners::read(header, &mut buf, refs)?;
				let store = self.store_mut(tcor.width)?;
				store.tile_corners = Some(tcor);
			},
			BlockKind::Path => {
				let path = PathSprites::read(header, &mut buf, refs)?;
				let idx = path.path_type.index();
				let store = self.store_mut(path.width)?;
				store.paths[idx] = Some(path);
			},
			BlockKind::PathDecoration => {
				let pdec = PathDecoration::read(header, &mut buf, refs)?;
				let store = self.store_mut(pdec.width)?;
				store.path_decoration = Some(pdec);
			},
			BlockKind::Fence => {
				let fence = Fence::read(header, &mut buf, refs)?;
				let idx = fence.fence_type.index();
				let store = self.store_mut(fence.width)?;
				store.fences[idx] = Some(fence);
			},
			BlockKind::Foundation => {
				let fund = Foundation::read(header, &mut buf, refs)?;
				let idx = fund.foundation_type.index();
				let store = self.store_mut(fund.width)?;
				store.foundations[idx] = Some(fund);
			},
			BlockKind::Platform => {
				let plat = Platform::read(header, &mut buf, refs)?;
				let store = self.store_mut(plat.width)?;
				store.platform = Some(plat);
			},
			BlockKind::Support => {
				let supp = Support::read(header, &mut buf, refs)?;
				let store = self.store_mut(supp.width)?;
				store.support = Some(supp);
			},
			BlockKind::BuildArrows => {
				let bdir = BuildArrows::read(header, &mut buf, refs)?;
				let store = self.store_mut(bdir.width)?;
				store.build_arrows = Some(bdir);
			},
			BlockKind::Animation => {
				let anim = Animation::read(header, &mut buf)?;
				for store in self.stores.values_mut() {
					store.remove_animations(anim.anim, anim.person);
				}
				self.animations.retain(|a| !(a.anim == anim.anim && a.person == anim.person));
				self.animations.push(anim);
			},
			BlockKind::AnimationSprites => {
				let ansp = AnimationSprites::read(header, &mut buf, refs)?;
				self.store_mut(ansp.width)?.add_animation_sprites(ansp);
			},
			BlockKind::Text => {
				let text = TextData::read(header, &mut buf, &self.config.languages)?;
				expect_consumed(header, buf)?;
				refs.texts.register(ordinal, TextId(self.texts.len()))?;
				self.texts.push(text);
			},
			BlockKind::FrameSet => {
				let fset = FrameSet::read(header, &mut buf, refs)?;
				refs.frame_sets.register(ordinal, FrameSetId(self.frame_sets.len()))?;
				self.frame_sets.push(fset);
			},
			BlockKind::TimedAnimation => {
				let tima = TimedAnimation::read(header, &mut buf, refs)?;
				self.timed_animations.push(tima);
			},
			BlockKind::GuiBorder => self.gui.load_border(header, &mut buf, refs)?,
			BlockKind::GuiCheckable => self.gui.load_checkable(header, &mut buf, refs, &self.images)?,
			BlockKind::GuiSlider => self.gui.load_slider(header, &mut buf, refs)?,
			BlockKind::GuiScrollbar => self.gui.load_scrollbar(header, &mut buf, refs, &self.images)?,
			BlockKind::GuiSlopeSelection => {
				self.gui.slope_selection = Some(SlopeSelection::read(header, &mut buf, refs)?);
			},
			BlockKind::MainMenu => {
				self.gui.main_menu = Some(MainMenu::read(header, &mut buf, refs)?);
			},
		}

		Ok(())
	}

	fn decode_external(&mut self, header: &BlockHeader, payload: &[u8], ordinal: u32, refs: &mut FileRefs) -> Result<(), RcdImportError> {
		let mut buf = payload;
		let decoded = match self.decoders.get(&header.tag) {
			Some(decoder) => decoder.decode(header, &mut buf, refs)?,
			None => return Ok(()),
		};
		expect_consumed(header, buf)?;

		match decoded {
			Decoded::Type(game_type) => {
				debug!("Registered {} type '{}'", header.tag, game_type.name());
				self.types.insert(header.tag, game_type);
			},
			Decoded::TrackPiece(piece) => {
				refs.track_pieces.register(ordinal, TrackPieceId(self.track_pieces.len()))?;
				self.track_pieces.push(piece);
			},
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_kind_table() {
		for (tag, kind, version, size) in BLOCK_KINDS.iter() {
			assert_eq!(BlockKind::from_tag(*tag), Some(*kind));
			assert_eq!(kind.tag(), *tag);
			assert_eq!(kind.version(), *version);
			assert_eq!(kind.size(), *size);
		}

		assert_eq!(BlockKind::from_tag(tag!(b"SURF")).map(|k| k.version()), Some(6));
		assert_eq!(BlockKind::from_tag(tag!(b"GSLP")).map(|k| k.version()), Some(11));
		assert_eq!(BlockKind::from_tag(tag!(b"SURF")).map(|k| k.size()), Some(BlockSize::Exact(98)));
		assert_eq!(BlockKind::from_tag(tag!(b"SUPP")).map(|k| k.size()), Some(BlockSize::Exact(146)));
		assert_eq!(BlockKind::from_tag(tag!(b"GSLP")).map(|k| k.size()), Some(BlockSize::Exact(252)));
		assert_eq!(BlockKind::from_tag(tag!(b"8PXL")).map(|k| k.size()), Some(BlockSize::AtLeast(8)));
		assert_eq!(BlockKind::from_tag(INFO), None);
		assert_eq!(BlockKind::from_tag(tag!(b"SHOP")), None);
	}

	#[test]
	fn test_header_gate() {
		let catalog = Catalog::default();
		let header = BlockHeader { tag: tag!(b"TEXT"), version: 3, length: 0 };
		let err = catalog.check_header(Some(BlockKind::Text), &header).unwrap_err();
		assert!(matches!(err, RcdImportError::Version { found: 3, expected: 2, .. }));

		let header = BlockHeader { tag: tag!(b"SURF"), version: 6, length: 0xffff_fff0 };
		let err = catalog.check_header(Some(BlockKind::Surface), &header).unwrap_err();
		assert!(matches!(err, RcdImportError::Size { found: 0xffff_fff0, expected: 98, .. }));

		let header = BlockHeader { tag: tag!(b"ANIM"), version: 4, length: 3 };
		let err = catalog.check_header(Some(BlockKind::Animation), &header).unwrap_err();
		assert!(matches!(err, RcdImportError::Short { found: 3, min: 5, .. }));

		let header = BlockHeader { tag: tag!(b"FSET"), version: 1, length: 0x7fff_ffff };
		assert!(catalog.check_header(Some(BlockKind::FrameSet), &header).is_ok());
	}
}
