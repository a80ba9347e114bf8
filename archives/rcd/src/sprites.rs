use bitflags::bitflags;

use byteorder::{
	LE,
	ReadBytesExt
};

use crate::{
	block::BlockHeader,
	error::RcdImportError,
	refs::{
		FileRefs,
		SpriteId
	}
};

/// Sprites of one tile, one per slope
pub const NUM_SLOPE_SPRITES: usize = 23;
/// Viewing orientations
pub const NUM_VIEWS: usize = 4;
/// Tile edges: north-east, south-east, south-west, north-west
pub const NUM_EDGES: usize = 4;
/// Path sprites: every combination of flat edges and corners, plus ramps
pub const PATH_COUNT: usize = 47;
pub const FENCE_COUNT: usize = 16;
pub const FOUNDATION_COUNT: usize = 6;
pub const SUPPORT_COUNT: usize = 35;
/// Variants of litter or vomit on a path tile
pub const DEBRIS_VARIANTS: usize = 4;

pub type Sprite = Option<SpriteId>;

/// Number of leading loaded sprites
fn leading(sprites: &[Sprite]) -> usize {
	sprites.iter().take_while(|s| s.is_some()).count()
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GroundType {
	Grass0,
	Grass1,
	Grass2,
	Grass3,
	Underground,
	Desert,
	CursorTest,
	CursorEdgeTest,
}

impl GroundType {
	pub const COUNT: usize = 8;

	pub fn index(self) -> usize {
		self as usize
	}
}

impl TryFrom<u16> for GroundType {
	type Error = RcdImportError;

	fn try_from(code: u16) -> Result<Self, Self::Error> {
		match code {
			16 => Ok(GroundType::Grass0),
			17 => Ok(GroundType::Grass1),
			18 => Ok(GroundType::Grass2),
			19 => Ok(GroundType::Grass3),
			20 => Ok(GroundType::Underground),
			32 => Ok(GroundType::Desert),
			48 => Ok(GroundType::CursorTest),
			49 => Ok(GroundType::CursorEdgeTest),
			_ => Err(RcdImportError::GroundType(code)),
		}
	}
}

/// Sprites of one ground type
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
	pub ground: GroundType,
	pub width: u16,
	pub sprites: [Sprite; NUM_SLOPE_SPRITES],
}

impl Surface {
	pub const VERSION: u32 = 6;
	pub const SIZE: u64 = 2 + 2 + 2 + 4 * NUM_SLOPE_SPRITES as u64;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<Surface, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(Surface::SIZE)?;

		let ground = GroundType::try_from(buf.read_u16::<LE>()?)?;
		let width = buf.read_u16::<LE>()?;
		let _height = buf.read_u16::<LE>()?;

		Ok(Surface {
			ground: ground,
			width: width,
			sprites: refs.read_sprites(buf)?,
		})
	}

	pub fn has_all_sprites(&self) -> bool {
		self.sprites.iter().all(Option::is_some)
	}
}

/// Cursor sprites highlighting a selected tile
#[derive(Clone, Debug, PartialEq)]
pub struct TileSelection {
	pub width: u16,
	pub sprites: [Sprite; NUM_SLOPE_SPRITES],
}

impl TileSelection {
	pub const VERSION: u32 = 2;
	pub const SIZE: u64 = 2 + 2 + 4 * NUM_SLOPE_SPRITES as u64;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<TileSelection, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(TileSelection::SIZE)?;

		let width = buf.read_u16::<LE>()?;
		let _height = buf.read_u16::<LE>()?;

		Ok(TileSelection {
			width: width,
			sprites: refs.read_sprites(buf)?,
		})
	}
}

/// Cursor sprites highlighting one corner of a tile, per view
#[derive(Clone, Debug, PartialEq)]
pub struct TileCorners {
	pub width: u16,
	pub sprites: [[Sprite; NUM_SLOPE_SPRITES]; NUM_VIEWS],
}

impl TileCorners {
	pub const VERSION: u32 = 2;
	pub const SIZE: u64 = 2 + 2 + 4 * (NUM_VIEWS * NUM_SLOPE_SPRITES) as u64;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<TileCorners, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(TileCorners::SIZE)?;

		let width = buf.read_u16::<LE>()?;
		let _height = buf.read_u16::<LE>()?;

		let mut sprites = [[None; NUM_SLOPE_SPRITES]; NUM_VIEWS];
		for view in sprites.iter_mut() {
			*view = refs.read_sprites(buf)?;
		}

		Ok(TileCorners {
			width: width,
			sprites: sprites,
		})
	}
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PathType {
	Wood,
	Tiled,
	Asphalt,
	Concrete,
}

impl PathType {
	pub const COUNT: usize = 4;

	pub fn index(self) -> usize {
		self as usize
	}
}

impl TryFrom<u16> for PathType {
	type Error = RcdImportError;

	fn try_from(code: u16) -> Result<Self, Self::Error> {
		match code {
			4 => Ok(PathType::Wood),
			8 => Ok(PathType::Tiled),
			12 => Ok(PathType::Asphalt),
			16 => Ok(PathType::Concrete),
			_ => Err(RcdImportError::PathType(code)),
		}
	}
}

bitflags! {
	/// Flag bits of a stored path type code
	pub struct PathFlags: u16 {
		const QUEUE = 0x8000;
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathStatus {
	Normal,
	Queue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathSprites {
	pub path_type: PathType,
	pub status: PathStatus,
	pub width: u16,
	pub sprites: [Sprite; PATH_COUNT],
}

impl PathSprites {
	pub const VERSION: u32 = 3;
	pub const SIZE: u64 = 2 + 2 + 2 + 4 * PATH_COUNT as u64;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<PathSprites, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(PathSprites::SIZE)?;

		let raw = buf.read_u16::<LE>()?;
		let flags = PathFlags::from_bits_truncate(raw);
		let path_type = PathType::try_from(raw & !PathFlags::all().bits())?;
		let width = buf.read_u16::<LE>()?;
		let _height = buf.read_u16::<LE>()?;

		Ok(PathSprites {
			path_type: path_type,
			status: if flags.contains(PathFlags::QUEUE) { PathStatus::Queue } else { PathStatus::Normal },
			width: width,
			sprites: refs.read_sprites(buf)?,
		})
	}
}

/// Litter bins, lamps and benches along path edges, and path debris
#[derive(Clone, Debug, PartialEq)]
pub struct PathDecoration {
	pub width: u16,
	pub litter_bin: [Sprite; NUM_EDGES],
	pub overflow_bin: [Sprite; NUM_EDGES],
	pub demolished_bin: [Sprite; NUM_EDGES],
	pub lamp_post: [Sprite; NUM_EDGES],
	pub demolished_lamp: [Sprite; NUM_EDGES],
	pub bench: [Sprite; NUM_EDGES],
	pub demolished_bench: [Sprite; NUM_EDGES],
	pub flat_litter: [Sprite; DEBRIS_VARIANTS],
	/// Litter on a ramp, by edge at the low end
	pub ramp_litter: [[Sprite; DEBRIS_VARIANTS]; NUM_EDGES],
	pub flat_vomit: [Sprite; DEBRIS_VARIANTS],
	pub ramp_vomit: [[Sprite; DEBRIS_VARIANTS]; NUM_EDGES],
}

impl PathDecoration {
	pub const VERSION: u32 = 1;
	/// Width, the seven edge sets and the debris sets
	pub const SIZE: u64 = 2 + (7 * NUM_EDGES * 4) as u64 + (2 * (1 + NUM_EDGES) * DEBRIS_VARIANTS * 4) as u64;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<PathDecoration, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(PathDecoration::SIZE)?;

		let width = buf.read_u16::<LE>()?;
		let litter_bin = refs.read_sprites(buf)?;
		let overflow_bin = refs.read_sprites(buf)?;
		let demolished_bin = refs.read_sprites(buf)?;
		let lamp_post = refs.read_sprites(buf)?;
		let demolished_lamp = refs.read_sprites(buf)?;
		let bench = refs.read_sprites(buf)?;
		let demolished_bench = refs.read_sprites(buf)?;

		let flat_litter = refs.read_sprites(buf)?;
		let mut ramp_litter = [[None; DEBRIS_VARIANTS]; NUM_EDGES];
		for edge in ramp_litter.iter_mut() {
			*edge = refs.read_sprites(buf)?;
		}

		let flat_vomit = refs.read_sprites(buf)?;
		let mut ramp_vomit = [[None; DEBRIS_VARIANTS]; NUM_EDGES];
		for edge in ramp_vomit.iter_mut() {
			*edge = refs.read_sprites(buf)?;
		}

		Ok(PathDecoration {
			width: width,
			litter_bin: litter_bin,
			overflow_bin: overflow_bin,
			demolished_bin: demolished_bin,
			lamp_post: lamp_post,
			demolished_lamp: demolished_lamp,
			bench: bench,
			demolished_bench: demolished_bench,
			flat_litter: flat_litter,
			ramp_litter: ramp_litter,
			flat_vomit: flat_vomit,
			ramp_vomit: ramp_vomit,
		})
	}

	/// Usable flat litter variants: those before the first missing sprite.
	pub fn flat_litter_count(&self) -> usize {
		leading(&self.flat_litter)
	}

	pub fn ramp_litter_count(&self, edge: usize) -> usize {
		self.ramp_litter.get(edge).map_or(0, |s| leading(s))
	}

	pub fn flat_vomit_count(&self) -> usize {
		leading(&self.flat_vomit)
	}

	pub fn ramp_vomit_count(&self, edge: usize) -> usize {
		self.ramp_vomit.get(edge).map_or(0, |s| leading(s))
	}
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FenceType {
	LandBorder,
	Wood,
	ConiferHedge,
	Brick,
	Iron,
}

impl FenceType {
	pub const COUNT: usize = 5;

	pub fn index(self) -> usize {
		self as usize
	}
}

impl TryFrom<u16> for FenceType {
	type Error = RcdImportError;

	fn try_from(code: u16) -> Result<Self, Self::Error> {
		match code {
			0 => Ok(FenceType::LandBorder),
			1 => Ok(FenceType::Wood),
			2 => Ok(FenceType::ConiferHedge),
			3 => Ok(FenceType::Brick),
			4 => Ok(FenceType::Iron),
			_ => Err(RcdImportError::FenceType(code)),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fence {
	pub width: u16,
	pub fence_type: FenceType,
	pub sprites: [Sprite; FENCE_COUNT],
}

impl Fence {
	pub const VERSION: u32 = 2;
	pub const SIZE: u64 = 2 + 2 + 4 * FENCE_COUNT as u64;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<Fence, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(Fence::SIZE)?;

		let width = buf.read_u16::<LE>()?;
		let fence_type = FenceType::try_from(buf.read_u16::<LE>()?)?;

		Ok(Fence {
			width: width,
			fence_type: fence_type,
			sprites: refs.read_sprites(buf)?,
		})
	}
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FoundationType {
	Ground,
	Wood,
	Brick,
}

impl FoundationType {
	pub const COUNT: usize = 3;

	pub fn index(self) -> usize {
		self as usize
	}
}

impl TryFrom<u16> for FoundationType {
	type Error = RcdImportError;

	fn try_from(code: u16) -> Result<Self, Self::Error> {
		match code {
			16 => Ok(FoundationType::Ground),
			32 => Ok(FoundationType::Wood),
			48 => Ok(FoundationType::Brick),
			_ => Err(RcdImportError::FoundationType(code)),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Foundation {
	pub foundation_type: FoundationType,
	pub width: u16,
	pub sprites: [Sprite; FOUNDATION_COUNT],
}

impl Foundation {
	pub const VERSION: u32 = 1;
	pub const SIZE: u64 = 2 + 2 + 2 + 4 * FOUNDATION_COUNT as u64;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<Foundation, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(Foundation::SIZE)?;

		let foundation_type = FoundationType::try_from(buf.read_u16::<LE>()?)?;
		let width = buf.read_u16::<LE>()?;
		let _height = buf.read_u16::<LE>()?;

		Ok(Foundation {
			foundation_type: foundation_type,
			width: width,
			sprites: refs.read_sprites(buf)?,
		})
	}
}

/// Only wooden platforms and supports exist.
const WOOD: u16 = 16;

/// Raised path platform
#[derive(Clone, Debug, PartialEq)]
pub struct Platform {
	pub width: u16,
	pub flat: [Sprite; 2],
	pub ramp: [Sprite; 4],
	pub right_ramp: [Sprite; 4],
	pub left_ramp: [Sprite; 4],
}

impl Platform {
	pub const VERSION: u32 = 2;
	pub const SIZE: u64 = 2 + 2 + 2 + 2 * 4 + 12 * 4;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<Platform, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(Platform::SIZE)?;

		let width = buf.read_u16::<LE>()?;
		let _height = buf.read_u16::<LE>()?;
		let platform_type = buf.read_u16::<LE>()?;
		if platform_type != WOOD {
			return Err(RcdImportError::PlatformType(platform_type));
		}

		Ok(Platform {
			width: width,
			flat: refs.read_sprites(buf)?,
			ramp: refs.read_sprites(buf)?,
			right_ramp: refs.read_sprites(buf)?,
			left_ramp: refs.read_sprites(buf)?,
		})
	}
}

/// Supports holding up raised paths and tracks
#[derive(Clone, Debug, PartialEq)]
pub struct Support {
	pub width: u16,
	pub sprites: [Sprite; SUPPORT_COUNT],
}

impl Support {
	pub const VERSION: u32 = 1;
	pub const SIZE: u64 = 2 + 2 + 2 + 4 * SUPPORT_COUNT as u64;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<Support, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(Support::SIZE)?;

		let support_type = buf.read_u16::<LE>()?;
		if support_type != WOOD {
			return Err(RcdImportError::SupportType(support_type));
		}
		let width = buf.read_u16::<LE>()?;
		let _height = buf.read_u16::<LE>()?;

		Ok(Support {
			width: width,
			sprites: refs.read_sprites(buf)?,
		})
	}
}

/// Arrows showing the build direction, one per edge
#[derive(Clone, Debug, PartialEq)]
pub struct BuildArrows {
	pub width: u16,
	pub sprites: [Sprite; NUM_EDGES],
}

impl BuildArrows {
	pub const VERSION: u32 = 1;
	pub const SIZE: u64 = 2 + 4 * NUM_EDGES as u64;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<BuildArrows, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(BuildArrows::SIZE)?;

		Ok(BuildArrows {
			width: buf.read_u16::<LE>()?,
			sprites: refs.read_sprites(buf)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn refs_with(ids: &[u32]) -> FileRefs {
		let mut refs = FileRefs::new();
		for (i, id) in ids.iter().enumerate() {
			refs.sprites.register(*id, SpriteId(i)).unwrap();
		}
		refs
	}

	fn payload(fields: &[u16], sprite_refs: &[u32]) -> Vec<u8> {
		let mut out = vec![];
		for f in fields.iter() {
			out.extend_from_slice(&f.to_le_bytes());
		}
		for r in sprite_refs.iter() {
			out.extend_from_slice(&r.to_le_bytes());
		}
		out
	}

	fn header(tag: [u8; 4], version: u32, data: &[u8]) -> BlockHeader {
		BlockHeader { tag: pk_core::Tag(tag), version: version, length: data.len() as u32 }
	}

	#[test]
	fn test_surface() {
		let refs = refs_with(&[1, 2]);
		let mut sprite_refs = [1; NUM_SLOPE_SPRITES];
		sprite_refs[22] = 2;
		let data = payload(&[32, 64, 16], &sprite_refs);

		let surf = Surface::read(&header(*b"SURF", 6, &data), &mut &data[..], &refs).unwrap();
		assert_eq!(surf.ground, GroundType::Desert);
		assert_eq!(surf.width, 64);
		assert_eq!(surf.sprites[0], Some(SpriteId(0)));
		assert_eq!(surf.sprites[22], Some(SpriteId(1)));
		assert!(surf.has_all_sprites());
	}

	#[test]
	fn test_unknown_ground_type() {
		let refs = FileRefs::new();
		let data = payload(&[99, 64, 16], &[0; NUM_SLOPE_SPRITES]);
		let err = Surface::read(&header(*b"SURF", 6, &data), &mut &data[..], &refs).unwrap_err();
		assert!(matches!(err, RcdImportError::GroundType(99)));
		assert_eq!(err.to_string(), "Unknown ground type: 99");
	}

	#[test]
	fn test_surface_size() {
		let refs = FileRefs::new();
		let data = payload(&[16, 64, 16], &[0; NUM_SLOPE_SPRITES - 1]);
		assert!(matches!(Surface::read(&header(*b"SURF", 6, &data), &mut &data[..], &refs),
			Err(RcdImportError::Size { found: 94, expected: 98, .. })));
	}

	#[test]
	fn test_queue_path() {
		let refs = FileRefs::new();
		let data = payload(&[0x8000 | 12, 64, 16], &[0; PATH_COUNT]);
		let path = PathSprites::read(&header(*b"PATH", 3, &data), &mut &data[..], &refs).unwrap();
		assert_eq!(path.path_type, PathType::Asphalt);
		assert_eq!(path.status, PathStatus::Queue);

		let data = payload(&[4, 64, 16], &[0; PATH_COUNT]);
		let path = PathSprites::read(&header(*b"PATH", 3, &data), &mut &data[..], &refs).unwrap();
		assert_eq!(path.path_type, PathType::Wood);
		assert_eq!(path.status, PathStatus::Normal);

		let data = payload(&[0x8000 | 5, 64, 16], &[0; PATH_COUNT]);
		assert!(matches!(PathSprites::read(&header(*b"PATH", 3, &data), &mut &data[..], &refs),
			Err(RcdImportError::PathType(5))));
	}

	#[test]
	fn test_path_decoration_counts() {
		let refs = refs_with(&[7]);
		let mut sprite_refs = vec![0; 7 * NUM_EDGES];
		// Flat litter: two variants, then a gap.
		sprite_refs.extend_from_slice(&[7, 7, 0, 7]);
		sprite_refs.extend_from_slice(&[7; NUM_EDGES * DEBRIS_VARIANTS]);
		sprite_refs.extend_from_slice(&[0, 7, 7, 7]);
		sprite_refs.extend_from_slice(&[0; NUM_EDGES * DEBRIS_VARIANTS]);
		let data = payload(&[64], &sprite_refs);
		assert_eq!(data.len(), 274);

		let pdec = PathDecoration::read(&header(*b"PDEC", 1, &data), &mut &data[..], &refs).unwrap();
		assert_eq!(pdec.flat_litter_count(), 2);
		assert_eq!(pdec.ramp_litter_count(3), 4);
		assert_eq!(pdec.flat_vomit_count(), 0);
		assert_eq!(pdec.ramp_vomit_count(0), 0);
		assert_eq!(pdec.ramp_vomit_count(9), 0);
	}

	#[test]
	fn test_fence_type() {
		let refs = FileRefs::new();
		let data = payload(&[64, 3], &[0; FENCE_COUNT]);
		let fence = Fence::read(&header(*b"FENC", 2, &data), &mut &data[..], &refs).unwrap();
		assert_eq!(fence.fence_type, FenceType::Brick);

		let data = payload(&[64, FenceType::COUNT as u16], &[0; FENCE_COUNT]);
		assert!(matches!(Fence::read(&header(*b"FENC", 2, &data), &mut &data[..], &refs),
			Err(RcdImportError::FenceType(5))));
	}

	#[test]
	fn test_platform_and_support_types() {
		let refs = FileRefs::new();
		let data = payload(&[64, 16, 32], &[0; 14]);
		assert!(matches!(Platform::read(&header(*b"PLAT", 2, &data), &mut &data[..], &refs),
			Err(RcdImportError::PlatformType(32))));

		let data = payload(&[17, 64, 16], &[0; SUPPORT_COUNT]);
		assert!(matches!(Support::read(&header(*b"SUPP", 1, &data), &mut &data[..], &refs),
			Err(RcdImportError::SupportType(17))));

		let data = payload(&[48, 64, 16], &[0; FOUNDATION_COUNT]);
		let fund = Foundation::read(&header(*b"FUND", 1, &data), &mut &data[..], &refs).unwrap();
		assert_eq!(fund.foundation_type, FoundationType::Brick);
	}

	#[test]
	fn test_forward_reference() {
		let refs = refs_with(&[1]);
		let data = payload(&[64], &[1, 0, 2, 0]);
		let err = BuildArrows::read(&header(*b"BDIR", 1, &data), &mut &data[..], &refs).unwrap_err();
		assert!(matches!(err, RcdImportError::Reference { .. }));
	}
}
