use std::{
	collections::{
		BTreeMap,
		HashMap
	},
	fmt,
	fs::File,
	io::BufReader,
	path::Path
};

use pk_core::Tag;

use crate::{
	anim::{
		Animation,
		AnimationSprites,
		AnimationType,
		PersonType
	},
	error::RcdImportError,
	frames::{
		FrameSet,
		TimedAnimation
	},
	gui::GuiSprites,
	image::ImageData,
	refs::{
		FrameSetId,
		SpriteId,
		TextId,
		TrackPieceId
	},
	sprites::{
		BuildArrows,
		Fence,
		FenceType,
		Foundation,
		FoundationType,
		GroundType,
		PathDecoration,
		PathSprites,
		PathType,
		Platform,
		Support,
		Surface,
		TileCorners,
		TileSelection
	},
	text::{
		Languages,
		TextData
	},
	types::{
		TrackPiece,
		TypeDecoder,
		TypeRegistry
	}
};

/// Tile width of the only sprite size drawn so far
pub const DEFAULT_TILE_WIDTH: u16 = 64;

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogConfig {
	/// Tile widths sprites may be loaded for; other widths fail the block.
	pub tile_widths: Vec<u16>,
	/// Languages kept from text blocks, by language index
	pub languages: Languages,
}

impl Default for CatalogConfig {
	fn default() -> Self {
		CatalogConfig {
			tile_widths: vec![DEFAULT_TILE_WIDTH],
			languages: Languages::default(),
		}
	}
}

/// Sprites drawn at one tile width. Later blocks replace earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteStore {
	pub width: u16,
	pub surfaces: [Option<Surface>; GroundType::COUNT],
	pub tile_select: Option<TileSelection>,
	pub tile_corners: Option<TileCorners>,
	pub paths: [Option<PathSprites>; PathType::COUNT],
	pub path_decoration: Option<PathDecoration>,
	pub fences: [Option<Fence>; FenceType::COUNT],
	pub foundations: [Option<Foundation>; FoundationType::COUNT],
	pub platform: Option<Platform>,
	pub support: Option<Support>,
	pub build_arrows: Option<BuildArrows>,
	pub animations: Vec<AnimationSprites>,
}

impl SpriteStore {
	pub fn new(width: u16) -> SpriteStore {
		SpriteStore {
			width: width,
			surfaces: Default::default(),
			tile_select: None,
			tile_corners: None,
			paths: Default::default(),
			path_decoration: None,
			fences: Default::default(),
			foundations: Default::default(),
			platform: None,
			support: None,
			build_arrows: None,
			animations: vec![],
		}
	}

	pub fn surface(&self, ground: GroundType) -> Option<&Surface> {
		self.surfaces[ground.index()].as_ref()
	}

	pub fn path(&self, path_type: PathType) -> Option<&PathSprites> {
		self.paths[path_type.index()].as_ref()
	}

	pub fn fence(&self, fence_type: FenceType) -> Option<&Fence> {
		self.fences[fence_type.index()].as_ref()
	}

	pub fn foundation(&self, foundation_type: FoundationType) -> Option<&Foundation> {
		self.foundations[foundation_type.index()].as_ref()
	}

	/// Adds animation sprites, replacing those of the same animation and person.
	pub fn add_animation_sprites(&mut self, sprites: AnimationSprites) {
		self.remove_animations(sprites.anim, sprites.person);
		self.animations.push(sprites);
	}

	pub fn remove_animations(&mut self, anim: AnimationType, person: PersonType) {
		self.animations.retain(|a| !(a.anim == anim && a.person == person));
	}

	pub fn animation_sprites(&self, anim: AnimationType, person: PersonType) -> Option<&AnimationSprites> {
		self.animations.iter().find(|a| a.anim == anim && a.person == person)
	}
}

/// Counts of one loaded container
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadStats {
	pub blocks: u32,
	pub skipped: u32,
}

/// Owner of everything decoded from resource containers.
///
/// Objects are kept in append-only arenas and referred to by index, so ids
/// handed out while loading one file stay valid for the catalog's lifetime.
pub struct Catalog {
	pub(crate) config: CatalogConfig,
	pub(crate) images: Vec<ImageData>,
	pub(crate) texts: Vec<TextData>,
	pub(crate) frame_sets: Vec<FrameSet>,
	pub(crate) timed_animations: Vec<TimedAnimation>,
	pub(crate) track_pieces: Vec<Box<dyn TrackPiece>>,
	pub(crate) animations: Vec<Animation>,
	pub(crate) stores: BTreeMap<u16, SpriteStore>,
	pub(crate) gui: GuiSprites,
	pub(crate) types: TypeRegistry,
	pub(crate) decoders: HashMap<Tag, Box<dyn TypeDecoder>>,
}

impl Default for Catalog {
	fn default() -> Self {
		Catalog::new(CatalogConfig::default())
	}
}

impl fmt::Debug for Catalog {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Catalog")
			.field("config", &self.config)
			.field("images", &self.images.len())
			.field("texts", &self.texts.len())
			.field("frame_sets", &self.frame_sets.len())
			.field("timed_animations", &self.timed_animations.len())
			.field("track_pieces", &self.track_pieces.len())
			.field("animations", &self.animations.len())
			.field("stores", &self.stores.keys().collect::<Vec<_>>())
			.field("types", &self.types.len())
			.field("decoders", &self.decoders.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl Catalog {
	pub fn new(config: CatalogConfig) -> Catalog {
		Catalog {
			config: config,
			images: vec![],
			texts: vec![],
			frame_sets: vec![],
			timed_animations: vec![],
			track_pieces: vec![],
			animations: vec![],
			stores: BTreeMap::new(),
			gui: GuiSprites::default(),
			types: TypeRegistry::new(),
			decoders: HashMap::new(),
		}
	}

	/// Installs the decoder for one game-object type tag, returning the decoder
	/// it replaces.
	pub fn register_decoder(&mut self, decoder: Box<dyn TypeDecoder>) -> Option<Box<dyn TypeDecoder>> {
		self.decoders.insert(decoder.tag(), decoder)
	}

	/// Loads one container file. On failure, blocks before the failing one
	/// stay loaded.
	pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<LoadStats, RcdImportError> {
		let file = File::open(path)?;
		self.load_from(BufReader::new(file))
	}

	pub fn config(&self) -> &CatalogConfig {
		&self.config
	}

	pub fn images(&self) -> &[ImageData] {
		&self.images
	}

	pub fn image(&self, id: SpriteId) -> Option<&ImageData> {
		self.images.get(id.0)
	}

	pub fn texts(&self) -> &[TextData] {
		&self.texts
	}

	pub fn text(&self, id: TextId) -> Option<&TextData> {
		self.texts.get(id.0)
	}

	/// Finds a string by name in any loaded text block, latest first.
	pub fn find_text(&self, name: &str, lang: usize) -> Option<&str> {
		self.texts.iter().rev().find_map(|t| t.lookup(name, lang))
	}

	pub fn frame_set(&self, id: FrameSetId) -> Option<&FrameSet> {
		self.frame_sets.get(id.0)
	}

	pub fn timed_animations(&self) -> &[TimedAnimation] {
		&self.timed_animations
	}

	pub fn track_piece(&self, id: TrackPieceId) -> Option<&dyn TrackPiece> {
		self.track_pieces.get(id.0).map(|p| p.as_ref())
	}

	pub fn track_piece_count(&self) -> usize {
		self.track_pieces.len()
	}

	pub fn animations(&self) -> &[Animation] {
		&self.animations
	}

	pub fn animation(&self, anim: AnimationType, person: PersonType) -> Option<&Animation> {
		self.animations.iter().find(|a| a.anim == anim && a.person == person)
	}

	pub fn store(&self, width: u16) -> Option<&SpriteStore> {
		self.stores.get(&width)
	}

	pub fn stores(&self) -> impl Iterator<Item = &SpriteStore> {
		self.stores.values()
	}

	/// Store of a configured tile width, created on first use
	pub(crate) fn store_mut(&mut self, width: u16) -> Result<&mut SpriteStore, RcdImportError> {
		if !self.config.tile_widths.contains(&width) {
			return Err(RcdImportError::TileWidth(width));
		}

		Ok(self.stores.entry(width).or_insert_with(|| SpriteStore::new(width)))
	}

	pub fn gui(&self) -> &GuiSprites {
		&self.gui
	}

	pub fn types(&self) -> &TypeRegistry {
		&self.types
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_store_widths() {
		let mut catalog = Catalog::new(CatalogConfig { tile_widths: vec![32, 64], ..Default::default() });
		assert!(catalog.store(32).is_none());
		assert_eq!(catalog.store_mut(32).unwrap().width, 32);
		assert!(catalog.store(32).is_some());
		assert!(matches!(catalog.store_mut(128), Err(RcdImportError::TileWidth(128))));
		assert_eq!(catalog.stores().count(), 1);
	}

	#[test]
	fn test_animation_sprites_replace() {
		let mut store = SpriteStore::new(64);
		let sprites = |n| AnimationSprites {
			width: 64,
			person: PersonType::Guest,
			anim: AnimationType::WalkNe,
			sprites: vec![None; n],
		};

		store.add_animation_sprites(sprites(1));
		store.add_animation_sprites(AnimationSprites { person: PersonType::Guard, ..sprites(2) });
		store.add_animation_sprites(sprites(3));
		assert_eq!(store.animations.len(), 2);
		assert_eq!(store.animation_sprites(AnimationType::WalkNe, PersonType::Guest).map(|a| a.sprites.len()), Some(3));

		store.remove_animations(AnimationType::WalkNe, PersonType::Guard);
		assert!(store.animation_sprites(AnimationType::WalkNe, PersonType::Guard).is_none());
	}
}
