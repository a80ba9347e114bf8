use byteorder::{
	LE,
	ReadBytesExt
};

use crate::{
	block::BlockHeader,
	error::RcdImportError,
	image::ImageData,
	refs::{
		FileRefs,
		TextId
	},
	sprites::Sprite
};

/// Sprites of a widget border: corners, edges and centre
pub const BORDER_SPRITES: usize = 9;
/// Sprites of a checkbox or radio button in its states
pub const CHECKABLE_SPRITES: usize = 6;
/// Sprites of a slider bar: both ends, the middle and the button
pub const SLIDER_SPRITES: usize = 4;
/// Sprites of a scrollbar: arrows, bar and slider parts
pub const SCROLLBAR_SPRITES: usize = 10;
pub const TOOLBAR_SPRITES: usize = 8;

fn sprite_size(images: &[ImageData], sprite: Sprite) -> Option<(u16, u16)> {
	sprite
		.and_then(|id| images.get(id.0))
		.map(|image| (image.width, image.height))
}

/// Widget border geometry and sprites
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BorderSprites {
	pub border_top: u8,
	pub border_left: u8,
	pub border_right: u8,
	pub border_bottom: u8,
	pub min_width: u8,
	pub min_height: u8,
	pub hor_stepsize: u8,
	pub vert_stepsize: u8,
	pub normal: [Sprite; BORDER_SPRITES],
	pub pressed: [Sprite; BORDER_SPRITES],
}

impl BorderSprites {
	pub fn is_loaded(&self) -> bool {
		self.min_width != 0 && self.min_height != 0
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckableSprites {
	/// Largest sprite width
	pub width: u16,
	/// Largest sprite height
	pub height: u16,
	pub sprites: [Sprite; CHECKABLE_SPRITES],
}

impl CheckableSprites {
	pub fn is_loaded(&self) -> bool {
		self.width != 0 && self.height != 0
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SliderSprites {
	pub min_bar_length: u8,
	pub stepsize: u8,
	pub height: u8,
	pub normal: [Sprite; SLIDER_SPRITES],
	pub shaded: [Sprite; SLIDER_SPRITES],
}

impl SliderSprites {
	pub fn is_loaded(&self) -> bool {
		self.min_bar_length != 0 && self.height != 0
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollbarSprites {
	pub min_length_all: u8,
	pub stepsize_bar: u8,
	pub min_length_slider: u8,
	pub stepsize_slider: u8,
	/// Thickness of the bar: widest sprite when vertical, tallest otherwise
	pub height: u16,
	pub normal: [Sprite; SCROLLBAR_SPRITES],
	pub shaded: [Sprite; SCROLLBAR_SPRITES],
}

impl ScrollbarSprites {
	pub fn is_loaded(&self) -> bool {
		self.min_length_all != 0 && self.height != 0
	}
}

/// Track-building and toolbar sprites, with the strings of the GUI
#[derive(Clone, Debug, PartialEq)]
pub struct SlopeSelection {
	/// Straight down, steep down, down, flat, up, steep up, straight up
	pub slopes: [Sprite; 7],
	pub bends: [Sprite; 7],
	pub banks: [Sprite; 3],
	pub triangle_left: Sprite,
	pub triangle_right: Sprite,
	pub triangle_up: Sprite,
	pub triangle_down: Sprite,
	pub platform: [Sprite; 2],
	pub power: [Sprite; 2],
	pub disabled: Sprite,
	pub compass: [Sprite; 4],
	pub bulldozer: Sprite,
	pub weather: [Sprite; 5],
	/// Red, orange and green lights
	pub lights_rog: [Sprite; 4],
	/// Red and green lights
	pub lights_rg: [Sprite; 3],
	pub rot_2d_pos: Sprite,
	pub rot_2d_neg: Sprite,
	pub rot_3d_pos: Sprite,
	pub rot_3d_neg: Sprite,
	pub close: Sprite,
	pub dot: Sprite,
	pub message_goto: Sprite,
	pub message_park: Sprite,
	pub message_guest: Sprite,
	pub message_ride: Sprite,
	pub message_ride_type: Sprite,
	pub toolbar: [Sprite; TOOLBAR_SPRITES],
	pub text: Option<TextId>,
}

impl SlopeSelection {
	pub const VERSION: u32 = 11;
	const SPRITE_COUNT: u64 = 7 + 7 + 3 + 4 + 2 + 2 + 1 + 4 + 1 + 5 + 4 + 3 + 4 + 2 + 5 + TOOLBAR_SPRITES as u64;
	pub const SIZE: u64 = 4 * SlopeSelection::SPRITE_COUNT + 4;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<SlopeSelection, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(SlopeSelection::SIZE)?;

		Ok(SlopeSelection {
			slopes: refs.read_sprites(buf)?,
			bends: refs.read_sprites(buf)?,
			banks: refs.read_sprites(buf)?,
			triangle_left: refs.read_sprite(buf)?,
			triangle_right: refs.read_sprite(buf)?,
			triangle_up: refs.read_sprite(buf)?,
			triangle_down: refs.read_sprite(buf)?,
			platform: refs.read_sprites(buf)?,
			power: refs.read_sprites(buf)?,
			disabled: refs.read_sprite(buf)?,
			compass: refs.read_sprites(buf)?,
			bulldozer: refs.read_sprite(buf)?,
			weather: refs.read_sprites(buf)?,
			lights_rog: refs.read_sprites(buf)?,
			lights_rg: refs.read_sprites(buf)?,
			rot_2d_pos: refs.read_sprite(buf)?,
			rot_2d_neg: refs.read_sprite(buf)?,
			rot_3d_pos: refs.read_sprite(buf)?,
			rot_3d_neg: refs.read_sprite(buf)?,
			close: refs.read_sprite(buf)?,
			dot: refs.read_sprite(buf)?,
			message_goto: refs.read_sprite(buf)?,
			message_park: refs.read_sprite(buf)?,
			message_guest: refs.read_sprite(buf)?,
			message_ride: refs.read_sprite(buf)?,
			message_ride_type: refs.read_sprite(buf)?,
			toolbar: refs.read_sprites(buf)?,
			text: refs.read_text(buf)?,
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MainMenu {
	/// Splash screen display time in milliseconds
	pub splash_duration: u32,
	pub logo: Sprite,
	pub splash: Sprite,
	pub new_game: Sprite,
	pub load: Sprite,
	pub settings: Sprite,
	pub quit: Sprite,
}

impl MainMenu {
	pub const VERSION: u32 = 1;
	pub const SIZE: u64 = 4 + 4 * 6;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<MainMenu, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(MainMenu::SIZE)?;

		Ok(MainMenu {
			splash_duration: buf.read_u32::<LE>()?,
			logo: refs.read_sprite(buf)?,
			splash: refs.read_sprite(buf)?,
			new_game: refs.read_sprite(buf)?,
			load: refs.read_sprite(buf)?,
			settings: refs.read_sprite(buf)?,
			quit: refs.read_sprite(buf)?,
		})
	}
}

/// Sprites of the GUI, shared by all tile widths
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GuiSprites {
	pub titlebar: BorderSprites,
	pub button: BorderSprites,
	pub left_tabbar: BorderSprites,
	pub tab_tabbar: BorderSprites,
	pub right_tabbar: BorderSprites,
	pub tabbar_panel: BorderSprites,
	pub panel: BorderSprites,
	pub checkbox: CheckableSprites,
	pub radio_button: CheckableSprites,
	pub hor_slider: SliderSprites,
	pub vert_slider: SliderSprites,
	pub hor_scroll: ScrollbarSprites,
	pub vert_scroll: ScrollbarSprites,
	pub slope_selection: Option<SlopeSelection>,
	pub main_menu: Option<MainMenu>,
}

impl GuiSprites {
	pub const BORDER_VERSION: u32 = 2;
	pub const CHECKABLE_VERSION: u32 = 1;
	pub const SLIDER_VERSION: u32 = 1;
	pub const SCROLLBAR_VERSION: u32 = 1;

	pub const BORDER_SIZE: u64 = 2 + 8 + 4 * BORDER_SPRITES as u64;
	pub const CHECKABLE_SIZE: u64 = 2 + 4 * CHECKABLE_SPRITES as u64;
	pub const SLIDER_SIZE: u64 = 3 + 2 + 4 * SLIDER_SPRITES as u64;
	pub const SCROLLBAR_SIZE: u64 = 4 + 2 + 4 * SCROLLBAR_SPRITES as u64;

	/// Loads a `GBOR` block.
	pub fn load_border<R>(&mut self, header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<(), RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(GuiSprites::BORDER_SIZE)?;

		let code = buf.read_u16::<LE>()?;
		let mut geometry = [0; 8];
		buf.read_exact(&mut geometry)?;
		let sprites = refs.read_sprites(buf)?;

		let (border, pressed) = match code {
			1 => (&mut self.left_tabbar, false),
			2 => (&mut self.tab_tabbar, true),
			3 => (&mut self.tab_tabbar, false),
			4 => (&mut self.right_tabbar, false),
			5 => (&mut self.tabbar_panel, false),
			6 => (&mut self.titlebar, false),
			7 => (&mut self.button, false),
			8 => (&mut self.button, true),
			9 => (&mut self.panel, false),
			_ => return Err(RcdImportError::WidgetType { tag: header.tag, code: code }),
		};

		border.border_top = geometry[0];
		border.border_left = geometry[1];
		border.border_right = geometry[2];
		border.border_bottom = geometry[3];
		border.min_width = geometry[4];
		border.min_height = geometry[5];
		border.hor_stepsize = geometry[6];
		border.vert_stepsize = geometry[7];
		if pressed {
			border.pressed = sprites;
		} else {
			border.normal = sprites;
		}

		Ok(())
	}

	/// Loads a `GCHK` block. Widget size is taken from the sprites.
	pub fn load_checkable<R>(&mut self, header: &BlockHeader, buf: &mut R, refs: &FileRefs, images: &[ImageData]) -> Result<(), RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(GuiSprites::CHECKABLE_SIZE)?;

		let code = buf.read_u16::<LE>()?;
		let sprites: [Sprite; CHECKABLE_SPRITES] = refs.read_sprites(buf)?;

		let target = match code {
			96 => &mut self.checkbox,
			112 => &mut self.radio_button,
			_ => return Err(RcdImportError::WidgetType { tag: header.tag, code: code }),
		};

		let (mut width, mut height) = (0, 0);
		for (w, h) in sprites.iter().filter_map(|s| sprite_size(images, *s)) {
			width = width.max(w);
			height = height.max(h);
		}

		*target = CheckableSprites {
			width: width,
			height: height,
			sprites: sprites,
		};
		Ok(())
	}

	/// Loads a `GSLI` block.
	pub fn load_slider<R>(&mut self, header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<(), RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(GuiSprites::SLIDER_SIZE)?;

		let min_bar_length = buf.read_u8()?;
		let stepsize = buf.read_u8()?;
		let height = buf.read_u8()?;
		let code = buf.read_u16::<LE>()?;
		let sprites = refs.read_sprites(buf)?;

		let (slider, shaded) = match code {
			128 => (&mut self.hor_slider, false),
			129 => (&mut self.hor_slider, true),
			144 => (&mut self.vert_slider, false),
			145 => (&mut self.vert_slider, true),
			_ => return Err(RcdImportError::WidgetType { tag: header.tag, code: code }),
		};

		slider.min_bar_length = min_bar_length;
		slider.stepsize = stepsize;
		slider.height = height;
		if shaded {
			slider.shaded = sprites;
		} else {
			slider.normal = sprites;
		}

		Ok(())
	}

	/// Loads a `GSCL` block. Bar thickness is taken from the sprites.
	pub fn load_scrollbar<R>(&mut self, header: &BlockHeader, buf: &mut R, refs: &FileRefs, images: &[ImageData]) -> Result<(), RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_size(GuiSprites::SCROLLBAR_SIZE)?;

		let mut lengths = [0; 4];
		buf.read_exact(&mut lengths)?;
		let code = buf.read_u16::<LE>()?;
		let sprites: [Sprite; SCROLLBAR_SPRITES] = refs.read_sprites(buf)?;

		let (scroll, shaded, vertical) = match code {
			160 => (&mut self.hor_scroll, false, false),
			161 => (&mut self.hor_scroll, true, false),
			176 => (&mut self.vert_scroll, false, true),
			177 => (&mut self.vert_scroll, true, true),
			_ => return Err(RcdImportError::WidgetType { tag: header.tag, code: code }),
		};

		let (mut max_width, mut max_height) = (0, 0);
		for (w, h) in sprites.iter().filter_map(|s| sprite_size(images, *s)) {
			max_width = max_width.max(w);
			max_height = max_height.max(h);
		}

		scroll.min_length_all = lengths[0];
		scroll.stepsize_bar = lengths[1];
		scroll.min_length_slider = lengths[2];
		scroll.stepsize_slider = lengths[3];
		scroll.height = if vertical { max_width } else { max_height };
		if shaded {
			scroll.shaded = sprites;
		} else {
			scroll.normal = sprites;
		}

		Ok(())
	}

	/// Whether enough is loaded to show a window with an error message
	pub fn has_sufficient_graphics(&self) -> bool {
		self.titlebar.is_loaded()
			&& self.button.is_loaded()
			&& self.left_tabbar.is_loaded()
			&& self.tab_tabbar.is_loaded()
			&& self.right_tabbar.is_loaded()
			&& self.tabbar_panel.is_loaded()
			&& self.panel.is_loaded()
			&& self.checkbox.is_loaded()
			&& self.radio_button.is_loaded()
			&& self.hor_scroll.is_loaded()
			&& self.vert_scroll.is_loaded()
			&& self.slope_selection.as_ref().map_or(false, |s| s.close.is_some())
	}
}

#[cfg(test)]
mod tests {
	use pk_core::Tag;

	use crate::{
		image::PixelFormat,
		refs::SpriteId
	};

	use super::*;

	fn header(tag: &[u8; 4], version: u32, data: &[u8]) -> BlockHeader {
		BlockHeader { tag: Tag(*tag), version: version, length: data.len() as u32 }
	}

	fn image(width: u16, height: u16) -> ImageData {
		ImageData {
			format: PixelFormat::Rgba,
			width: width,
			height: height,
			x_offset: 0,
			y_offset: 0,
			pixels: vec![],
		}
	}

	fn refs(count: u32) -> FileRefs {
		let mut refs = FileRefs::new();
		for id in 1..=count {
			refs.sprites.register(id, SpriteId(id as usize - 1)).unwrap();
		}
		refs
	}

	fn block(prefix: &[u8], sprite_refs: &[u32]) -> Vec<u8> {
		let mut out = prefix.to_vec();
		for r in sprite_refs.iter() {
			out.extend_from_slice(&r.to_le_bytes());
		}
		out
	}

	#[test]
	fn test_border() {
		let mut gui = GuiSprites::default();
		let data = block(b"\x08\x00\x01\x02\x03\x04\x05\x06\x07\x08", &[1; BORDER_SPRITES]);
		gui.load_border(&header(b"GBOR", 2, &data), &mut &data[..], &refs(1)).unwrap();

		assert_eq!(gui.button.pressed, [Some(SpriteId(0)); BORDER_SPRITES]);
		assert_eq!(gui.button.normal, [None; BORDER_SPRITES]);
		assert_eq!((gui.button.min_width, gui.button.vert_stepsize), (5, 8));
		assert!(gui.button.is_loaded());
		assert!(!gui.panel.is_loaded());

		let data = block(b"\x0a\x00\x01\x02\x03\x04\x05\x06\x07\x08", &[0; BORDER_SPRITES]);
		assert!(matches!(gui.load_border(&header(b"GBOR", 2, &data), &mut &data[..], &refs(0)),
			Err(RcdImportError::WidgetType { code: 10, .. })));
	}

	#[test]
	fn test_checkable_size() {
		let images = vec![image(10, 4), image(7, 12)];
		let mut gui = GuiSprites::default();
		let data = block(b"\x70\x00", &[1, 0, 2, 0, 0, 0]);
		gui.load_checkable(&header(b"GCHK", 1, &data), &mut &data[..], &refs(2), &images).unwrap();

		assert_eq!((gui.radio_button.width, gui.radio_button.height), (10, 12));
		assert!(gui.radio_button.is_loaded());
		assert!(!gui.checkbox.is_loaded());
	}

	#[test]
	fn test_slider() {
		let mut gui = GuiSprites::default();
		let data = block(b"\x10\x02\x08\x91\x00", &[0; SLIDER_SPRITES]);
		gui.load_slider(&header(b"GSLI", 1, &data), &mut &data[..], &FileRefs::new()).unwrap();
		assert_eq!((gui.vert_slider.min_bar_length, gui.vert_slider.stepsize, gui.vert_slider.height), (16, 2, 8));
		assert!(gui.vert_slider.is_loaded());
	}

	#[test]
	fn test_scrollbar_height() {
		let images = vec![image(9, 3), image(5, 14)];
		let mut gui = GuiSprites::default();
		let mut sprite_refs = [0; SCROLLBAR_SPRITES];
		sprite_refs[0] = 1;
		sprite_refs[9] = 2;

		let data = block(b"\x01\x02\x03\x04\xb0\x00", &sprite_refs);
		gui.load_scrollbar(&header(b"GSCL", 1, &data), &mut &data[..], &refs(2), &images).unwrap();
		assert_eq!(gui.vert_scroll.height, 9);

		let data = block(b"\x01\x02\x03\x04\xa1\x00", &sprite_refs);
		gui.load_scrollbar(&header(b"GSCL", 1, &data), &mut &data[..], &refs(2), &images).unwrap();
		assert_eq!(gui.hor_scroll.height, 14);
		assert_eq!(gui.hor_scroll.shaded[9], Some(SpriteId(1)));
	}

	#[test]
	fn test_slope_selection_size() {
		assert_eq!(4 * SlopeSelection::SPRITE_COUNT + 4, 252);

		let mut data = block(b"", &[0; SlopeSelection::SPRITE_COUNT as usize]);
		data.extend_from_slice(&0u32.to_le_bytes());
		let sel = SlopeSelection::read(&header(b"GSLP", 11, &data), &mut &data[..], &FileRefs::new()).unwrap();
		assert_eq!(sel.text, None);
		assert_eq!(sel.close, None);
	}

	#[test]
	fn test_main_menu() {
		let data = block(b"\xe8\x03\x00\x00", &[0, 1, 0, 0, 0, 1]);
		let menu = MainMenu::read(&header(b"MENU", 1, &data), &mut &data[..], &refs(1)).unwrap();
		assert_eq!(menu.splash_duration, 1000);
		assert_eq!(menu.splash, Some(SpriteId(0)));
		assert_eq!(menu.quit, Some(SpriteId(0)));
		assert_eq!(menu.logo, None);
	}

	#[test]
	fn test_sufficient_graphics() {
		let mut gui = GuiSprites::default();
		assert!(!gui.has_sufficient_graphics());

		let loaded = BorderSprites { min_width: 1, min_height: 1, ..Default::default() };
		gui.titlebar = loaded.clone();
		gui.button = loaded.clone();
		gui.left_tabbar = loaded.clone();
		gui.tab_tabbar = loaded.clone();
		gui.right_tabbar = loaded.clone();
		gui.tabbar_panel = loaded.clone();
		gui.panel = loaded;
		gui.checkbox = CheckableSprites { width: 1, height: 1, ..Default::default() };
		gui.radio_button = gui.checkbox.clone();
		gui.hor_scroll = ScrollbarSprites { min_length_all: 1, height: 1, ..Default::default() };
		gui.vert_scroll = gui.hor_scroll.clone();
		assert!(!gui.has_sufficient_graphics());

		let mut data = block(b"", &[1; SlopeSelection::SPRITE_COUNT as usize]);
		data.extend_from_slice(&0u32.to_le_bytes());
		gui.slope_selection = Some(SlopeSelection::read(&header(b"GSLP", 11, &data), &mut &data[..], &refs(1)).unwrap());
		assert!(gui.has_sufficient_graphics());
	}
}
