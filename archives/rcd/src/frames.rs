use byteorder::{
	LE,
	ReadBytesExt
};

use crate::{
	block::BlockHeader,
	error::RcdImportError,
	refs::{
		FileRefs,
		FrameSetId
	},
	sprites::{
		NUM_VIEWS,
		Sprite
	}
};

/// Sprites of an object spanning `width_x` by `width_y` tiles, per view
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSet {
	pub width: u16,
	pub width_x: u8,
	pub width_y: u8,
	views: [Vec<Sprite>; NUM_VIEWS],
}

impl FrameSet {
	pub const VERSION: u32 = 1;
	/// Width and the footprint in tiles
	pub const BASE_SIZE: u32 = 4;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<FrameSet, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_min_size(FrameSet::BASE_SIZE)?;

		let width = buf.read_u16::<LE>()?;
		let width_x = buf.read_u8()?;
		let width_y = buf.read_u8()?;
		let tiles = width_x as usize * width_y as usize;
		header.expect_size(FrameSet::BASE_SIZE as u64 + 16 * tiles as u64)?;

		let mut views: [Vec<Sprite>; NUM_VIEWS] = Default::default();
		for view in views.iter_mut() {
			for _ in 0..tiles {
				view.push(refs.read_sprite(buf)?);
			}
		}

		Ok(FrameSet {
			width: width,
			width_x: width_x,
			width_y: width_y,
			views: views,
		})
	}

	/// Sprite of tile (`x`, `y`) in `view`
	pub fn sprite(&self, view: usize, x: u8, y: u8) -> Sprite {
		if x >= self.width_x || y >= self.width_y {
			return None;
		}

		let idx = x as usize * self.width_y as usize + y as usize;
		self.views.get(view)?.get(idx).copied().flatten()
	}
}

/// Sequence of frame sets shown for given durations
#[derive(Clone, Debug, PartialEq)]
pub struct TimedAnimation {
	/// Frame durations in milliseconds
	pub durations: Vec<u32>,
	pub frames: Vec<Option<FrameSetId>>,
}

impl TimedAnimation {
	pub const VERSION: u32 = 1;
	/// Frame count
	pub const BASE_SIZE: u32 = 4;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<TimedAnimation, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_min_size(TimedAnimation::BASE_SIZE)?;

		let count = buf.read_u32::<LE>()?;
		header.expect_size(TimedAnimation::BASE_SIZE as u64 + 8 * count as u64)?;

		let mut durations = Vec::with_capacity(count as usize);
		for _ in 0..count {
			durations.push(buf.read_u32::<LE>()?);
		}

		let mut frames = Vec::with_capacity(count as usize);
		for _ in 0..count {
			frames.push(refs.read_frame_set(buf)?);
		}

		Ok(TimedAnimation {
			durations: durations,
			frames: frames,
		})
	}

	/// Time needed to play the animation once, in milliseconds
	pub fn total_duration(&self) -> u64 {
		self.durations.iter().map(|d| *d as u64).sum()
	}

	/// Index of the frame shown `time` milliseconds after the start. Without
	/// `loop_around`, the animation shows nothing once it has finished.
	pub fn frame_at(&self, time: u64, loop_around: bool) -> Option<usize> {
		let total = self.total_duration();
		if total == 0 || (!loop_around && time >= total) {
			return None;
		}

		let mut time = time % total;
		for (i, d) in self.durations.iter().enumerate() {
			if time < *d as u64 {
				return Some(i);
			}
			time -= *d as u64;
		}

		None
	}
}
