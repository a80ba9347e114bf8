use byteorder::{
	LE,
	ReadBytesExt
};

use crate::{
	block::BlockHeader,
	error::RcdImportError,
	refs::FileRefs,
	sprites::Sprite
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PersonType {
	Any,
	Guest,
	Handyman,
	Mechanic,
	Guard,
	Entertainer,
}

impl TryFrom<u8> for PersonType {
	type Error = RcdImportError;

	fn try_from(code: u8) -> Result<Self, Self::Error> {
		match code {
			0 => Ok(PersonType::Any),
			8 | 16 => Ok(PersonType::Guest),
			17 => Ok(PersonType::Handyman),
			18 => Ok(PersonType::Mechanic),
			19 => Ok(PersonType::Guard),
			20 => Ok(PersonType::Entertainer),
			_ => Err(RcdImportError::PersonType(code)),
		}
	}
}

/// Kind of person animation, with the direction it is played in
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AnimationType {
	WalkNe = 1,
	WalkSe,
	WalkSw,
	WalkNw,
	MechanicRepairNe,
	MechanicRepairSe,
	MechanicRepairSw,
	MechanicRepairNw,
	HandymanWaterNe,
	HandymanWaterSe,
	HandymanWaterSw,
	HandymanWaterNw,
	HandymanSweepNe,
	HandymanSweepSe,
	HandymanSweepSw,
	HandymanSweepNw,
}

impl TryFrom<u16> for AnimationType {
	type Error = RcdImportError;

	fn try_from(code: u16) -> Result<Self, Self::Error> {
		use AnimationType::*;

		static ALL: [AnimationType; 16] = [
			WalkNe, WalkSe, WalkSw, WalkNw,
			MechanicRepairNe, MechanicRepairSe, MechanicRepairSw, MechanicRepairNw,
			HandymanWaterNe, HandymanWaterSe, HandymanWaterSw, HandymanWaterNw,
			HandymanSweepNe, HandymanSweepSe, HandymanSweepSw, HandymanSweepNw,
		];

		match code {
			1..=16 => Ok(ALL[code as usize - 1]),
			_ => Err(RcdImportError::AnimationType(code)),
		}
	}
}

/// Upper bound (exclusive) on a frame's display time in milliseconds
const MAX_FRAME_DURATION: u16 = 5000;
/// Bound on the movement of a person during one frame, in pixels
const MAX_FRAME_OFFSET: i16 = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AnimationFrame {
	pub duration: u16,
	pub dx: i16,
	pub dy: i16,
}

impl AnimationFrame {
	pub fn read<R>(buf: &mut R) -> Result<AnimationFrame, RcdImportError>
	where
		R: ReadBytesExt,
	{
		let duration = buf.read_u16::<LE>()?;
		if duration == 0 || duration >= MAX_FRAME_DURATION {
			return Err(RcdImportError::FrameDuration(duration));
		}

		let dx = buf.read_i16::<LE>()?;
		if dx < -MAX_FRAME_OFFSET || dx > MAX_FRAME_OFFSET {
			return Err(RcdImportError::FrameOffset(dx));
		}

		let dy = buf.read_i16::<LE>()?;
		if dy < -MAX_FRAME_OFFSET || dy > MAX_FRAME_OFFSET {
			return Err(RcdImportError::FrameOffset(dy));
		}

		Ok(AnimationFrame {
			duration: duration,
			dx: dx,
			dy: dy,
		})
	}
}

/// Timing and movement of a person animation, independent of tile width
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
	pub person: PersonType,
	pub anim: AnimationType,
	pub frames: Vec<AnimationFrame>,
}

impl Animation {
	pub const VERSION: u32 = 4;
	pub const BASE_SIZE: u32 = 1 + 2 + 2;

	pub fn read<R>(header: &BlockHeader, buf: &mut R) -> Result<Animation, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_min_size(Animation::BASE_SIZE)?;

		let person = PersonType::try_from(buf.read_u8()?)?;
		let anim = AnimationType::try_from(buf.read_u16::<LE>()?)?;
		let count = buf.read_u16::<LE>()?;
		header.expect_size(Animation::BASE_SIZE as u64 + 6 * count as u64)?;
		if count == 0 {
			return Err(RcdImportError::FrameCount);
		}

		let mut frames = Vec::with_capacity(count as usize);
		for _ in 0..count {
			frames.push(AnimationFrame::read(buf)?);
		}

		Ok(Animation {
			person: person,
			anim: anim,
			frames: frames,
		})
	}

	pub fn total_duration(&self) -> u32 {
		self.frames.iter().map(|f| f.duration as u32).sum()
	}
}

/// Sprites of a person animation at one tile width
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSprites {
	pub width: u16,
	pub person: PersonType,
	pub anim: AnimationType,
	pub sprites: Vec<Sprite>,
}

impl AnimationSprites {
	pub const VERSION: u32 = 3;
	pub const BASE_SIZE: u32 = 2 + 1 + 2 + 2;

	pub fn read<R>(header: &BlockHeader, buf: &mut R, refs: &FileRefs) -> Result<AnimationSprites, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_min_size(AnimationSprites::BASE_SIZE)?;

		let width = buf.read_u16::<LE>()?;
		let person = PersonType::try_from(buf.read_u8()?)?;
		let anim = AnimationType::try_from(buf.read_u16::<LE>()?)?;
		let count = buf.read_u16::<LE>()?;
		header.expect_size(AnimationSprites::BASE_SIZE as u64 + 4 * count as u64)?;
		if count == 0 {
			return Err(RcdImportError::FrameCount);
		}

		let mut sprites = Vec::with_capacity(count as usize);
		for _ in 0..count {
			sprites.push(refs.read_sprite(buf)?);
		}

		Ok(AnimationSprites {
			width: width,
			person: person,
			anim: anim,
			sprites: sprites,
		})
	}
}
