use byteorder::{
	LE,
	ReadBytesExt
};

use pk_core::{
	io_ext::ReadBinExt,
	tag,
	Tag
};

use crate::{
	block::BlockHeader,
	error::RcdImportError
};

pub const PALETTED_TAG: Tag = tag!(b"8PXL");
pub const PALETTED_VERSION: u32 = 2;
pub const RGBA_TAG: Tag = tag!(b"32PX");
pub const RGBA_VERSION: u32 = 1;

/// Size of the image geometry preceding the pixel stream
pub const GEOMETRY_SIZE: u32 = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PixelFormat {
	/// 8 bit palette indices
	Paletted,
	/// 32 bit colour with alpha
	Rgba,
}

impl PixelFormat {
	pub fn from_tag(tag: Tag) -> Option<PixelFormat> {
		match tag {
			PALETTED_TAG => Some(PixelFormat::Paletted),
			RGBA_TAG => Some(PixelFormat::Rgba),
			_ => None,
		}
	}
}

/// Sprite image; the encoded pixel stream is kept as stored.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
	pub format: PixelFormat,
	pub width: u16,
	pub height: u16,
	/// Horizontal offset of the image relative to its anchor
	pub x_offset: i16,
	/// Vertical offset of the image relative to its anchor
	pub y_offset: i16,
	pub pixels: Vec<u8>,
}

impl ImageData {
	pub fn read<R>(header: &BlockHeader, buf: &mut R) -> Result<ImageData, RcdImportError>
	where
		R: ReadBytesExt,
	{
		header.expect_min_size(GEOMETRY_SIZE)?;
		let format = match PixelFormat::from_tag(header.tag) {
			Some(format) => format,
			None => return Err(RcdImportError::Decoder {
				tag: header.tag,
				message: "not an image block".to_string(),
			}),
		};

		let width = buf.read_u16::<LE>()?;
		let height = buf.read_u16::<LE>()?;
		let x_offset = buf.read_i16::<LE>()?;
		let y_offset = buf.read_i16::<LE>()?;
		let pixels = buf.read_blob((header.length - GEOMETRY_SIZE) as usize)?;

		Ok(ImageData {
			format: format,
			width: width,
			height: height,
			x_offset: x_offset,
			y_offset: y_offset,
			pixels: pixels,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_image() {
		let payload = b"\x02\x00\x01\x00\xfe\xff\x03\x00\xaa\xbb";
		let header = BlockHeader { tag: PALETTED_TAG, version: PALETTED_VERSION, length: payload.len() as u32 };

		let image = ImageData::read(&header, &mut &payload[..]).unwrap();
		assert_eq!(image.format, PixelFormat::Paletted);
		assert_eq!((image.width, image.height), (2, 1));
		assert_eq!((image.x_offset, image.y_offset), (-2, 3));
		assert_eq!(image.pixels, b"\xaa\xbb");
	}

	#[test]
	fn test_short_image() {
		let header = BlockHeader { tag: RGBA_TAG, version: RGBA_VERSION, length: 0 };
		assert!(matches!(ImageData::read(&header, &mut &b""[..]),
			Err(RcdImportError::Short { found: 0, min: 8, .. })));
	}
}
