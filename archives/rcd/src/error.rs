use std::io;

use thiserror::Error;

use pk_core::{
	io_ext::StrError,
	xref::RefError,
	Tag
};

#[derive(Debug, Error)]
pub enum RcdImportError {
	#[error("Unknown/unsupported animation type: {0}")]
	AnimationType(u16),
	#[error("{tag} block #{block} failed to load: {source}")]
	Block {
		tag: Tag,
		block: u32,
		#[source]
		source: Box<RcdImportError>,
	},
	#[error("{tag} decoder failed: {message}")]
	Decoder {
		tag: Tag,
		message: String,
	},
	#[error("Text encoding error: {source}")]
	Encoding {
		#[from]
		source: StrError,
	},
	#[error("Unknown/unsupported fence type: {0}")]
	FenceType(u16),
	#[error("Unknown/unsupported foundation type: {0}")]
	FoundationType(u16),
	#[error("Animation has no frames")]
	FrameCount,
	#[error("Animation frame duration out of range: {0}")]
	FrameDuration(u16),
	#[error("Animation frame offset out of range: {0}")]
	FrameOffset(i16),
	#[error("Unknown ground type: {0}")]
	GroundType(u16),
	#[error("Bad header: not an RCD file (found {magic}, version {version})")]
	Header {
		magic: Tag,
		version: u32,
	},
	#[error("I/O error: {source}")]
	IO {
		#[from]
		source: io::Error,
	},
	#[error("Unknown/unsupported path type: {0}")]
	PathType(u16),
	#[error("Unknown/unsupported person type: {0}")]
	PersonType(u8),
	#[error("Unsupported platform type: {0}")]
	PlatformType(u16),
	#[error("Unresolved reference: {source}")]
	Reference {
		#[from]
		source: RefError,
	},
	#[error("{tag} block has {found} bytes, expected {expected}")]
	Size {
		tag: Tag,
		found: u32,
		expected: u64,
	},
	#[error("{tag} block has {found} bytes, expected at least {min}")]
	Short {
		tag: Tag,
		found: u32,
		min: u32,
	},
	#[error("Unsupported support type: {0}")]
	SupportType(u16),
	#[error("Text block holds more than {0} strings")]
	TextCount(usize),
	#[error("Text block length field is inconsistent: {0}")]
	TextLength(&'static str),
	#[error("Text block does not fit in {0} bytes")]
	TextOverflow(usize),
	#[error("Unsupported tile width: {0}")]
	TileWidth(u16),
	#[error("{tag} block has {count} unread trailing bytes")]
	Trailing {
		tag: Tag,
		count: usize,
	},
	#[error("Block header truncated after {0} bytes")]
	TruncatedHeader(usize),
	#[error("{tag} version {found} is not supported (expected {expected})")]
	Version {
		tag: Tag,
		found: u32,
		expected: u32,
	},
	#[error("Unknown/unsupported {tag} widget type: {code}")]
	WidgetType {
		tag: Tag,
		code: u16,
	},
}

impl RcdImportError {
	/// Attaches the failing block's tag and ordinal to an error.
	pub fn in_block(self, tag: Tag, block: u32) -> RcdImportError {
		RcdImportError::Block {
			tag: tag,
			block: block,
			source: Box::new(self),
		}
	}
}
