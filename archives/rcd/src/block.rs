use byteorder::{
	LE,
	ReadBytesExt
};
#[cfg(feature = "export")]
use byteorder::WriteBytesExt;

use std::io::{
	self,
	Read
};
#[cfg(feature = "export")]
use std::io::Write;

use pk_core::{
	io_ext::ReadBinExt,
	tag,
	Tag
};
#[cfg(feature = "export")]
use pk_core::io_ext::WriteBinExt;

use crate::error::RcdImportError;

pub const MAGIC: Tag = tag!(b"RCDF");
/// Container format version following the [`MAGIC`].
pub const FORMAT_VERSION: u32 = 2;
/// Size of a block header: tag, version and payload length.
pub const HEADER_SIZE: usize = 12;

/// Payload length accepted for a block kind, known from its header alone
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlockSize {
	Exact(u64),
	AtLeast(u32),
}

/// Header preceding every block payload
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockHeader {
	pub tag: Tag,
	pub version: u32,
	/// Exact number of payload bytes following the header
	pub length: u32,
}

impl BlockHeader {
	/// Reads a block header. End of stream exactly at the header boundary
	/// yields `None`; a stream ending inside the header is an error.
	pub fn read<R>(buf: &mut R) -> Result<Option<BlockHeader>, RcdImportError>
	where
		R: Read + ?Sized,
	{
		let mut raw = [0; HEADER_SIZE];
		let mut got = 0;

		while got < raw.len() {
			match buf.read(&mut raw[got..]) {
				Ok(0) => break,
				Ok(n) => got += n,
				Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
				Err(e) => return Err(e.into()),
			}
		}

		if got == 0 {
			return Ok(None);
		}
		if got < HEADER_SIZE {
			return Err(RcdImportError::TruncatedHeader(got));
		}

		let mut fields = &raw[..];
		Ok(Some(BlockHeader {
			tag: fields.read_tag()?,
			version: fields.read_u32::<LE>()?,
			length: fields.read_u32::<LE>()?,
		}))
	}

	pub fn expect_version(&self, expected: u32) -> Result<(), RcdImportError> {
		if self.version != expected {
			return Err(RcdImportError::Version {
				tag: self.tag,
				found: self.version,
				expected: expected,
			});
		}

		Ok(())
	}

	/// Checks the payload length against the exact size implied by the version
	/// and any already decoded leading fields.
	pub fn expect_size(&self, expected: u64) -> Result<(), RcdImportError> {
		if self.length as u64 != expected {
			return Err(RcdImportError::Size {
				tag: self.tag,
				found: self.length,
				expected: expected,
			});
		}

		Ok(())
	}

	/// Checks that the leading fields of a variable-sized payload are present.
	pub fn expect_min_size(&self, min: u32) -> Result<(), RcdImportError> {
		if self.length < min {
			return Err(RcdImportError::Short {
				tag: self.tag,
				found: self.length,
				min: min,
			});
		}

		Ok(())
	}

	pub fn expect_block_size(&self, size: BlockSize) -> Result<(), RcdImportError> {
		match size {
			BlockSize::Exact(expected) => self.expect_size(expected),
			BlockSize::AtLeast(min) => self.expect_min_size(min),
		}
	}

	#[cfg(feature = "export")]
	pub fn write<W>(&self, buf: &mut W) -> io::Result<()>
	where
		W: WriteBytesExt,
	{
		buf.write_tag(self.tag)?;
		buf.write_u32::<LE>(self.version)?;
		buf.write_u32::<LE>(self.length)
	}
}

/// One block as stored in the file, payload undecoded
#[derive(Clone, Debug, PartialEq)]
pub struct RawBlock {
	pub header: BlockHeader,
	pub payload: Vec<u8>,
}

/// Sequential reader over the blocks of an RCD container
#[derive(Debug)]
pub struct RcdReader<R> {
	inner: R,
}

impl<R: Read> RcdReader<R> {
	/// Checks the file header and positions the reader at the first block.
	pub fn new(mut inner: R) -> Result<RcdReader<R>, RcdImportError> {
		let magic = inner.read_tag()?;
		let version = inner.read_u32::<LE>()?;
		if magic != MAGIC || version != FORMAT_VERSION {
			return Err(RcdImportError::Header { magic: magic, version: version });
		}

		Ok(RcdReader { inner: inner })
	}

	/// Reads the next block header, or `None` when the container ends.
	pub fn next_header(&mut self) -> Result<Option<BlockHeader>, RcdImportError> {
		BlockHeader::read(&mut self.inner)
	}

	/// Reads the complete payload of the block whose header was just read.
	/// The buffer only grows with the bytes actually present.
	pub fn read_payload(&mut self, header: &BlockHeader) -> Result<Vec<u8>, RcdImportError> {
		let length = header.length as u64;

		let mut payload = vec![];
		(&mut self.inner).take(length).read_to_end(&mut payload)?;
		if (payload.len() as u64) != length {
			return Err(io::Error::new(io::ErrorKind::UnexpectedEof,
				format!("{} payload ends after {} of {} bytes", header.tag, payload.len(), length)).into());
		}

		Ok(payload)
	}

	/// Discards the payload of the block whose header was just read, leaving
	/// the reader at the next header.
	pub fn skip_payload(&mut self, header: &BlockHeader) -> Result<(), RcdImportError> {
		Ok(self.inner.skip_bytes(header.length as u64)?)
	}

	pub fn next_block(&mut self) -> Result<Option<RawBlock>, RcdImportError> {
		match self.next_header()? {
			Some(header) => {
				let payload = self.read_payload(&header)?;
				Ok(Some(RawBlock { header: header, payload: payload }))
			},
			None => Ok(None),
		}
	}

	pub fn into_inner(self) -> R {
		self.inner
	}
}

/// Writes an RCD container block by block
#[cfg(feature = "export")]
#[derive(Debug)]
pub struct RcdWriter<W> {
	inner: W,
}

#[cfg(feature = "export")]
impl<W: Write> RcdWriter<W> {
	/// Writes the file header.
	pub fn new(mut inner: W) -> io::Result<RcdWriter<W>> {
		inner.write_tag(MAGIC)?;
		inner.write_u32::<LE>(FORMAT_VERSION)?;
		Ok(RcdWriter { inner: inner })
	}

	pub fn write_block(&mut self, tag: Tag, version: u32, payload: &[u8]) -> io::Result<()> {
		let length = u32::try_from(payload.len())
			.map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "block payload too large"))?;

		BlockHeader { tag: tag, version: version, length: length }.write(&mut self.inner)?;
		self.inner.write_all(payload)
	}

	pub fn write_raw(&mut self, block: &RawBlock) -> io::Result<()> {
		block.header.write(&mut self.inner)?;
		self.inner.write_all(&block.payload)
	}

	pub fn into_inner(self) -> W {
		self.inner
	}
}
