use std::io::Write;

use byteorder::{
	LE,
	WriteBytesExt
};
use log::trace;

use crate::{
	error::SavingError,
	is_block_name
};

/// Writes a savegame as nested blocks. A block is its name and version
/// followed by whatever the caller puts into it; nothing marks its end.
#[derive(Debug)]
pub struct Saver<W> {
	inner: W,
	scopes: Vec<String>,
}

impl<W: Write> Saver<W> {
	pub fn new(inner: W) -> Saver<W> {
		Saver {
			inner: inner,
			scopes: vec![],
		}
	}

	pub fn start_block(&mut self, name: &str, version: u32) -> Result<(), SavingError> {
		if !is_block_name(name) {
			return Err(SavingError::BlockName(name.to_string()));
		}

		self.inner.write_all(name.as_bytes())?;
		self.inner.write_u32::<LE>(version)?;
		trace!("{:>width$}start {} v{}", "", name, version, width = 2 * self.scopes.len());
		self.scopes.push(name.to_string());
		Ok(())
	}

	pub fn end_block(&mut self) -> Result<(), SavingError> {
		let name = self.scopes.pop().ok_or(SavingError::NoOpenBlock)?;
		trace!("{:>width$}end {}", "", name, width = 2 * self.scopes.len());
		Ok(())
	}

	pub fn put_u8(&mut self, value: u8) -> Result<(), SavingError> {
		Ok(self.inner.write_u8(value)?)
	}

	pub fn put_u16(&mut self, value: u16) -> Result<(), SavingError> {
		Ok(self.inner.write_u16::<LE>(value)?)
	}

	pub fn put_u32(&mut self, value: u32) -> Result<(), SavingError> {
		Ok(self.inner.write_u32::<LE>(value)?)
	}

	pub fn put_u64(&mut self, value: u64) -> Result<(), SavingError> {
		Ok(self.inner.write_u64::<LE>(value)?)
	}

	pub fn put_text(&mut self, text: &str) -> Result<(), SavingError> {
		let length = u32::try_from(text.len()).map_err(|_| SavingError::TextLength(text.len()))?;
		self.put_u32(length)?;
		Ok(self.inner.write_all(text.as_bytes())?)
	}

	/// Ends the save once every block is closed, returning the flushed writer.
	pub fn finish(mut self) -> Result<W, SavingError> {
		if let Some(name) = self.scopes.pop() {
			return Err(SavingError::UnclosedBlock(name));
		}

		self.inner.flush()?;
		Ok(self.inner)
	}
}
