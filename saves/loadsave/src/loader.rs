use std::io::{
	self,
	Read
};

use byteorder::{
	LE,
	ReadBytesExt
};
use log::trace;

use pk_core::pushback::PushbackReader;

use crate::{
	error::LoadingError,
	is_block_name
};

/// Reads a savegame back, block by block, in the order it was saved.
#[derive(Debug)]
pub struct Loader<R> {
	inner: PushbackReader<R>,
	scopes: Vec<String>,
}

impl<R: Read> Loader<R> {
	pub fn new(inner: R) -> Loader<R> {
		Loader {
			inner: PushbackReader::new(inner),
			scopes: vec![],
		}
	}

	/// Opens the block `name`, which must come next, and returns its saved
	/// version.
	///
	/// Stored names carry no length or terminator, so only the bytes of `name`
	/// are compared. A block saved as "PARKING" is opened by `"PARK"`, which
	/// then reads "ING" and one more byte as the version. Names of blocks that
	/// can appear at the same position must not be prefixes of each other.
	pub fn open_block(&mut self, name: &str) -> Result<u32, LoadingError> {
		if !is_block_name(name) {
			return Err(LoadingError::BlockName(name.to_string()));
		}

		if let Some(found) = self.match_name(name)? {
			return Err(LoadingError::Tag {
				expected: name.to_string(),
				found: String::from_utf8_lossy(&found).into_owned(),
			});
		}

		self.enter(name)
	}

	/// Opens the block `name` if it comes next. Otherwise leaves the stream
	/// untouched and returns `None`.
	///
	/// Matching stops after the bytes of `name`, with the same prefix caveat
	/// as [`Loader::open_block`].
	pub fn probe_block(&mut self, name: &str) -> Result<Option<u32>, LoadingError> {
		if !is_block_name(name) {
			return Err(LoadingError::BlockName(name.to_string()));
		}

		if let Some(found) = self.match_name(name)? {
			self.inner.unread_all(&found)?;
			trace!("no {} block", name);
			return Ok(None);
		}

		Ok(Some(self.enter(name)?))
	}

	/// Reads the stream for as long as it agrees with `name`. Returns the bytes
	/// consumed when it does not.
	fn match_name(&mut self, name: &str) -> Result<Option<Vec<u8>>, LoadingError> {
		let mut seen = Vec::with_capacity(name.len());
		for expected in name.bytes() {
			let mut b = [0; 1];
			if self.inner.read(&mut b)? == 0 {
				return Ok(Some(seen));
			}

			seen.push(b[0]);
			if b[0] != expected {
				return Ok(Some(seen));
			}
		}

		Ok(None)
	}

	fn enter(&mut self, name: &str) -> Result<u32, LoadingError> {
		let version = self.inner.read_u32::<LE>()?;
		self.scopes.push(name.to_string());
		trace!("{:>width$}open {} v{}", "", name, version, width = 2 * (self.scopes.len() - 1));
		Ok(version)
	}

	/// Closes the innermost open block.
	pub fn close_block(&mut self) -> Result<(), LoadingError> {
		let name = self.scopes.pop().ok_or(LoadingError::NoOpenBlock)?;
		trace!("{:>width$}close {}", "", name, width = 2 * self.scopes.len());
		Ok(())
	}

	/// Name of the innermost open block.
	pub fn current_block(&self) -> Option<&str> {
		self.scopes.last().map(String::as_str)
	}

	/// Error for a saved version of the innermost block that this program
	/// cannot read.
	pub fn version_mismatch(&self, saved: u32, current: u32) -> LoadingError {
		LoadingError::VersionMismatch {
			name: self.current_block().unwrap_or_default().to_string(),
			saved: saved,
			current: current,
		}
	}

	pub fn get_u8(&mut self) -> Result<u8, LoadingError> {
		Ok(self.inner.read_u8()?)
	}

	pub fn get_u16(&mut self) -> Result<u16, LoadingError> {
		Ok(self.inner.read_u16::<LE>()?)
	}

	pub fn get_u32(&mut self) -> Result<u32, LoadingError> {
		Ok(self.inner.read_u32::<LE>()?)
	}

	pub fn get_u64(&mut self) -> Result<u64, LoadingError> {
		Ok(self.inner.read_u64::<LE>()?)
	}

	/// Reads a text: its byte length, then that many bytes of UTF-8.
	pub fn get_text(&mut self) -> Result<String, LoadingError> {
		let length = self.get_u32()? as u64;

		let mut buf = vec![];
		(&mut self.inner).take(length).read_to_end(&mut buf)?;
		if (buf.len() as u64) != length {
			return Err(io::Error::new(io::ErrorKind::UnexpectedEof,
				format!("text ends after {} of {} bytes", buf.len(), length)).into());
		}

		Ok(String::from_utf8(buf)?)
	}

	/// Ends the load. Every block must be closed and the stream exhausted.
	pub fn finish(mut self) -> Result<(), LoadingError> {
		if let Some(name) = self.scopes.pop() {
			return Err(LoadingError::UnclosedBlock(name));
		}
		if self.inner.peek()?.is_some() {
			return Err(LoadingError::TrailingData);
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_open_wrong_block() {
		let data = b"OTHER\x01\x00\x00\x00";
		let mut loader = Loader::new(&data[..]);
		let err = loader.open_block("PLAYER").unwrap_err();
		assert!(matches!(err, LoadingError::Tag { ref expected, ref found } if expected == "PLAYER" && found == "O"));
	}

	#[test]
	fn test_probe_absent_block() {
		let data = b"OTHER\x01\x00\x00\x00";
		let mut loader = Loader::new(&data[..]);
		assert_eq!(loader.probe_block("PLAYER").unwrap(), None);
		assert_eq!(loader.current_block(), None);

		assert_eq!(loader.open_block("OTHER").unwrap(), 1);
		assert_eq!(loader.current_block(), Some("OTHER"));
		loader.close_block().unwrap();
		loader.finish().unwrap();
	}

	#[test]
	fn test_probe_restores_partial_match() {
		let data = b"PLAN\x02\x00\x00\x00";
		let mut loader = Loader::new(&data[..]);
		assert_eq!(loader.probe_block("PLAYER").unwrap(), None);
		assert_eq!(loader.open_block("PLAN").unwrap(), 2);
	}

	#[test]
	fn test_name_prefix_matches() {
		let data = b"PARKING\x01\x00\x00\x00";

		let mut loader = Loader::new(&data[..]);
		assert_eq!(loader.probe_block("PARK").unwrap(), Some(u32::from_le_bytes(*b"ING\x01")));
		assert_eq!(loader.current_block(), Some("PARK"));

		let mut loader = Loader::new(&data[..]);
		assert_eq!(loader.probe_block("PARKING").unwrap(), Some(1));
		loader.close_block().unwrap();
		loader.finish().unwrap();

		let mut loader = Loader::new(&b"PARK\x01\x00\x00\x00"[..]);
		assert_eq!(loader.probe_block("PARKING").unwrap(), None);
		assert_eq!(loader.open_block("PARK").unwrap(), 1);
	}

	#[test]
	fn test_probe_at_end_of_stream() {
		let mut loader = Loader::new(&b""[..]);
		assert_eq!(loader.probe_block("PARK").unwrap(), None);
		loader.finish().unwrap();

		let mut loader = Loader::new(&b""[..]);
		assert!(matches!(loader.open_block("PARK"), Err(LoadingError::Tag { .. })));
	}

	#[test]
	fn test_bad_block_name() {
		let mut loader = Loader::new(&b"VERYLONGNAME"[..]);
		assert!(matches!(loader.open_block("VERYLONGNAME"), Err(LoadingError::BlockName(_))));
		assert!(matches!(loader.probe_block(""), Err(LoadingError::BlockName(_))));
	}

	#[test]
	fn test_scalars() {
		let data = b"\x2a\x34\x12\x78\x56\x34\x12\x01\x00\x00\x00\x00\x00\x00\x80";
		let mut loader = Loader::new(&data[..]);
		assert_eq!(loader.get_u8().unwrap(), 0x2a);
		assert_eq!(loader.get_u16().unwrap(), 0x1234);
		assert_eq!(loader.get_u32().unwrap(), 0x12345678);
		assert_eq!(loader.get_u64().unwrap(), 0x8000_0000_0000_0001);
		assert!(matches!(loader.get_u8(), Err(LoadingError::IO { .. })));
	}

	#[test]
	fn test_get_text() {
		let data = b"\x05\x00\x00\x00Hello\x00\x00\x00\x00";
		let mut loader = Loader::new(&data[..]);
		assert_eq!(loader.get_text().unwrap(), "Hello");
		assert_eq!(loader.get_text().unwrap(), "");

		let mut loader = Loader::new(&b"\x02\x00\x00\x00\xc3\x28"[..]);
		assert!(matches!(loader.get_text(), Err(LoadingError::Encoding { .. })));

		let mut loader = Loader::new(&b"\xff\xff\xff\xffHi"[..]);
		assert!(matches!(loader.get_text(), Err(LoadingError::IO { .. })));
	}

	#[test]
	fn test_unbalanced_scopes() {
		let data = b"PARK\x01\x00\x00\x00";
		let mut loader = Loader::new(&data[..]);
		assert!(matches!(loader.close_block(), Err(LoadingError::NoOpenBlock)));

		loader.open_block("PARK").unwrap();
		assert!(matches!(loader.finish(), Err(LoadingError::UnclosedBlock(ref name)) if name == "PARK"));
	}

	#[test]
	fn test_trailing_data() {
		let data = b"PARK\x01\x00\x00\x00\x00";
		let mut loader = Loader::new(&data[..]);
		loader.open_block("PARK").unwrap();
		loader.close_block().unwrap();
		assert!(matches!(loader.finish(), Err(LoadingError::TrailingData)));
	}

	#[test]
	fn test_version_mismatch() {
		let data = b"PLAYER\x03\x00\x00\x00";
		let mut loader = Loader::new(&data[..]);
		let version = loader.open_block("PLAYER").unwrap();
		let err = loader.version_mismatch(version, 2);
		assert_eq!(err.to_string(), "PLAYER block has version 3, current version is 2");
	}
}
