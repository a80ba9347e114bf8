use std::{
	io::{
		self,
		Read,
		Result,
		Write
	},
	str::{
		from_utf8,
		Utf8Error
	}
};

use thiserror::Error;

use crate::Tag;

#[derive(Debug, Error)]
pub enum StrError {
	#[error("I/O error")]
	IO {
		#[from]
		source: io::Error,
	},
	#[error("String has no room for a terminator")]
	Empty,
	#[error("String contains a NUL byte before its end at {0}")]
	EmbeddedNul(usize),
	#[error("String is not NUL-terminated")]
	Unterminated,
	#[error("String is not valid UTF-8")]
	UTF8 {
		#[from]
		source: Utf8Error,
	},
}

/// Validates a NUL-terminated UTF-8 string that fills `bytes` exactly.
/// The terminator must be the last byte; the returned string excludes it.
pub fn utf8z(bytes: &[u8]) -> std::result::Result<&str, StrError> {
	let (last, text) = bytes.split_last().ok_or(StrError::Empty)?;
	if *last != 0 {
		return Err(StrError::Unterminated);
	}
	if let Some(pos) = text.iter().position(|b| *b == 0) {
		return Err(StrError::EmbeddedNul(pos));
	}

	Ok(from_utf8(text)?)
}

pub trait ReadBinExt: Read {
	/// Reads exactly `n` bytes. The buffer grows with the bytes actually
	/// read, so an untrusted `n` costs no more memory than the stream holds.
	fn read_blob(&mut self, n: usize) -> Result<Vec<u8>> {
		let mut buf = vec![];
		Read::take(&mut *self, n as u64).read_to_end(&mut buf)?;
		if buf.len() != n {
			return Err(io::Error::new(io::ErrorKind::UnexpectedEof,
				format!("stream ends after {} of {} bytes", buf.len(), n)));
		}

		Ok(buf)
	}

	/// Reads a 4-byte block tag
	#[inline]
	fn read_tag(&mut self) -> Result<Tag> {
		let mut buf = [0; 4];
		self.read_exact(&mut buf)?;
		Ok(Tag(buf))
	}

	/// Reads exactly `n` bytes holding a NUL-terminated UTF-8 string
	#[inline]
	fn read_utf8z(&mut self, n: usize) -> std::result::Result<String, StrError> {
		let buf = self.read_blob(n)?;
		Ok(utf8z(&buf)?.to_string())
	}

	/// Discards exactly `n` bytes, failing if the stream ends first
	fn skip_bytes(&mut self, n: u64) -> Result<()> {
		let skipped = io::copy(&mut Read::take(&mut *self, n), &mut io::sink())?;
		if skipped != n {
			return Err(io::Error::new(io::ErrorKind::UnexpectedEof,
				format!("stream ended after skipping {} of {} bytes", skipped, n)));
		}

		Ok(())
	}
}

impl<R> ReadBinExt for R
where
	R: Read + ?Sized,
{
}

pub trait WriteBinExt: Write {
	#[inline]
	fn write_tag(&mut self, tag: Tag) -> Result<()> {
		self.write_all(tag.as_bytes())
	}

	/// Writes a string followed by its NUL terminator
	#[inline]
	fn write_utf8z(&mut self, s: &str) -> Result<()> {
		self.write_all(s.as_bytes())?;
		self.write_all(&[0])
	}
}

impl<W> WriteBinExt for W
where
	W: Write + ?Sized,
{
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_utf8z() {
		assert_eq!(utf8z(b"Hello\x00").unwrap(), "Hello");
		assert_eq!(utf8z(b"\x00").unwrap(), "");
		assert_eq!(utf8z("Grüße\x00".as_bytes()).unwrap(), "Grüße");
		assert!(matches!(utf8z(b""), Err(StrError::Empty)));
		assert!(matches!(utf8z(b"Hello"), Err(StrError::Unterminated)));
		assert!(matches!(utf8z(b"He\x00lo\x00"), Err(StrError::EmbeddedNul(2))));
		assert!(matches!(utf8z(b"\xc3\x28\x00"), Err(StrError::UTF8 { .. })));
	}

	#[test]
	fn test_read_utf8z() {
		let mut data = &b"en_GB\x00rest"[..];
		assert_eq!(data.read_utf8z(6).unwrap(), "en_GB");
		assert_eq!(data, b"rest");
	}

	#[test]
	fn test_read_blob_short() {
		let mut data = &b"abc"[..];
		let err = data.read_blob(4).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
	}

	#[test]
	fn test_read_blob_huge_length() {
		let mut data = &b"abc"[..];
		let err = data.read_blob(usize::MAX).unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

		let mut data = &b"abcdef"[..];
		assert_eq!(data.read_blob(4).unwrap(), b"abcd");
		assert_eq!(data, b"ef");
	}

	#[test]
	fn test_skip_bytes() {
		let mut data = &b"0123456789"[..];
		data.skip_bytes(4).unwrap();
		assert_eq!(data.read_tag().unwrap(), crate::tag!(b"4567"));
		assert_eq!(data.skip_bytes(3).unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
	}

	#[test]
	fn test_write_utf8z() {
		let mut out = vec![];
		out.write_tag(crate::tag!(b"TEXT")).unwrap();
		out.write_utf8z("NAME").unwrap();
		assert_eq!(out, b"TEXTNAME\x00");
	}
}
