use std::io::{
	self,
	Read
};

use thiserror::Error;

/// Number of bytes that can be put back into a [`PushbackReader`].
pub const PUSHBACK_CAPACITY: usize = 8;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum PushbackError {
	#[error("Pushback buffer is full")]
	Overflow,
}

/// Reader with a small stack of bytes that have been put back.
///
/// Bytes handed to [`PushbackReader::unread`] are returned by the next reads,
/// most recently pushed first, before any further data from the inner reader.
#[derive(Debug)]
pub struct PushbackReader<R> {
	inner: R,
	cache: [u8; PUSHBACK_CAPACITY],
	count: usize,
}

impl<R: Read> PushbackReader<R> {
	pub fn new(inner: R) -> PushbackReader<R> {
		PushbackReader {
			inner: inner,
			cache: [0; PUSHBACK_CAPACITY],
			count: 0,
		}
	}

	/// Puts a byte back so the next read returns it first.
	pub fn unread(&mut self, b: u8) -> Result<(), PushbackError> {
		if self.count == PUSHBACK_CAPACITY {
			return Err(PushbackError::Overflow);
		}

		self.cache[self.count] = b;
		self.count += 1;
		Ok(())
	}

	/// Puts back bytes that were read in order, so that they are read again in
	/// that same order.
	pub fn unread_all(&mut self, bytes: &[u8]) -> Result<(), PushbackError> {
		if self.count + bytes.len() > PUSHBACK_CAPACITY {
			return Err(PushbackError::Overflow);
		}

		for b in bytes.iter().rev() {
			self.unread(*b)?;
		}

		Ok(())
	}

	/// Reads one byte and puts it back. Returns `None` at end of stream.
	pub fn peek(&mut self) -> io::Result<Option<u8>> {
		let mut buf = [0; 1];
		if self.read(&mut buf)? == 0 {
			return Ok(None);
		}

		self.unread(buf[0]).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
		Ok(Some(buf[0]))
	}

	/// Number of bytes waiting in the pushback buffer.
	pub fn pending(&self) -> usize {
		self.count
	}

	pub fn get_ref(&self) -> &R {
		&self.inner
	}

	/// Returns the inner reader. Pending pushed-back bytes are lost.
	pub fn into_inner(self) -> R {
		self.inner
	}
}

impl<R: Read> Read for PushbackReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if self.count == 0 || buf.is_empty() {
			return self.inner.read(buf);
		}

		let mut n = 0;
		while n < buf.len() && self.count > 0 {
			self.count -= 1;
			buf[n] = self.cache[self.count];
			n += 1;
		}

		Ok(n)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Read;

	use super::*;

	#[test]
	fn test_unread_order() {
		let mut rd = PushbackReader::new(&b"cd"[..]);
		rd.unread(b'b').unwrap();
		rd.unread(b'a').unwrap();

		let mut out = vec![];
		rd.read_to_end(&mut out).unwrap();
		assert_eq!(out, b"abcd");
	}

	#[test]
	fn test_unread_all() {
		let mut rd = PushbackReader::new(&b"SAVE"[..]);
		let mut tag = [0; 4];
		rd.read_exact(&mut tag).unwrap();
		rd.unread_all(&tag).unwrap();
		assert_eq!(rd.pending(), 4);

		let mut again = [0; 4];
		rd.read_exact(&mut again).unwrap();
		assert_eq!(&again, b"SAVE");
		assert_eq!(rd.pending(), 0);
	}

	#[test]
	fn test_overflow() {
		let mut rd = PushbackReader::new(&b""[..]);
		for i in 0..PUSHBACK_CAPACITY {
			rd.unread(i as u8).unwrap();
		}
		assert_eq!(rd.unread(0xFF), Err(PushbackError::Overflow));
		assert_eq!(rd.pending(), PUSHBACK_CAPACITY);

		let mut rd = PushbackReader::new(&b""[..]);
		rd.unread(1).unwrap();
		assert_eq!(rd.unread_all(&[0; PUSHBACK_CAPACITY]), Err(PushbackError::Overflow));
		assert_eq!(rd.pending(), 1);
	}

	#[test]
	fn test_peek() {
		let mut rd = PushbackReader::new(&b"\x2a\x01"[..]);
		assert_eq!(rd.peek().unwrap(), Some(0x2a));
		assert_eq!(rd.peek().unwrap(), Some(0x2a));

		let mut buf = [0; 2];
		rd.read_exact(&mut buf).unwrap();
		assert_eq!(buf, [0x2a, 0x01]);
		assert_eq!(rd.peek().unwrap(), None);
	}
}
