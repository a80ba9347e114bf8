use byteorder::{
	LE,
	ReadBytesExt
};

#[cfg(feature = "export")]
use std::io;

use pk_core::io_ext::{
	ReadBinExt,
	StrError,
	utf8z
};

use crate::{
	block::BlockHeader,
	error::RcdImportError
};

pub const VERSION: u32 = 2;
/// Maximum number of strings in one TEXT block
pub const MAX_STRINGS: usize = 512;
/// Maximum number of text bytes (names and translations) in one TEXT block
pub const BUFFER_SIZE: usize = 64 * 1024;
/// Scratch space for a language name or a discarded translation
const SCRATCH_SIZE: usize = 1000;
/// Length and name-length prefix of a string or translation record
const RECORD_HEADER_SIZE: usize = 3;

pub static DEFAULT_LANGUAGES: [&str; 9] = [
	"en_GB", "da_DK", "de_DE", "en_US", "es_ES", "fr_FR", "nds_DE", "nl_NL", "sv_SE",
];

/// Ordered language names; the position of a name is its language index.
#[derive(Clone, Debug, PartialEq)]
pub struct Languages {
	names: Vec<String>,
}

impl Languages {
	pub fn new<I, S>(names: I) -> Languages
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Languages { names: names.into_iter().map(Into::into).collect() }
	}

	pub fn index(&self, name: &str) -> Option<usize> {
		self.names.iter().position(|n| n == name)
	}

	pub fn name(&self, index: usize) -> Option<&str> {
		self.names.get(index).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

impl Default for Languages {
	fn default() -> Self {
		Languages::new(DEFAULT_LANGUAGES)
	}
}

/// NUL-terminated string stored in a text buffer; `len` includes the NUL.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Span {
	offset: u32,
	len: u32,
}

/// Bounded accumulator of validated NUL-terminated UTF-8 strings
struct TextBuffer {
	data: Vec<u8>,
	capacity: usize,
}

impl TextBuffer {
	fn new(capacity: usize) -> TextBuffer {
		TextBuffer {
			data: vec![],
			capacity: capacity,
		}
	}

	/// Reads `n` bytes holding one string, rejecting it if it would not fit.
	fn push<R>(&mut self, buf: &mut R, n: usize) -> Result<Span, RcdImportError>
	where
		R: ReadBytesExt,
	{
		if self.data.len() + n > self.capacity {
			return Err(RcdImportError::TextOverflow(self.capacity));
		}

		let bytes = buf.read_blob(n)?;
		utf8z(&bytes)?;

		let span = Span {
			offset: self.data.len() as u32,
			len: n as u32,
		};
		self.data.extend_from_slice(&bytes);
		Ok(span)
	}

	fn get(&self, span: Span) -> &str {
		let start = span.offset as usize;
		let end = start + span.len as usize - 1;
		std::str::from_utf8(&self.data[start..end]).unwrap_or_default()
	}
}

#[derive(Clone, Debug, PartialEq)]
struct TextString {
	name: Span,
	languages: Vec<Option<Span>>,
}

/// Decoded TEXT block: named strings with their translations, all stored in
/// one backing allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct TextData {
	data: String,
	strings: Vec<TextString>,
}

impl TextData {
	pub fn read<R>(header: &BlockHeader, buf: &mut R, languages: &Languages) -> Result<TextData, RcdImportError>
	where
		R: ReadBytesExt,
	{
		let mut length = header.length as usize;
		let mut text = TextBuffer::new(BUFFER_SIZE);
		let mut strings = vec![];

		while length > 0 {
			if strings.len() >= MAX_STRINGS {
				return Err(RcdImportError::TextCount(MAX_STRINGS));
			}
			if length < RECORD_HEADER_SIZE {
				return Err(RcdImportError::TextLength("string header does not fit in the block"));
			}

			let str_length = buf.read_u16::<LE>()? as usize;
			let ident_length = buf.read_u8()? as usize;
			if str_length > length {
				return Err(RcdImportError::TextLength("string does not fit in the block"));
			}
			length -= RECORD_HEADER_SIZE;

			if ident_length + RECORD_HEADER_SIZE >= str_length {
				return Err(RcdImportError::TextLength("no room for translations"));
			}
			let mut trs_length = str_length - (ident_length + RECORD_HEADER_SIZE);

			let name = text.push(buf, ident_length)?;
			length -= ident_length;

			let mut translations = vec![None; languages.len()];
			while trs_length > 0 {
				if length < RECORD_HEADER_SIZE {
					return Err(RcdImportError::TextLength("translation header does not fit in the block"));
				}

				let tr_length = buf.read_u16::<LE>()? as usize;
				let lang_length = buf.read_u8()? as usize;
				length -= RECORD_HEADER_SIZE;

				if tr_length > trs_length {
					return Err(RcdImportError::TextLength("translation does not fit in its string"));
				}
				if lang_length + RECORD_HEADER_SIZE >= tr_length {
					return Err(RcdImportError::TextLength("no room for translation text"));
				}
				let text_length = tr_length - (lang_length + RECORD_HEADER_SIZE);

				let mut scratch = TextBuffer::new(SCRATCH_SIZE);
				let lang = scratch.push(buf, lang_length)?;
				length -= lang_length;

				match languages.index(scratch.get(lang)) {
					Some(idx) => translations[idx] = Some(text.push(buf, text_length)?),
					None => {
						// Unknown language, validated but not kept.
						TextBuffer::new(SCRATCH_SIZE).push(buf, text_length)?;
					},
				}
				length -= text_length;
				trs_length -= tr_length;
			}

			strings.push(TextString {
				name: name,
				languages: translations,
			});
		}

		let data = String::from_utf8(text.data)
			.map_err(|e| StrError::from(e.utf8_error()))?;

		Ok(TextData {
			data: data,
			strings: strings,
		})
	}

	fn span(&self, span: Span) -> &str {
		let start = span.offset as usize;
		&self.data[start..start + span.len as usize - 1]
	}

	pub fn len(&self) -> usize {
		self.strings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.strings.is_empty()
	}

	/// Name of the string at `index`
	pub fn name(&self, index: usize) -> Option<&str> {
		self.strings.get(index).map(|s| self.span(s.name))
	}

	pub fn find(&self, name: &str) -> Option<usize> {
		self.strings.iter().position(|s| self.span(s.name) == name)
	}

	/// Translation of the string at `index` in language `lang`, if present
	pub fn translation(&self, index: usize, lang: usize) -> Option<&str> {
		let s = self.strings.get(index)?;
		s.languages.get(lang).copied().flatten().map(|span| self.span(span))
	}

	/// Translation of the named string in language `lang`, if present
	pub fn lookup(&self, name: &str, lang: usize) -> Option<&str> {
		self.translation(self.find(name)?, lang)
	}

	/// Total bytes of text held, terminators included
	pub fn text_size(&self) -> usize {
		self.data.len()
	}
}

/// Builds the payload of a TEXT block
#[cfg(feature = "export")]
#[derive(Clone, Debug, Default)]
pub struct TextBlockWriter {
	payload: Vec<u8>,
}

#[cfg(feature = "export")]
impl TextBlockWriter {
	pub fn new() -> TextBlockWriter {
		TextBlockWriter::default()
	}

	fn record_header(total: usize, name_length: usize) -> io::Result<[u8; 3]> {
		let total = u16::try_from(total)
			.map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "text record too long"))?;
		let name_length = u8::try_from(name_length)
			.map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "text name too long"))?;

		let t = total.to_le_bytes();
		Ok([t[0], t[1], name_length])
	}

	/// Adds a named string with `(language, text)` translations.
	pub fn add(&mut self, name: &str, translations: &[(&str, &str)]) -> io::Result<()> {
		let mut body = vec![];
		for (lang, text) in translations.iter() {
			let total = RECORD_HEADER_SIZE + lang.len() + 1 + text.len() + 1;
			body.extend_from_slice(&TextBlockWriter::record_header(total, lang.len() + 1)?);
			body.extend_from_slice(lang.as_bytes());
			body.push(0);
			body.extend_from_slice(text.as_bytes());
			body.push(0);
		}

		let total = RECORD_HEADER_SIZE + name.len() + 1 + body.len();
		self.payload.extend_from_slice(&TextBlockWriter::record_header(total, name.len() + 1)?);
		self.payload.extend_from_slice(name.as_bytes());
		self.payload.push(0);
		self.payload.extend_from_slice(&body);
		Ok(())
	}

	pub fn finish(self) -> Vec<u8> {
		self.payload
	}
}
