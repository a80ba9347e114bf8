use std::{
	io,
	string::FromUtf8Error
};

use thiserror::Error;

use pk_core::pushback::PushbackError;

#[derive(Debug, Error)]
pub enum LoadingError {
	#[error("Bad block name {0:?}")]
	BlockName(String),
	#[error("Text is not valid UTF-8: {source}")]
	Encoding {
		#[from]
		source: FromUtf8Error,
	},
	#[error("I/O error: {source}")]
	IO {
		#[from]
		source: io::Error,
	},
	#[error("No block is open")]
	NoOpenBlock,
	#[error("Cannot put back data: {source}")]
	Pushback {
		#[from]
		source: PushbackError,
	},
	#[error("Expected block {expected}, found {found:?}")]
	Tag {
		expected: String,
		found: String,
	},
	#[error("Data remains after the end of the savegame")]
	TrailingData,
	#[error("Block {0} is never closed")]
	UnclosedBlock(String),
	#[error("{name} block has version {saved}, current version is {current}")]
	VersionMismatch {
		name: String,
		saved: u32,
		current: u32,
	},
}

#[derive(Debug, Error)]
pub enum SavingError {
	#[error("Bad block name {0:?}")]
	BlockName(String),
	#[error("I/O error: {source}")]
	IO {
		#[from]
		source: io::Error,
	},
	#[error("No block is open")]
	NoOpenBlock,
	#[error("Text of {0} bytes is too long")]
	TextLength(usize),
	#[error("Block {0} is never closed")]
	UnclosedBlock(String),
}
