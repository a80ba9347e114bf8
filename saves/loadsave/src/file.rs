use std::{
	fs::File,
	io::{
		BufReader,
		BufWriter,
		Read,
		Write
	},
	path::Path
};

use log::info;

use crate::{
	error::{
		LoadingError,
		SavingError
	},
	loader::Loader,
	saver::Saver
};

/// Name of the block every savegame starts with.
pub const HEADER_BLOCK: &str = "SGHD";
pub const HEADER_VERSION: u32 = 1;

/// Game state that can be written to and restored from a savegame.
pub trait Persist {
	fn save<W: Write>(&self, saver: &mut Saver<W>) -> Result<(), SavingError>;
	fn load<R: Read>(&mut self, loader: &mut Loader<R>) -> Result<(), LoadingError>;
}

pub fn save_game<W, S>(buf: W, state: &S) -> Result<W, SavingError>
where
	W: Write,
	S: Persist,
{
	let mut saver = Saver::new(buf);
	saver.start_block(HEADER_BLOCK, HEADER_VERSION)?;
	saver.end_block()?;
	state.save(&mut saver)?;
	saver.finish()
}

/// Restores `state` from a savegame. Any failure leaves `state` partially
/// loaded; callers should discard it.
pub fn load_game<R, S>(buf: R, state: &mut S) -> Result<(), LoadingError>
where
	R: Read,
	S: Persist,
{
	let mut loader = Loader::new(buf);
	let version = loader.open_block(HEADER_BLOCK)?;
	if version != HEADER_VERSION {
		return Err(loader.version_mismatch(version, HEADER_VERSION));
	}
	loader.close_block()?;

	state.load(&mut loader)?;
	loader.finish()
}

pub fn save_game_file<P, S>(path: P, state: &S) -> Result<(), SavingError>
where
	P: AsRef<Path>,
	S: Persist,
{
	let file = File::create(path.as_ref())?;
	save_game(BufWriter::new(file), state)?;
	info!("saved {}", path.as_ref().display());
	Ok(())
}

pub fn load_game_file<P, S>(path: P, state: &mut S) -> Result<(), LoadingError>
where
	P: AsRef<Path>,
	S: Persist,
{
	let file = File::open(path.as_ref())?;
	load_game(BufReader::new(file), state)?;
	info!("loaded {}", path.as_ref().display());
	Ok(())
}
