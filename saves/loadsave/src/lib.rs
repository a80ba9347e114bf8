//! Savegames: nested named blocks, each starting with its name and a version.
//! Blocks store no length, so a load must mirror the save call for call.

pub mod error;
#[cfg(all(feature = "import", feature = "export"))]
pub mod file;
#[cfg(feature = "import")]
pub mod loader;
#[cfg(feature = "export")]
pub mod saver;

use pk_core::pushback::PUSHBACK_CAPACITY;

pub use error::{
	LoadingError,
	SavingError
};
#[cfg(all(feature = "import", feature = "export"))]
pub use file::{
	load_game,
	load_game_file,
	save_game,
	save_game_file,
	Persist
};
#[cfg(feature = "import")]
pub use loader::Loader;
#[cfg(feature = "export")]
pub use saver::Saver;

/// Block names are printable ASCII and short enough to be put back after a
/// failed probe.
pub fn is_block_name(name: &str) -> bool {
	!name.is_empty()
		&& name.len() <= PUSHBACK_CAPACITY
		&& name.bytes().all(|b| b.is_ascii_graphic())
}
