//! Resource container ("RCD") support: a flat sequence of tagged, versioned
//! and size-checked blocks holding sprites, texts, animations and game-object
//! types. Later blocks refer to earlier ones by their position in the file.

pub mod anim;
pub mod block;
#[cfg(feature = "import")]
pub mod catalog;
#[cfg(feature = "import")]
pub mod dispatch;
pub mod error;
pub mod frames;
pub mod gui;
pub mod image;
pub mod refs;
pub mod sprites;
pub mod text;
pub mod types;

pub use block::{
	BlockHeader,
	BlockSize,
	RawBlock,
	RcdReader
};
#[cfg(feature = "export")]
pub use block::RcdWriter;
#[cfg(feature = "import")]
pub use catalog::{
	Catalog,
	CatalogConfig,
	LoadStats
};
pub use error::RcdImportError;

#[cfg(feature = "import")]
pub fn read_rcd(filepath: &str) -> Result<Catalog, RcdImportError> {
	let mut catalog = Catalog::default();
	catalog.load(filepath)?;
	Ok(catalog)
}
