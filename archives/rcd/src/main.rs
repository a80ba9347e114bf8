use std::{
	fs::File,
	io::BufReader,
	path::{
		Path,
		PathBuf
	},
	process::ExitCode
};

use clap::Parser;
use log::error;

use pk_archives_rcd::{
	Catalog,
	RcdImportError,
	RcdReader
};

#[derive(Parser)]
#[command(name = "rcdinfo", about = "Summarise RCD resource files")]
struct Cli {
	/// RCD files, loaded in order into one catalog
	#[arg(required = true)]
	paths: Vec<PathBuf>,
	/// List every block of each file
	#[arg(short, long)]
	verbose: bool,
}

fn list_blocks(path: &Path) -> Result<(), RcdImportError> {
	let mut rd = RcdReader::new(BufReader::new(File::open(path)?))?;
	let mut ordinal = 0;
	while let Some(header) = rd.next_header()? {
		ordinal += 1;
		println!("  #{:<4} {} v{} ({} bytes)", ordinal, header.tag, header.version, header.length);
		rd.skip_payload(&header)?;
	}

	Ok(())
}

fn main() -> ExitCode {
	env_logger::init();
	let cli = Cli::parse();

	let mut catalog = Catalog::default();
	let mut failed = 0;

	for path in cli.paths.iter() {
		println!("{}", path.display());
		if cli.verbose {
			if let Err(e) = list_blocks(path) {
				error!("{}: {}", path.display(), e);
			}
		}

		match catalog.load(path) {
			Ok(stats) => println!("  {} blocks, {} skipped", stats.blocks, stats.skipped),
			Err(e) => {
				error!("{}: {}", path.display(), e);
				failed += 1;
			},
		}
	}

	println!("images: {}", catalog.images().len());
	println!("texts: {}", catalog.texts().len());
	println!("animations: {}", catalog.animations().len());
	println!("timed animations: {}", catalog.timed_animations().len());
	println!("tile widths: {:?}", catalog.stores().map(|s| s.width).collect::<Vec<_>>());
	println!("types: {}", catalog.types().len());
	println!("GUI complete: {}", catalog.gui().has_sufficient_graphics());

	if failed > 0 {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}
