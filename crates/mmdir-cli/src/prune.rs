use std::path::PathBuf;

use clap::{Parser, ValueHint};
use mmdir::{prune::prune_unreferenced, DirArchive};
use tracing::info;

#[derive(Debug, Clone, Parser)]
pub struct PruneArgs {
	/// Archive directory.
	#[arg(
		value_hint = ValueHint::DirPath,
		value_name = "PATH",
	)]
	pub archive: PathBuf,
}

pub(crate) fn prune(args: PruneArgs) -> miette::Result<()> {
	info!(path=?args.archive, "open archive");
	let archive = DirArchive::open(&args.archive);

	let removed = prune_unreferenced(&archive)?;
	for slot in &removed {
		println!("{slot}");
	}
	println!("removed {} unreferenced slots", removed.len());
	Ok(())
}
