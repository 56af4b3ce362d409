use std::path::PathBuf;

use clap::{Parser, ValueHint};
use mmdir::{dedup, DirArchive};
use tracing::info;

#[derive(Debug, Clone, Parser)]
pub struct DedupeArgs {
	/// Archive directory.
	#[arg(
		value_hint = ValueHint::DirPath,
		value_name = "PATH",
	)]
	pub archive: PathBuf,

	/// Print each removed slot and the slot it was merged into.
	#[arg(long)]
	pub show: bool,
}

pub(crate) fn dedupe(args: DedupeArgs) -> miette::Result<()> {
	info!(path=?args.archive, "open archive");
	let archive = DirArchive::open(&args.archive);

	let report = dedup::dedupe(&archive)?;
	if args.show {
		for (duplicate, kept) in &report.duplicates {
			println!("{duplicate} -> {kept}");
		}
	}

	println!(
		"removed {} duplicate slots, rewrote {} entries in {} entry sets",
		report.duplicates.len(),
		report.rewritten_entries,
		report.rewritten_entry_sets
	);
	Ok(())
}
