use std::path::PathBuf;

use clap::{Parser, ValueHint};
use mmdir::{export, open_archive};
use tracing::info;

#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
	/// Archive directory or ZIP container.
	#[arg(
		value_hint = ValueHint::AnyPath,
		value_name = "PATH",
	)]
	pub archive: PathBuf,

	/// Where to extract to. Must not exist.
	#[arg(
		value_hint = ValueHint::DirPath,
		value_name = "DEST",
	)]
	pub output: PathBuf,

	/// Which entry set to extract, counting from zero.
	#[arg(long, short = 'n', default_value_t = 0)]
	pub entry_set: usize,
}

pub(crate) fn extract(args: ExtractArgs) -> miette::Result<()> {
	info!(path=?args.archive, "open archive");
	let archive = open_archive(&args.archive)?;

	let summary = export::extract(&archive, args.entry_set, &args.output)?;
	println!(
		"extracted {} files and {} directories ({} bytes) to {}",
		summary.files,
		summary.directories,
		summary.bytes,
		args.output.display()
	);
	Ok(())
}
