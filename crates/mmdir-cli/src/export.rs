use std::path::PathBuf;

use clap::{Parser, ValueHint};
use mmdir::{export::export_to_zip, DirArchive};
use tracing::info;

#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
	/// Archive directory.
	#[arg(
		value_hint = ValueHint::DirPath,
		value_name = "PATH",
	)]
	pub archive: PathBuf,

	/// ZIP file to write. Must not exist.
	#[arg(
		value_hint = ValueHint::FilePath,
		value_name = "DEST",
	)]
	pub output: PathBuf,
}

pub(crate) fn export(args: ExportArgs) -> miette::Result<()> {
	info!(path=?args.archive, "open archive");
	let archive = DirArchive::open(&args.archive);

	let files = export_to_zip(&archive, &args.output)?;
	println!("wrote {files} files to {}", args.output.display());
	Ok(())
}
