use std::path::PathBuf;

use clap::{Parser, ValueEnum, ValueHint};
use mmdir::import::{import_as, import_path, ArchiveFormat};
use tracing::info;

#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
	/// Foreign archive to import.
	#[arg(
		value_hint = ValueHint::FilePath,
		value_name = "PATH",
	)]
	pub input: PathBuf,

	/// Where to create the archive. Must not exist.
	#[arg(
		value_hint = ValueHint::DirPath,
		value_name = "DEST",
	)]
	pub output: PathBuf,

	/// Format of the input, if its extension doesn't say.
	#[arg(long)]
	pub format: Option<Format>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
	Zip,
	Rar,
}

impl From<Format> for ArchiveFormat {
	fn from(format: Format) -> Self {
		match format {
			Format::Zip => Self::Zip,
			Format::Rar => Self::Rar,
		}
	}
}

pub(crate) fn import(args: ImportArgs) -> miette::Result<()> {
	info!(input=?args.input, output=?args.output, "import foreign archive");
	let (archive, summary) = match args.format {
		Some(format) => import_as(format.into(), &args.input, &args.output)?,
		None => import_path(&args.input, &args.output)?,
	};

	println!(
		"imported {} entries into {} ({} slots, {} bytes)",
		summary.entries,
		archive.root().display(),
		summary.slots,
		summary.bytes
	);
	Ok(())
}
