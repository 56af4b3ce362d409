use std::path::PathBuf;

use clap::{Parser, ValueHint};
use mmdir::MmZip;
use tracing::info;

#[derive(Debug, Clone, Parser)]
pub struct UnpackArgs {
	/// ZIP container.
	#[arg(
		value_hint = ValueHint::FilePath,
		value_name = "PATH",
	)]
	pub input: PathBuf,

	/// Where to create the archive directory. Must not exist.
	#[arg(
		value_hint = ValueHint::DirPath,
		value_name = "DEST",
	)]
	pub output: PathBuf,
}

pub(crate) fn unpack(args: UnpackArgs) -> miette::Result<()> {
	info!(path=?args.input, "open zip container");
	let zip = MmZip::open(&args.input)?;

	let archive = zip.unpack(&args.output)?;
	println!("unpacked to {}", archive.root().display());
	Ok(())
}
