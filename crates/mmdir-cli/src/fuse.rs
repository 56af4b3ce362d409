use std::path::PathBuf;

use clap::{Parser, ValueHint};
use mmdir::{fusion, open_archive};
use tracing::info;

#[derive(Debug, Clone, Parser)]
pub struct FuseArgs {
	/// First archive; its content and entry sets come first.
	#[arg(
		value_hint = ValueHint::AnyPath,
		value_name = "A",
	)]
	pub first: PathBuf,

	/// Second archive.
	#[arg(
		value_hint = ValueHint::AnyPath,
		value_name = "B",
	)]
	pub second: PathBuf,

	/// Where to create the fused archive. Must not exist.
	#[arg(
		value_hint = ValueHint::DirPath,
		value_name = "DEST",
	)]
	pub output: PathBuf,
}

pub(crate) fn fuse(args: FuseArgs) -> miette::Result<()> {
	info!(path=?args.first, "open first archive");
	let a = open_archive(&args.first)?;

	info!(path=?args.second, "open second archive");
	let b = open_archive(&args.second)?;

	let fused = fusion::fuse(&a, &b, &args.output)?;
	println!(
		"fused {} entry sets into {} ({} + {} slots, {} duplicates removed)",
		fused.entry_sets,
		fused.archive.root().display(),
		fused.slots_from_a,
		fused.slots_from_b,
		fused.dedup.duplicates.len()
	);
	Ok(())
}
