use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::{
	dedupe::DedupeArgs, export::ExportArgs, extract::ExtractArgs, fuse::FuseArgs,
	import::ImportArgs, list::ListArgs, prune::PruneArgs, unpack::UnpackArgs,
};

/// Archives that keep file content apart from file metadata.
///
/// An mmdir archive is a directory with numbered content slots under `data/` and JSON entry set
/// manifests under `mm_info/`. Import ZIP or RAR files into it, fuse archives together, and
/// deduplicate their content.
#[derive(Debug, Clone, Parser)]
#[command(
	name = "mmdir",
	bin_name = "mmdir",
	author,
	version,
	after_help = "Want more detail? Try the long '--help' flag!",
	after_long_help = "Didn't expect this much output? Use the short '-h' flag to get short help."
)]
#[cfg_attr(debug_assertions, command(before_help = "⚠ DEBUG BUILD ⚠"))]
pub struct Args {
	/// Set diagnostic log level.
	///
	/// This enables diagnostic logging, which is useful for investigating bugs. Use multiple
	/// times to increase verbosity: warnings, then info, debug, and trace.
	///
	/// You may want to use with '--log-file' to avoid polluting your terminal.
	///
	/// Setting $RUST_LOG also works, and takes precedence, but is not recommended.
	#[arg(long, short, action = ArgAction::Count, global = true)]
	pub verbose: u8,

	/// Write diagnostic logs to a file.
	///
	/// This writes diagnostic logs to a file, instead of the terminal, in JSON format. If a log
	/// level was not already specified, this will set it to '-vvv'.
	///
	/// If a path is not provided, the default is the working directory. Note that with
	/// '--log-file <path>' the path is required; to use the default, omit the value.
	///
	/// If the path provided is a directory, a file will be created in that directory. The file
	/// name will be the current date and time, in the format 'mmdir.YYYY-MM-DDTHH-MM-SSZ.log'.
	#[arg(
		long,
		num_args = 0..=1,
		default_missing_value = ".",
		value_hint = ValueHint::AnyPath,
		value_name = "PATH",
		global = true,
	)]
	pub log_file: Option<PathBuf>,

	/// What to do.
	#[command(subcommand)]
	pub action: Action,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
	/// Import a ZIP or RAR file into a new archive.
	Import(ImportArgs),

	/// Fuse two archives into a new one, then deduplicate it.
	Fuse(FuseArgs),

	/// Deduplicate the content of an archive, in place.
	Dedupe(DedupeArgs),

	/// Extract an entry set to a file tree.
	Extract(ExtractArgs),

	/// Snapshot an archive directory into a ZIP container.
	Export(ExportArgs),

	/// Unpack a ZIP container back into an archive directory.
	Unpack(UnpackArgs),

	/// List the entries of an entry set.
	List(ListArgs),

	/// Delete content slots no entry refers to.
	Prune(PruneArgs),
}
