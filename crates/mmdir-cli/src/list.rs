use std::path::PathBuf;

use clap::{Parser, ValueHint};
use mmdir::{open_archive, ArchiveHandle};
use regex::Regex;
use tracing::info;

#[derive(Debug, Clone, Parser)]
pub struct ListArgs {
	/// Archive directory or ZIP container.
	#[arg(
		value_hint = ValueHint::AnyPath,
		value_name = "PATH",
	)]
	pub archive: PathBuf,

	/// Which entry set to list, counting from zero.
	#[arg(long, short = 'n', default_value_t = 0)]
	pub entry_set: usize,

	/// List the entry sets themselves instead of their entries.
	///
	/// Prints one line per entry set: its index, source file name, entry count, and comment.
	#[arg(long, conflicts_with_all = ["entry_set", "only_files", "decorate", "slots", "filter"])]
	pub sets: bool,

	/// List only files.
	#[arg(long)]
	pub only_files: bool,

	/// Indicate filetypes with suffixes.
	///
	/// Directories are marked with a '/' suffix, if their name doesn't already end with one.
	#[arg(long)]
	pub decorate: bool,

	/// Also print the content slot of each file.
	#[arg(long)]
	pub slots: bool,

	/// Filter entries by name (with a regex).
	///
	/// Can be given multiple times, and entries will be matched if they match any of the regexes.
	#[arg(long, value_name = "REGEX")]
	pub filter: Vec<Regex>,
}

pub(crate) fn list(args: ListArgs) -> miette::Result<()> {
	info!(path=?args.archive, "open archive");
	let archive = open_archive(&args.archive)?;

	if args.sets {
		info!("list entry sets");
		for (index, set) in archive.list_entry_sets()?.iter().enumerate() {
			println!(
				"{index}\t{}\t{}\t{}",
				set.file_name,
				set.entries.len(),
				set.comment
			);
		}
		return Ok(());
	}

	info!(index = args.entry_set, "read entry set");
	let set = archive.entry_set(args.entry_set)?;

	for entry in &set.entries {
		if args.only_files && entry.is_dir {
			continue;
		}

		let name = &entry.file_name;
		if !args.filter.is_empty() && !args.filter.iter().any(|filter| filter.is_match(name)) {
			continue;
		}

		print!("{name}");
		if args.decorate && entry.is_dir && !name.ends_with('/') {
			print!("/");
		}
		if let (true, Some(slot)) = (args.slots, &entry.entry_name) {
			print!("\t{slot}");
		}

		println!();
	}

	Ok(())
}
