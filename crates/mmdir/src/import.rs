//! Importer: turn a foreign archive (ZIP or RAR) into a new directory archive.
//!
//! Every non-directory member's bytes go into a fresh content slot, numbered from
//! [`IMPORT_FIRST_SLOT`] in listing order, and the whole listing becomes a single entry set
//! named after the foreign archive's file name. The entry set is written last, once every slot
//! has been copied: a failure part way leaves slots behind but never a manifest.

use std::{
	io::{self, Read},
	path::Path,
};

use tracing::{debug, info, instrument, trace};

use crate::{
	constants::IMPORT_FIRST_SLOT,
	error::{ErrorKind, Result},
	handle::DirArchive,
	manifest::{Entry, EntrySet, EntryTime, ManifestName},
};

#[doc(inline)]
pub use self::rar_source::RarSource;
#[doc(inline)]
pub use self::zip_source::ZipSource;

mod rar_source;
mod zip_source;

/// One member of a foreign archive, as listed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignEntry {
	/// Member name, as stored.
	pub name: String,

	/// Whether this is a directory.
	pub is_dir: bool,

	/// Modification time.
	pub date_time: EntryTime,

	/// Member comment.
	pub comment: String,
}

/// A foreign archive the importer can read.
pub trait ForeignArchive {
	/// File name of the archive, which names the imported entry set.
	fn source_name(&self) -> &str;

	/// Archive-level comment.
	fn comment(&self) -> Result<String>;

	/// Members, in listing order.
	fn entries(&mut self) -> Result<Vec<ForeignEntry>>;

	/// Open the decompressed contents of the member at `index` in the listing.
	fn open_entry(&mut self, index: usize) -> Result<Box<dyn Read + '_>>;
}

/// Supported foreign archive formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
	/// ZIP.
	Zip,

	/// RAR.
	Rar,
}

impl ArchiveFormat {
	/// Guess the format from a file extension.
	pub fn from_path(path: &Path) -> Option<Self> {
		let ext = path.extension()?.to_str()?.to_ascii_lowercase();
		match ext.as_str() {
			"zip" => Some(Self::Zip),
			"rar" => Some(Self::Rar),
			_ => None,
		}
	}
}

/// What an import produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportSummary {
	/// Entries recorded in the entry set.
	pub entries: usize,

	/// Content slots written.
	pub slots: usize,

	/// Total bytes copied into slots.
	pub bytes: u64,
}

/// Import the archive at `path`, detecting its format from the extension.
///
/// Fails with [`ErrorKind::InvalidArchive`] for unknown extensions.
pub fn import_path(path: &Path, dest: &Path) -> Result<(DirArchive, ImportSummary)> {
	let format = ArchiveFormat::from_path(path).ok_or_else(|| {
		ErrorKind::InvalidArchive
			.with_message(format!("unsupported archive format: {}", path.display()))
	})?;

	import_as(format, path, dest)
}

/// Import the archive at `path` as the given format.
pub fn import_as(
	format: ArchiveFormat,
	path: &Path,
	dest: &Path,
) -> Result<(DirArchive, ImportSummary)> {
	match format {
		ArchiveFormat::Zip => import(&mut ZipSource::open(path)?, dest),
		ArchiveFormat::Rar => import(&mut RarSource::open(path)?, dest),
	}
}

/// Import a foreign archive into a new directory archive at `dest`.
///
/// Fails with [`ErrorKind::AlreadyExists`] if `dest` exists.
#[instrument(level = "debug", skip(source), fields(source = source.source_name()))]
pub fn import(
	source: &mut (impl ForeignArchive + ?Sized),
	dest: &Path,
) -> Result<(DirArchive, ImportSummary)> {
	let archive = DirArchive::create(dest)?;

	let comment = source.comment()?;
	let listing = source.entries()?;
	debug!(members = listing.len(), "listed foreign archive");

	let mut set = EntrySet::new(source.source_name(), comment);
	let mut next_slot = IMPORT_FIRST_SLOT;
	let mut summary = ImportSummary {
		entries: 0,
		slots: 0,
		bytes: 0,
	};

	for (index, member) in listing.into_iter().enumerate() {
		let entry = if member.is_dir {
			trace!(name = %member.name, "directory");
			Entry::directory(member.name, member.date_time)
		} else {
			let (slot, mut file) = archive.create_slot(next_slot)?;
			let mut reader = source.open_entry(index)?;
			let bytes = io::copy(&mut reader, &mut file)?;
			trace!(name = %member.name, %slot, %bytes, "file");

			next_slot += 1;
			summary.slots += 1;
			summary.bytes += bytes;
			Entry::file(member.name, member.date_time, slot)
		};

		set.entries.push(entry.with_comment(member.comment));
	}

	summary.entries = set.entries.len();
	archive.write_entry_set(&ManifestName::standard(0), &set)?;

	info!(
		entries = summary.entries,
		slots = summary.slots,
		bytes = summary.bytes,
		"imported foreign archive"
	);
	Ok((archive, summary))
}

/// File name part of a path, for naming entry sets.
pub(crate) fn source_name(path: &Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default()
}
