//! Archive handles: uniform access to MMDir archives.
//!
//! An archive is read through the [`ArchiveHandle`] trait, whatever its physical backing:
//!
//! - [`DirArchive`]: a plain directory. Readable and writable; this is what the importer and
//!   fusion create, and what deduplication works on.
//! - [`MmZip`]: a ZIP container holding the same layout, as produced by
//!   [`export_to_zip`](crate::export::export_to_zip). Read-only.

use std::{io::Write, path::Path};

use tracing::{debug, instrument};

use crate::{
	error::{Error, ErrorKind, Result},
	manifest::{EntrySet, Info, ManifestName, Slot, SlotName},
};

#[doc(inline)]
pub use self::container::MmZip;
#[doc(inline)]
pub use self::directory::DirArchive;

mod container;
mod directory;

/// Read access to an MMDir archive.
pub trait ArchiveHandle {
	/// Where the archive is, for messages.
	fn location(&self) -> &Path;

	/// Read the info record.
	fn info(&self) -> Result<Info>;

	/// Returns `true` if the info record is present and readable.
	fn has_info(&self) -> bool {
		self.info().is_ok()
	}

	/// Names of the entry set manifests, in positional order.
	///
	/// Standard-named manifests come first, then legacy-named ones, each by number.
	fn entry_set_names(&self) -> Result<Vec<ManifestName>>;

	/// Read one entry set manifest by name.
	fn read_entry_set(&self, name: &ManifestName) -> Result<EntrySet>;

	/// All entry sets, in positional order.
	fn list_entry_sets(&self) -> Result<Vec<EntrySet>> {
		self.entry_set_names()?
			.iter()
			.map(|name| self.read_entry_set(name))
			.collect()
	}

	/// Number of entry sets.
	fn entry_set_count(&self) -> Result<usize> {
		self.entry_set_names().map(|names| names.len())
	}

	/// The entry set at position `index`.
	///
	/// Fails with [`ErrorKind::NotFound`] if there's no such position.
	fn entry_set(&self, index: usize) -> Result<EntrySet> {
		let names = self.entry_set_names()?;
		let Some(name) = names.get(index) else {
			return Err(ErrorKind::NotFound.with_message(format!(
				"entry set {index} not found, {} has {} entry sets",
				self.location().display(),
				names.len()
			)));
		};

		debug!(manifest = name.file_name(), "read entry set");
		self.read_entry_set(name)
	}

	/// Content slots, in ascending slot order.
	fn content_slots(&self) -> Result<Vec<Slot>>;

	/// Read a content slot entirely.
	///
	/// Fails with [`ErrorKind::NotFound`] if there's no such slot.
	fn read_slot(&self, name: &SlotName) -> Result<Vec<u8>>;

	/// Copy a content slot into a writer, returning the number of bytes copied.
	fn copy_slot(&self, name: &SlotName, writer: &mut dyn Write) -> Result<u64> {
		let bytes = self.read_slot(name)?;
		writer.write_all(&bytes)?;
		Ok(bytes.len() as u64)
	}
}

/// Open an archive at `path`: a directory archive if it's a directory, an MMZip otherwise.
#[instrument(level = "debug")]
pub fn open_archive(path: &Path) -> Result<Box<dyn ArchiveHandle>> {
	let meta = path
		.metadata()
		.map_err(|err| Error::from_missing(err, || format!("no archive at {}", path.display())))?;

	if meta.is_dir() {
		debug!("directory archive");
		Ok(Box::new(DirArchive::open(path)))
	} else {
		debug!("zip-backed archive");
		Ok(Box::new(MmZip::open(path)?))
	}
}

impl<H: ArchiveHandle + ?Sized> ArchiveHandle for Box<H> {
	fn location(&self) -> &Path {
		(**self).location()
	}

	fn info(&self) -> Result<Info> {
		(**self).info()
	}

	fn has_info(&self) -> bool {
		(**self).has_info()
	}

	fn entry_set_names(&self) -> Result<Vec<ManifestName>> {
		(**self).entry_set_names()
	}

	fn read_entry_set(&self, name: &ManifestName) -> Result<EntrySet> {
		(**self).read_entry_set(name)
	}

	fn content_slots(&self) -> Result<Vec<Slot>> {
		(**self).content_slots()
	}

	fn read_slot(&self, name: &SlotName) -> Result<Vec<u8>> {
		(**self).read_slot(name)
	}

	fn copy_slot(&self, name: &SlotName, writer: &mut dyn Write) -> Result<u64> {
		(**self).copy_slot(name, writer)
	}
}
