use std::{
	fs::{self, File, OpenOptions},
	io::{self, Write},
	path::{Path, PathBuf},
};

use tracing::{debug, info, instrument, trace, warn};

use super::ArchiveHandle;
use crate::{
	constants::{DATA_DIR, INFO_DIR, INFO_FILE},
	error::{Error, ErrorKind, Result},
	manifest::{sort_manifests, sort_slots, EntrySet, Info, ManifestName, Slot, SlotName},
};

/// Directory-backed archive.
///
/// Holds nothing but the root path: every operation goes to the filesystem, so the handle never
/// goes stale when another operation (like deduplication) changes the archive.
///
/// There is no locking. Only one writer may work on an archive at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirArchive {
	root: PathBuf,
}

impl DirArchive {
	/// Handle to an existing archive.
	///
	/// This doesn't check anything; see [`has_info`](ArchiveHandle::has_info).
	pub fn open(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Create a new, empty archive at `root`.
	///
	/// Fails with [`ErrorKind::AlreadyExists`] if anything is at `root` already, without touching
	/// it. If a later step fails, whatever was created so far is left in place for the caller to
	/// inspect or remove.
	#[instrument(level = "debug", skip(root), fields(root = ?root.as_ref()))]
	pub fn create(root: impl AsRef<Path>) -> Result<Self> {
		let root = root.as_ref();
		if root.symlink_metadata().is_ok() {
			return Err(Error::already_exists(root));
		}

		fs::create_dir(root).map_err(|err| {
			if err.kind() == io::ErrorKind::AlreadyExists {
				Error::already_exists(root)
			} else {
				err.into()
			}
		})?;

		let archive = Self::open(root);
		fs::create_dir(archive.data_dir())?;
		fs::create_dir(archive.info_dir())?;
		fs::write(archive.info_path(), Info::default().encode()?)?;

		info!(root = ?archive.root, "created archive");
		Ok(archive)
	}

	/// Archive root.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Content area.
	pub fn data_dir(&self) -> PathBuf {
		self.root.join(DATA_DIR)
	}

	/// Metadata area.
	pub fn info_dir(&self) -> PathBuf {
		self.root.join(INFO_DIR)
	}

	/// Info record.
	pub fn info_path(&self) -> PathBuf {
		self.info_dir().join(INFO_FILE)
	}

	/// Path of an entry set manifest.
	pub fn manifest_path(&self, name: &ManifestName) -> PathBuf {
		self.info_dir().join(name.file_name())
	}

	/// Path of a content slot.
	///
	/// Fails with [`ErrorKind::NotFound`] if the name doesn't point inside the content area.
	pub fn slot_path(&self, name: &SlotName) -> Result<PathBuf> {
		let file_name = name.file_name().ok_or_else(|| {
			ErrorKind::NotFound.with_message(format!("not a content slot name: {name:?}"))
		})?;
		Ok(self.data_dir().join(file_name))
	}

	/// Create an empty content slot numbered `number`, for the caller to write into.
	///
	/// Fails with [`ErrorKind::AlreadyExists`] if the slot is taken.
	pub fn create_slot(&self, number: u64) -> Result<(SlotName, File)> {
		let name = SlotName::from_number(number);
		let path = self.slot_path(&name)?;
		let file = OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(&path)
			.map_err(|err| {
				if err.kind() == io::ErrorKind::AlreadyExists {
					Error::already_exists(&path)
				} else {
					err.into()
				}
			})?;

		trace!(%name, "created slot");
		Ok((name, file))
	}

	/// Store `bytes` as content slot `number`.
	pub fn write_slot(&self, number: u64, bytes: &[u8]) -> Result<SlotName> {
		let (name, mut file) = self.create_slot(number)?;
		file.write_all(bytes)?;
		Ok(name)
	}

	/// Delete a content slot.
	pub fn remove_slot(&self, name: &SlotName) -> Result<()> {
		let path = self.slot_path(name)?;
		fs::remove_file(path)
			.map_err(|err| Error::from_missing(err, || format!("no content slot {name}")))?;
		debug!(%name, "removed slot");
		Ok(())
	}

	/// Write an entry set manifest, replacing any manifest of the same name.
	pub fn write_entry_set(&self, name: &ManifestName, set: &EntrySet) -> Result<()> {
		fs::write(self.manifest_path(name), set.encode()?)?;
		debug!(manifest = name.file_name(), entries = set.entries.len(), "wrote entry set");
		Ok(())
	}

	/// Write entry sets under standard names numbered from zero, in order.
	pub fn write_entry_sets<'s>(
		&self,
		sets: impl IntoIterator<Item = &'s EntrySet>,
	) -> Result<()> {
		for (number, set) in sets.into_iter().enumerate() {
			self.write_entry_set(&ManifestName::standard(number as u64), set)?;
		}
		Ok(())
	}
}

impl ArchiveHandle for DirArchive {
	fn location(&self) -> &Path {
		&self.root
	}

	fn info(&self) -> Result<Info> {
		let bytes = fs::read(self.info_path()).map_err(|err| {
			Error::from_missing(err, || {
				format!("{} has no info record", self.root.display())
			})
		})?;
		Info::decode(&bytes)
	}

	fn entry_set_names(&self) -> Result<Vec<ManifestName>> {
		let dir = self.info_dir();
		let listing = fs::read_dir(&dir).map_err(|err| {
			Error::from_missing(err, || {
				format!("{} has no metadata area", self.root.display())
			})
		})?;

		let mut names = Vec::new();
		for entry in listing {
			let entry = entry?;
			if !entry.file_type()?.is_file() {
				continue;
			}

			let file_name = entry.file_name();
			let Some(name) = file_name.to_str().and_then(ManifestName::parse) else {
				trace!(?file_name, "not an entry set manifest");
				continue;
			};
			names.push(name);
		}

		sort_manifests(&mut names);
		Ok(names)
	}

	fn read_entry_set(&self, name: &ManifestName) -> Result<EntrySet> {
		let bytes = fs::read(self.manifest_path(name)).map_err(|err| {
			Error::from_missing(err, || format!("no entry set manifest {}", name.file_name()))
		})?;
		EntrySet::decode(&bytes)
	}

	fn content_slots(&self) -> Result<Vec<Slot>> {
		let listing = fs::read_dir(self.data_dir()).map_err(|err| {
			Error::from_missing(err, || {
				format!("{} has no content area", self.root.display())
			})
		})?;

		let mut slots = Vec::new();
		for entry in listing {
			let entry = entry?;
			let meta = entry.metadata()?;
			if !meta.is_file() {
				continue;
			}

			let file_name = entry.file_name();
			let Some(file_name) = file_name.to_str() else {
				warn!(?file_name, "skipping content file with non-UTF-8 name");
				continue;
			};

			slots.push(Slot {
				name: SlotName::from_file_name(file_name),
				size: meta.len(),
			});
		}

		sort_slots(&mut slots);
		Ok(slots)
	}

	fn read_slot(&self, name: &SlotName) -> Result<Vec<u8>> {
		let path = self.slot_path(name)?;
		fs::read(path).map_err(|err| Error::from_missing(err, || format!("no content slot {name}")))
	}

	fn copy_slot(&self, name: &SlotName, writer: &mut dyn Write) -> Result<u64> {
		let path = self.slot_path(name)?;
		let mut file = File::open(path)
			.map_err(|err| Error::from_missing(err, || format!("no content slot {name}")))?;
		Ok(io::copy(&mut file, writer)?)
	}
}
