use std::{
	fs::{self, File},
	io::{self, Read, Write},
	path::{Path, PathBuf},
};

use tracing::{debug, info, instrument, trace};
use zip::ZipArchive;

use super::{ArchiveHandle, DirArchive};
use crate::{
	constants::{DATA_DIR, INFO_DIR, INFO_FILE},
	error::{Error, ErrorKind, Result},
	manifest::{sort_manifests, sort_slots, EntrySet, Info, ManifestName, Slot, SlotName},
	ondemand::OnDemand,
};

/// ZIP-backed archive (an "MMZip").
///
/// A ZIP container whose members follow the directory layout: `mm_info/info.json`,
/// `mm_info/entry_set<N>.json`, `data/<NNNNN>`. Read-only.
///
/// The container is reopened through [`OnDemand`] for every operation, so several readers can
/// use the same source independently.
#[derive(Clone, Debug)]
pub struct MmZip<R = PathBuf> {
	source: R,
	location: PathBuf,
}

impl MmZip<PathBuf> {
	/// Open the ZIP file at `path`.
	///
	/// Checks that it reads as a ZIP container, but not that it holds an archive; see
	/// [`has_info`](ArchiveHandle::has_info).
	#[instrument(level = "debug", skip(path), fields(path = ?path.as_ref()))]
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref().to_path_buf();
		let zip = Self::with_source(path.clone(), path);
		let members = zip.container()?.len();
		debug!(%members, "opened zip container");
		Ok(zip)
	}
}

impl<R: OnDemand> MmZip<R> {
	/// Wrap any on-demand byte source; `location` is only used in messages.
	pub fn with_source(source: R, location: impl Into<PathBuf>) -> Self {
		Self {
			source,
			location: location.into(),
		}
	}

	fn container(&self) -> Result<ZipArchive<R::Reader>> {
		Ok(ZipArchive::new(self.source.open()?)?)
	}

	fn read_member(&self, member: &str) -> Result<Vec<u8>> {
		let mut container = self.container()?;
		let mut file = container.by_name(member).map_err(|err| match err {
			zip::result::ZipError::FileNotFound => ErrorKind::NotFound.with_message(format!(
				"{} has no member {member}",
				self.location.display()
			)),
			other => other.into(),
		})?;

		let mut bytes = Vec::with_capacity(usize::try_from(file.size()).unwrap_or_default());
		file.read_to_end(&mut bytes)?;
		Ok(bytes)
	}

	/// Restore the raw container contents into a new directory archive at `dest`.
	///
	/// This is a plain unzip, not an interpretation through the manifests. Fails with
	/// [`ErrorKind::AlreadyExists`] if `dest` exists, and with [`ErrorKind::Format`] on members
	/// whose names would land outside of `dest`.
	#[instrument(level = "debug", skip(self, dest), fields(zip = ?self.location, dest = ?dest.as_ref()))]
	pub fn unpack(&self, dest: impl AsRef<Path>) -> Result<DirArchive> {
		let dest = dest.as_ref();
		if dest.symlink_metadata().is_ok() {
			return Err(Error::already_exists(dest));
		}

		let mut container = self.container()?;
		fs::create_dir_all(dest)?;
		for index in 0..container.len() {
			let mut member = container.by_index(index)?;
			let Some(relative) = member.enclosed_name() else {
				return Err(ErrorKind::Format.with_message(format!(
					"member name escapes the destination: {:?}",
					member.name()
				)));
			};

			let path = dest.join(relative);
			if member.is_dir() {
				trace!(?path, "directory");
				fs::create_dir_all(&path)?;
				continue;
			}

			if let Some(parent) = path.parent() {
				fs::create_dir_all(parent)?;
			}
			let mut file = File::create(&path)?;
			let bytes = io::copy(&mut member, &mut file)?;
			trace!(?path, %bytes, "file");
		}

		info!(members = container.len(), "unpacked zip container");
		Ok(DirArchive::open(dest))
	}
}

impl<R: OnDemand> ArchiveHandle for MmZip<R> {
	fn location(&self) -> &Path {
		&self.location
	}

	fn info(&self) -> Result<Info> {
		Info::decode(&self.read_member(&format!("{INFO_DIR}/{INFO_FILE}"))?)
	}

	fn entry_set_names(&self) -> Result<Vec<ManifestName>> {
		let container = self.container()?;
		let prefix = format!("{INFO_DIR}/");
		let mut names: Vec<ManifestName> = container
			.file_names()
			.filter_map(|member| member.strip_prefix(&prefix))
			.filter(|file_name| !file_name.contains('/'))
			.filter_map(ManifestName::parse)
			.collect();

		sort_manifests(&mut names);
		Ok(names)
	}

	fn read_entry_set(&self, name: &ManifestName) -> Result<EntrySet> {
		EntrySet::decode(&self.read_member(&format!("{INFO_DIR}/{}", name.file_name()))?)
	}

	fn content_slots(&self) -> Result<Vec<Slot>> {
		let mut container = self.container()?;
		let prefix = format!("{DATA_DIR}/");
		let mut slots = Vec::new();
		for index in 0..container.len() {
			let member = container.by_index_raw(index)?;
			if member.is_dir() {
				continue;
			}

			let Some(file_name) = member.name().strip_prefix(&prefix) else {
				continue;
			};
			if file_name.is_empty() || file_name.contains('/') {
				continue;
			}

			slots.push(Slot {
				name: SlotName::from_file_name(file_name),
				size: member.size(),
			});
		}

		sort_slots(&mut slots);
		Ok(slots)
	}

	fn read_slot(&self, name: &SlotName) -> Result<Vec<u8>> {
		if name.file_name().is_none() {
			return Err(
				ErrorKind::NotFound.with_message(format!("not a content slot name: {name:?}"))
			);
		}

		self.read_member(name.as_str())
	}

	fn copy_slot(&self, name: &SlotName, writer: &mut dyn Write) -> Result<u64> {
		if name.file_name().is_none() {
			return Err(
				ErrorKind::NotFound.with_message(format!("not a content slot name: {name:?}"))
			);
		}

		let mut container = self.container()?;
		let mut file = container.by_name(name.as_str()).map_err(|err| match err {
			zip::result::ZipError::FileNotFound => {
				ErrorKind::NotFound.with_message(format!("no content slot {name}"))
			}
			other => Error::from(other),
		})?;
		Ok(io::copy(&mut file, writer)?)
	}
}
