//! Exporter: turn an archive back into files.
//!
//! - [`extract`] materialises one entry set as a file tree, restoring modification times.
//! - [`export_to_zip`] snapshots a whole directory archive, manifests and content alike, into a
//!   ZIP container that [`MmZip`](crate::MmZip) can read.

use std::{
	fs::{self, File, OpenOptions},
	io::{self, Write},
	path::{Path, PathBuf},
};

use filetime::FileTime;
use tracing::{debug, info, instrument, trace};
use walkdir::WalkDir;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::{
	error::{Error, ErrorKind, Result},
	handle::{ArchiveHandle, DirArchive},
	manifest::{Entry, SlotName},
};

/// What an extraction produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractSummary {
	/// Directories created for directory entries.
	pub directories: usize,

	/// Files written.
	pub files: usize,

	/// Total bytes written.
	pub bytes: u64,
}

enum Step<'e> {
	Directory,
	File(&'e SlotName),
}

/// Extract entry set `index` of `archive` into a new directory at `dest`.
///
/// Fails with [`ErrorKind::NotFound`] if there's no such entry set, and with
/// [`ErrorKind::AlreadyExists`] if `dest` exists. Entry names and timestamps are all checked
/// before anything is written.
///
/// Entries are processed in manifest order. Parent directories are created as needed, whether or
/// not the manifest lists them first. Every directory and file gets its entry's timestamp as both
/// access and modification time; directory timestamps are applied again at the end, as writing
/// children into a directory changes its modification time.
#[instrument(level = "debug", skip(archive, dest), fields(archive = ?archive.location(), dest = ?dest.as_ref()))]
pub fn extract(
	archive: &(impl ArchiveHandle + ?Sized),
	index: usize,
	dest: impl AsRef<Path>,
) -> Result<ExtractSummary> {
	let dest = dest.as_ref();
	let set = archive.entry_set(index)?;
	if dest.symlink_metadata().is_ok() {
		return Err(Error::already_exists(dest));
	}

	let mut plan = Vec::with_capacity(set.entries.len());
	for entry in &set.entries {
		let path = dest.join(entry.relative_path()?);
		let time = file_time(entry)?;
		let step = match (&entry.entry_name, entry.is_dir) {
			(None, true) => Step::Directory,
			(Some(slot), false) => Step::File(slot),
			_ => {
				return Err(ErrorKind::Format.with_message(format!(
					"entry {:?} is inconsistent",
					entry.file_name
				)))
			}
		};
		plan.push((path, time, step));
	}

	info!(entries = plan.len(), set = %set.file_name, "extract entry set");
	fs::create_dir_all(dest)?;

	let mut summary = ExtractSummary::default();
	let mut directories: Vec<(&PathBuf, FileTime)> = Vec::new();
	for (path, time, step) in &plan {
		match step {
			Step::Directory => {
				trace!(?path, "directory");
				fs::create_dir_all(path)?;
				set_timestamps(path, *time)?;
				directories.push((path, *time));
				summary.directories += 1;
			}
			Step::File(slot) => {
				if let Some(parent) = path.parent() {
					fs::create_dir_all(parent)?;
				}

				let mut file = File::create(path)?;
				let bytes = archive.copy_slot(slot, &mut file)?;
				file.flush()?;
				drop(file);

				trace!(?path, %slot, %bytes, "file");
				set_timestamps(path, *time)?;
				summary.files += 1;
				summary.bytes += bytes;
			}
		}
	}

	for (path, time) in directories.into_iter().rev() {
		set_timestamps(path, time)?;
	}

	info!(
		directories = summary.directories,
		files = summary.files,
		bytes = summary.bytes,
		"extracted entry set"
	);
	Ok(summary)
}

fn file_time(entry: &Entry) -> Result<FileTime> {
	let seconds = entry.date_time.unix_seconds().ok_or_else(|| {
		ErrorKind::Format.with_message(format!(
			"entry {:?} has an invalid timestamp: {}",
			entry.file_name, entry.date_time
		))
	})?;
	Ok(FileTime::from_unix_time(seconds, 0))
}

/// Set access and modification time of a file or directory.
#[instrument(level = "trace")]
fn set_timestamps(path: &Path, time: FileTime) -> io::Result<()> {
	filetime::set_file_times(path, time, time)
}

/// Snapshot the directory archive into a new ZIP container at `dest`.
///
/// Every file under the archive root goes in, at its root-relative path, deflate-compressed, in
/// file name order. This copies the container as it is on disk and doesn't look at manifests.
///
/// Fails with [`ErrorKind::AlreadyExists`] if `dest` exists, and with
/// [`ErrorKind::InvalidArchive`] if the root holds no archive or `dest` is inside it. Nothing is
/// created on failure. Returns the number of files
/// written.
#[instrument(level = "debug", skip(archive, dest), fields(root = ?archive.root(), dest = ?dest.as_ref()))]
pub fn export_to_zip(archive: &DirArchive, dest: impl AsRef<Path>) -> Result<usize> {
	let dest = dest.as_ref();
	let root = archive.root();
	if dest.symlink_metadata().is_ok() {
		return Err(Error::already_exists(dest));
	}
	if !archive.has_info() {
		return Err(ErrorKind::InvalidArchive.with_message(format!(
			"{} is not a directory archive",
			root.display()
		)));
	}
	if let (Ok(root), Some(parent)) = (root.canonicalize(), dest.parent()) {
		let parent = if parent.as_os_str().is_empty() {
			Path::new(".")
		} else {
			parent
		};
		if parent.canonicalize().map_or(false, |parent| parent.starts_with(&root)) {
			return Err(ErrorKind::InvalidArchive.with_message(format!(
				"cannot export {} into itself",
				archive.root().display()
			)));
		}
	}

	let file = OpenOptions::new()
		.write(true)
		.create_new(true)
		.open(dest)?;
	let mut zip = ZipWriter::new(file);
	let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

	let mut count = 0;
	for entry in WalkDir::new(root).sort_by_file_name() {
		let entry = entry?;
		if !entry.file_type().is_file() {
			continue;
		}

		let relative = entry.path().strip_prefix(root).map_err(io::Error::other)?;
		let member = relative
			.components()
			.map(|c| c.as_os_str().to_string_lossy())
			.collect::<Vec<_>>()
			.join("/");

		trace!(%member, "add file");
		zip.start_file(member, options)?;
		io::copy(&mut File::open(entry.path())?, &mut zip)?;
		count += 1;
	}

	zip.finish()?;
	debug!(files = count, "finished zip container");
	Ok(count)
}
