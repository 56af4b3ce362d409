use std::{
	fs::File,
	io::Read,
	path::{Component, Path, PathBuf},
};

use chrono::{NaiveDateTime, TimeZone, Utc};
use tempfile::TempDir;
use tracing::{debug, instrument, trace};

use super::{source_name, ForeignArchive, ForeignEntry};
use crate::{
	error::{ErrorKind, Result},
	manifest::EntryTime,
};

/// RAR file as an import source.
///
/// The `rar` crate only decodes whole archives, so the archive is unpacked into a scratch
/// directory when opened (and cleaned up on drop). Members are listed in the archive's own order
/// with directory status and modification time from their file headers; only file content is read
/// back from the scratch copy. The crate exposes neither the archive comment nor member comments,
/// so both are recorded empty.
#[derive(Debug)]
pub struct RarSource {
	name: String,
	scratch: TempDir,
	members: Vec<ForeignEntry>,
}

impl RarSource {
	/// Unpack the RAR file at `path` into a scratch directory.
	#[instrument(level = "debug")]
	pub fn open(path: &Path) -> Result<Self> {
		let path_str = path.to_str().ok_or_else(|| {
			ErrorKind::InvalidArchive.with_message("RAR path contains invalid UTF-8")
		})?;

		let scratch = tempfile::tempdir()?;
		let scratch_str = scratch.path().to_str().ok_or_else(|| {
			ErrorKind::InvalidArchive.with_message("scratch path contains invalid UTF-8")
		})?;

		let archive = rar::Archive::extract_all(path_str, scratch_str, "").map_err(|err| {
			ErrorKind::Format
				.with_message(format!("failed to read RAR {}: {err:?}", path.display()))
		})?;

		let members: Vec<ForeignEntry> = archive
			.files
			.iter()
			.map(|file| {
				let modified = file
					.extra
					.file_time
					.as_ref()
					.and_then(|time| time.modification_time);
				let entry = ForeignEntry {
					name: file.name.to_string(),
					is_dir: file.flags.directory,
					date_time: member_time(modified, file.flags.time.then_some(file.mtime)),
					comment: String::new(),
				};
				trace!(?entry, "rar member");
				entry
			})
			.collect();
		debug!(members = members.len(), "unpacked rar archive");

		Ok(Self {
			name: source_name(path),
			scratch,
			members,
		})
	}

	fn scratch_path(&self, member: &str) -> Result<PathBuf> {
		let mut path = self.scratch.path().to_path_buf();
		for component in Path::new(&member.replace('\\', "/")).components() {
			match component {
				Component::Normal(part) => path.push(part),
				Component::CurDir => {}
				_ => {
					return Err(ErrorKind::Format.with_message(format!(
						"RAR member name escapes the archive: {member:?}"
					)))
				}
			}
		}
		Ok(path)
	}
}

/// Modification time of a member: the extended time record (UTC) wins over the header's Unix
/// seconds; with neither, the DOS epoch.
fn member_time(extended: Option<NaiveDateTime>, unix: Option<u32>) -> EntryTime {
	extended
		.map(|naive| Utc.from_utc_datetime(&naive))
		.or_else(|| unix.and_then(|secs| Utc.timestamp_opt(i64::from(secs), 0).single()))
		.map_or(EntryTime::DOS_EPOCH, EntryTime::from)
}

impl ForeignArchive for RarSource {
	fn source_name(&self) -> &str {
		&self.name
	}

	fn comment(&self) -> Result<String> {
		Ok(String::new())
	}

	fn entries(&mut self) -> Result<Vec<ForeignEntry>> {
		Ok(self.members.clone())
	}

	fn open_entry(&mut self, index: usize) -> Result<Box<dyn Read + '_>> {
		let member = self.members.get(index).ok_or_else(|| {
			ErrorKind::NotFound.with_message(format!("no RAR member at index {index}"))
		})?;
		if member.is_dir {
			return Err(ErrorKind::NotFound.with_message(format!(
				"RAR member {:?} is a directory",
				member.name
			)));
		}

		Ok(Box::new(File::open(self.scratch_path(&member.name)?)?))
	}
}
