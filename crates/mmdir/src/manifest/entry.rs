use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{slot::SlotName, timestamps::EntryTime};
use crate::error::{ErrorKind, Result};

/// Entry set entry: one file or directory.
///
/// Directories have no content; files point at exactly one content slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
	/// Path within the represented tree, `/`-separated.
	pub file_name: String,

	/// Modification time.
	pub date_time: EntryTime,

	/// Whether this is a directory.
	pub is_dir: bool,

	/// Free-form comment.
	#[serde(default)]
	pub comment: String,

	/// Content slot, `None` if and only if this is a directory.
	///
	/// The field itself is required in the record, even when null.
	#[serde(deserialize_with = "Option::deserialize")]
	pub entry_name: Option<SlotName>,
}

impl Entry {
	/// New file entry with content in `slot`.
	pub fn file(file_name: impl Into<String>, date_time: EntryTime, slot: SlotName) -> Self {
		Self {
			file_name: file_name.into(),
			date_time,
			is_dir: false,
			comment: String::new(),
			entry_name: Some(slot),
		}
	}

	/// New directory entry.
	pub fn directory(file_name: impl Into<String>, date_time: EntryTime) -> Self {
		Self {
			file_name: file_name.into(),
			date_time,
			is_dir: true,
			comment: String::new(),
			entry_name: None,
		}
	}

	/// Set the comment.
	pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = comment.into();
		self
	}

	/// Returns `true` if the directory flag and the slot reference agree.
	pub fn is_consistent(&self) -> bool {
		self.is_dir == self.entry_name.is_none()
	}

	/// Relative filesystem path for this entry.
	///
	/// Fails if the name would land outside of the tree it's extracted into.
	pub fn relative_path(&self) -> Result<PathBuf> {
		let mut path = PathBuf::new();
		for component in Path::new(&self.file_name).components() {
			match component {
				Component::Normal(part) => path.push(part),
				Component::CurDir => {}
				Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
					return Err(ErrorKind::Format.with_message(format!(
						"entry name escapes the extraction root: {:?}",
						self.file_name
					)));
				}
			}
		}

		if path.as_os_str().is_empty() {
			return Err(ErrorKind::Format.with_message(format!(
				"entry name is empty: {:?}",
				self.file_name
			)));
		}

		Ok(path)
	}
}
