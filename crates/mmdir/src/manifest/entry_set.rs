use serde::{Deserialize, Serialize};

use super::{entry::Entry, slot::SlotName};
use crate::error::{ErrorKind, Result};

/// Entry set: one manifest layer.
///
/// Describes the tree imported from one source archive: its file name, its entries in listing
/// order, and its comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntrySet {
	/// Name of the originating archive.
	pub file_name: String,

	/// Entries, in listing order.
	#[serde(rename = "entry_list")]
	pub entries: Vec<Entry>,

	/// Comment of the originating archive.
	#[serde(default)]
	pub comment: String,
}

impl EntrySet {
	/// New empty entry set.
	pub fn new(file_name: impl Into<String>, comment: impl Into<String>) -> Self {
		Self {
			file_name: file_name.into(),
			entries: Vec::new(),
			comment: comment.into(),
		}
	}

	/// Decode from JSON, checking every entry.
	pub fn decode(bytes: &[u8]) -> Result<Self> {
		let set: Self = serde_json::from_slice(bytes)?;
		if let Some(entry) = set.entries.iter().find(|entry| !entry.is_consistent()) {
			return Err(ErrorKind::Format.with_message(format!(
				"entry {:?} in entry set {:?}: is_dir is {} but entry_name is {:?}",
				entry.file_name, set.file_name, entry.is_dir, entry.entry_name
			)));
		}

		Ok(set)
	}

	/// Encode to JSON.
	pub fn encode(&self) -> Result<Vec<u8>> {
		Ok(serde_json::to_vec(self)?)
	}

	/// Slot references of all file entries, in entry order.
	pub fn slot_refs(&self) -> impl Iterator<Item = &SlotName> + '_ {
		self.entries
			.iter()
			.filter_map(|entry| entry.entry_name.as_ref())
	}

	/// Rewrite slot references.
	///
	/// `rewrite` is called for each file entry's slot; where it returns a name, the entry is
	/// changed to point there. Directories are left alone. Returns how many entries changed.
	pub fn rewrite_slots(
		&mut self,
		mut rewrite: impl FnMut(&SlotName) -> Option<SlotName>,
	) -> usize {
		let mut changed = 0;
		for entry in &mut self.entries {
			let Some(slot) = entry.entry_name.as_mut() else {
				continue;
			};

			if let Some(new) = rewrite(slot) {
				if new != *slot {
					*slot = new;
					changed += 1;
				}
			}
		}
		changed
	}
}
