use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DATA_DIR, SLOT_DIGITS};

/// Reference to a content slot.
///
/// This is the slot's path relative to the archive root, like `data/00001`. It is only a name:
/// resolve it through an [`ArchiveHandle`](crate::ArchiveHandle) each time, as deduplication
/// rewrites which names exist.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotName(String);

impl SlotName {
	/// The name of slot number `number`.
	pub fn from_number(number: u64) -> Self {
		Self(format!("{DATA_DIR}/{number:0width$}", width = SLOT_DIGITS))
	}

	/// The name of a slot stored as `file_name` in the content area.
	pub fn from_file_name(file_name: &str) -> Self {
		Self(format!("{DATA_DIR}/{file_name}"))
	}

	/// The reference as written in manifests.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// File name of the slot inside the content area.
	///
	/// Returns `None` if this doesn't name a plain file directly inside the content area, so a
	/// hostile manifest can't make a handle read outside of it.
	pub fn file_name(&self) -> Option<&str> {
		let name = self.0.strip_prefix(DATA_DIR)?.strip_prefix('/')?;
		if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
			None
		} else {
			Some(name)
		}
	}

	/// Slot number, if the file name is all digits.
	pub fn number(&self) -> Option<u64> {
		let name = self.file_name()?;
		if name.bytes().all(|b| b.is_ascii_digit()) {
			name.parse().ok()
		} else {
			None
		}
	}

	/// Key for ascending slot order: numbered slots by number, then anything else by name.
	pub fn sort_key(&self) -> (u64, &str) {
		(self.number().unwrap_or(u64::MAX), self.as_str())
	}
}

impl fmt::Display for SlotName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for SlotName {
	fn from(name: String) -> Self {
		Self(name)
	}
}

impl From<&str> for SlotName {
	fn from(name: &str) -> Self {
		Self(name.into())
	}
}

/// A content slot as listed by an archive handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slot {
	/// Slot reference.
	pub name: SlotName,

	/// Size in bytes.
	pub size: u64,
}

/// Sort slots into ascending slot order.
pub fn sort_slots(slots: &mut [Slot]) {
	slots.sort_by(|a, b| a.name.sort_key().cmp(&b.name.sort_key()));
}
