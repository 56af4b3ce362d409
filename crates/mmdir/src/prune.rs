//! Opt-in removal of unreferenced content slots.
//!
//! Deduplication and fusion never delete a slot just because nothing points at it any more. This
//! is the separate pass that does, and it only runs when asked for.

use std::collections::HashSet;

use tracing::{debug, info, instrument};

use crate::{
	error::Result,
	handle::{ArchiveHandle, DirArchive},
	manifest::SlotName,
};

/// Delete every content slot that no entry of any entry set references.
///
/// Returns the names of the deleted slots, in slot order.
#[instrument(level = "debug", skip(archive), fields(root = ?archive.root()))]
pub fn prune_unreferenced(archive: &DirArchive) -> Result<Vec<SlotName>> {
	let referenced: HashSet<SlotName> = archive
		.list_entry_sets()?
		.iter()
		.flat_map(|set| set.slot_refs().cloned())
		.collect();
	debug!(referenced = referenced.len(), "collected references");

	let mut removed = Vec::new();
	for slot in archive.content_slots()? {
		if !referenced.contains(&slot.name) {
			archive.remove_slot(&slot.name)?;
			removed.push(slot.name);
		}
	}

	info!(removed = removed.len(), "pruned unreferenced slots");
	Ok(removed)
}
