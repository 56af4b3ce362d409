//! Deduplicator: collapse byte-identical content slots into one.
//!
//! Slots are compared pairwise in ascending slot order. A pair is only read when the sizes
//! match; each slot's CRC-32 is computed at most once per run; and a matching checksum is
//! confirmed by comparing the bytes in full. The earliest slot among equals always survives.
//!
//! Every entry set manifest is read before anything changes, so a malformed manifest aborts the
//! run with the archive untouched. Duplicates are then deleted, and every manifest that referenced
//! one is rewritten in place (under its own file name) to reference the survivor instead. Slots that end up with no
//! references are left alone; see [`prune`](crate::prune) for the opt-in cleanup.
//!
//! This is quadratic in the number of slots, which is fine for archives of ordinary size. A
//! checksum-keyed index would scale better, as long as it keeps the earliest-survivor rule.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument, trace};

use crate::{
	error::Result,
	handle::{ArchiveHandle, DirArchive},
	manifest::{Slot, SlotName},
};

/// What deduplication did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DedupReport {
	/// Deleted slots, each mapped to the surviving slot with the same content.
	pub duplicates: BTreeMap<SlotName, SlotName>,

	/// Entries changed to point at a survivor.
	pub rewritten_entries: usize,

	/// Entry set manifests written back.
	pub rewritten_entry_sets: usize,
}

impl DedupReport {
	/// Returns `true` if nothing was changed.
	pub fn is_empty(&self) -> bool {
		self.duplicates.is_empty() && self.rewritten_entries == 0
	}
}

#[derive(Debug)]
struct Candidate {
	slot: Slot,
	crc: Option<u32>,
	duplicate_of: Option<usize>,
}

impl Candidate {
	fn checksum(&mut self, archive: &DirArchive, cache: &mut Option<Vec<u8>>) -> Result<u32> {
		if let Some(crc) = self.crc {
			return Ok(crc);
		}

		let crc = crc32fast::hash(cached(archive, &self.slot.name, cache)?);
		trace!(slot = %self.slot.name, crc = %format!("{crc:08x}"), "checksum");
		self.crc = Some(crc);
		Ok(crc)
	}
}

fn cached<'c>(
	archive: &DirArchive,
	name: &SlotName,
	cache: &'c mut Option<Vec<u8>>,
) -> Result<&'c [u8]> {
	if cache.is_none() {
		*cache = Some(archive.read_slot(name)?);
	}
	Ok(cache.as_deref().unwrap_or_default())
}

/// Deduplicate the content slots of a directory archive, in place.
#[instrument(level = "debug", skip(archive), fields(root = ?archive.root()))]
pub fn dedupe(archive: &DirArchive) -> Result<DedupReport> {
	let mut candidates: Vec<Candidate> = archive
		.content_slots()?
		.into_iter()
		.map(|slot| Candidate {
			slot,
			crc: None,
			duplicate_of: None,
		})
		.collect();
	debug!(slots = candidates.len(), "scanning for duplicate content");

	find_duplicates(archive, &mut candidates)?;

	let mut report = DedupReport::default();
	for candidate in &candidates {
		if let Some(survivor) = candidate.duplicate_of {
			report.duplicates.insert(
				candidate.slot.name.clone(),
				candidates[survivor].slot.name.clone(),
			);
		}
	}

	if report.duplicates.is_empty() {
		debug!("no duplicate content");
		return Ok(report);
	}

	// every manifest must decode before anything is deleted
	let mut rewrites = Vec::new();
	for name in archive.entry_set_names()? {
		let mut set = archive.read_entry_set(&name)?;
		let changed = set.rewrite_slots(|slot| report.duplicates.get(slot).cloned());
		if changed > 0 {
			rewrites.push((name, set, changed));
		}
	}

	for duplicate in report.duplicates.keys() {
		archive.remove_slot(duplicate)?;
	}

	for (name, set, changed) in rewrites {
		archive.write_entry_set(&name, &set)?;
		report.rewritten_entries += changed;
		report.rewritten_entry_sets += 1;
		debug!(manifest = name.file_name(), %changed, "rewrote references");
	}

	info!(
		removed = report.duplicates.len(),
		entries = report.rewritten_entries,
		entry_sets = report.rewritten_entry_sets,
		"deduplicated archive"
	);
	Ok(report)
}

fn find_duplicates(archive: &DirArchive, candidates: &mut [Candidate]) -> Result<()> {
	for i in 0..candidates.len() {
		if candidates[i].duplicate_of.is_some() {
			continue;
		}

		let mut bytes_i = None;
		for j in (i + 1)..candidates.len() {
			if candidates[j].duplicate_of.is_some()
				|| candidates[j].slot.size != candidates[i].slot.size
			{
				continue;
			}

			let mut bytes_j = None;
			let crc_i = candidates[i].checksum(archive, &mut bytes_i)?;
			let crc_j = candidates[j].checksum(archive, &mut bytes_j)?;
			if crc_i != crc_j {
				continue;
			}

			let same = cached(archive, &candidates[i].slot.name, &mut bytes_i)?
				== cached(archive, &candidates[j].slot.name, &mut bytes_j)?;
			if same {
				info!(
					survivor = %candidates[i].slot.name,
					duplicate = %candidates[j].slot.name,
					"found same content"
				);
				candidates[j].duplicate_of = Some(i);
			} else {
				debug!(
					a = %candidates[i].slot.name,
					b = %candidates[j].slot.name,
					"checksum collision"
				);
			}
		}
	}

	Ok(())
}
