//! Fusion engine: merge two archives into a third.
//!
//! Content slots of the first archive, then of the second, are copied into the destination under
//! one running sequence of numbers starting at [`FUSION_FIRST_SLOT`]. Both archives' entry sets
//! are rewritten to the new slot names and written, first archive's then second's, as a fresh
//! `0..M` sequence of manifests. The result is then [deduplicated](crate::dedup::dedupe).
//!
//! Sources are only read; either may be a directory or ZIP-backed archive.

use std::{collections::HashMap, path::Path};

use tracing::{debug, info, instrument};

use crate::{
	constants::FUSION_FIRST_SLOT,
	dedup::{dedupe, DedupReport},
	error::{Error, ErrorKind, Result},
	handle::{ArchiveHandle, DirArchive},
	manifest::{EntrySet, SlotName},
};

/// What a fusion produced.
#[derive(Clone, Debug)]
pub struct Fusion {
	/// The new archive.
	pub archive: DirArchive,

	/// Slots copied from the first archive.
	pub slots_from_a: usize,

	/// Slots copied from the second archive.
	pub slots_from_b: usize,

	/// Entry sets written.
	pub entry_sets: usize,

	/// Deduplication of the result.
	pub dedup: DedupReport,
}

/// Slot renumbering for one source archive.
#[derive(Debug)]
struct SlotPlan {
	moves: Vec<(SlotName, u64)>,
	renames: HashMap<SlotName, SlotName>,
}

impl SlotPlan {
	/// Assign destination numbers to every slot of `source`, continuing from `next`.
	fn new(source: &(impl ArchiveHandle + ?Sized), next: &mut u64) -> Result<Self> {
		let mut moves = Vec::new();
		let mut renames = HashMap::new();
		for slot in source.content_slots()? {
			renames.insert(slot.name.clone(), SlotName::from_number(*next));
			moves.push((slot.name, *next));
			*next += 1;
		}

		Ok(Self { moves, renames })
	}

	/// Entry sets of `source`, with references rewritten to destination names.
	fn entry_sets(&self, source: &(impl ArchiveHandle + ?Sized)) -> Result<Vec<EntrySet>> {
		let mut sets = source.list_entry_sets()?;
		for (position, set) in sets.iter_mut().enumerate() {
			if let Some(missing) = set.slot_refs().find(|slot| !self.renames.contains_key(*slot)) {
				return Err(ErrorKind::NotFound.with_message(format!(
					"entry set {position} of {} references missing content slot {missing}",
					source.location().display()
				)));
			}

			set.rewrite_slots(|slot| self.renames.get(slot).cloned());
		}
		Ok(sets)
	}

	fn copy(&self, source: &(impl ArchiveHandle + ?Sized), dest: &DirArchive) -> Result<()> {
		for (old, number) in &self.moves {
			let (new, mut file) = dest.create_slot(*number)?;
			let bytes = source.copy_slot(old, &mut file)?;
			debug!(%old, %new, %bytes, "copied slot");
		}
		Ok(())
	}
}

/// Fuse archives `a` and `b` into a new directory archive at `dest`.
///
/// Fails with [`ErrorKind::InvalidArchive`] if either source lacks a readable info record, and
/// with [`ErrorKind::AlreadyExists`] if `dest` exists. If a source's entry references a slot that
/// source doesn't have, fails with [`ErrorKind::NotFound`] before any content is copied.
#[instrument(
	level = "debug",
	skip(a, b, dest),
	fields(a = ?a.location(), b = ?b.location(), dest = ?dest.as_ref())
)]
pub fn fuse(
	a: &(impl ArchiveHandle + ?Sized),
	b: &(impl ArchiveHandle + ?Sized),
	dest: impl AsRef<Path>,
) -> Result<Fusion> {
	if !a.has_info() {
		return Err(missing_info(a.location()));
	}
	if !b.has_info() {
		return Err(missing_info(b.location()));
	}

	let archive = DirArchive::create(dest)?;

	let mut next = FUSION_FIRST_SLOT;
	let plan_a = SlotPlan::new(a, &mut next)?;
	let plan_b = SlotPlan::new(b, &mut next)?;

	let mut sets = plan_a.entry_sets(a)?;
	sets.extend(plan_b.entry_sets(b)?);

	plan_a.copy(a, &archive)?;
	plan_b.copy(b, &archive)?;
	archive.write_entry_sets(&sets)?;
	info!(
		slots = plan_a.moves.len() + plan_b.moves.len(),
		entry_sets = sets.len(),
		"fused archives"
	);

	let dedup = dedupe(&archive)?;
	Ok(Fusion {
		archive,
		slots_from_a: plan_a.moves.len(),
		slots_from_b: plan_b.moves.len(),
		entry_sets: sets.len(),
		dedup,
	})
}

fn missing_info(location: &Path) -> Error {
	ErrorKind::InvalidArchive.with_message(format!(
		"{} does not have an info record",
		location.display()
	))
}
