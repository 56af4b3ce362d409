use std::fs;

use mmdir::{
	dedup::dedupe,
	manifest::{Entry, SlotName},
	prune::prune_unreferenced,
	ArchiveHandle, DirArchive, ErrorKind,
};

mod common;
use common::*;

fn slot(n: u64) -> SlotName {
	SlotName::from_number(n)
}

/// Slots 1, 3 and 4 hold the same bytes; 5 has the same size but differs; 7 is unreferenced.
fn messy(root: &std::path::Path) -> DirArchive {
	let archive = build_archive(
		root,
		&[
			(1, b"same"),
			(2, b"other content"),
			(3, b"same"),
			(4, b"same"),
			(5, b"samf"),
			(7, b"lonely"),
		],
		&[files_set("first.zip", &[("a", 1), ("b", 2), ("c", 3)])],
	);

	let mut legacy = files_set("second.zip", &[("d", 4), ("e", 5)]);
	legacy.entries.push(Entry::directory("dir/", T1));
	archive
		.write_entry_set(&manifest("entory_set0.json"), &legacy)
		.expect("write legacy");
	archive
}

#[test]
fn duplicates_collapse_into_earliest_slot() {
	let tmp = tempdir();
	let archive = messy(&tmp.path().join("arch"));

	let report = dedupe(&archive).expect("dedupe");
	assert_eq!(report.duplicates.len(), 2);
	assert_eq!(report.duplicates.get(&slot(3)), Some(&slot(1)));
	assert_eq!(report.duplicates.get(&slot(4)), Some(&slot(1)));
	assert_eq!(report.rewritten_entries, 2);
	assert_eq!(report.rewritten_entry_sets, 2);

	assert_eq!(
		slot_names(&archive),
		["data/00001", "data/00002", "data/00005", "data/00007"]
	);
	assert_eq!(archive.read_slot(&slot(5)).expect("slot 5"), b"samf");

	let first = archive.entry_set(0).expect("first");
	let refs: Vec<_> = first.slot_refs().cloned().collect();
	assert_eq!(refs, [slot(1), slot(2), slot(1)]);
}

#[test]
fn legacy_manifest_is_rewritten_in_place() {
	let tmp = tempdir();
	let archive = messy(&tmp.path().join("arch"));
	dedupe(&archive).expect("dedupe");

	assert!(archive.manifest_path(&manifest("entory_set0.json")).exists());
	assert!(!archive.manifest_path(&manifest("entry_set1.json")).exists());

	let legacy = archive.entry_set(1).expect("legacy");
	assert_eq!(legacy.file_name, "second.zip");
	let refs: Vec<_> = legacy.slot_refs().cloned().collect();
	assert_eq!(refs, [slot(1), slot(5)]);
	assert_eq!(legacy.entries[2].entry_name, None);
}

#[test]
fn second_run_changes_nothing() {
	let tmp = tempdir();
	let archive = messy(&tmp.path().join("arch"));
	dedupe(&archive).expect("first run");

	let before = fs::read(archive.manifest_path(&manifest("entry_set0.json"))).expect("read");
	let report = dedupe(&archive).expect("second run");
	assert!(report.is_empty());
	assert_eq!(
		fs::read(archive.manifest_path(&manifest("entry_set0.json"))).expect("read"),
		before
	);
}

#[test]
fn unique_content_is_untouched() {
	let tmp = tempdir();
	let archive = build_archive(
		&tmp.path().join("arch"),
		&[(1, b"a"), (2, b"bb"), (3, b"c")],
		&[files_set("x.zip", &[("a", 1), ("b", 2), ("c", 3)])],
	);

	let report = dedupe(&archive).expect("dedupe");
	assert!(report.is_empty());
	assert_eq!(slot_names(&archive).len(), 3);
}

#[test]
fn unreferenced_slots_survive_dedup_until_pruned() {
	let tmp = tempdir();
	let archive = messy(&tmp.path().join("arch"));
	dedupe(&archive).expect("dedupe");
	assert!(archive.slot_path(&slot(7)).expect("path").exists());

	let removed = prune_unreferenced(&archive).expect("prune");
	assert_eq!(removed, [slot(7)]);
	assert_eq!(
		slot_names(&archive),
		["data/00001", "data/00002", "data/00005"]
	);

	assert!(prune_unreferenced(&archive).expect("prune again").is_empty());
}

#[test]
fn content_area_accepts_foreign_names() {
	let tmp = tempdir();
	let archive = build_archive(
		&tmp.path().join("arch"),
		&[(2, b"dup")],
		&[files_set("x.zip", &[("a", 2)])],
	);
	fs::write(archive.data_dir().join("extra"), b"dup").expect("write");

	let report = dedupe(&archive).expect("dedupe");
	assert_eq!(
		report.duplicates.get(&SlotName::from_file_name("extra")),
		Some(&slot(2))
	);
}

#[test]
fn malformed_manifest_leaves_archive_untouched() {
	let tmp = tempdir();
	let archive = build_archive(
		&tmp.path().join("arch"),
		&[(1, b"same"), (2, b"same")],
		&[files_set("x.zip", &[("a", 1), ("b", 2)])],
	);
	fs::write(archive.info_dir().join("entry_set1.json"), b"{ broken").expect("write");
	let before = fs::read(archive.manifest_path(&manifest("entry_set0.json"))).expect("read");

	let err = dedupe(&archive).expect_err("malformed manifest");
	assert!(err.is(ErrorKind::Format), "{err:?}");

	assert_eq!(slot_names(&archive), ["data/00001", "data/00002"]);
	assert_eq!(
		fs::read(archive.manifest_path(&manifest("entry_set0.json"))).expect("read"),
		before
	);
}

#[test]
fn checksum_collision_is_not_a_duplicate() {
	// different bytes, same CRC-32 (0x1fc8ab3a)
	const A: &[u8] = &[198, 217, 230, 200, 207, 56, 23, 10];
	const B: &[u8] = &[119, 79, 166, 153, 21, 251, 82, 186];
	assert_eq!(crc32fast::hash(A), crc32fast::hash(B));

	let tmp = tempdir();
	let archive = build_archive(
		&tmp.path().join("arch"),
		&[(1, A), (2, B), (3, A)],
		&[files_set("x.zip", &[("a", 1), ("b", 2), ("c", 3)])],
	);

	let report = dedupe(&archive).expect("dedupe");
	assert_eq!(report.duplicates.len(), 1);
	assert_eq!(report.duplicates.get(&slot(3)), Some(&slot(1)));

	assert_eq!(slot_names(&archive), ["data/00001", "data/00002"]);
	assert_eq!(archive.read_slot(&slot(1)).expect("slot 1"), A);
	assert_eq!(archive.read_slot(&slot(2)).expect("slot 2"), B);

	let refs: Vec<_> = archive
		.entry_set(0)
		.expect("entry set")
		.slot_refs()
		.cloned()
		.collect();
	assert_eq!(refs, [slot(1), slot(2), slot(1)]);
}
