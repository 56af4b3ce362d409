use std::fs;

use mmdir::{
	export::{export_to_zip, extract},
	fusion::fuse,
	manifest::SlotName,
	ArchiveHandle, DirArchive, ErrorKind, MmZip,
};

mod common;
use common::*;

#[test]
fn same_content_is_shared_after_fusion() {
	let tmp = tempdir();
	let a = import_zip(tmp.path(), "a.zip", "a", &[file("x.txt", b"hi", T1)]);
	let b = import_zip(tmp.path(), "b.zip", "b", &[file("y.txt", b"hi", T2)]);

	let fused = fuse(&a, &b, tmp.path().join("c")).expect("fuse");
	assert_eq!(fused.slots_from_a, 1);
	assert_eq!(fused.slots_from_b, 1);
	assert_eq!(fused.entry_sets, 2);
	assert_eq!(
		fused.dedup.duplicates.get(&SlotName::from_number(1)),
		Some(&SlotName::from_number(0))
	);

	let c = &fused.archive;
	assert!(c.has_info());
	assert_eq!(slot_names(c), ["data/00000"]);

	let sets = c.list_entry_sets().expect("entry sets");
	assert_eq!(sets.len(), 2);
	assert_eq!(sets[0].entries[0].file_name, "x.txt");
	assert_eq!(sets[0].entries[0].entry_name, Some(SlotName::from_number(0)));
	assert_eq!(sets[1].entries[0].file_name, "y.txt");
	assert_eq!(sets[1].entries[0].entry_name, Some(SlotName::from_number(0)));

	extract(c, 1, tmp.path().join("out")).expect("extract");
	assert_eq!(fs::read(tmp.path().join("out/y.txt")).expect("y"), b"hi");
}

#[test]
fn slots_are_renumbered_in_sequence() {
	let tmp = tempdir();
	let a = import_zip(
		tmp.path(),
		"a.zip",
		"a",
		&[file("one", b"1", T1), dir("d/", T1), file("d/two", b"22", T1)],
	);
	let b = import_zip(
		tmp.path(),
		"b.zip",
		"b",
		&[
			file("three", b"333", T2),
			file("four", b"4444", T2),
			file("five", b"55555", T2),
		],
	);

	let fused = fuse(&a, &b, tmp.path().join("c")).expect("fuse");
	assert!(fused.dedup.is_empty());
	let c = &fused.archive;
	assert_eq!(
		slot_names(c),
		["data/00000", "data/00001", "data/00002", "data/00003", "data/00004"]
	);
	assert_eq!(c.read_slot(&SlotName::from_number(1)).expect("slot"), b"22");
	assert_eq!(c.read_slot(&SlotName::from_number(4)).expect("slot"), b"55555");

	let first = c.entry_set(0).expect("first");
	assert_eq!(first.file_name, "a.zip");
	assert_eq!(first.entries[1].entry_name, None);
	assert_eq!(first.entries[2].entry_name, Some(SlotName::from_number(1)));

	let second = c.entry_set(1).expect("second");
	assert_eq!(second.file_name, "b.zip");
	let refs: Vec<_> = second.slot_refs().map(|s| s.to_string()).collect();
	assert_eq!(refs, ["data/00002", "data/00003", "data/00004"]);

	assert_eq!(
		fs::read_dir(c.info_dir())
			.expect("info dir")
			.map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
			.filter(|name| name.starts_with("entry_set"))
			.count(),
		2
	);
}

#[test]
fn entry_sets_are_concatenated_in_order() {
	let tmp = tempdir();
	let a = build_archive(
		&tmp.path().join("a"),
		&[(1, b"a1"), (2, b"a2")],
		&[
			files_set("a0.zip", &[("f", 1)]),
			files_set("a1.zip", &[("g", 2)]),
		],
	);
	let b = build_archive(
		&tmp.path().join("b"),
		&[(1, b"b1")],
		&[files_set("b0.zip", &[("h", 1)])],
	);
	fs::rename(
		b.manifest_path(&manifest("entry_set0.json")),
		b.manifest_path(&manifest("entory_set0.json")),
	)
	.expect("rename to legacy");

	let fused = fuse(&a, &b, tmp.path().join("c")).expect("fuse");
	let names: Vec<_> = fused
		.archive
		.list_entry_sets()
		.expect("sets")
		.into_iter()
		.map(|set| set.file_name)
		.collect();
	assert_eq!(names, ["a0.zip", "a1.zip", "b0.zip"]);
	assert!(fused
		.archive
		.manifest_path(&manifest("entry_set2.json"))
		.exists());
	assert_eq!(
		fused.archive.entry_set(2).expect("set 2").entries[0].entry_name,
		Some(SlotName::from_number(2))
	);
}

#[test]
fn sources_are_left_alone() {
	let tmp = tempdir();
	let a = import_zip(tmp.path(), "a.zip", "a", &[file("x.txt", b"hi", T1)]);
	let b = import_zip(tmp.path(), "b.zip", "b", &[file("y.txt", b"hi", T2)]);

	fuse(&a, &b, tmp.path().join("c")).expect("fuse");
	assert_eq!(slot_names(&a), ["data/00001"]);
	assert_eq!(slot_names(&b), ["data/00001"]);
	assert_eq!(
		b.entry_set(0).expect("b set").entries[0].entry_name,
		Some(SlotName::from_number(1))
	);
}

#[test]
fn source_without_info_is_invalid() {
	let tmp = tempdir();
	let a = import_zip(tmp.path(), "a.zip", "a", &[file("x.txt", b"hi", T1)]);
	let b = import_zip(tmp.path(), "b.zip", "b", &[file("y.txt", b"yo", T2)]);
	fs::remove_file(b.info_path()).expect("remove info");

	let err = fuse(&a, &b, tmp.path().join("c")).expect_err("no info");
	assert!(err.is(ErrorKind::InvalidArchive));
	assert!(!tmp.path().join("c").exists());
}

#[test]
fn source_with_wrong_type_is_invalid() {
	let tmp = tempdir();
	let a = import_zip(tmp.path(), "a.zip", "a", &[file("x.txt", b"hi", T1)]);
	let b = import_zip(tmp.path(), "b.zip", "b", &[file("y.txt", b"yo", T2)]);
	fs::write(a.info_path(), r#"{"type": "tarball"}"#).expect("overwrite info");

	let err = fuse(&a, &b, tmp.path().join("c")).expect_err("wrong type");
	assert!(err.is(ErrorKind::InvalidArchive));
}

#[test]
fn dangling_reference_is_not_found() {
	let tmp = tempdir();
	let a = import_zip(
		tmp.path(),
		"a.zip",
		"a",
		&[file("x.txt", b"hi", T1), file("z.txt", b"zz", T1)],
	);
	let b = import_zip(tmp.path(), "b.zip", "b", &[file("y.txt", b"yo", T2)]);
	a.remove_slot(&SlotName::from_number(2)).expect("remove");

	let err = fuse(&a, &b, tmp.path().join("c")).expect_err("dangling");
	assert!(err.is(ErrorKind::NotFound));
	let c = DirArchive::open(tmp.path().join("c"));
	assert!(slot_names(&c).is_empty());
}

#[test]
fn existing_destination_is_refused() {
	let tmp = tempdir();
	let a = import_zip(tmp.path(), "a.zip", "a", &[file("x.txt", b"hi", T1)]);
	let b = import_zip(tmp.path(), "b.zip", "b", &[file("y.txt", b"yo", T2)]);
	let dest = tmp.path().join("c");
	fs::write(&dest, "keep").expect("write");

	let err = fuse(&a, &b, &dest).expect_err("exists");
	assert!(err.is(ErrorKind::AlreadyExists));
	assert_eq!(fs::read_to_string(&dest).expect("read"), "keep");
}

#[test]
fn zip_backed_source_fuses_like_a_directory() {
	let tmp = tempdir();
	let a = import_zip(tmp.path(), "a.zip", "a", &[file("x.txt", b"hi", T1)]);
	let b = import_zip(tmp.path(), "b.zip", "b", &[file("y.txt", b"hi", T2)]);
	export_to_zip(&a, tmp.path().join("a.mmzip")).expect("export");
	let a_zip = MmZip::open(tmp.path().join("a.mmzip")).expect("open");

	let fused = fuse(&a_zip, &b, tmp.path().join("c")).expect("fuse");
	assert_eq!(slot_names(&fused.archive), ["data/00000"]);
	assert_eq!(fused.archive.entry_set_count().expect("count"), 2);
}
