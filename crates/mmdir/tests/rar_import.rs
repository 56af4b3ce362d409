use std::path::{Path, PathBuf};

use mmdir::{
	export::extract,
	import::{import_as, import_path, ArchiveFormat},
	manifest::{EntryTime, SlotName},
	ArchiveHandle,
};

mod common;
use common::*;

/// Stored (uncompressed) RAR5 archive holding `hello.txt` with an extended Unix mtime, a `docs`
/// directory with a Windows FILETIME mtime, and `plain.bin` with no time at all.
fn sample() -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.rar")
}

#[test]
fn import_takes_metadata_from_headers() {
	let tmp = tempdir();
	let (archive, summary) = import_path(&sample(), &tmp.path().join("arch")).expect("import");
	assert_eq!(summary.entries, 3);
	assert_eq!(summary.slots, 2);

	let set = archive.entry_set(0).expect("entry set 0");
	assert_eq!(set.file_name, "sample.rar");
	assert_eq!(set.comment, "");

	let names: Vec<_> = set.entries.iter().map(|e| e.file_name.as_str()).collect();
	assert_eq!(names, ["hello.txt", "docs", "plain.bin"]);

	let hello = &set.entries[0];
	assert!(!hello.is_dir);
	assert_eq!(hello.date_time, EntryTime::new(2021, 6, 15, 12, 34, 56));
	assert_eq!(hello.entry_name, Some(SlotName::from_number(1)));

	let docs = &set.entries[1];
	assert!(docs.is_dir);
	assert_eq!(docs.entry_name, None);
	assert_eq!(docs.date_time, EntryTime::new(2020, 5, 6, 7, 8, 11));

	let plain = &set.entries[2];
	assert!(!plain.is_dir);
	assert_eq!(plain.date_time, EntryTime::DOS_EPOCH);
	assert_eq!(plain.entry_name, Some(SlotName::from_number(2)));

	assert_eq!(slot_names(&archive), ["data/00001", "data/00002"]);
	assert_eq!(
		archive.read_slot(&SlotName::from_number(1)).expect("slot 1"),
		b"hello from rar\n"
	);
	assert_eq!(
		archive.read_slot(&SlotName::from_number(2)).expect("slot 2"),
		b"\x00\x01\x02binary"
	);
}

#[test]
fn imported_rar_extracts_with_its_times() {
	let tmp = tempdir();
	let (archive, _) =
		import_as(ArchiveFormat::Rar, &sample(), &tmp.path().join("arch")).expect("import");

	let out = tmp.path().join("out");
	let summary = extract(&archive, 0, &out).expect("extract");
	assert_eq!(summary.directories, 1);
	assert_eq!(summary.files, 2);

	assert!(out.join("docs").is_dir());
	assert_eq!(
		std::fs::read(out.join("hello.txt")).expect("read"),
		b"hello from rar\n"
	);
	assert_eq!(
		mtime(&out.join("hello.txt")),
		EntryTime::new(2021, 6, 15, 12, 34, 56).unix_seconds().expect("valid")
	);
	assert_eq!(
		mtime(&out.join("docs")),
		EntryTime::new(2020, 5, 6, 7, 8, 11).unix_seconds().expect("valid")
	);
}
