#![allow(dead_code)]

use std::{
	fs::{self, File},
	path::Path,
};

use filetime::FileTime;
use mmdir::{
	import::import_path,
	manifest::{Entry, EntrySet, EntryTime, ManifestName, SlotName},
	DirArchive,
};
use tempfile::TempDir;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

/// One member of a ZIP fixture.
pub struct Member<'a> {
	pub name: &'a str,
	pub content: Option<&'a [u8]>,
	pub time: EntryTime,
}

pub fn file<'a>(name: &'a str, content: &'a [u8], time: EntryTime) -> Member<'a> {
	Member {
		name,
		content: Some(content),
		time,
	}
}

pub fn dir(name: &str, time: EntryTime) -> Member<'_> {
	Member {
		name,
		content: None,
		time,
	}
}

/// Even seconds only: that's all a DOS timestamp can hold.
pub const T1: EntryTime = EntryTime::new(2020, 5, 6, 7, 8, 10);
pub const T2: EntryTime = EntryTime::new(2020, 5, 6, 7, 8, 12);
pub const T3: EntryTime = EntryTime::new(2019, 1, 2, 3, 4, 6);

pub fn tempdir() -> TempDir {
	tempfile::tempdir().expect("tempdir")
}

pub fn write_zip(path: &Path, members: &[Member<'_>], comment: &str) {
	let mut zip = ZipWriter::new(File::create(path).expect("create zip"));
	for member in members {
		let t = member.time;
		let time = zip::DateTime::from_date_and_time(
			t.year as u16,
			t.month as u8,
			t.day as u8,
			t.hour as u8,
			t.minute as u8,
			t.second as u8,
		)
		.expect("dos time");
		let options = SimpleFileOptions::default()
			.compression_method(CompressionMethod::Stored)
			.last_modified_time(time);

		match member.content {
			Some(content) => {
				zip.start_file(member.name, options).expect("start file");
				std::io::Write::write_all(&mut zip, content).expect("write member");
			}
			None => zip.add_directory(member.name, options).expect("add directory"),
		}
	}
	zip.set_comment(comment);
	zip.finish().expect("finish zip");
}

/// Write `name` as a ZIP file in `tmp` and import it into `tmp/<archive>`.
pub fn import_zip(tmp: &Path, name: &str, archive: &str, members: &[Member<'_>]) -> DirArchive {
	let zip = tmp.join(name);
	write_zip(&zip, members, "");
	let (archive, _) = import_path(&zip, &tmp.join(archive)).expect("import");
	archive
}

/// Archive built by hand: `slots` are written as numbered slots, `sets` as standard manifests.
pub fn build_archive(root: &Path, slots: &[(u64, &[u8])], sets: &[EntrySet]) -> DirArchive {
	let archive = DirArchive::create(root).expect("create archive");
	for (number, bytes) in slots {
		archive.write_slot(*number, bytes).expect("write slot");
	}
	archive.write_entry_sets(sets).expect("write entry sets");
	archive
}

/// Entry set of files only, each pointing at the given slot number.
pub fn files_set(name: &str, files: &[(&str, u64)]) -> EntrySet {
	let mut set = EntrySet::new(name, "");
	for (file_name, slot) in files {
		set.entries
			.push(Entry::file(*file_name, T1, SlotName::from_number(*slot)));
	}
	set
}

pub fn manifest(name: &str) -> ManifestName {
	ManifestName::parse(name).expect("manifest name")
}

pub fn mtime(path: &Path) -> i64 {
	let meta = fs::metadata(path).expect("metadata");
	FileTime::from_last_modification_time(&meta).unix_seconds()
}

pub fn slot_names(archive: &impl mmdir::ArchiveHandle) -> Vec<String> {
	archive
		.content_slots()
		.expect("content slots")
		.into_iter()
		.map(|slot| slot.name.to_string())
		.collect()
}
