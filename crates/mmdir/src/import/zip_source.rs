use std::{
	fs::File,
	io::{Read, Seek},
	path::Path,
};

use tracing::trace;
use zip::ZipArchive;

use super::{source_name, ForeignArchive, ForeignEntry};
use crate::{error::Result, manifest::EntryTime};

/// ZIP file as an import source.
///
/// Records each member's own comment as well as the container comment.
#[derive(Debug)]
pub struct ZipSource<R = File> {
	name: String,
	container: ZipArchive<R>,
}

impl ZipSource<File> {
	/// Open the ZIP file at `path`.
	pub fn open(path: &Path) -> Result<Self> {
		Self::new(source_name(path), File::open(path)?)
	}
}

impl<R: Read + Seek> ZipSource<R> {
	/// Read a ZIP container from `reader`, calling it `name`.
	pub fn new(name: impl Into<String>, reader: R) -> Result<Self> {
		Ok(Self {
			name: name.into(),
			container: ZipArchive::new(reader)?,
		})
	}
}

impl<R: Read + Seek> ForeignArchive for ZipSource<R> {
	fn source_name(&self) -> &str {
		&self.name
	}

	fn comment(&self) -> Result<String> {
		Ok(String::from_utf8_lossy(self.container.comment()).into_owned())
	}

	fn entries(&mut self) -> Result<Vec<ForeignEntry>> {
		let mut entries = Vec::with_capacity(self.container.len());
		for index in 0..self.container.len() {
			let member = self.container.by_index_raw(index)?;
			let entry = ForeignEntry {
				name: member.name().into(),
				is_dir: member.is_dir(),
				date_time: member
					.last_modified()
					.map_or(EntryTime::DOS_EPOCH, zip_time),
				comment: member.comment().into(),
			};
			trace!(?entry, size = member.size(), "zip member");
			entries.push(entry);
		}
		Ok(entries)
	}

	fn open_entry(&mut self, index: usize) -> Result<Box<dyn Read + '_>> {
		Ok(Box::new(self.container.by_index(index)?))
	}
}

fn zip_time(dt: zip::DateTime) -> EntryTime {
	EntryTime::new(
		i32::from(dt.year()),
		u32::from(dt.month()),
		u32::from(dt.day()),
		u32::from(dt.hour()),
		u32::from(dt.minute()),
		u32::from(dt.second()),
	)
}
