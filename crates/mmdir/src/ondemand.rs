//! On-demand reader+seek trait and implementations.
//!
//! This is a trait that allows for obtaining multiple reader+seeker instances from a single byte
//! source. The ZIP-backed [`MmZip`](crate::MmZip) handle uses it to open the container afresh for
//! every operation, so the handle holds no open file between calls and independent readers can
//! share one source.
//!
//! This is implemented for files by path ([`PathBuf`]) and for shared in-memory buffers.

use std::{
	fs::File,
	io::{Cursor, Read, Result, Seek},
	path::PathBuf,
	sync::Arc,
};

/// On-demand independent readers for a byte source.
pub trait OnDemand {
	/// The output reader type.
	type Reader: Read + Seek;

	/// Open an independent reader for this byte source.
	fn open(&self) -> Result<Self::Reader>;
}

impl OnDemand for PathBuf {
	type Reader = File;

	fn open(&self) -> Result<Self::Reader> {
		File::open(self)
	}
}

impl OnDemand for Arc<[u8]> {
	type Reader = Cursor<Arc<[u8]>>;

	fn open(&self) -> Result<Self::Reader> {
		Ok(Cursor::new(Arc::clone(self)))
	}
}
