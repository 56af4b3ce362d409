//! MMDir: archives that keep file content apart from file metadata.
//!
//! An MMDir archive is a directory with two areas. The content area (`data/`) holds numbered
//! content slots: raw, uncompressed bytes. The metadata area (`mm_info/`) holds an info record
//! tagging the directory as an MMDir archive, and one or more entry sets, each describing a tree
//! of files and directories whose content lives in slots.
//!
//! Because entries only point at slots by name, several entries (even from different entry
//! sets) can share one slot. [`fusion::fuse`] relies on this to merge two archives and then
//! [`dedup::dedupe`] the result.
//!
//! The usual life of an archive:
//!
//! - [`import`] a ZIP or RAR file into a new directory archive,
//! - [`fuse`](fusion::fuse) two archives into a third,
//! - [`extract`](export::extract) an entry set back to a file tree, or snapshot the whole
//!   directory into a ZIP container with [`export_to_zip`](export::export_to_zip).

#![warn(clippy::unwrap_used, missing_docs)]
#![deny(rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod constants;
pub mod dedup;
pub mod error;
pub mod export;
pub mod fusion;
pub mod handle;
pub mod import;
pub mod manifest;
pub mod ondemand;
pub mod prune;

#[doc(inline)]
pub use self::error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use self::handle::{open_archive, ArchiveHandle, DirArchive, MmZip};
