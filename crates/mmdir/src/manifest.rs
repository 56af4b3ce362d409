//! Manifest model: entry sets, entries, slot references, and the info record.
//!
//! All records are JSON on disk. Decoding is strict: unknown fields, missing required fields,
//! and entries that break the directory/content invariant are [`Format`](crate::ErrorKind::Format)
//! errors.

#[doc(inline)]
pub use self::entry::*;
#[doc(inline)]
pub use self::entry_set::*;
#[doc(inline)]
pub use self::info::*;
#[doc(inline)]
pub use self::naming::*;
#[doc(inline)]
pub use self::slot::*;
#[doc(inline)]
pub use self::timestamps::*;

mod entry;
mod entry_set;
mod info;
mod naming;
mod slot;
mod timestamps;
