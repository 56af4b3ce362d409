//! Names and values of the on-disk layout.
//!
//! ```text
//! mm_info/info.json           {"type": "mmzip"}
//! mm_info/entry_set<N>.json   N = 0, 1, 2, ...
//! data/00001, data/00002 ...  content slots
//! ```

/// Metadata area, relative to the archive root.
pub const INFO_DIR: &str = "mm_info";

/// Content area, relative to the archive root.
pub const DATA_DIR: &str = "data";

/// Info record file, inside [`INFO_DIR`].
pub const INFO_FILE: &str = "info.json";

/// Entry set manifest prefix.
pub const ENTRY_SET_PREFIX: &str = "entry_set";

/// Misspelt entry set manifest prefix, still found in older archives.
///
/// Never written, only read.
pub const LEGACY_ENTRY_SET_PREFIX: &str = "entory_set";

/// Manifest file suffix.
pub const MANIFEST_SUFFIX: &str = ".json";

/// The `type` an info record must carry.
pub const ARCHIVE_TYPE: &str = "mmzip";

/// Zero padding of slot numbers in slot names.
pub const SLOT_DIGITS: usize = 5;

/// First slot number allocated when importing.
pub const IMPORT_FIRST_SLOT: u64 = 1;

/// First slot number allocated when fusing.
pub const FUSION_FIRST_SLOT: u64 = 0;
