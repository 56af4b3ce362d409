use crate::constants::{ENTRY_SET_PREFIX, LEGACY_ENTRY_SET_PREFIX, MANIFEST_SUFFIX};

/// Naming scheme an entry set manifest was found under.
///
/// Standard names sort before legacy names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Naming {
	/// `entry_set<N>.json`
	Standard,

	/// `entory_set<N>.json`, from older archives.
	Legacy,
}

/// Name of an entry set manifest inside the metadata area.
///
/// The ordering of this type is the positional order of entry sets in an archive: all standard
/// names by number, then all legacy names by number.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManifestName {
	/// Scheme.
	pub naming: Naming,

	/// Number in the file name.
	pub number: u64,

	/// The file name as found, so manifests can be rewritten in place.
	file_name: String,
}

impl ManifestName {
	/// Standard name for entry set `number`.
	pub fn standard(number: u64) -> Self {
		Self {
			naming: Naming::Standard,
			number,
			file_name: format!("{ENTRY_SET_PREFIX}{number}{MANIFEST_SUFFIX}"),
		}
	}

	/// Recognise a manifest file name, under either scheme.
	pub fn parse(file_name: &str) -> Option<Self> {
		let (naming, rest) = if let Some(rest) = file_name.strip_prefix(ENTRY_SET_PREFIX) {
			(Naming::Standard, rest)
		} else {
			(Naming::Legacy, file_name.strip_prefix(LEGACY_ENTRY_SET_PREFIX)?)
		};

		let digits = rest.strip_suffix(MANIFEST_SUFFIX)?;
		if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
			return None;
		}

		Some(Self {
			naming,
			number: digits.parse().ok()?,
			file_name: file_name.into(),
		})
	}

	/// File name inside the metadata area.
	pub fn file_name(&self) -> &str {
		&self.file_name
	}
}

/// Sort manifest names into positional order.
pub fn sort_manifests(names: &mut [ManifestName]) {
	names.sort();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_both_schemes() {
		let std = ManifestName::parse("entry_set12.json").expect("standard");
		assert_eq!((std.naming, std.number), (Naming::Standard, 12));
		let legacy = ManifestName::parse("entory_set0.json").expect("legacy");
		assert_eq!((legacy.naming, legacy.number), (Naming::Legacy, 0));
		assert_eq!(legacy.file_name(), "entory_set0.json");
	}

	#[test]
	fn ignores_other_files() {
		for name in [
			"info.json",
			"entry_set.json",
			"entry_setx.json",
			"entry_set1.json.bak",
			"entry_set1.txt",
		] {
			assert_eq!(ManifestName::parse(name), None, "{name}");
		}
	}

	#[test]
	fn standard_before_legacy_numeric_within() {
		let mut names: Vec<ManifestName> = [
			"entory_set0.json",
			"entry_set10.json",
			"entory_set2.json",
			"entry_set2.json",
			"entry_set0.json",
		]
		.into_iter()
		.filter_map(ManifestName::parse)
		.collect();
		sort_manifests(&mut names);
		let order: Vec<&str> = names.iter().map(|n| n.file_name()).collect();
		assert_eq!(
			order,
			[
				"entry_set0.json",
				"entry_set2.json",
				"entry_set10.json",
				"entory_set0.json",
				"entory_set2.json",
			]
		);
	}

	#[test]
	fn standard_name() {
		assert_eq!(ManifestName::standard(3).file_name(), "entry_set3.json");
	}
}
