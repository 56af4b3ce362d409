use serde::{Deserialize, Serialize};

use crate::{
	constants::ARCHIVE_TYPE,
	error::{ErrorKind, Result},
};

/// Info record, tagging an archive as MMDir.
///
/// Written once when an archive is created, never changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Info {
	/// Archive type. Always [`ARCHIVE_TYPE`].
	#[serde(rename = "type")]
	pub archive_type: String,
}

impl Default for Info {
	fn default() -> Self {
		Self {
			archive_type: ARCHIVE_TYPE.into(),
		}
	}
}

impl Info {
	/// Decode from JSON, checking the archive type.
	pub fn decode(bytes: &[u8]) -> Result<Self> {
		let info: Self = serde_json::from_slice(bytes)?;
		if info.archive_type != ARCHIVE_TYPE {
			return Err(ErrorKind::Format.with_message(format!(
				"unknown archive type {:?}, expected {ARCHIVE_TYPE:?}",
				info.archive_type
			)));
		}

		Ok(info)
	}

	/// Encode to JSON.
	pub fn encode(&self) -> Result<Vec<u8>> {
		Ok(serde_json::to_vec(self)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn shape() {
		assert_eq!(
			Info::default().encode().expect("encode"),
			br#"{"type":"mmzip"}"#
		);
		assert_eq!(
			Info::decode(br#"{"type": "mmzip"}"#).expect("decode"),
			Info::default()
		);
	}

	#[test]
	fn wrong_type() {
		let err = Info::decode(br#"{"type": "tar"}"#).expect_err("tar");
		assert!(err.is(ErrorKind::Format));
	}
}
