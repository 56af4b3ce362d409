use std::{fmt, time::SystemTime};

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Entry timestamp.
///
/// Calendar fields in UTC, whole seconds, stored as `[year, month, day, hour, minute, second]`.
/// Values are kept exactly as the foreign archive reported them (a blank DOS date has month and
/// day zero, for instance) and only turned into an instant when needed, see
/// [`to_datetime`](Self::to_datetime).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, u32, u32, u32, u32, u32)", into = "(i32, u32, u32, u32, u32, u32)")]
pub struct EntryTime {
	/// Year.
	pub year: i32,
	/// Month, 1-12.
	pub month: u32,
	/// Day of month, 1-31.
	pub day: u32,
	/// Hour, 0-23.
	pub hour: u32,
	/// Minute, 0-59.
	pub minute: u32,
	/// Second, 0-59.
	pub second: u32,
}

impl EntryTime {
	/// Earliest time a ZIP container can express.
	pub const DOS_EPOCH: Self = Self::new(1980, 1, 1, 0, 0, 0);

	/// New timestamp from calendar fields.
	pub const fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
		Self {
			year,
			month,
			day,
			hour,
			minute,
			second,
		}
	}

	/// The instant this names, if the fields form a valid UTC date and time.
	pub fn to_datetime(self) -> Option<DateTime<Utc>> {
		Utc.with_ymd_and_hms(
			self.year,
			self.month,
			self.day,
			self.hour,
			self.minute,
			self.second,
		)
		.single()
	}

	/// Seconds since the Unix epoch, if the fields are valid.
	pub fn unix_seconds(self) -> Option<i64> {
		self.to_datetime().map(|dt| dt.timestamp())
	}
}

impl From<DateTime<Utc>> for EntryTime {
	fn from(dt: DateTime<Utc>) -> Self {
		Self::new(
			dt.year(),
			dt.month(),
			dt.day(),
			dt.hour(),
			dt.minute(),
			dt.second(),
		)
	}
}

impl From<SystemTime> for EntryTime {
	fn from(st: SystemTime) -> Self {
		DateTime::<Utc>::from(st).into()
	}
}

impl From<(i32, u32, u32, u32, u32, u32)> for EntryTime {
	fn from((year, month, day, hour, minute, second): (i32, u32, u32, u32, u32, u32)) -> Self {
		Self::new(year, month, day, hour, minute, second)
	}
}

impl From<EntryTime> for (i32, u32, u32, u32, u32, u32) {
	fn from(t: EntryTime) -> Self {
		(t.year, t.month, t.day, t.hour, t.minute, t.second)
	}
}

impl fmt::Display for EntryTime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
			self.year, self.month, self.day, self.hour, self.minute, self.second
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn json_shape_is_six_element_array() {
		let t = EntryTime::new(2021, 3, 4, 5, 6, 7);
		assert_eq!(
			serde_json::to_string(&t).expect("encode"),
			"[2021,3,4,5,6,7]"
		);
		let back: EntryTime = serde_json::from_str("[2021,3,4,5,6,7]").expect("decode");
		assert_eq!(back, t);
	}

	#[test]
	fn rejects_short_arrays() {
		assert!(serde_json::from_str::<EntryTime>("[2021,3,4]").is_err());
	}

	#[test]
	fn drops_subseconds() {
		let dt = Utc
			.with_ymd_and_hms(2020, 2, 29, 23, 59, 58)
			.single()
			.expect("valid")
			+ chrono::Duration::milliseconds(750);
		let t = EntryTime::from(dt);
		assert_eq!(t, EntryTime::new(2020, 2, 29, 23, 59, 58));
		assert_eq!(t.unix_seconds(), Some(dt.timestamp()));
	}

	#[test]
	fn blank_dos_date_has_no_instant() {
		assert_eq!(EntryTime::new(1980, 0, 0, 0, 0, 0).to_datetime(), None);
	}
}
