//! Deadline preference presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named deadline policy selected by the user.
///
/// Presets map to fixed offsets from the current time; `Custom` means the
/// deadlines were entered directly and no preset applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlinePreference {
	/// Open within a minute, fill within an hour.
	Fast,
	/// Open within five minutes, fill within six hours.
	#[default]
	Auto,
	/// Open within ten minutes, fill within a day.
	Economy,
	/// Deadlines set explicitly.
	Custom,
}

impl DeadlinePreference {
	/// Returns `(open_offset, fill_offset)` in seconds for presets.
	pub fn offsets(&self) -> Option<(u64, u64)> {
		match self {
			DeadlinePreference::Fast => Some((60, 3600)),
			DeadlinePreference::Auto => Some((300, 3600 * 6)),
			DeadlinePreference::Economy => Some((600, 3600 * 24)),
			DeadlinePreference::Custom => None,
		}
	}

	/// All selectable presets, in display order.
	pub fn presets() -> [DeadlinePreference; 3] {
		[
			DeadlinePreference::Fast,
			DeadlinePreference::Auto,
			DeadlinePreference::Economy,
		]
	}
}

impl fmt::Display for DeadlinePreference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DeadlinePreference::Fast => write!(f, "Fast"),
			DeadlinePreference::Auto => write!(f, "Auto"),
			DeadlinePreference::Economy => write!(f, "Economy"),
			DeadlinePreference::Custom => write!(f, "Custom"),
		}
	}
}

impl FromStr for DeadlinePreference {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"fast" => Ok(DeadlinePreference::Fast),
			"auto" => Ok(DeadlinePreference::Auto),
			"economy" => Ok(DeadlinePreference::Economy),
			"custom" => Ok(DeadlinePreference::Custom),
			other => Err(format!("Unknown deadline preference '{}'", other)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_preset_offsets_are_ordered() {
		for preset in DeadlinePreference::presets() {
			let (open, fill) = preset.offsets().unwrap();
			assert!(open > 0);
			assert!(open < fill, "{} must open before it fills", preset);
		}
		assert!(DeadlinePreference::Custom.offsets().is_none());
	}

	#[test]
	fn test_parse_round_trips_display() {
		for preset in DeadlinePreference::presets() {
			assert_eq!(preset.to_string().parse::<DeadlinePreference>().unwrap(), preset);
		}
		assert!("turbo".parse::<DeadlinePreference>().is_err());
	}
}
