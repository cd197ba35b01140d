//! Deadline presets resolved against a clock.

use intent_types::{current_timestamp, DeadlinePreference};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of the current UNIX time in seconds.
pub trait Clock: Send + Sync {
	fn now(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> u64 {
		current_timestamp()
	}
}

/// Manually driven clock for tests and reproducible runs.
#[derive(Debug, Default)]
pub struct FixedClock {
	now: AtomicU64,
}

impl FixedClock {
	pub fn new(now: u64) -> Self {
		Self {
			now: AtomicU64::new(now),
		}
	}

	pub fn advance(&self, seconds: u64) {
		self.now.fetch_add(seconds, Ordering::SeqCst);
	}
}

impl Clock for FixedClock {
	fn now(&self) -> u64 {
		self.now.load(Ordering::SeqCst)
	}
}

/// Open and fill deadlines computed from a single clock read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deadlines {
	pub open_deadline: u64,
	pub fill_deadline: u64,
}

/// Maps deadline presets to timestamps.
#[derive(Clone)]
pub struct DeadlinePolicy {
	clock: Arc<dyn Clock>,
}

impl DeadlinePolicy {
	pub fn new(clock: Arc<dyn Clock>) -> Self {
		Self { clock }
	}

	pub fn now(&self) -> u64 {
		self.clock.now()
	}

	/// Computes both deadlines for `preference` from one clock read.
	///
	/// Returns `None` for [`DeadlinePreference::Custom`], which has no offsets.
	pub fn deadlines(&self, preference: DeadlinePreference) -> Option<Deadlines> {
		let (open_offset, fill_offset) = preference.offsets()?;
		let now = self.clock.now();
		Some(Deadlines {
			open_deadline: now + open_offset,
			fill_deadline: now + fill_offset,
		})
	}
}

impl std::fmt::Debug for DeadlinePolicy {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DeadlinePolicy")
			.field("now", &self.clock.now())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_preset_values() {
		let clock = Arc::new(FixedClock::new(1_000));
		let policy = DeadlinePolicy::new(clock);

		assert_eq!(
			policy.deadlines(DeadlinePreference::Fast),
			Some(Deadlines {
				open_deadline: 1_060,
				fill_deadline: 4_600
			})
		);
		assert_eq!(
			policy.deadlines(DeadlinePreference::Auto),
			Some(Deadlines {
				open_deadline: 1_300,
				fill_deadline: 22_600
			})
		);
		assert_eq!(
			policy.deadlines(DeadlinePreference::Economy),
			Some(Deadlines {
				open_deadline: 1_600,
				fill_deadline: 87_400
			})
		);
		assert_eq!(policy.deadlines(DeadlinePreference::Custom), None);
	}

	#[test]
	fn test_presets_are_ordered_and_in_the_future() {
		let clock = Arc::new(FixedClock::new(1_700_000_000));
		let policy = DeadlinePolicy::new(clock.clone());

		for preset in DeadlinePreference::presets() {
			let deadlines = policy.deadlines(preset).unwrap();
			assert!(deadlines.open_deadline < deadlines.fill_deadline);
			assert!(deadlines.open_deadline > clock.now());
		}
	}

	#[test]
	fn test_deadlines_follow_the_clock() {
		let clock = Arc::new(FixedClock::new(100));
		let policy = DeadlinePolicy::new(clock.clone());
		let before = policy.deadlines(DeadlinePreference::Fast).unwrap();

		clock.advance(50);
		let after = policy.deadlines(DeadlinePreference::Fast).unwrap();
		assert_eq!(after.open_deadline, before.open_deadline + 50);
		assert_eq!(after.fill_deadline, before.fill_deadline + 50);
	}
}
