//! Helper utilities for common operations.

/// Returns the current UNIX timestamp in seconds, or 0 if the system clock
/// reads earlier than the epoch.
pub fn current_timestamp() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}
