//! Internal cache entry structure

use std::time::{Duration, SystemTime};
use tokio::time::Instant;

/// Lifecycle of a cached count.
///
/// `Pending` means a refresh is scheduled or in flight while the stored
/// value (if any) may still be served as stale data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryState {
	Pending,
	Fresh,
	Stale,
}

#[derive(Debug, Clone)]
pub(crate) struct CacheEntry {
	pub(crate) value: i64,
	/// Wall-clock time of the refresh, reported back to callers.
	pub(crate) timestamp: SystemTime,
	pub(crate) state: EntryState,
	/// Monotonic refresh time, used for TTL checks so they follow the
	/// runtime clock in tests.
	pub(crate) refreshed_at: Instant,
	pub(crate) last_used: Instant,
}

impl CacheEntry {
	pub(crate) fn fresh(value: i64, timestamp: SystemTime) -> Self {
		let now = Instant::now();
		Self {
			value,
			timestamp,
			state: EntryState::Fresh,
			refreshed_at: now,
			last_used: now,
		}
	}

	pub(crate) fn is_expired(&self, ttl: Duration) -> bool {
		self.refreshed_at.elapsed() > ttl
	}

	pub(crate) fn touch(&mut self) {
		self.last_used = Instant::now();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn test_entry_expires_after_ttl() {
		let entry = CacheEntry::fresh(42, SystemTime::now());
		assert!(!entry.is_expired(Duration::from_secs(60)));

		tokio::time::advance(Duration::from_secs(61)).await;
		assert!(entry.is_expired(Duration::from_secs(60)));
	}
}
