//! Tuning knobs for the count cache.

use std::time::Duration;

/// Options controlling debounce, expiry, and dispatch behavior.
///
/// # Examples
///
/// ```
/// use arkiv_count::CountCacheOptions;
/// use std::time::Duration;
///
/// let options = CountCacheOptions::default()
///     .with_debounce(Duration::from_millis(100))
///     .with_show_stale_data(true);
///
/// assert_eq!(options.debounce, Duration::from_millis(100));
/// assert_eq!(options.ttl, Duration::from_secs(300));
/// ```
#[derive(Debug, Clone)]
pub struct CountCacheOptions {
	/// Quiet period before a count query is dispatched.
	pub debounce: Duration,
	/// How long a refreshed count stays fresh.
	pub ttl: Duration,
	/// Entry cap; least-recently-used entries are evicted above it.
	pub max_entries: usize,
	/// Serve an expired value immediately while refreshing in the
	/// background instead of making the caller wait.
	pub show_stale_data: bool,
	/// Compile count queries on the offload executor.
	pub use_offload: bool,
}

impl Default for CountCacheOptions {
	fn default() -> Self {
		Self {
			debounce: Duration::from_millis(200),
			ttl: Duration::from_secs(300),
			max_entries: 256,
			show_stale_data: false,
			use_offload: false,
		}
	}
}

impl CountCacheOptions {
	pub fn with_debounce(mut self, debounce: Duration) -> Self {
		self.debounce = debounce;
		self
	}

	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = ttl;
		self
	}

	pub fn with_max_entries(mut self, max_entries: usize) -> Self {
		self.max_entries = max_entries;
		self
	}

	pub fn with_show_stale_data(mut self, show_stale_data: bool) -> Self {
		self.show_stale_data = show_stale_data;
		self
	}

	pub fn with_use_offload(mut self, use_offload: bool) -> Self {
		self.use_offload = use_offload;
		self
	}
}
