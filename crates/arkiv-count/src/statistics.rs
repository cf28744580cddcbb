//! Cache statistics

/// Counter snapshot for inspection.
///
/// A stale value served while a refresh runs in the background counts
/// as a hit; a request that had to wait for the executor counts as a
/// miss.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatistics {
	/// Number of requests answered from the cache
	pub hits: u64,
	/// Number of requests that waited for a refresh
	pub misses: u64,
	/// Total number of requests
	pub total_requests: u64,
	/// Current number of entries in the cache
	pub entry_count: u64,
}

impl CacheStatistics {
	/// Calculate hit rate (0.0 to 1.0)
	///
	/// # Examples
	///
	/// ```
	/// use arkiv_count::CacheStatistics;
	///
	/// let stats = CacheStatistics {
	///     hits: 75,
	///     misses: 25,
	///     total_requests: 100,
	///     entry_count: 10,
	/// };
	///
	/// assert_eq!(stats.hit_rate(), 0.75);
	/// ```
	pub fn hit_rate(&self) -> f64 {
		if self.total_requests == 0 {
			0.0
		} else {
			self.hits as f64 / self.total_requests as f64
		}
	}

	/// Calculate miss rate (0.0 to 1.0)
	pub fn miss_rate(&self) -> f64 {
		if self.total_requests == 0 {
			0.0
		} else {
			self.misses as f64 / self.total_requests as f64
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rates_with_zero_requests() {
		let stats = CacheStatistics::default();
		assert_eq!(stats.hit_rate(), 0.0);
		assert_eq!(stats.miss_rate(), 0.0);
	}
}
