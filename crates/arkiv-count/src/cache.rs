//! Debounced, request-coalescing count cache.
//!
//! One signature owns at most one flight: a spawned task that waits out
//! the debounce window, dispatches the compiled count query once, and
//! fans the result out to every attached caller over a watch channel.
//! The instance lock is never held across an await point.

use crate::entry::{CacheEntry, EntryState};
use crate::error::CountError;
use crate::executor::CountExecutor;
use crate::offload::{OffloadExecutor, SpawnBlockingOffload};
use crate::options::CountCacheOptions;
use crate::statistics::CacheStatistics;
use arkiv_filter::{FilterConfig, signature};
use arkiv_query::{QueryCompiler, Value, optimize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tokio::sync::{Mutex, watch};
use tokio::time::Instant;

/// A resolved count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountResult {
	pub count: i64,
	/// True when the value was served past its TTL while a refresh ran
	/// in the background.
	pub is_stale: bool,
	/// When the executor produced this value.
	pub timestamp: SystemTime,
}

type FlightOutcome = Option<Result<CountResult, CountError>>;

/// A scheduled or in-flight refresh for one signature.
///
/// `generation` counts attached requests; the value recorded in
/// `dispatched` at executor dispatch tells the owner task whether the
/// flight was superseded while the query ran.
struct PendingFlight {
	deadline: Instant,
	generation: u64,
	dispatched: Option<u64>,
	rx: watch::Receiver<FlightOutcome>,
}

#[derive(Default)]
struct CacheState {
	entries: HashMap<String, CacheEntry>,
	pending: HashMap<String, PendingFlight>,
}

#[derive(Default)]
struct Counters {
	hits: AtomicU64,
	misses: AtomicU64,
	requests: AtomicU64,
}

/// Debounced count estimator over a [`QueryCompiler`] and the host's
/// executor.
///
/// # Examples
///
/// ```no_run
/// use arkiv_count::{CountCache, CountCacheOptions, CountExecutor};
/// use arkiv_filter::{FilterConfig, InMemoryFieldRegistry};
/// use arkiv_query::QueryCompiler;
/// use std::sync::Arc;
///
/// # async fn demo(executor: Arc<dyn CountExecutor>) {
/// let compiler = QueryCompiler::new(Arc::new(
///     InMemoryFieldRegistry::new().with_content_type("alumni", ["last_name"]),
/// ));
/// let cache = CountCache::new(compiler, CountCacheOptions::default());
///
/// let config = FilterConfig {
///     content_type: "alumni".to_string(),
///     ..Default::default()
/// };
/// let result = cache.calculate_count(&config, executor).await.unwrap();
/// println!("{} rows match", result.count);
/// # }
/// ```
pub struct CountCache {
	compiler: QueryCompiler,
	options: CountCacheOptions,
	offload: Arc<dyn OffloadExecutor>,
	state: Arc<Mutex<CacheState>>,
	counters: Arc<Counters>,
}

impl CountCache {
	pub fn new(compiler: QueryCompiler, options: CountCacheOptions) -> Self {
		Self {
			compiler,
			options,
			offload: Arc::new(SpawnBlockingOffload),
			state: Arc::new(Mutex::new(CacheState::default())),
			counters: Arc::new(Counters::default()),
		}
	}

	/// Replace the offload executor used when
	/// [`CountCacheOptions::use_offload`] is set.
	pub fn with_offload(mut self, offload: Arc<dyn OffloadExecutor>) -> Self {
		self.offload = offload;
		self
	}

	/// Count the rows matching `config`, debounced and cached per
	/// canonical signature.
	///
	/// A fresh cached value returns immediately. An expired value
	/// returns immediately as stale when
	/// [`CountCacheOptions::show_stale_data`] is set, scheduling a
	/// background refresh; otherwise the caller joins the pending
	/// flight and resolves when it completes.
	pub async fn calculate_count(
		&self,
		config: &FilterConfig,
		executor: Arc<dyn CountExecutor>,
	) -> Result<CountResult, CountError> {
		let sig = signature(config);
		self.counters.requests.fetch_add(1, Ordering::Relaxed);

		let mut rx = {
			let mut state = self.state.lock().await;

			let mut stale: Option<CountResult> = None;
			if let Some(entry) = state.entries.get_mut(&sig) {
				if entry.state == EntryState::Fresh && !entry.is_expired(self.options.ttl) {
					entry.touch();
					self.counters.hits.fetch_add(1, Ordering::Relaxed);
					tracing::debug!(signature = %sig, count = entry.value, "count cache hit");
					return Ok(CountResult {
						count: entry.value,
						is_stale: false,
						timestamp: entry.timestamp,
					});
				}
				entry.touch();
				entry.state = EntryState::Pending;
				if self.options.show_stale_data {
					stale = Some(CountResult {
						count: entry.value,
						is_stale: true,
						timestamp: entry.timestamp,
					});
				}
			}

			let rx = self.schedule_refresh(&mut state, &sig, config, executor);

			if let Some(result) = stale {
				self.counters.hits.fetch_add(1, Ordering::Relaxed);
				tracing::debug!(signature = %sig, "serving stale count while refreshing");
				return Ok(result);
			}
			self.counters.misses.fetch_add(1, Ordering::Relaxed);
			rx
		};

		loop {
			if rx.changed().await.is_err() {
				return Err(CountError::Canceled);
			}
			let outcome = rx.borrow_and_update().clone();
			if let Some(result) = outcome {
				return result;
			}
		}
	}

	/// Drop one cached signature, or everything.
	///
	/// The next request for a dropped signature dispatches instead of
	/// serving from cache. An in-flight refresh is left to finish.
	pub async fn invalidate(&self, signature: Option<&str>) {
		let mut state = self.state.lock().await;
		match signature {
			Some(sig) => {
				state.entries.remove(sig);
			}
			None => state.entries.clear(),
		}
	}

	/// Mark every expired `Fresh` entry `Stale` in place. Returns how
	/// many were marked.
	pub async fn cleanup_expired(&self) -> usize {
		let mut state = self.state.lock().await;
		let ttl = self.options.ttl;
		let mut marked = 0;
		for entry in state.entries.values_mut() {
			if entry.state == EntryState::Fresh && entry.is_expired(ttl) {
				entry.state = EntryState::Stale;
				marked += 1;
			}
		}
		marked
	}

	pub async fn statistics(&self) -> CacheStatistics {
		let state = self.state.lock().await;
		CacheStatistics {
			hits: self.counters.hits.load(Ordering::Relaxed),
			misses: self.counters.misses.load(Ordering::Relaxed),
			total_requests: self.counters.requests.load(Ordering::Relaxed),
			entry_count: state.entries.len() as u64,
		}
	}

	/// Attach to the signature's flight, creating it (and its owner
	/// task) on first contact. Attaching before dispatch pushes the
	/// debounce deadline; attaching after dispatch supersedes the
	/// in-flight result.
	fn schedule_refresh(
		&self,
		state: &mut CacheState,
		sig: &str,
		config: &FilterConfig,
		executor: Arc<dyn CountExecutor>,
	) -> watch::Receiver<FlightOutcome> {
		if let Some(flight) = state.pending.get_mut(sig) {
			flight.generation += 1;
			if flight.dispatched.is_none() {
				flight.deadline = Instant::now() + self.options.debounce;
			}
			return flight.rx.clone();
		}

		let (tx, rx) = watch::channel(None);
		state.pending.insert(
			sig.to_string(),
			PendingFlight {
				deadline: Instant::now() + self.options.debounce,
				generation: 0,
				dispatched: None,
				rx: rx.clone(),
			},
		);

		tokio::spawn(run_flight(
			Arc::clone(&self.state),
			self.compiler.clone(),
			self.options.clone(),
			Arc::clone(&self.offload),
			executor,
			sig.to_string(),
			config.clone(),
			tx,
		));

		rx
	}
}

/// Owner task for one signature's flight.
///
/// Waits out the (pushable) debounce deadline, dispatches exactly one
/// executor call at a time, and re-dispatches when a request superseded
/// the call mid-flight. The final result lands in the cache and the
/// watch channel under the same lock acquisition that removes the
/// flight, so late arrivals either see the pending flight or a settled
/// cache entry, never neither.
#[allow(clippy::too_many_arguments)]
async fn run_flight(
	state: Arc<Mutex<CacheState>>,
	compiler: QueryCompiler,
	options: CountCacheOptions,
	offload: Arc<dyn OffloadExecutor>,
	executor: Arc<dyn CountExecutor>,
	sig: String,
	config: FilterConfig,
	tx: watch::Sender<FlightOutcome>,
) {
	loop {
		// Debounce: sleep to the deadline, then re-check it, since an
		// attach may have pushed it while we slept. After a superseding
		// attach the stored deadline is already past, so this falls
		// through to an immediate re-dispatch.
		loop {
			let deadline = {
				let guard = state.lock().await;
				match guard.pending.get(&sig) {
					Some(flight) => flight.deadline,
					None => return,
				}
			};
			tokio::time::sleep_until(deadline).await;

			let mut guard = state.lock().await;
			let Some(flight) = guard.pending.get_mut(&sig) else {
				return;
			};
			if flight.deadline <= Instant::now() {
				flight.dispatched = Some(flight.generation);
				tracing::debug!(signature = %sig, generation = flight.generation, "dispatching count query");
				break;
			}
		}

		let outcome = run_query(&compiler, &options, &offload, &executor, &config).await;

		let mut guard = state.lock().await;
		let Some(flight) = guard.pending.get_mut(&sig) else {
			return;
		};
		if flight.dispatched != Some(flight.generation) {
			tracing::debug!(signature = %sig, "count result superseded, re-dispatching");
			continue;
		}

		match outcome {
			Ok(result) => {
				guard
					.entries
					.insert(sig.clone(), CacheEntry::fresh(result.count, result.timestamp));
				evict_lru(&mut guard.entries, options.max_entries);
				guard.pending.remove(&sig);
				let _ = tx.send(Some(Ok(result)));
			}
			Err(error) => {
				// Keep the previous value, if any, as explicitly stale.
				if let Some(entry) = guard.entries.get_mut(&sig) {
					entry.state = EntryState::Stale;
				}
				guard.pending.remove(&sig);
				tracing::warn!(signature = %sig, error = %error, "count refresh failed");
				let _ = tx.send(Some(Err(error)));
			}
		}
		return;
	}
}

async fn run_query(
	compiler: &QueryCompiler,
	options: &CountCacheOptions,
	offload: &Arc<dyn OffloadExecutor>,
	executor: &Arc<dyn CountExecutor>,
	config: &FilterConfig,
) -> Result<CountResult, CountError> {
	let compiled = if options.use_offload {
		let compiler = compiler.clone();
		let config = config.clone();
		offload
			.compile(Box::new(move || compiler.compile_count(&config)))
			.await?
	} else {
		compiler.compile_count(config)?
	};
	let compiled = optimize(compiled);

	let rows = executor.execute(&compiled.sql, &compiled.params).await?;
	let count = extract_count(&rows).ok_or(CountError::MalformedResult)?;
	Ok(CountResult {
		count,
		is_stale: false,
		timestamp: SystemTime::now(),
	})
}

/// Count lives in row 0, column 0.
fn extract_count(rows: &[Vec<Value>]) -> Option<i64> {
	match rows.first()?.first()? {
		Value::Int(count) => Some(*count),
		Value::Double(count) => Some(*count as i64),
		_ => None,
	}
}

/// Evict least-recently-used entries above the cap. Entries with a
/// refresh in flight are never victims.
fn evict_lru(entries: &mut HashMap<String, CacheEntry>, max_entries: usize) {
	while entries.len() > max_entries {
		let victim = entries
			.iter()
			.filter(|(_, entry)| entry.state != EntryState::Pending)
			.min_by_key(|(_, entry)| entry.last_used)
			.map(|(key, _)| key.clone());
		match victim {
			Some(key) => {
				tracing::debug!(signature = %key, "evicting least-recently-used count");
				entries.remove(&key);
			}
			None => break,
		}
	}
}
