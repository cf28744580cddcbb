//! Debounced count estimation for archive filter queries.
//!
//! The cache keys on the canonical filter signature. Continuous edits
//! to the same filter coalesce into one executor call per quiet period,
//! concurrent callers share the in-flight result, and completed counts
//! are served from cache until their TTL elapses.
//!
//! Storage stays on the host's side of the [`CountExecutor`] seam; this
//! crate never opens a connection itself.

pub mod cache;
pub mod error;
pub mod executor;
pub mod offload;
pub mod options;
pub mod statistics;

mod entry;

pub use cache::{CountCache, CountResult};
pub use error::CountError;
pub use executor::{CountExecutor, ExecuteError};
pub use offload::{CompileJob, InlineOffload, OffloadExecutor, SpawnBlockingOffload};
pub use options::CountCacheOptions;
pub use statistics::CacheStatistics;
