//! The executor seam between the count cache and the host's storage.

use arkiv_query::Value;
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by the host's executor.
///
/// The cache treats the message as opaque. `Clone` so a single failure
/// can be fanned out to every caller attached to the flight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
	#[error("query failed: {0}")]
	Query(String),
	#[error("executor unavailable: {0}")]
	Unavailable(String),
}

/// Runs a parameterized query against the host's storage.
///
/// The cache issues `SELECT COUNT(*)` statements and reads the count
/// from row 0, column 0 of the result. Timeout policy belongs to the
/// implementation; the cache imposes none of its own.
#[async_trait]
pub trait CountExecutor: Send + Sync {
	async fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>, ExecuteError>;
}
