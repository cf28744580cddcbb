//! Offload seam for CPU-heavy compilation.
//!
//! Compiling a very large filter tree is synchronous work; the offload
//! executor decides where it runs so the interactive task is not blocked.

use crate::error::CountError;
use arkiv_query::{CompileError, CompiledQuery};
use async_trait::async_trait;

/// A deferred compilation, ready to run wherever the offload decides.
pub type CompileJob = Box<dyn FnOnce() -> Result<CompiledQuery, CompileError> + Send + 'static>;

#[async_trait]
pub trait OffloadExecutor: Send + Sync {
	async fn compile(&self, job: CompileJob) -> Result<CompiledQuery, CountError>;
}

/// Runs the job on the current task. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineOffload;

#[async_trait]
impl OffloadExecutor for InlineOffload {
	async fn compile(&self, job: CompileJob) -> Result<CompiledQuery, CountError> {
		Ok(job()?)
	}
}

/// Runs the job on the blocking thread pool via
/// [`tokio::task::spawn_blocking`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnBlockingOffload;

#[async_trait]
impl OffloadExecutor for SpawnBlockingOffload {
	async fn compile(&self, job: CompileJob) -> Result<CompiledQuery, CountError> {
		match tokio::task::spawn_blocking(job).await {
			Ok(compiled) => Ok(compiled?),
			Err(join_error) => {
				tracing::warn!(error = %join_error, "offloaded compilation did not complete");
				Err(CountError::Canceled)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use arkiv_filter::{FilterConfig, InMemoryFieldRegistry};
	use arkiv_query::QueryCompiler;
	use std::sync::Arc;

	fn job() -> CompileJob {
		let compiler = QueryCompiler::new(Arc::new(
			InMemoryFieldRegistry::new().with_content_type("alumni", ["last_name"]),
		));
		let config = FilterConfig {
			content_type: "alumni".to_string(),
			..Default::default()
		};
		Box::new(move || compiler.compile_count(&config))
	}

	#[tokio::test]
	async fn test_inline_offload_runs_job() {
		let compiled = InlineOffload.compile(job()).await.unwrap();
		assert_eq!(compiled.sql, "SELECT COUNT(*) FROM alumni WHERE 1=1");
	}

	#[tokio::test]
	async fn test_spawn_blocking_offload_runs_job() {
		let compiled = SpawnBlockingOffload.compile(job()).await.unwrap();
		assert_eq!(compiled.sql, "SELECT COUNT(*) FROM alumni WHERE 1=1");
	}
}
