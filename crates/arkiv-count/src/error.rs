//! Errors surfaced by the count cache.

use crate::executor::ExecuteError;
use arkiv_query::CompileError;
use thiserror::Error;

/// Why a count request failed. `Clone` for watch-channel fan-out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CountError {
	#[error(transparent)]
	Compile(#[from] CompileError),
	#[error(transparent)]
	Execution(#[from] ExecuteError),
	#[error("count query returned no usable value")]
	MalformedResult,
	#[error("count request was canceled before completion")]
	Canceled,
}
