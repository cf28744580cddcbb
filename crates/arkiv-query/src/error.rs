//! Compilation errors.

use arkiv_filter::ValidationError;
use thiserror::Error;

/// Failure raised before any SQL is emitted. The caller never receives
/// partial query text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
	/// The specification referenced unknown identifiers or carried
	/// inconsistent bounds.
	#[error("validation failed: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
	Validation(Vec<ValidationError>),

	/// A leaf node without a filter fragment (the tree editor had not
	/// finished it).
	#[error("leaf node '{0}' has no filter fragment")]
	EmptyLeaf(String),

	/// The tree root was not an operator node.
	#[error("filter tree root must be an operator node, got '{0}'")]
	RootNotOperator(String),
}

pub type QueryResult<T> = Result<T, CompileError>;
