//! # arkiv-query
//!
//! Filter-query compiler and optimizer for the archive kiosk search
//! core.
//!
//! The compiler walks a flat [`FilterConfig`](arkiv_filter::FilterConfig)
//! or a nested [`FilterNode`](arkiv_filter::FilterNode) tree and emits a
//! parameterized query: text with `?` placeholders plus the positional
//! parameter list, in matching order. Filter values never appear in the
//! text; field and table identifiers are constrained to the
//! [`FieldRegistry`](arkiv_filter::FieldRegistry) allow-list.
//!
//! [`optimize`] is a pure rewrite pass that removes redundant grouping,
//! neutral predicates, and duplicate leaves while matching the identical
//! row set.
//!
//! ## Quick Start
//!
//! ```rust
//! use arkiv_filter::{FilterConfig, InMemoryFieldRegistry, RangeFilter};
//! use arkiv_query::{QueryCompiler, optimize};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(
//!     InMemoryFieldRegistry::new().with_content_type("alumni", ["graduation_year"]),
//! );
//! let compiler = QueryCompiler::new(registry);
//!
//! let config = FilterConfig {
//!     content_type: "alumni".to_string(),
//!     range_filters: vec![RangeFilter {
//!         field: "graduation_year".to_string(),
//!         min: Some(1980),
//!         max: Some(1990),
//!     }],
//!     ..Default::default()
//! };
//!
//! let query = optimize(compiler.compile(&config).unwrap());
//! assert_eq!(
//!     query.sql,
//!     "SELECT * FROM alumni WHERE graduation_year BETWEEN ? AND ?"
//! );
//! assert_eq!(query.params.len(), 2);
//! ```

pub mod compiler;
pub mod error;
pub mod export;
pub mod predicate;
pub mod value;
pub mod writer;

pub mod optimizer;

pub use compiler::{CompiledQuery, QueryCompiler, QueryKind};
pub use error::{CompileError, QueryResult};
pub use export::{FilterExport, FilterSpec};
pub use optimizer::optimize;
pub use predicate::Predicate;
pub use value::Value;
pub use writer::SqlWriter;
