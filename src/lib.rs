//! # Arkiv
//!
//! The interactive search core of an archive kiosk: visitors stack
//! filters over catalogued records and watch the match count update as
//! they edit. This workspace covers the part between the filter editor
//! and the storage layer.
//!
//! - [`filter`] — the filter model (flat configurations and nested
//!   operator/group/leaf trees), field allow-list registry, validation,
//!   canonical signatures, and the serializable export format.
//! - [`query`] — the compiler from filter model to parameterized SQL,
//!   the predicate IR, and the redundancy-removing optimizer.
//! - [`count`] — the debounced, request-coalescing count cache that
//!   keeps `COUNT(*)` estimates warm while the visitor edits.
//!
//! The UI and the storage engine stay on the host's side: the filter
//! model arrives as data (typically deserialized from the frontend) and
//! compiled queries leave through the [`count::CountExecutor`] seam or
//! as plain `{sql, params}` pairs.
//!
//! ## Quick Start
//!
//! ```
//! use arkiv::filter::{FilterConfig, InMemoryFieldRegistry, MatchType, TextFilter};
//! use arkiv::query::{QueryCompiler, optimize};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(
//!     InMemoryFieldRegistry::new().with_content_type("alumni", ["last_name"]),
//! );
//! let compiler = QueryCompiler::new(registry);
//!
//! let config = FilterConfig {
//!     content_type: "alumni".to_string(),
//!     text_filters: vec![TextFilter {
//!         field: "last_name".to_string(),
//!         value: "Smith".to_string(),
//!         match_type: MatchType::Contains,
//!         case_sensitive: false,
//!     }],
//!     ..Default::default()
//! };
//!
//! let query = optimize(compiler.compile(&config).unwrap());
//! assert_eq!(
//!     query.sql,
//!     "SELECT * FROM alumni WHERE LOWER(last_name) LIKE LOWER(?)"
//! );
//! assert_eq!(query.params.len(), 1);
//! ```

pub use arkiv_count as count;
pub use arkiv_filter as filter;
pub use arkiv_query as query;

/// The types most hosts need, in one import.
pub mod prelude {
	pub use arkiv_count::{
		CountCache, CountCacheOptions, CountError, CountExecutor, CountResult, ExecuteError,
	};
	pub use arkiv_filter::{
		FieldRegistry, FilterConfig, FilterNode, InMemoryFieldRegistry, LeafFilter, LogicalOp,
		MatchType, signature,
	};
	pub use arkiv_query::{CompileError, CompiledQuery, QueryCompiler, Value, optimize};
}
