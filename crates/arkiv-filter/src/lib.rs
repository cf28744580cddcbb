//! # arkiv-filter
//!
//! Filter model and validation for the archive kiosk search core.
//!
//! This crate owns the data types that describe a filter specification —
//! either a flat [`FilterConfig`] grouped by filter kind, or a nested
//! [`FilterNode`] tree produced by the visual query builder — together
//! with the [`FieldRegistry`] allow-list and the validation pass that
//! runs before any SQL is compiled.
//!
//! The model is `serde`-serializable with camelCase field names because
//! saved searches are shared with the kiosk frontend.
//!
//! ## Quick Start
//!
//! ```rust
//! use arkiv_filter::{FilterConfig, InMemoryFieldRegistry, MatchType, TextFilter, validate};
//!
//! let registry = InMemoryFieldRegistry::new()
//!     .with_content_type("alumni", ["last_name", "graduation_year"]);
//!
//! let config = FilterConfig {
//!     content_type: "alumni".to_string(),
//!     text_filters: vec![TextFilter {
//!         field: "last_name".to_string(),
//!         value: "Smith".to_string(),
//!         match_type: MatchType::Equals,
//!         case_sensitive: false,
//!     }],
//!     ..Default::default()
//! };
//!
//! assert!(validate(&config, &registry).is_ok());
//! ```

pub mod config;
pub mod node;
pub mod registry;
pub mod signature;
pub mod validate;

pub use config::{
	BooleanFilter, CustomFilter, DateFilter, DatePreset, FilterConfig, LogicalOp, MatchType,
	RangeFilter, TextFilter,
};
pub use node::{FilterNode, LeafFilter};
pub use registry::{FieldRegistry, InMemoryFieldRegistry};
pub use signature::signature;
pub use validate::{ValidationError, validate, validate_node};
