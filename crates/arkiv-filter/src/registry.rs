//! Field allow-listing per content type.
//!
//! Field names, unlike filter values, end up as identifiers in generated
//! SQL text and cannot be parameterized. The registry is the single
//! authority on which identifiers may appear; anything else is a
//! validation failure, never silent compilation.

use std::collections::{HashMap, HashSet};

/// Collaborator-supplied list of allowed field names per content type.
///
/// Consulted synchronously during validation and compilation.
pub trait FieldRegistry: Send + Sync {
	/// Allowed fields for `content_type`, or `None` when the content type
	/// itself is unknown.
	fn allowed_fields(&self, content_type: &str) -> Option<&HashSet<String>>;

	/// `true` when `field` is registered for `content_type`.
	fn is_allowed(&self, content_type: &str, field: &str) -> bool {
		self.allowed_fields(content_type)
			.is_some_and(|fields| fields.contains(field))
	}
}

/// In-memory [`FieldRegistry`] built from the kiosk's content schema.
///
/// # Examples
///
/// ```
/// use arkiv_filter::{FieldRegistry, InMemoryFieldRegistry};
///
/// let registry = InMemoryFieldRegistry::new()
///     .with_content_type("alumni", ["last_name", "graduation_year"])
///     .with_content_type("photos", ["caption", "year_taken"]);
///
/// assert!(registry.is_allowed("alumni", "last_name"));
/// assert!(!registry.is_allowed("alumni", "caption"));
/// assert!(registry.allowed_fields("faculty").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryFieldRegistry {
	content_types: HashMap<String, HashSet<String>>,
}

impl InMemoryFieldRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a content type with its allowed fields.
	///
	/// Registering the same content type twice replaces its field set.
	pub fn with_content_type<I, S>(mut self, content_type: impl Into<String>, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.content_types.insert(
			content_type.into(),
			fields.into_iter().map(Into::into).collect(),
		);
		self
	}
}

impl FieldRegistry for InMemoryFieldRegistry {
	fn allowed_fields(&self, content_type: &str) -> Option<&HashSet<String>> {
		self.content_types.get(content_type)
	}
}
