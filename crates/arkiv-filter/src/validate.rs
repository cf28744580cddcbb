//! Validation of filter specifications against the field registry.
//!
//! Validation runs before compilation and never touches the executor.
//! All failures are collected and returned; nothing is thrown partway
//! through, so the panel can surface every problem at once.

use crate::config::{DateFilter, FilterConfig, RangeFilter};
use crate::node::{FilterNode, LeafFilter};
use crate::registry::FieldRegistry;
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
	#[error("unknown content type '{0}'")]
	UnknownContentType(String),

	#[error("unknown field '{field}' for content type '{content_type}'")]
	UnknownField { content_type: String, field: String },

	#[error("range filter on '{field}' has min {min} greater than max {max}")]
	InvalidRange { field: String, min: i64, max: i64 },

	#[error("date filter on '{field}' has start {start} after end {end}")]
	InvalidDateRange {
		field: String,
		start: NaiveDate,
		end: NaiveDate,
	},

	#[error("custom filter on '{field}' must carry a scalar value")]
	UnsupportedCustomValue { field: String },

	#[error("duplicate node id '{0}' in filter tree")]
	DuplicateNodeId(String),
}

/// Validate a flat configuration against the registry.
///
/// Checks that every referenced field exists for the content type, that
/// range bounds satisfy `min <= max`, that explicit date bounds satisfy
/// `start <= end`, and that custom values are scalars. Unrecognized
/// operators and match types never reach this point: they are rejected
/// when the model is deserialized.
///
/// # Examples
///
/// ```
/// use arkiv_filter::{FilterConfig, InMemoryFieldRegistry, RangeFilter, validate};
///
/// let registry = InMemoryFieldRegistry::new()
///     .with_content_type("alumni", ["graduation_year"]);
///
/// let config = FilterConfig {
///     content_type: "alumni".to_string(),
///     range_filters: vec![RangeFilter {
///         field: "graduation_year".to_string(),
///         min: Some(1990),
///         max: Some(1980),
///     }],
///     ..Default::default()
/// };
///
/// let errors = validate(&config, &registry).unwrap_err();
/// assert_eq!(errors.len(), 1);
/// ```
pub fn validate(
	config: &FilterConfig,
	registry: &dyn FieldRegistry,
) -> Result<(), Vec<ValidationError>> {
	let mut errors = Vec::new();

	let known_type = registry.allowed_fields(&config.content_type).is_some();
	if !known_type {
		errors.push(ValidationError::UnknownContentType(
			config.content_type.clone(),
		));
	}

	if known_type {
		for field in config.referenced_fields() {
			check_field(&config.content_type, field, registry, &mut errors);
		}
	}

	for filter in &config.range_filters {
		check_range(filter, &mut errors);
	}
	for filter in &config.date_filters {
		check_date(filter, &mut errors);
	}
	for filter in &config.custom_filters {
		if !is_scalar(&filter.value) {
			errors.push(ValidationError::UnsupportedCustomValue {
				field: filter.field.clone(),
			});
		}
	}

	if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a filter tree against the registry.
///
/// Applies the same per-leaf checks as [`validate`] across the whole
/// tree, and additionally rejects duplicate node ids.
pub fn validate_node(
	root: &FilterNode,
	content_type: &str,
	registry: &dyn FieldRegistry,
) -> Result<(), Vec<ValidationError>> {
	let mut errors = Vec::new();

	let known_type = registry.allowed_fields(content_type).is_some();
	if !known_type {
		errors.push(ValidationError::UnknownContentType(content_type.to_string()));
	}

	let mut seen_ids: HashSet<&str> = HashSet::new();
	for node in root.iter() {
		if !seen_ids.insert(node.id()) {
			errors.push(ValidationError::DuplicateNodeId(node.id().to_string()));
		}

		if let FilterNode::Leaf {
			filter: Some(leaf), ..
		} = node
		{
			if known_type {
				check_field(content_type, leaf.field(), registry, &mut errors);
			}
			match leaf {
				LeafFilter::Range(f) => check_range(f, &mut errors),
				LeafFilter::Date(f) => check_date(f, &mut errors),
				LeafFilter::Custom(f) if !is_scalar(&f.value) => {
					errors.push(ValidationError::UnsupportedCustomValue {
						field: f.field.clone(),
					});
				}
				_ => {}
			}
		}
	}

	if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_field(
	content_type: &str,
	field: &str,
	registry: &dyn FieldRegistry,
	errors: &mut Vec<ValidationError>,
) {
	if !registry.is_allowed(content_type, field) {
		errors.push(ValidationError::UnknownField {
			content_type: content_type.to_string(),
			field: field.to_string(),
		});
	}
}

fn check_range(filter: &RangeFilter, errors: &mut Vec<ValidationError>) {
	if let (Some(min), Some(max)) = (filter.min, filter.max) {
		if min > max {
			errors.push(ValidationError::InvalidRange {
				field: filter.field.clone(),
				min,
				max,
			});
		}
	}
}

fn check_date(filter: &DateFilter, errors: &mut Vec<ValidationError>) {
	if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
		if start > end {
			errors.push(ValidationError::InvalidDateRange {
				field: filter.field.clone(),
				start,
				end,
			});
		}
	}
}

fn is_scalar(value: &serde_json::Value) -> bool {
	matches!(
		value,
		serde_json::Value::Bool(_) | serde_json::Value::Number(_) | serde_json::Value::String(_)
	)
}
