//! Canonical cache signatures for filter configurations.
//!
//! The count cache keys its entries by a deterministic string derived
//! from a [`FilterConfig`]. Two configurations that describe the same
//! criteria in a different list order must map to the same signature, so
//! each filter list is sorted by its serialized form before rendering.
//! Object keys come out sorted because `serde_json`'s map is ordered.

use crate::config::FilterConfig;
use serde_json::Value;

/// The five list keys whose element order is irrelevant to semantics.
const LIST_KEYS: [&str; 5] = [
	"textFilters",
	"dateFilters",
	"rangeFilters",
	"booleanFilters",
	"customFilters",
];

/// Derive the canonical signature string for a configuration.
///
/// # Examples
///
/// ```
/// use arkiv_filter::{BooleanFilter, FilterConfig, signature};
///
/// let a = FilterConfig {
///     content_type: "alumni".to_string(),
///     boolean_filters: vec![
///         BooleanFilter { field: "is_donor".to_string(), value: true },
///         BooleanFilter { field: "is_active".to_string(), value: false },
///     ],
///     ..Default::default()
/// };
/// let mut b = a.clone();
/// b.boolean_filters.reverse();
///
/// assert_eq!(signature(&a), signature(&b));
/// ```
pub fn signature(config: &FilterConfig) -> String {
	// FilterConfig serialization cannot fail: no maps with non-string
	// keys, no non-finite floats.
	let mut value = serde_json::to_value(config).unwrap_or(Value::Null);

	if let Value::Object(map) = &mut value {
		for key in LIST_KEYS {
			if let Some(Value::Array(items)) = map.get_mut(key) {
				items.sort_by_cached_key(|item| item.to_string());
			}
		}
	}

	value.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{MatchType, RangeFilter, TextFilter};

	fn base() -> FilterConfig {
		FilterConfig {
			content_type: "alumni".to_string(),
			text_filters: vec![
				TextFilter {
					field: "last_name".to_string(),
					value: "Smith".to_string(),
					match_type: MatchType::Contains,
					case_sensitive: false,
				},
				TextFilter {
					field: "first_name".to_string(),
					value: "Ada".to_string(),
					match_type: MatchType::Equals,
					case_sensitive: true,
				},
			],
			range_filters: vec![RangeFilter {
				field: "graduation_year".to_string(),
				min: Some(1980),
				max: Some(1990),
			}],
			..Default::default()
		}
	}

	#[test]
	fn test_deterministic() {
		assert_eq!(signature(&base()), signature(&base()));
	}

	#[test]
	fn test_list_order_is_normalized() {
		let a = base();
		let mut b = base();
		b.text_filters.reverse();
		assert_eq!(signature(&a), signature(&b));
	}

	#[test]
	fn test_value_changes_signature() {
		let a = base();
		let mut b = base();
		b.range_filters[0].max = Some(2000);
		assert_ne!(signature(&a), signature(&b));
	}

	#[test]
	fn test_case_sensitivity_is_significant() {
		let a = base();
		let mut b = base();
		b.text_filters[0].case_sensitive = true;
		assert_ne!(signature(&a), signature(&b));
	}
}
