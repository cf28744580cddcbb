//! Flat filter specification grouped by filter kind.
//!
//! A [`FilterConfig`] is an immutable snapshot handed over by the kiosk's
//! filter panel: one list per filter kind, all joined by a single
//! top-level [`LogicalOp`]. The nested tree counterpart lives in
//! [`crate::node`].

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Logical operator joining filter predicates.
///
/// Unknown values are rejected at deserialization time, which is how the
/// model enforces the "recognized operators only" rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOp {
	#[default]
	And,
	Or,
}

/// Text match semantics for a [`TextFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchType {
	/// Substring match (`LIKE %value%`)
	Contains,
	/// Exact match (`=`)
	Equals,
	/// Prefix match (`LIKE value%`)
	StartsWith,
	/// Suffix match (`LIKE %value`)
	EndsWith,
}

/// Named date window resolved against "today".
///
/// Presets let the kiosk offer one-tap date filters without the frontend
/// computing bounds itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatePreset {
	LastWeek,
	LastMonth,
	LastYear,
	LastDecade,
}

impl DatePreset {
	/// Resolve the preset to an inclusive `(start, end)` pair.
	///
	/// # Examples
	///
	/// ```
	/// use arkiv_filter::DatePreset;
	/// use chrono::NaiveDate;
	///
	/// let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
	/// let (start, end) = DatePreset::LastWeek.resolve(today);
	/// assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 23).unwrap());
	/// assert_eq!(end, today);
	/// ```
	pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
		let start = match self {
			DatePreset::LastWeek => today.checked_sub_days(Days::new(7)),
			DatePreset::LastMonth => today.checked_sub_months(Months::new(1)),
			DatePreset::LastYear => today.checked_sub_months(Months::new(12)),
			DatePreset::LastDecade => today.checked_sub_months(Months::new(120)),
		};
		(start.unwrap_or(NaiveDate::MIN), today)
	}
}

/// A single-field text criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFilter {
	pub field: String,
	pub value: String,
	pub match_type: MatchType,
	#[serde(default)]
	pub case_sensitive: bool,
}

/// A date-window criterion with optional explicit bounds and an optional
/// named preset filling in whichever bounds are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilter {
	pub field: String,
	#[serde(default)]
	pub start_date: Option<NaiveDate>,
	#[serde(default)]
	pub end_date: Option<NaiveDate>,
	#[serde(default)]
	pub preset: Option<DatePreset>,
}

impl DateFilter {
	/// Effective bounds after preset resolution.
	///
	/// Explicit bounds always win; the preset only fills in missing ones.
	pub fn resolved_bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
		match self.preset {
			Some(preset) => {
				let (start, end) = preset.resolve(today);
				(
					Some(self.start_date.unwrap_or(start)),
					Some(self.end_date.unwrap_or(end)),
				)
			}
			None => (self.start_date, self.end_date),
		}
	}
}

/// A numeric range criterion. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFilter {
	pub field: String,
	#[serde(default)]
	pub min: Option<i64>,
	#[serde(default)]
	pub max: Option<i64>,
}

/// A boolean flag criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanFilter {
	pub field: String,
	pub value: bool,
}

/// An opaque field/value pair for schema extensions.
///
/// The value must be a JSON scalar; arrays and objects are rejected by
/// validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFilter {
	pub field: String,
	pub value: serde_json::Value,
}

/// Flat filter specification over one content type.
///
/// All entries across all lists are joined with `operator`. An entirely
/// empty configuration compiles to the neutral `1=1` predicate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
	pub content_type: String,
	pub operator: LogicalOp,
	pub text_filters: Vec<TextFilter>,
	pub date_filters: Vec<DateFilter>,
	pub range_filters: Vec<RangeFilter>,
	pub boolean_filters: Vec<BooleanFilter>,
	pub custom_filters: Vec<CustomFilter>,
}

impl FilterConfig {
	/// `true` when no list carries any criterion.
	pub fn is_empty(&self) -> bool {
		self.text_filters.is_empty()
			&& self.date_filters.is_empty()
			&& self.range_filters.is_empty()
			&& self.boolean_filters.is_empty()
			&& self.custom_filters.is_empty()
	}

	/// Every field name referenced by the configuration, in list order.
	pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
		self.text_filters
			.iter()
			.map(|f| f.field.as_str())
			.chain(self.date_filters.iter().map(|f| f.field.as_str()))
			.chain(self.range_filters.iter().map(|f| f.field.as_str()))
			.chain(self.boolean_filters.iter().map(|f| f.field.as_str()))
			.chain(self.custom_filters.iter().map(|f| f.field.as_str()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_preset_fills_missing_bounds_only() {
		let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
		let explicit_start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

		let filter = DateFilter {
			field: "added_on".to_string(),
			start_date: Some(explicit_start),
			end_date: None,
			preset: Some(DatePreset::LastYear),
		};

		let (start, end) = filter.resolved_bounds(today);
		assert_eq!(start, Some(explicit_start));
		assert_eq!(end, Some(today));
	}

	#[test]
	fn test_preset_resolution_windows() {
		let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

		let (start, _) = DatePreset::LastMonth.resolve(today);
		assert_eq!(start, NaiveDate::from_ymd_opt(2026, 7, 30).unwrap());

		let (start, _) = DatePreset::LastDecade.resolve(today);
		assert_eq!(start, NaiveDate::from_ymd_opt(2016, 8, 30).unwrap());
	}

	#[test]
	fn test_empty_config() {
		let config = FilterConfig {
			content_type: "alumni".to_string(),
			..Default::default()
		};
		assert!(config.is_empty());
		assert_eq!(config.operator, LogicalOp::And);
	}

	#[test]
	fn test_unknown_operator_rejected() {
		let result: Result<FilterConfig, _> =
			serde_json::from_str(r#"{"contentType":"alumni","operator":"XOR"}"#);
		assert!(result.is_err());
	}

	#[test]
	fn test_unknown_match_type_rejected() {
		let result: Result<TextFilter, _> = serde_json::from_str(
			r#"{"field":"last_name","value":"x","matchType":"fuzzy"}"#,
		);
		assert!(result.is_err());
	}

	#[test]
	fn test_camel_case_round_trip() {
		let config = FilterConfig {
			content_type: "photos".to_string(),
			operator: LogicalOp::Or,
			range_filters: vec![RangeFilter {
				field: "year_taken".to_string(),
				min: Some(1950),
				max: None,
			}],
			..Default::default()
		};

		let json = serde_json::to_string(&config).unwrap();
		assert!(json.contains("\"contentType\":\"photos\""));
		assert!(json.contains("\"rangeFilters\""));
		assert!(json.contains("\"operator\":\"OR\""));

		let back: FilterConfig = serde_json::from_str(&json).unwrap();
		assert_eq!(back, config);
	}
}
