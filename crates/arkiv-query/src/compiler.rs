//! The filter-query compiler.
//!
//! Turns a flat [`FilterConfig`] or a nested [`FilterNode`] tree into a
//! parameterized query. Values always travel as positional parameters;
//! the only identifiers ever written into text are the content-type
//! table and field names, both constrained to the registry allow-list
//! and checked by validation before compilation starts.

use crate::error::{CompileError, QueryResult};
use crate::predicate::Predicate;
use crate::value::Value;
use crate::writer::SqlWriter;
use arkiv_filter::{
	BooleanFilter, CustomFilter, DateFilter, FieldRegistry, FilterConfig, FilterNode, LeafFilter,
	LogicalOp, MatchType, RangeFilter, TextFilter, ValidationError, validate, validate_node,
};
use chrono::NaiveDate;
use std::sync::Arc;

/// What the rendered statement wraps around the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
	/// `SELECT * FROM <table> WHERE <predicate>`
	Select,
	/// `SELECT COUNT(*) FROM <table> WHERE <predicate>`
	Count,
	/// The bare predicate, for composition by the host.
	Fragment,
}

/// A compiled, parameterized query.
///
/// `sql` and `params` are aligned: the n-th `?` placeholder binds the
/// n-th parameter. The predicate IR is retained so the optimizer can
/// rewrite and re-render without re-indexing placeholders by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
	pub sql: String,
	pub params: Vec<Value>,
	pub(crate) kind: QueryKind,
	pub(crate) table: String,
	pub(crate) predicate: Predicate,
}

impl CompiledQuery {
	pub(crate) fn render(kind: QueryKind, table: String, predicate: Predicate) -> Self {
		let (where_sql, params) = predicate.to_sql();
		let sql = match kind {
			QueryKind::Select => format!("SELECT * FROM {table} WHERE {where_sql}"),
			QueryKind::Count => format!("SELECT COUNT(*) FROM {table} WHERE {where_sql}"),
			QueryKind::Fragment => where_sql,
		};
		Self {
			sql,
			params,
			kind,
			table,
			predicate,
		}
	}

	/// Number of `?` placeholders in the text. Always equals
	/// `params.len()`.
	pub fn placeholder_count(&self) -> usize {
		self.sql.matches('?').count()
	}
}

/// Compiles filter specifications into parameterized queries.
///
/// # Examples
///
/// ```
/// use arkiv_filter::{FilterConfig, InMemoryFieldRegistry, MatchType, TextFilter};
/// use arkiv_query::QueryCompiler;
/// use std::sync::Arc;
///
/// let registry = Arc::new(
///     InMemoryFieldRegistry::new().with_content_type("alumni", ["last_name"]),
/// );
/// let compiler = QueryCompiler::new(registry);
///
/// let config = FilterConfig {
///     content_type: "alumni".to_string(),
///     text_filters: vec![TextFilter {
///         field: "last_name".to_string(),
///         value: "Smith".to_string(),
///         match_type: MatchType::Equals,
///         case_sensitive: false,
///     }],
///     ..Default::default()
/// };
///
/// let query = compiler.compile(&config).unwrap();
/// assert_eq!(
///     query.sql,
///     "SELECT * FROM alumni WHERE LOWER(last_name) = LOWER(?)"
/// );
/// assert_eq!(query.params.len(), 1);
/// ```
#[derive(Clone)]
pub struct QueryCompiler {
	registry: Arc<dyn FieldRegistry>,
}

impl QueryCompiler {
	pub fn new(registry: Arc<dyn FieldRegistry>) -> Self {
		Self { registry }
	}

	/// Compile a flat configuration into a full row query.
	pub fn compile(&self, config: &FilterConfig) -> QueryResult<CompiledQuery> {
		self.compile_flat(config, QueryKind::Select)
	}

	/// Compile a flat configuration into a `COUNT(*)` query.
	pub fn compile_count(&self, config: &FilterConfig) -> QueryResult<CompiledQuery> {
		self.compile_flat(config, QueryKind::Count)
	}

	/// Compile only the predicate fragment of a flat configuration.
	pub fn compile_where(&self, config: &FilterConfig) -> QueryResult<CompiledQuery> {
		self.compile_flat(config, QueryKind::Fragment)
	}

	/// Compile a filter tree into a full row query.
	///
	/// The root must be an operator node; leaves without a fragment and
	/// duplicate node ids are rejected before any SQL is emitted.
	pub fn compile_tree(&self, root: &FilterNode, content_type: &str) -> QueryResult<CompiledQuery> {
		self.compile_tree_kind(root, content_type, QueryKind::Select)
	}

	/// Compile a filter tree into a `COUNT(*)` query.
	pub fn compile_tree_count(
		&self,
		root: &FilterNode,
		content_type: &str,
	) -> QueryResult<CompiledQuery> {
		self.compile_tree_kind(root, content_type, QueryKind::Count)
	}

	/// Compile only the predicate fragment of a filter tree.
	pub fn compile_tree_where(
		&self,
		root: &FilterNode,
		content_type: &str,
	) -> QueryResult<CompiledQuery> {
		self.compile_tree_kind(root, content_type, QueryKind::Fragment)
	}

	fn compile_flat(&self, config: &FilterConfig, kind: QueryKind) -> QueryResult<CompiledQuery> {
		validate(config, self.registry.as_ref()).map_err(CompileError::Validation)?;

		let today = today();
		let mut predicates = Vec::new();
		for filter in &config.text_filters {
			predicates.push(compile_text(filter));
		}
		for filter in &config.date_filters {
			predicates.push(compile_date(filter, today));
		}
		for filter in &config.range_filters {
			predicates.push(compile_range(filter));
		}
		for filter in &config.boolean_filters {
			predicates.push(compile_boolean(filter));
		}
		for filter in &config.custom_filters {
			predicates.push(compile_custom(filter)?);
		}

		let predicate = join_flat(predicates, config.operator);
		let query = CompiledQuery::render(kind, config.content_type.clone(), predicate);
		tracing::debug!(
			content_type = %config.content_type,
			params = query.params.len(),
			"compiled flat filter query"
		);
		Ok(query)
	}

	fn compile_tree_kind(
		&self,
		root: &FilterNode,
		content_type: &str,
		kind: QueryKind,
	) -> QueryResult<CompiledQuery> {
		validate_node(root, content_type, self.registry.as_ref())
			.map_err(CompileError::Validation)?;

		if !matches!(root, FilterNode::Operator { .. }) {
			return Err(CompileError::RootNotOperator(root.id().to_string()));
		}

		let predicate = build_node(root, true, today())?;
		let query = CompiledQuery::render(kind, content_type.to_string(), predicate);
		tracing::debug!(
			content_type,
			params = query.params.len(),
			"compiled tree filter query"
		);
		Ok(query)
	}
}

fn today() -> NaiveDate {
	chrono::Utc::now().date_naive()
}

fn join_flat(mut predicates: Vec<Predicate>, operator: LogicalOp) -> Predicate {
	match predicates.len() {
		0 => Predicate::True,
		1 => predicates.pop().unwrap_or(Predicate::True),
		_ => match operator {
			LogicalOp::And => Predicate::And(predicates),
			LogicalOp::Or => Predicate::Or(predicates),
		},
	}
}

fn build_node(node: &FilterNode, is_root: bool, today: NaiveDate) -> QueryResult<Predicate> {
	match node {
		FilterNode::Leaf { id, filter } => {
			let leaf = filter
				.as_ref()
				.ok_or_else(|| CompileError::EmptyLeaf(id.clone()))?;
			Ok(Predicate::grouped(compile_leaf(leaf, today)?))
		}
		FilterNode::Operator { op, children, .. } => {
			let mut compiled = Vec::with_capacity(children.len());
			for child in children {
				compiled.push(build_node(child, false, today)?);
			}
			Ok(match compiled.len() {
				0 => Predicate::True,
				1 => compiled.pop().unwrap_or(Predicate::True),
				_ => {
					let joined = match op {
						LogicalOp::And => Predicate::And(compiled),
						LogicalOp::Or => Predicate::Or(compiled),
					};
					if is_root {
						joined
					} else {
						Predicate::grouped(joined)
					}
				}
			})
		}
		FilterNode::Group { children, .. } => {
			let mut compiled = Vec::with_capacity(children.len());
			for child in children {
				compiled.push(build_node(child, false, today)?);
			}
			Ok(match compiled.len() {
				0 => Predicate::True,
				1 => compiled.pop().unwrap_or(Predicate::True),
				// A group exists to force brackets, so it keeps them at
				// any depth.
				_ => Predicate::grouped(Predicate::And(compiled)),
			})
		}
	}
}

fn compile_leaf(leaf: &LeafFilter, today: NaiveDate) -> QueryResult<Predicate> {
	Ok(match leaf {
		LeafFilter::Text(f) => compile_text(f),
		LeafFilter::Date(f) => compile_date(f, today),
		LeafFilter::Range(f) => compile_range(f),
		LeafFilter::Boolean(f) => compile_boolean(f),
		LeafFilter::Custom(f) => compile_custom(f)?,
	})
}

/// Escape LIKE metacharacters in user text before wildcard wrapping.
fn escape_like_pattern(pattern: &str) -> String {
	pattern
		.replace('\\', "\\\\")
		.replace('%', "\\%")
		.replace('_', "\\_")
}

fn compile_text(filter: &TextFilter) -> Predicate {
	let (op, pattern) = match filter.match_type {
		MatchType::Contains => ("LIKE", format!("%{}%", escape_like_pattern(&filter.value))),
		MatchType::Equals => ("=", filter.value.clone()),
		MatchType::StartsWith => ("LIKE", format!("{}%", escape_like_pattern(&filter.value))),
		MatchType::EndsWith => ("LIKE", format!("%{}", escape_like_pattern(&filter.value))),
	};

	let mut writer = SqlWriter::new();
	if filter.case_sensitive {
		writer.push(&filter.field);
		writer.push(" ");
		writer.push(op);
		writer.push(" ");
		writer.push_value(Value::Text(pattern));
	} else {
		// Both sides go through LOWER so matching is correct regardless
		// of stored casing.
		writer.push("LOWER(");
		writer.push(&filter.field);
		writer.push(") ");
		writer.push(op);
		writer.push(" LOWER(");
		writer.push_value(Value::Text(pattern));
		writer.push(")");
	}

	let (sql, params) = writer.finish();
	Predicate::Leaf { sql, params }
}

fn compile_range(filter: &RangeFilter) -> Predicate {
	bounds_predicate(
		&filter.field,
		filter.min.map(Value::Int),
		filter.max.map(Value::Int),
	)
}

fn compile_date(filter: &DateFilter, today: NaiveDate) -> Predicate {
	let (start, end) = filter.resolved_bounds(today);
	bounds_predicate(
		&filter.field,
		start.map(Value::Date),
		end.map(Value::Date),
	)
}

fn bounds_predicate(field: &str, min: Option<Value>, max: Option<Value>) -> Predicate {
	let mut writer = SqlWriter::new();
	match (min, max) {
		(Some(min), Some(max)) => {
			writer.push(field);
			writer.push(" BETWEEN ");
			writer.push_value(min);
			writer.push(" AND ");
			writer.push_value(max);
		}
		(Some(min), None) => {
			writer.push(field);
			writer.push(" >= ");
			writer.push_value(min);
		}
		(None, Some(max)) => {
			writer.push(field);
			writer.push(" <= ");
			writer.push_value(max);
		}
		(None, None) => return Predicate::True,
	}
	let (sql, params) = writer.finish();
	Predicate::Leaf { sql, params }
}

fn compile_boolean(filter: &BooleanFilter) -> Predicate {
	let mut writer = SqlWriter::new();
	writer.push(&filter.field);
	writer.push(" = ");
	writer.push_value(Value::Bool(filter.value));
	let (sql, params) = writer.finish();
	Predicate::Leaf { sql, params }
}

fn compile_custom(filter: &CustomFilter) -> QueryResult<Predicate> {
	let value = Value::from_json(&filter.value).ok_or_else(|| {
		CompileError::Validation(vec![ValidationError::UnsupportedCustomValue {
			field: filter.field.clone(),
		}])
	})?;
	let mut writer = SqlWriter::new();
	writer.push(&filter.field);
	writer.push(" = ");
	writer.push_value(value);
	let (sql, params) = writer.finish();
	Ok(Predicate::Leaf { sql, params })
}

#[cfg(test)]
mod tests {
	use super::*;
	use arkiv_filter::InMemoryFieldRegistry;

	fn compiler() -> QueryCompiler {
		QueryCompiler::new(Arc::new(InMemoryFieldRegistry::new().with_content_type(
			"alumni",
			[
				"last_name",
				"graduation_year",
				"enrolled_on",
				"is_donor",
				"house",
			],
		)))
	}

	fn text(field: &str, value: &str, match_type: MatchType, case_sensitive: bool) -> TextFilter {
		TextFilter {
			field: field.to_string(),
			value: value.to_string(),
			match_type,
			case_sensitive,
		}
	}

	#[test]
	fn test_empty_config_is_neutral() {
		let config = FilterConfig {
			content_type: "alumni".to_string(),
			..Default::default()
		};
		let query = compiler().compile(&config).unwrap();
		assert_eq!(query.sql, "SELECT * FROM alumni WHERE 1=1");
		assert!(query.params.is_empty());
	}

	#[test]
	fn test_case_insensitive_equals() {
		let config = FilterConfig {
			content_type: "alumni".to_string(),
			text_filters: vec![text("last_name", "Smith", MatchType::Equals, false)],
			..Default::default()
		};
		let query = compiler().compile(&config).unwrap();
		assert_eq!(
			query.sql,
			"SELECT * FROM alumni WHERE LOWER(last_name) = LOWER(?)"
		);
		assert_eq!(query.params, vec![Value::Text("Smith".to_string())]);
	}

	#[test]
	fn test_contains_wraps_and_escapes() {
		let config = FilterConfig {
			content_type: "alumni".to_string(),
			text_filters: vec![text("last_name", "Sm_th", MatchType::Contains, true)],
			..Default::default()
		};
		let query = compiler().compile(&config).unwrap();
		assert_eq!(query.sql, "SELECT * FROM alumni WHERE last_name LIKE ?");
		assert_eq!(query.params, vec![Value::Text("%Sm\\_th%".to_string())]);
	}

	#[test]
	fn test_starts_and_ends_with() {
		let starts = compile_text(&text("last_name", "Sm", MatchType::StartsWith, true));
		let ends = compile_text(&text("last_name", "th", MatchType::EndsWith, true));
		assert_eq!(
			starts,
			Predicate::leaf("last_name LIKE ?", vec![Value::Text("Sm%".to_string())])
		);
		assert_eq!(
			ends,
			Predicate::leaf("last_name LIKE ?", vec![Value::Text("%th".to_string())])
		);
	}

	#[test]
	fn test_range_between() {
		let config = FilterConfig {
			content_type: "alumni".to_string(),
			range_filters: vec![RangeFilter {
				field: "graduation_year".to_string(),
				min: Some(1980),
				max: Some(1990),
			}],
			..Default::default()
		};
		let query = compiler().compile(&config).unwrap();
		assert_eq!(
			query.sql,
			"SELECT * FROM alumni WHERE graduation_year BETWEEN ? AND ?"
		);
		assert_eq!(query.params, vec![Value::Int(1980), Value::Int(1990)]);
	}

	#[test]
	fn test_range_single_bound() {
		let min_only = compile_range(&RangeFilter {
			field: "graduation_year".to_string(),
			min: Some(1980),
			max: None,
		});
		assert_eq!(
			min_only,
			Predicate::leaf("graduation_year >= ?", vec![Value::Int(1980)])
		);

		let max_only = compile_range(&RangeFilter {
			field: "graduation_year".to_string(),
			min: None,
			max: Some(1990),
		});
		assert_eq!(
			max_only,
			Predicate::leaf("graduation_year <= ?", vec![Value::Int(1990)])
		);
	}

	#[test]
	fn test_multiple_filters_join_with_operator() {
		let mut config = FilterConfig {
			content_type: "alumni".to_string(),
			text_filters: vec![text("last_name", "Smith", MatchType::Equals, true)],
			boolean_filters: vec![BooleanFilter {
				field: "is_donor".to_string(),
				value: true,
			}],
			..Default::default()
		};

		let query = compiler().compile(&config).unwrap();
		assert_eq!(
			query.sql,
			"SELECT * FROM alumni WHERE last_name = ? AND is_donor = ?"
		);

		config.operator = LogicalOp::Or;
		let query = compiler().compile(&config).unwrap();
		assert_eq!(
			query.sql,
			"SELECT * FROM alumni WHERE last_name = ? OR is_donor = ?"
		);
	}

	#[test]
	fn test_count_query() {
		let config = FilterConfig {
			content_type: "alumni".to_string(),
			boolean_filters: vec![BooleanFilter {
				field: "is_donor".to_string(),
				value: false,
			}],
			..Default::default()
		};
		let query = compiler().compile_count(&config).unwrap();
		assert_eq!(query.sql, "SELECT COUNT(*) FROM alumni WHERE is_donor = ?");
		assert_eq!(query.params, vec![Value::Bool(false)]);
	}

	#[test]
	fn test_validation_failure_produces_no_sql() {
		let config = FilterConfig {
			content_type: "alumni".to_string(),
			text_filters: vec![text("shoe_size", "9", MatchType::Equals, true)],
			..Default::default()
		};
		let err = compiler().compile(&config).unwrap_err();
		assert!(matches!(err, CompileError::Validation(_)));
	}

	#[test]
	fn test_tree_shape_and_param_order() {
		let tree = FilterNode::Operator {
			id: "root".to_string(),
			op: LogicalOp::And,
			children: vec![
				FilterNode::Operator {
					id: "or".to_string(),
					op: LogicalOp::Or,
					children: vec![
						FilterNode::Leaf {
							id: "l1".to_string(),
							filter: Some(LeafFilter::Text(text(
								"last_name",
								"Smith",
								MatchType::Equals,
								true,
							))),
						},
						FilterNode::Leaf {
							id: "l2".to_string(),
							filter: Some(LeafFilter::Text(text(
								"last_name",
								"Jones",
								MatchType::Equals,
								true,
							))),
						},
					],
				},
				FilterNode::Leaf {
					id: "l3".to_string(),
					filter: Some(LeafFilter::Range(RangeFilter {
						field: "graduation_year".to_string(),
						min: Some(1980),
						max: Some(1990),
					})),
				},
			],
		};

		let query = compiler().compile_tree(&tree, "alumni").unwrap();
		assert_eq!(
			query.sql,
			"SELECT * FROM alumni WHERE ((last_name = ?) OR (last_name = ?)) \
			 AND (graduation_year BETWEEN ? AND ?)"
		);
		assert_eq!(
			query.params,
			vec![
				Value::Text("Smith".to_string()),
				Value::Text("Jones".to_string()),
				Value::Int(1980),
				Value::Int(1990),
			]
		);
	}

	#[test]
	fn test_group_always_parenthesizes() {
		let tree = FilterNode::Operator {
			id: "root".to_string(),
			op: LogicalOp::Or,
			children: vec![
				FilterNode::Group {
					id: "g".to_string(),
					children: vec![
						FilterNode::Leaf {
							id: "l1".to_string(),
							filter: Some(LeafFilter::Boolean(BooleanFilter {
								field: "is_donor".to_string(),
								value: true,
							})),
						},
						FilterNode::Leaf {
							id: "l2".to_string(),
							filter: Some(LeafFilter::Text(text(
								"house",
								"North",
								MatchType::Equals,
								true,
							))),
						},
					],
				},
				FilterNode::Leaf {
					id: "l3".to_string(),
					filter: Some(LeafFilter::Text(text(
						"house",
						"South",
						MatchType::Equals,
						true,
					))),
				},
			],
		};

		let query = compiler().compile_tree(&tree, "alumni").unwrap();
		assert_eq!(
			query.sql,
			"SELECT * FROM alumni WHERE ((is_donor = ?) AND (house = ?)) OR (house = ?)"
		);
	}

	#[test]
	fn test_zero_child_operator_is_neutral() {
		let tree = FilterNode::Operator {
			id: "root".to_string(),
			op: LogicalOp::And,
			children: vec![],
		};
		let query = compiler().compile_tree(&tree, "alumni").unwrap();
		assert_eq!(query.sql, "SELECT * FROM alumni WHERE 1=1");
	}

	#[test]
	fn test_empty_leaf_is_a_compile_error() {
		let tree = FilterNode::Operator {
			id: "root".to_string(),
			op: LogicalOp::And,
			children: vec![FilterNode::Leaf {
				id: "l1".to_string(),
				filter: None,
			}],
		};
		let err = compiler().compile_tree(&tree, "alumni").unwrap_err();
		assert_eq!(err, CompileError::EmptyLeaf("l1".to_string()));
	}

	#[test]
	fn test_root_must_be_operator() {
		let tree = FilterNode::Group {
			id: "g".to_string(),
			children: vec![],
		};
		let err = compiler().compile_tree(&tree, "alumni").unwrap_err();
		assert_eq!(err, CompileError::RootNotOperator("g".to_string()));
	}

	#[test]
	fn test_placeholders_match_params() {
		let config = FilterConfig {
			content_type: "alumni".to_string(),
			text_filters: vec![
				text("last_name", "Smith", MatchType::Contains, false),
				text("house", "North", MatchType::StartsWith, true),
			],
			range_filters: vec![RangeFilter {
				field: "graduation_year".to_string(),
				min: Some(1980),
				max: Some(1990),
			}],
			boolean_filters: vec![BooleanFilter {
				field: "is_donor".to_string(),
				value: true,
			}],
			custom_filters: vec![CustomFilter {
				field: "house".to_string(),
				value: serde_json::json!("East"),
			}],
			..Default::default()
		};
		let query = compiler().compile(&config).unwrap();
		assert_eq!(query.placeholder_count(), query.params.len());
	}
}
