//! Semantics-preserving query rewrites.
//!
//! The optimizer runs over the retained predicate IR and re-renders, so
//! the placeholder/parameter alignment is re-derived rather than patched.
//! Every rewrite preserves the matched row set exactly:
//!
//! 1. parentheses around a single operand are dropped;
//! 2. neutral true predicates disappear from AND chains, and an OR chain
//!    containing one collapses entirely to neutral true;
//! 3. syntactically identical leaves with identical parameters are
//!    deduplicated when they sit directly under the same AND chain.
//!
//! The rendered text never grows: rewrites only remove tokens.

use crate::compiler::CompiledQuery;
use crate::predicate::Predicate;

/// Rewrite a compiled query into an equivalent, no-longer form.
///
/// # Examples
///
/// ```
/// use arkiv_filter::{BooleanFilter, FilterConfig, InMemoryFieldRegistry};
/// use arkiv_query::{QueryCompiler, optimize};
/// use std::sync::Arc;
///
/// let registry = Arc::new(
///     InMemoryFieldRegistry::new().with_content_type("alumni", ["is_donor"]),
/// );
/// let compiler = QueryCompiler::new(registry);
///
/// let config = FilterConfig {
///     content_type: "alumni".to_string(),
///     boolean_filters: vec![
///         BooleanFilter { field: "is_donor".to_string(), value: true },
///         BooleanFilter { field: "is_donor".to_string(), value: true },
///     ],
///     ..Default::default()
/// };
///
/// let raw = compiler.compile(&config).unwrap();
/// let optimized = optimize(raw.clone());
/// assert_eq!(optimized.sql, "SELECT * FROM alumni WHERE is_donor = ?");
/// assert!(optimized.sql.len() <= raw.sql.len());
/// ```
pub fn optimize(query: CompiledQuery) -> CompiledQuery {
	let CompiledQuery {
		kind,
		table,
		predicate,
		..
	} = query;
	CompiledQuery::render(kind, table, rewrite(predicate))
}

fn rewrite(predicate: Predicate) -> Predicate {
	match predicate {
		Predicate::True => Predicate::True,
		leaf @ Predicate::Leaf { .. } => leaf,
		Predicate::Grouped(inner) => match rewrite(*inner) {
			// A bracket around a single operand is redundant.
			Predicate::True => Predicate::True,
			leaf @ Predicate::Leaf { .. } => leaf,
			grouped @ Predicate::Grouped(_) => grouped,
			multi => Predicate::grouped(multi),
		},
		Predicate::And(items) => {
			let mut kept: Vec<Predicate> = Vec::with_capacity(items.len());
			for item in items {
				match rewrite(item) {
					// Neutral under conjunction.
					Predicate::True => {}
					p => {
						let duplicate = matches!(p, Predicate::Leaf { .. })
							&& kept.iter().any(|seen| *seen == p);
						if !duplicate {
							kept.push(p);
						}
					}
				}
			}
			collapse(kept, Predicate::And)
		}
		Predicate::Or(items) => {
			let mut kept: Vec<Predicate> = Vec::with_capacity(items.len());
			for item in items {
				match rewrite(item) {
					// OR with "always true" is always true.
					Predicate::True => return Predicate::True,
					p => kept.push(p),
				}
			}
			collapse(kept, Predicate::Or)
		}
	}
}

fn collapse(mut items: Vec<Predicate>, join: fn(Vec<Predicate>) -> Predicate) -> Predicate {
	match items.len() {
		0 => Predicate::True,
		1 => items.pop().unwrap_or(Predicate::True),
		_ => join(items),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::Value;

	fn leaf(sql: &str, params: Vec<Value>) -> Predicate {
		Predicate::leaf(sql, params)
	}

	#[test]
	fn test_single_operand_brackets_collapse() {
		let pred = Predicate::grouped(Predicate::grouped(leaf("a = ?", vec![Value::Int(1)])));
		assert_eq!(rewrite(pred), leaf("a = ?", vec![Value::Int(1)]));
	}

	#[test]
	fn test_multi_operand_brackets_survive() {
		let pred = Predicate::grouped(Predicate::Or(vec![
			leaf("a = ?", vec![Value::Int(1)]),
			leaf("b = ?", vec![Value::Int(2)]),
		]));
		let rewritten = rewrite(pred.clone());
		assert_eq!(rewritten, pred);
	}

	#[test]
	fn test_true_vanishes_under_and() {
		let pred = Predicate::And(vec![
			Predicate::True,
			leaf("a = ?", vec![Value::Int(1)]),
			Predicate::True,
		]);
		assert_eq!(rewrite(pred), leaf("a = ?", vec![Value::Int(1)]));
	}

	#[test]
	fn test_true_collapses_or_chain() {
		let pred = Predicate::Or(vec![
			leaf("a = ?", vec![Value::Int(1)]),
			Predicate::True,
			leaf("b = ?", vec![Value::Int(2)]),
		]);
		assert_eq!(rewrite(pred), Predicate::True);
	}

	#[test]
	fn test_duplicate_leaves_dedup_under_and() {
		let pred = Predicate::And(vec![
			leaf("a = ?", vec![Value::Int(1)]),
			leaf("a = ?", vec![Value::Int(1)]),
			leaf("a = ?", vec![Value::Int(2)]),
		]);
		assert_eq!(
			rewrite(pred),
			Predicate::And(vec![
				leaf("a = ?", vec![Value::Int(1)]),
				leaf("a = ?", vec![Value::Int(2)]),
			])
		);
	}

	#[test]
	fn test_duplicates_under_or_are_kept() {
		// Rule 3 is scoped to AND chains; OR operands stay untouched.
		let pred = Predicate::Or(vec![
			leaf("a = ?", vec![Value::Int(1)]),
			leaf("a = ?", vec![Value::Int(1)]),
		]);
		assert_eq!(rewrite(pred.clone()), pred);
	}

	#[test]
	fn test_idempotent() {
		let pred = Predicate::And(vec![
			Predicate::grouped(Predicate::Or(vec![
				Predicate::grouped(leaf("a = ?", vec![Value::Int(1)])),
				Predicate::True,
			])),
			leaf("b = ?", vec![Value::Int(2)]),
			leaf("b = ?", vec![Value::Int(2)]),
		]);
		let once = rewrite(pred);
		let twice = rewrite(once.clone());
		assert_eq!(once, twice);
	}
}
