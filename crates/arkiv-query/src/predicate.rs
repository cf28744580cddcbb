//! Intermediate predicate representation.
//!
//! The compiler builds this tagged union and the renderers below turn it
//! into `WHERE`-clause text. Keeping an explicit IR lets the optimizer
//! rewrite a query without touching placeholder indices by hand: the
//! params are re-collected on every render, so they always match the
//! placeholders that remain.

use crate::value::Value;
use crate::writer::SqlWriter;

/// The neutral true predicate, used for empty configurations and
/// zero-child nodes so composition stays uniform.
pub const NEUTRAL_TRUE: &str = "1=1";

/// A compiled boolean expression over one content type's rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
	/// Always matches (`1=1`).
	True,
	/// A single comparison, already rendered with `?` placeholders.
	Leaf { sql: String, params: Vec<Value> },
	/// Conjunction of operands, rendered joined by ` AND `.
	And(Vec<Predicate>),
	/// Disjunction of operands, rendered joined by ` OR `.
	Or(Vec<Predicate>),
	/// Explicit parenthesization.
	Grouped(Box<Predicate>),
}

impl Predicate {
	pub fn leaf(sql: impl Into<String>, params: Vec<Value>) -> Self {
		Predicate::Leaf {
			sql: sql.into(),
			params,
		}
	}

	pub fn grouped(inner: Predicate) -> Self {
		Predicate::Grouped(Box::new(inner))
	}

	/// Render into an existing writer.
	pub fn render(&self, writer: &mut SqlWriter) {
		match self {
			Predicate::True => writer.push(NEUTRAL_TRUE),
			Predicate::Leaf { sql, params } => {
				writer.push(sql);
				writer.append_params(params);
			}
			Predicate::And(items) => render_joined(items, " AND ", writer),
			Predicate::Or(items) => render_joined(items, " OR ", writer),
			Predicate::Grouped(inner) => {
				writer.push("(");
				inner.render(writer);
				writer.push(")");
			}
		}
	}

	/// Render into a fresh `(sql, params)` pair.
	pub fn to_sql(&self) -> (String, Vec<Value>) {
		let mut writer = SqlWriter::new();
		self.render(&mut writer);
		writer.finish()
	}
}

fn render_joined(items: &[Predicate], separator: &str, writer: &mut SqlWriter) {
	if items.is_empty() {
		writer.push(NEUTRAL_TRUE);
		return;
	}
	for (i, item) in items.iter().enumerate() {
		if i > 0 {
			writer.push(separator);
		}
		item.render(writer);
	}
}
