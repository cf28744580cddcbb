//! SQL writer helper for constructing query text with placeholders.
//!
//! Keeps the text and the collected parameter values in one place so the
//! placeholder/parameter alignment invariant holds by construction: the
//! only way to emit a `?` is [`SqlWriter::push_value`], which appends the
//! matching value in the same call.

use crate::value::Value;

/// Accumulator for SQL text and positional parameters.
#[derive(Debug, Clone, Default)]
pub struct SqlWriter {
	sql: String,
	params: Vec<Value>,
}

impl SqlWriter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Push raw SQL text. Never pass user-controlled values through here;
	/// identifiers must already be allow-listed.
	pub fn push(&mut self, s: &str) {
		self.sql.push_str(s);
	}

	/// Push a `?` placeholder and collect its value.
	pub fn push_value(&mut self, value: Value) {
		self.sql.push('?');
		self.params.push(value);
	}

	/// Append already-compiled parameters (their placeholders are part of
	/// a fragment pushed via [`push`](Self::push)).
	pub fn append_params(&mut self, params: &[Value]) {
		self.params.extend_from_slice(params);
	}

	pub fn sql(&self) -> &str {
		&self.sql
	}

	pub fn is_empty(&self) -> bool {
		self.sql.is_empty()
	}

	/// Consume the writer and return `(sql, params)`.
	pub fn finish(self) -> (String, Vec<Value>) {
		(self.sql, self.params)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_placeholder_and_value_stay_aligned() {
		let mut writer = SqlWriter::new();
		writer.push("last_name = ");
		writer.push_value(Value::Text("Smith".to_string()));
		writer.push(" AND graduation_year >= ");
		writer.push_value(Value::Int(1980));

		let (sql, params) = writer.finish();
		assert_eq!(sql, "last_name = ? AND graduation_year >= ?");
		assert_eq!(sql.matches('?').count(), params.len());
	}

	#[test]
	fn test_append_params() {
		let mut writer = SqlWriter::new();
		writer.push("(a = ? OR b = ?)");
		writer.append_params(&[Value::Int(1), Value::Int(2)]);

		let (sql, params) = writer.finish();
		assert_eq!(sql.matches('?').count(), params.len());
	}
}
