//! Parameter value representation for generated queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scalar bound to a `?` placeholder.
///
/// This is the subset of SQL value types the kiosk schema needs. Values
/// are never rendered into query text; they ride alongside it in
/// placeholder order and cross the executor boundary as-is. Booleans are
/// coerced to the executor's 0/1 literal form by the executor itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
	Bool(bool),
	Int(i64),
	Double(f64),
	Text(String),
	Date(NaiveDate),
}

impl Value {
	/// Coerce a JSON scalar into a parameter value.
	///
	/// Arrays, objects, and nulls have no parameter form and yield
	/// `None`; validation rejects them long before compilation.
	pub fn from_json(value: &serde_json::Value) -> Option<Value> {
		match value {
			serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
			serde_json::Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					Some(Value::Int(i))
				} else {
					n.as_f64().map(Value::Double)
				}
			}
			serde_json::Value::String(s) => Some(Value::Text(s.clone())),
			_ => None,
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Double(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Text(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Text(v)
	}
}

impl From<NaiveDate> for Value {
	fn from(v: NaiveDate) -> Self {
		Value::Date(v)
	}
}
