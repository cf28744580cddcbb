//! Serializable export of a filter and its compiled query.
//!
//! Saved searches and share links persist this structure. Schema
//! evolution is the exporter's responsibility; the core only promises a
//! stable shape for the current model.

use crate::compiler::CompiledQuery;
use crate::value::Value;
use arkiv_filter::{FilterConfig, FilterNode};
use serde::{Deserialize, Serialize};

/// The filter specification half of an export: either a flat config or a
/// builder tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterSpec {
	Config(FilterConfig),
	Tree(FilterNode),
}

/// A filter together with the query compiled from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterExport {
	pub filter: FilterSpec,
	pub sql: String,
	pub params: Vec<Value>,
}

impl FilterExport {
	pub fn from_config(config: FilterConfig, query: &CompiledQuery) -> Self {
		Self {
			filter: FilterSpec::Config(config),
			sql: query.sql.clone(),
			params: query.params.clone(),
		}
	}

	pub fn from_tree(tree: FilterNode, query: &CompiledQuery) -> Self {
		Self {
			filter: FilterSpec::Tree(tree),
			sql: query.sql.clone(),
			params: query.params.clone(),
		}
	}
}
