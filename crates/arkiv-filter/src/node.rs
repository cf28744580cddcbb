//! Nested filter tree for the visual query builder.
//!
//! The tree is a tagged union with three cases: a [`FilterNode::Leaf`]
//! holding a single-field criterion, a [`FilterNode::Operator`] joining
//! its children with AND/OR, and a [`FilterNode::Group`] acting as an
//! explicit bracket (combined internally as AND). Nodes are owned
//! exclusively by their parent's children list, so the tree is acyclic by
//! construction.

use crate::config::{BooleanFilter, CustomFilter, DateFilter, LogicalOp, RangeFilter, TextFilter};
use serde::{Deserialize, Serialize};

/// A single-field criterion carried by a [`FilterNode::Leaf`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LeafFilter {
	Text(TextFilter),
	Date(DateFilter),
	Range(RangeFilter),
	Boolean(BooleanFilter),
	Custom(CustomFilter),
}

impl LeafFilter {
	/// The field this criterion references.
	pub fn field(&self) -> &str {
		match self {
			LeafFilter::Text(f) => &f.field,
			LeafFilter::Date(f) => &f.field,
			LeafFilter::Range(f) => &f.field,
			LeafFilter::Boolean(f) => &f.field,
			LeafFilter::Custom(f) => &f.field,
		}
	}
}

/// A node in the visual builder's filter tree.
///
/// The tree editor creates leaves before the user has picked a field, so
/// a leaf's criterion is optional at the model level; compiling a leaf
/// without one is an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FilterNode {
	Leaf {
		id: String,
		#[serde(default)]
		filter: Option<LeafFilter>,
	},
	Operator {
		id: String,
		op: LogicalOp,
		#[serde(default)]
		children: Vec<FilterNode>,
	},
	Group {
		id: String,
		#[serde(default)]
		children: Vec<FilterNode>,
	},
}

impl FilterNode {
	/// The node's unique id within its tree.
	pub fn id(&self) -> &str {
		match self {
			FilterNode::Leaf { id, .. }
			| FilterNode::Operator { id, .. }
			| FilterNode::Group { id, .. } => id,
		}
	}

	/// Direct children, empty for leaves.
	pub fn children(&self) -> &[FilterNode] {
		match self {
			FilterNode::Leaf { .. } => &[],
			FilterNode::Operator { children, .. } | FilterNode::Group { children, .. } => children,
		}
	}

	/// Depth-first traversal over the node and all descendants.
	pub fn iter(&self) -> FilterNodeIter<'_> {
		FilterNodeIter { stack: vec![self] }
	}
}

/// Depth-first iterator over a filter tree.
pub struct FilterNodeIter<'a> {
	stack: Vec<&'a FilterNode>,
}

impl<'a> Iterator for FilterNodeIter<'a> {
	type Item = &'a FilterNode;

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.stack.pop()?;
		for child in node.children().iter().rev() {
			self.stack.push(child);
		}
		Some(node)
	}
}
