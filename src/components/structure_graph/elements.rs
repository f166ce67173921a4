//! Translation of the input document into visual element records.
//!
//! Each node and edge becomes a record carrying its display data plus a
//! space-separated style class string (`type` followed by its modifier tags).
//! The style table in [`super::theme`] is resolved from that string.

use serde::Serialize;

use super::types::{GraphDocument, GraphEdge, GraphNode};

/// Modifiers that collapse into the single `operational` style class.
const OPERATIONAL_MODIFIERS: [&str; 3] = ["constructor", "destructor", "operator"];

/// Display data of a node. Optional fields are only present when the source
/// node carries them.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
	pub id: String,
	pub short_name: String,
	pub long_name: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hover_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub reference: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filename: Option<String>,
}

/// Display data of an edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeRecord {
	pub source: String,
	pub target: String,
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// A visual element: display data plus its style class string.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VisualElement<T> {
	pub data: T,
	pub classes: String,
}

impl<T> VisualElement<T> {
	/// Whether the class string contains `class` as a whole token.
	pub fn has_class(&self, class: &str) -> bool {
		self.classes.split(' ').any(|c| c == class)
	}
}

/// Visual node element.
pub type VisualNode = VisualElement<NodeRecord>;
/// Visual edge element.
pub type VisualEdge = VisualElement<EdgeRecord>;

/// All visual elements of one document, in document order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VisualElements {
	pub nodes: Vec<VisualNode>,
	pub edges: Vec<VisualEdge>,
}

impl VisualElements {
	pub fn from_document(doc: &GraphDocument) -> Self {
		Self {
			nodes: doc.nodes.iter().map(visual_node).collect(),
			edges: doc.edges.iter().map(visual_edge).collect(),
		}
	}
}

/// Builds the style class string of a node. Operational modifiers are
/// replaced by `operational`, every other modifier is kept verbatim.
pub fn node_classes(kind: &str, modifiers: &[String]) -> String {
	let mut classes = kind.to_string();
	for modifier in modifiers {
		classes.push(' ');
		if OPERATIONAL_MODIFIERS.contains(&modifier.as_str()) {
			classes.push_str("operational");
		} else {
			classes.push_str(modifier);
		}
	}
	classes
}

/// Builds the style class string of an edge.
pub fn edge_classes(kind: &str, modifiers: &[String]) -> String {
	let mut classes = kind.to_string();
	for modifier in modifiers {
		classes.push(' ');
		classes.push_str(modifier);
	}
	classes
}

fn visual_node(node: &GraphNode) -> VisualNode {
	VisualElement {
		data: NodeRecord {
			id: node.id.clone(),
			short_name: node.short_name.clone(),
			long_name: node.long_name.clone(),
			kind: node.kind.clone(),
			parent: node.parent.clone(),
			hover_name: node.hover_name.clone(),
			reference: node.reference.clone(),
			filename: node.filename.clone(),
		},
		classes: node_classes(&node.kind, &node.classes),
	}
}

fn visual_edge(edge: &GraphEdge) -> VisualEdge {
	VisualElement {
		data: EdgeRecord {
			source: edge.source.clone(),
			target: edge.target.clone(),
			kind: edge.kind.clone(),
			description: edge.description.clone(),
		},
		classes: edge_classes(&edge.kind, &edge.classes),
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use serde_json::{Value, json};

	use super::*;

	fn document(value: Value) -> GraphDocument {
		serde_json::from_value(value).unwrap()
	}

	fn keys(value: &Value) -> BTreeSet<String> {
		value.as_object().unwrap().keys().cloned().collect()
	}

	#[test]
	fn node_record_carries_exactly_the_present_optional_fields() {
		let doc = document(json!({
			"nodes": [
				{"id": "a", "shortName": "a", "longName": "a", "type": "class"},
				{
					"id": "b", "shortName": "b", "longName": "ns::b", "type": "method",
					"parent": "a", "hoverName": "void b()", "filename": "b.h"
				},
				{
					"id": "c", "shortName": "c", "longName": "c", "type": "struct",
					"reference": "structs/c", "classes": ["public"]
				}
			],
			"edges": []
		}));
		let elements = VisualElements::from_document(&doc);
		let records: Vec<Value> = elements
			.nodes
			.iter()
			.map(|n| serde_json::to_value(&n.data).unwrap())
			.collect();

		let base = ["id", "shortName", "longName", "type"];
		let expect = |extra: &[&str]| -> BTreeSet<String> {
			base.iter().chain(extra).map(|s| s.to_string()).collect()
		};
		assert_eq!(keys(&records[0]), expect(&[]));
		assert_eq!(keys(&records[1]), expect(&["parent", "hoverName", "filename"]));
		assert_eq!(keys(&records[2]), expect(&["reference"]));
		assert_eq!(records[1]["hoverName"], "void b()");
	}

	#[test]
	fn operational_modifiers_collapse() {
		let classes = node_classes("method", &["constructor".into(), "public".into()]);
		assert_eq!(classes, "method operational public");
	}

	#[test]
	fn repeated_operational_modifiers_are_not_deduplicated() {
		let classes = node_classes(
			"method",
			&["destructor".into(), "operator".into(), "private".into()],
		);
		assert_eq!(classes, "method operational operational private");
	}

	#[test]
	fn edge_modifiers_are_kept_verbatim() {
		let doc = document(json!({
			"nodes": [],
			"edges": [
				{"source": "a", "target": "b", "type": "call", "classes": ["virtual", "indirect"]},
				{"source": "a", "target": "b", "type": "member", "description": "int x"}
			]
		}));
		let elements = VisualElements::from_document(&doc);
		assert_eq!(elements.edges[0].classes, "call virtual indirect");
		assert_eq!(elements.edges[1].classes, "member");
		assert!(elements.edges[0].has_class("virtual"));
		assert!(!elements.edges[0].has_class("virt"));

		let record = serde_json::to_value(&elements.edges[1].data).unwrap();
		assert_eq!(record["description"], "int x");
		assert_eq!(record["type"], "member");
	}
}
