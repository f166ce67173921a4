//! Graph document structures for input to the structure graph component.

use serde::Deserialize;

/// A node in the structure graph (namespace, class, method, ...).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in edges and parents.
	pub id: String,
	/// Label shown while the node is not selected.
	pub short_name: String,
	/// Fully qualified label shown when selected.
	pub long_name: String,
	/// Category tag (e.g. "namespace", "class", "method").
	#[serde(rename = "type")]
	pub kind: String,
	/// Id of the enclosing node in the containment hierarchy.
	pub parent: Option<String>,
	/// Tooltip label override; the long name is used when absent.
	pub hover_name: Option<String>,
	/// Path fragment of the detail document opened on a repeated tap.
	pub reference: Option<String>,
	/// Source file shown in the tooltip.
	pub filename: Option<String>,
	/// Modifier tags such as "private" or "constructor".
	#[serde(default)]
	pub classes: Vec<String>,
}

/// A directed, typed relation between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphEdge {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Category tag (e.g. "inherits", "call", "member").
	#[serde(rename = "type")]
	pub kind: String,
	/// Free text shown in the tooltip and the selected label.
	pub description: Option<String>,
	/// Modifier tags such as "indirect" or "virtual".
	#[serde(default)]
	pub classes: Vec<String>,
}

/// Complete graph document: nodes, edges and the class-view flag.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphDocument {
	/// Every node, in document order.
	pub nodes: Vec<GraphNode>,
	/// Every edge, in document order.
	pub edges: Vec<GraphEdge>,
	/// Class-structure view; selects the wider layout preset.
	#[serde(default)]
	pub class: bool,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_document_with_optional_fields() {
		let doc: GraphDocument = serde_json::from_value(serde_json::json!({
			"nodes": [
				{"id": "ns", "shortName": "ns", "longName": "ns", "type": "namespace"},
				{
					"id": "ns::A", "shortName": "A", "longName": "ns::A", "type": "class",
					"parent": "ns", "reference": "classes/A", "classes": ["private"]
				}
			],
			"edges": [
				{"source": "ns::A", "target": "ns", "type": "parent"}
			],
			"class": true
		}))
		.unwrap();

		assert!(doc.class);
		assert_eq!(doc.nodes.len(), 2);
		assert_eq!(doc.nodes[1].kind, "class");
		assert_eq!(doc.nodes[1].parent.as_deref(), Some("ns"));
		assert_eq!(doc.nodes[1].classes, vec!["private"]);
		assert!(doc.nodes[0].hover_name.is_none());
		assert!(doc.nodes[0].classes.is_empty());
		assert!(doc.edges[0].description.is_none());
	}

	#[test]
	fn class_flag_defaults_to_false() {
		let doc: GraphDocument =
			serde_json::from_str(r#"{"nodes": [], "edges": []}"#).unwrap();
		assert!(!doc.class);
	}
}
