//! structure-graph: interactive code-structure graph viewer.
//!
//! This crate provides a WASM-based graph component that renders namespaces,
//! classes and their relations with a force-directed layout, category-driven
//! styling, tap-to-focus selection and hover tooltips.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::structure_graph::{
	GraphDocument, GraphEdge, GraphNode, StructureGraphCanvas, Theme,
};

/// Id of the script element holding the graph document.
const GRAPH_DATA_ID: &str = "graph-data";
/// Attribute of that element holding the detail document base path.
const BASE_DIR_ATTR: &str = "data-base-dir";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("structure-graph: logging initialized");
}

/// Parses a graph document from JSON text.
pub fn parse_document(json_text: &str) -> serde_json::Result<GraphDocument> {
	serde_json::from_str(json_text)
}

/// Load the graph document and base path from a script element with
/// id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }, base path in
/// the `data-base-dir` attribute.
fn read_graph_script() -> Option<(GraphDocument, String)> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(GRAPH_DATA_ID)?;
	let base_dir = element.get_attribute(BASE_DIR_ATTR).unwrap_or_default();
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match parse_document(&json_text) {
		Ok(data) => {
			info!(
				"structure-graph: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some((data, base_dir))
		}
		Err(e) => {
			warn!("structure-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Graph document and base path supplied by the host page. Falls back to an
/// empty graph when the page carries none.
pub fn load_page_input() -> (GraphDocument, String) {
	read_graph_script().unwrap_or_default()
}

/// Mounts the interactive view of `document` into the page body.
///
/// A repeated tap on a selected node opens `{base_dir}{reference}.json`.
pub fn render(document: GraphDocument, base_dir: String) {
	mount_to_body(move || {
		view! { <App document=document base_dir=base_dir /> }
	})
}

/// Main application component.
#[component]
pub fn App(document: GraphDocument, base_dir: String) -> impl IntoView {
	provide_meta_context();

	let graph_signal = Signal::derive(move || document.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Structure Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div id="cy" class="fullscreen-graph">
			<StructureGraphCanvas data=graph_signal base_dir=base_dir fullscreen=true />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_page_document() {
		let doc = parse_document(
			r#"{"nodes": [{"id": "a", "shortName": "a", "longName": "a", "type": "class"}],
			    "edges": [], "class": true}"#,
		)
		.unwrap();
		assert_eq!(doc.nodes.len(), 1);
		assert!(doc.class);
	}

	#[test]
	fn rejects_nodes_without_names() {
		assert!(parse_document(r#"{"nodes": [{"id": "a", "type": "class"}], "edges": []}"#).is_err());
	}
}
