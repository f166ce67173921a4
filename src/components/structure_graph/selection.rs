//! Selection and fade state driven by taps.
//!
//! A tap on a node or edge selects it and fades every element outside its
//! neighborhood. A tap on the background clears both marks. Each tap answers
//! with the viewport fit to perform and, for a repeated tap on a node with a
//! reference, the detail document to open.

use std::collections::HashSet;

use log::debug;

use super::elements::VisualElements;
use super::graph::{ElementId, GraphIndex};

/// Padding used when fitting the whole graph, at first draw and on reset.
pub const FIT_PADDING: f64 = 80.0;
/// Padding used when fitting a selection neighborhood.
pub const SELECTION_FIT_PADDING: f64 = 100.0;

/// The selected element, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	Idle,
	Node(usize),
	Edge(usize),
}

/// What a tap landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapTarget {
	Node(usize),
	Edge(usize),
	Background,
}

/// Viewport fit requested by a tap.
#[derive(Clone, Debug, PartialEq)]
pub struct FitRequest {
	/// Elements to frame; `None` frames the whole graph.
	pub elements: Option<HashSet<ElementId>>,
	pub padding: f64,
}

impl FitRequest {
	pub fn whole_graph() -> Self {
		Self {
			elements: None,
			padding: FIT_PADDING,
		}
	}
}

/// Effects of one tap, applied by the view.
#[derive(Clone, Debug, PartialEq)]
pub struct TapResponse {
	pub fit: FitRequest,
	/// Detail document to open, as `{base_dir}{reference}.json`.
	pub open: Option<String>,
}

/// Elements that stay prominent for a selection.
///
/// For a node: the node, its neighbors, its containment descendants, and
/// every edge whose endpoints both lie in that set. For an edge: the edge and
/// its endpoints. With nothing selected every element is visible.
pub fn compute_visible_set(selection: Selection, graph: &GraphIndex) -> HashSet<ElementId> {
	match selection {
		Selection::Idle => graph.all_elements(),
		Selection::Node(n) => {
			let mut nodes: HashSet<usize> = HashSet::from([n]);
			nodes.extend(graph.neighbors(n));
			nodes.extend(graph.descendants(n));

			let edges = graph
				.edges()
				.filter(|(_, s, t)| nodes.contains(s) && nodes.contains(t))
				.map(|(e, _, _)| ElementId::Edge(e));

			nodes.iter().copied().map(ElementId::Node).chain(edges).collect()
		}
		Selection::Edge(e) => {
			let mut set = HashSet::from([ElementId::Edge(e)]);
			if let Some((src, tgt)) = graph.endpoints(e) {
				set.insert(ElementId::Node(src));
				set.insert(ElementId::Node(tgt));
			}
			set
		}
	}
}

/// Selected and faded marks of one view.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
	selection: Selection,
	faded: HashSet<ElementId>,
}

impl SelectionState {
	pub fn selection(&self) -> Selection {
		self.selection
	}

	pub fn is_selected(&self, id: ElementId) -> bool {
		match (self.selection, id) {
			(Selection::Node(a), ElementId::Node(b)) | (Selection::Edge(a), ElementId::Edge(b)) => {
				a == b
			}
			_ => false,
		}
	}

	pub fn is_faded(&self, id: ElementId) -> bool {
		self.faded.contains(&id)
	}

	/// Applies a tap and returns the effects the view must carry out.
	pub fn tap(
		&mut self,
		target: TapTarget,
		graph: &GraphIndex,
		elements: &VisualElements,
		base_dir: &str,
	) -> TapResponse {
		match target {
			TapTarget::Node(n) => {
				let open = if self.selection == Selection::Node(n) {
					elements.nodes[n]
						.data
						.reference
						.as_deref()
						.map(|reference| detail_href(base_dir, reference))
				} else {
					None
				};
				let visible = self.select(Selection::Node(n), graph);
				debug!("structure-graph: selected node #{n}, {} visible", visible.len());
				TapResponse {
					fit: FitRequest {
						elements: Some(visible),
						padding: SELECTION_FIT_PADDING,
					},
					open,
				}
			}
			TapTarget::Edge(e) => {
				let visible = self.select(Selection::Edge(e), graph);
				debug!("structure-graph: selected edge #{e}");
				TapResponse {
					fit: FitRequest {
						elements: Some(visible),
						padding: SELECTION_FIT_PADDING,
					},
					open: None,
				}
			}
			TapTarget::Background => {
				self.clear();
				debug!("structure-graph: selection cleared");
				TapResponse {
					fit: FitRequest::whole_graph(),
					open: None,
				}
			}
		}
	}

	/// Drops every selected and faded mark.
	pub fn clear(&mut self) {
		self.selection = Selection::Idle;
		self.faded.clear();
	}

	fn select(&mut self, selection: Selection, graph: &GraphIndex) -> HashSet<ElementId> {
		let visible = compute_visible_set(selection, graph);
		self.selection = selection;
		self.faded = graph.all_elements().difference(&visible).copied().collect();
		visible
	}
}

/// Location of the detail document of a node reference.
pub fn detail_href(base_dir: &str, reference: &str) -> String {
	format!("{base_dir}{reference}.json")
}
