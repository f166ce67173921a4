//! Graph view state and interaction tracking.
//!
//! Combines the translated elements, settled layout, selection marks, pan/zoom
//! transform and tooltip of one mounted view. Event handlers mutate it; the
//! renderer only reads it.

use std::collections::HashSet;

use log::debug;

use super::elements::VisualElements;
use super::graph::{ElementId, GraphIndex};
use super::layout::{self, LayoutConfig, Point};
use super::selection::{FitRequest, SelectionState, TapResponse, TapTarget};
use super::theme::{self, NODE_HEIGHT, NodeStyle, SELECTED_NODE_HEIGHT, EdgeStyle, Theme};
use super::tooltip::{self, TooltipState};
use super::types::GraphDocument;
use super::viewport::{Rect, ViewTransform, distance_to_segment};

/// Screen distance within which a pointer press still counts as a tap.
pub const TAP_TOLERANCE: f64 = 4.0;
/// Screen distance within which an edge is hit.
const EDGE_HIT_DISTANCE: f64 = 5.0;

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	/// Whether the pointer moved further than a tap allows.
	pub moved: bool,
}

/// State of one mounted structure graph view.
pub struct StructureGraphState {
	pub elements: VisualElements,
	pub graph: GraphIndex,
	pub node_styles: Vec<NodeStyle>,
	pub edge_styles: Vec<EdgeStyle>,
	pub positions: Vec<Point>,
	pub selection: SelectionState,
	pub tooltip: TooltipState,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub mouse_down: bool,
	pub base_dir: String,
	pub width: f64,
	pub height: f64,
	/// Leaf nodes first, then compound nodes from the innermost outwards.
	/// Compound boxes are computed in this order.
	box_order: Vec<usize>,
	boxes: Vec<Rect>,
}

impl StructureGraphState {
	pub fn new(
		doc: &GraphDocument,
		base_dir: String,
		width: f64,
		height: f64,
		theme: &Theme,
	) -> Self {
		let elements = VisualElements::from_document(doc);
		let graph = GraphIndex::new(&elements);
		let config = LayoutConfig::for_counts(doc.nodes.len(), doc.edges.len(), doc.class);
		let sizes: Vec<(f64, f64)> = elements
			.nodes
			.iter()
			.map(|n| (theme::node_width(&n.data.short_name, false), NODE_HEIGHT))
			.collect();
		let positions = layout::settle(&graph, &config, &sizes);

		let node_styles = elements.nodes.iter().map(|n| theme.node_style(n)).collect();
		let edge_styles = elements.edges.iter().map(|e| theme.edge_style(e)).collect();
		let box_order = box_order(&graph);

		let mut state = Self {
			boxes: vec![Rect::centered(0.0, 0.0, 0.0, 0.0); graph.node_count()],
			elements,
			graph,
			node_styles,
			edge_styles,
			positions,
			selection: SelectionState::default(),
			tooltip: TooltipState::default(),
			transform: ViewTransform::default(),
			pan: PanState::default(),
			mouse_down: false,
			base_dir,
			width,
			height,
			box_order,
		};
		state.update_boxes(theme);
		state.apply_fit(&FitRequest::whole_graph());
		state
	}

	/// Box of a node as last computed.
	pub fn node_box(&self, node: usize) -> Rect {
		self.boxes[node]
	}

	/// Label shown on a node in its current selection state.
	pub fn node_label(&self, node: usize) -> &str {
		let data = &self.elements.nodes[node].data;
		if self.selection.is_selected(ElementId::Node(node)) {
			&data.long_name
		} else {
			&data.short_name
		}
	}

	/// Recomputes node boxes. Leaf boxes depend on the label and selection,
	/// compound boxes enclose their children.
	pub fn update_boxes(&mut self, theme: &Theme) {
		for &n in &self.box_order {
			let children = self.graph.children(n);
			self.boxes[n] = if children.is_empty() {
				let selected = self.selection.is_selected(ElementId::Node(n));
				let height = if selected {
					SELECTED_NODE_HEIGHT
				} else {
					NODE_HEIGHT
				};
				let p = self.positions[n];
				Rect::centered(
					p.x,
					p.y,
					theme::node_width(self.node_label(n), selected),
					height,
				)
			} else {
				Rect::enclosing(children.iter().map(|&c| self.boxes[c]))
					.map(|r| r.expand(theme.compound_padding))
					.unwrap_or_else(|| self.boxes[n])
			};
		}
	}

	/// Center used as the endpoint of a node's edges.
	pub fn node_center(&self, node: usize) -> (f64, f64) {
		self.boxes[node].center()
	}

	/// Bounds of a set of elements, or of the whole graph for `None`.
	pub fn bounds(&self, elements: Option<&HashSet<ElementId>>) -> Option<Rect> {
		let rect_of = |id: &ElementId| match *id {
			ElementId::Node(n) => Some(self.boxes[n]),
			ElementId::Edge(e) => self.graph.endpoints(e).map(|(s, t)| {
				let (sx, sy) = self.node_center(s);
				let (tx, ty) = self.node_center(t);
				Rect {
					x1: sx.min(tx),
					y1: sy.min(ty),
					x2: sx.max(tx),
					y2: sy.max(ty),
				}
			}),
		};
		match elements {
			Some(set) => Rect::enclosing(set.iter().filter_map(rect_of)),
			None => Rect::enclosing(self.boxes.iter().copied()),
		}
	}

	pub fn apply_fit(&mut self, fit: &FitRequest) {
		if let Some(bounds) = self.bounds(fit.elements.as_ref()) {
			self.transform = ViewTransform::fit(bounds, fit.padding, self.width, self.height);
		}
	}

	/// Topmost element under a screen point: leaf nodes, then edges, then
	/// compound boxes from the innermost outwards.
	pub fn element_at(&self, sx: f64, sy: f64) -> Option<ElementId> {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);

		let leaf = (0..self.graph.node_count())
			.rev()
			.filter(|&n| !self.graph.is_compound(n))
			.find(|&n| self.boxes[n].contains(gx, gy));
		if let Some(n) = leaf {
			return Some(ElementId::Node(n));
		}

		let reach = EDGE_HIT_DISTANCE / self.transform.k;
		let edge = self.graph.edges().find(|&(_, s, t)| {
			let (x1, y1) = self.node_center(s);
			let (x2, y2) = self.node_center(t);
			distance_to_segment(gx, gy, x1, y1, x2, y2) <= reach
		});
		if let Some((e, _, _)) = edge {
			return Some(ElementId::Edge(e));
		}

		self.box_order
			.iter()
			.copied()
			.filter(|&n| self.graph.is_compound(n))
			.find(|&n| self.boxes[n].contains(gx, gy))
			.map(ElementId::Node)
	}

	/// Handles a tap at a screen point. Returns the detail document to open,
	/// if any.
	pub fn tap(&mut self, sx: f64, sy: f64, theme: &Theme) -> Option<String> {
		self.tooltip.hide();
		let target = match self.element_at(sx, sy) {
			Some(ElementId::Node(n)) => TapTarget::Node(n),
			Some(ElementId::Edge(e)) => TapTarget::Edge(e),
			None => TapTarget::Background,
		};
		let TapResponse { fit, open } =
			self.selection
				.tap(target, &self.graph, &self.elements, &self.base_dir);
		self.update_boxes(theme);
		self.apply_fit(&fit);
		open
	}

	/// Updates the tooltip for a pointer at a screen point.
	pub fn hover(&mut self, sx: f64, sy: f64) {
		if self.mouse_down {
			return;
		}
		let text = match self.element_at(sx, sy) {
			Some(ElementId::Node(n)) if !self.graph.is_compound(n) => {
				Some(tooltip::node_tooltip(&self.elements.nodes[n]))
			}
			Some(ElementId::Edge(e)) => tooltip::edge_tooltip(&self.elements.edges[e]),
			_ => None,
		};
		if let Some(text) = text {
			self.tooltip.show(text, sx, sy);
		}
	}

	pub fn press(&mut self, sx: f64, sy: f64) {
		self.mouse_down = true;
		self.tooltip.hide();
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
			moved: false,
		};
	}

	/// Pans the view while the pointer is held.
	pub fn drag(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		if !self.pan.moved && (dx * dx + dy * dy).sqrt() > TAP_TOLERANCE {
			self.pan.moved = true;
		}
		if self.pan.moved {
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	/// Ends a press; returns whether it was a tap.
	pub fn release(&mut self) -> bool {
		let was_tap = self.pan.active && !self.pan.moved;
		self.mouse_down = false;
		self.pan = PanState::default();
		was_tap
	}

	pub fn leave(&mut self) {
		self.mouse_down = false;
		self.pan = PanState::default();
	}

	pub fn tick(&mut self, dt: f64) {
		self.tooltip.tick(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		debug!("structure-graph: resized to {width}x{height}");
		self.width = width;
		self.height = height;
	}
}

/// Orders nodes so every child precedes its parent.
fn box_order(graph: &GraphIndex) -> Vec<usize> {
	let mut order: Vec<usize> = (0..graph.node_count()).collect();
	order.sort_by_key(|&n| std::cmp::Reverse(graph.depth(n)));
	order
}
