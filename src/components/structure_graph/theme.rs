//! Visual theming for the structure graph.
//!
//! The style table maps category and modifier classes to colors, shapes and
//! line styles. Rules are applied in order, so later rules override earlier
//! ones for the properties they set (e.g. `operational` over `method`).

use super::elements::{VisualEdge, VisualNode};

/// Base node height.
pub const NODE_HEIGHT: f64 = 30.0;
/// Node height while selected, room for the two-line label.
pub const SELECTED_NODE_HEIGHT: f64 = 40.0;

/// Width of a node box for its current label.
///
/// Selected nodes show the long name and use a wider per-character step.
pub fn node_width(label: &str, selected: bool) -> f64 {
	let per_char = if selected { 9.0 } else { 8.0 };
	35.0 + per_char * label.chars().count() as f64
}

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color from a `0xRRGGBB` literal.
	pub const fn hex(rgb: u32) -> Self {
		Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Outline of a node box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
	Rectangle,
	RoundRectangle,
	Octagon,
}

/// Where a node label sits relative to its box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelPlacement {
	/// Centered inside the box.
	Center,
	/// Above the box, horizontally centered.
	Top,
	/// Above the box, flush with its right edge.
	TopRight,
}

/// Arrowhead drawn at an edge end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowShape {
	None,
	Triangle,
	Circle,
	Diamond,
}

/// Resolved style of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub fill: Color,
	pub shape: NodeShape,
	pub border_width: f64,
	pub label: LabelPlacement,
	/// Drawn behind edges and leaf nodes.
	pub background_layer: bool,
}

/// Resolved style of one edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub color: Color,
	pub dashed: bool,
	pub italic: bool,
	pub source_arrow: ArrowShape,
	pub source_arrow_filled: bool,
	pub target_arrow: ArrowShape,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background.
	pub background: Color,
	/// Node fill when no category color applies.
	pub node_fill: Color,
	/// Node outline.
	pub node_border: Color,
	/// Node label text.
	pub node_text: Color,
	/// Edge line when no category color applies.
	pub edge_color: Color,
	/// Edge label text, drawn on a background in the edge color.
	pub edge_text: Color,
	/// Edge line width.
	pub edge_width: f64,
	/// Outline width of selected nodes and line width of selected edges.
	pub selected_border_width: f64,
	/// Opacity of faded elements. Compound boxes never fade.
	pub faded_opacity: f64,
	/// Space between a compound box and its children.
	pub compound_padding: f64,
	/// Label font size in pixels.
	pub font_size: f64,
	/// Label font family.
	pub font_family: &'static str,
	/// Arrowhead length.
	pub arrow_size: f64,
	/// Node fill per category class. Later entries win.
	pub node_colors: Vec<(&'static str, Color)>,
	/// Line color per edge category class. Later entries win.
	pub edge_colors: Vec<(&'static str, Color)>,
}

impl Theme {
	/// Light theme of the structure viewer (default)
	pub fn default_theme() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			node_fill: Color::hex(0x999999),
			node_border: Color::rgb(0, 0, 0),
			node_text: Color::rgb(0, 0, 0),
			edge_color: Color::hex(0xdddddd),
			edge_text: Color::rgb(255, 255, 255),
			edge_width: 2.0,
			selected_border_width: 3.0,
			faded_opacity: 0.4,
			compound_padding: 10.0,
			font_size: 12.0,
			font_family: "Helvetica, Arial, sans-serif",
			arrow_size: 8.0,
			node_colors: vec![
				("namespace", Color::hex(0xcccccc)),
				("object", Color::hex(0xcccccc)),
				("class", Color::hex(0xD5D40D)),
				("struct", Color::hex(0x3584EE)),
				("member", Color::hex(0x3584EE)),
				("interface", Color::hex(0x46E322)),
				("connection", Color::hex(0x46E322)),
				("method", Color::hex(0xD5D40D)),
				("operational", Color::hex(0xE5E46D)),
			],
			edge_colors: vec![
				("member", Color::hex(0xEDA1ED)),
				("override", Color::hex(0xF5A45D)),
				("derives", Color::hex(0xA5A40D)),
				("parent", Color::hex(0xA5040D)),
				("call", Color::hex(0xA5040D)),
				("access", Color::hex(0x05A4DD)),
				("use", Color::hex(0x777777)),
				("inherits", Color::hex(0x2E8B57)),
			],
		}
	}

	/// Resolves the style of a node from its class string.
	pub fn node_style(&self, node: &VisualNode) -> NodeStyle {
		let mut style = NodeStyle {
			fill: self.node_fill,
			shape: NodeShape::Rectangle,
			border_width: 1.0,
			label: LabelPlacement::Center,
			background_layer: false,
		};

		if node.has_class("namespace") || node.has_class("object") {
			style.label = LabelPlacement::Top;
			style.background_layer = true;
		}
		if node.has_class("namespace") {
			style.border_width = 0.0;
			style.label = LabelPlacement::TopRight;
		}
		for (class, color) in &self.node_colors {
			if node.has_class(class) {
				style.fill = *color;
			}
		}
		if node.has_class("protected") {
			style.shape = NodeShape::RoundRectangle;
		}
		if node.has_class("private") {
			style.shape = NodeShape::Octagon;
		}
		style
	}

	/// Resolves the style of an edge from its class string.
	pub fn edge_style(&self, edge: &VisualEdge) -> EdgeStyle {
		let mut style = EdgeStyle {
			color: self.edge_color,
			dashed: false,
			italic: false,
			source_arrow: ArrowShape::None,
			source_arrow_filled: false,
			target_arrow: ArrowShape::Triangle,
		};

		if edge.has_class("protected") {
			style.source_arrow = ArrowShape::Circle;
		}
		if edge.has_class("private") {
			style.source_arrow = ArrowShape::Diamond;
		}
		// Member edges point from the member to its owner. A visibility
		// marker keeps its shape and only becomes filled.
		if edge.has_class("member") {
			style.target_arrow = ArrowShape::None;
			if style.source_arrow == ArrowShape::None {
				style.source_arrow = ArrowShape::Diamond;
			}
			style.source_arrow_filled = true;
		}
		for (class, color) in &self.edge_colors {
			if edge.has_class(class) {
				style.color = *color;
			}
		}
		if edge.has_class("indirect") || edge.has_class("uncertain") {
			style.dashed = true;
		}
		if edge.has_class("virtual") {
			style.italic = true;
		}
		style
	}

	/// CSS font for labels.
	pub fn font(&self, bold: bool, italic: bool) -> String {
		format!(
			"{}{}{}px {}",
			if italic { "italic " } else { "" },
			if bold { "bold " } else { "" },
			self.font_size,
			self.font_family
		)
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::structure_graph::elements::{
		EdgeRecord, NodeRecord, VisualElement, edge_classes, node_classes,
	};

	fn node(kind: &str, modifiers: &[&str]) -> VisualNode {
		let modifiers: Vec<String> = modifiers.iter().map(|m| m.to_string()).collect();
		VisualElement {
			data: NodeRecord {
				id: "n".into(),
				short_name: "n".into(),
				long_name: "n".into(),
				kind: kind.into(),
				parent: None,
				hover_name: None,
				reference: None,
				filename: None,
			},
			classes: node_classes(kind, &modifiers),
		}
	}

	fn edge(kind: &str, modifiers: &[&str]) -> VisualEdge {
		let modifiers: Vec<String> = modifiers.iter().map(|m| m.to_string()).collect();
		VisualElement {
			data: EdgeRecord {
				source: "a".into(),
				target: "b".into(),
				kind: kind.into(),
				description: None,
			},
			classes: edge_classes(kind, &modifiers),
		}
	}

	#[test]
	fn operational_overrides_method_color() {
		let theme = Theme::default();
		let method = theme.node_style(&node("method", &[]));
		let ctor = theme.node_style(&node("method", &["constructor"]));
		assert_eq!(method.fill, Color::hex(0xD5D40D));
		assert_eq!(ctor.fill, Color::hex(0xE5E46D));
	}

	#[test]
	fn visibility_selects_shape() {
		let theme = Theme::default();
		assert_eq!(theme.node_style(&node("class", &[])).shape, NodeShape::Rectangle);
		assert_eq!(
			theme.node_style(&node("member", &["protected"])).shape,
			NodeShape::RoundRectangle
		);
		assert_eq!(
			theme.node_style(&node("member", &["private"])).shape,
			NodeShape::Octagon
		);
	}

	#[test]
	fn namespace_is_flat_background() {
		let style = Theme::default().node_style(&node("namespace", &[]));
		assert_eq!(style.border_width, 0.0);
		assert_eq!(style.label, LabelPlacement::TopRight);
		assert!(style.background_layer);

		let object = Theme::default().node_style(&node("object", &[]));
		assert_eq!(object.border_width, 1.0);
		assert_eq!(object.label, LabelPlacement::Top);
	}

	#[test]
	fn member_edges_are_reversed() {
		let style = Theme::default().edge_style(&edge("member", &[]));
		assert_eq!(style.target_arrow, ArrowShape::None);
		assert_eq!(style.source_arrow, ArrowShape::Diamond);
		assert!(style.source_arrow_filled);
		assert_eq!(style.color, Color::hex(0xEDA1ED));
	}

	#[test]
	fn protected_member_keeps_filled_circle() {
		let theme = Theme::default();
		let protected = theme.edge_style(&edge("member", &["protected"]));
		assert_eq!(protected.source_arrow, ArrowShape::Circle);
		assert!(protected.source_arrow_filled);
		assert_eq!(protected.target_arrow, ArrowShape::None);

		let private = theme.edge_style(&edge("member", &["private"]));
		assert_eq!(private.source_arrow, ArrowShape::Diamond);
		assert!(private.source_arrow_filled);
	}

	#[test]
	fn edge_categories_have_distinct_colors() {
		let theme = Theme::default();
		let kinds = ["member", "override", "derives", "call", "access", "use", "inherits"];
		let colors: Vec<String> = kinds
			.iter()
			.map(|k| theme.edge_style(&edge(k, &[])).color.to_css())
			.collect();
		for (i, a) in colors.iter().enumerate() {
			for b in &colors[i + 1..] {
				assert_ne!(a, b);
			}
		}
		assert_eq!(
			theme.edge_style(&edge("parent", &[])).color,
			theme.edge_style(&edge("call", &[])).color
		);
	}

	#[test]
	fn edge_modifiers_style_line_and_label() {
		let theme = Theme::default();
		assert!(theme.edge_style(&edge("call", &["indirect"])).dashed);
		assert!(theme.edge_style(&edge("call", &["uncertain"])).dashed);
		assert!(!theme.edge_style(&edge("call", &[])).dashed);
		assert!(theme.edge_style(&edge("override", &["virtual"])).italic);
		let private = theme.edge_style(&edge("use", &["private"]));
		assert_eq!(private.source_arrow, ArrowShape::Diamond);
		assert!(!private.source_arrow_filled);
		assert_eq!(private.target_arrow, ArrowShape::Triangle);
	}

	#[test]
	fn width_grows_with_label() {
		assert_eq!(node_width("abc", false), 59.0);
		assert_eq!(node_width("abc", true), 62.0);
		assert!(node_width("a::b::c", true) > node_width("c", false));
	}

	#[test]
	fn hex_colors_render_as_css() {
		assert_eq!(Color::hex(0xD5D40D).to_css(), "#d5d40d");
		assert_eq!(
			Color { a: 0.5, ..Color::rgb(1, 2, 3) }.to_css(),
			"rgba(1, 2, 3, 0.5)"
		);
	}
}
