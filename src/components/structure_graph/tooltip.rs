//! Hover tooltip content and lifetime.

use super::elements::{VisualEdge, VisualNode};

/// Idle time after which a tooltip is dismissed.
pub const TOOLTIP_IDLE_SECS: f64 = 2.0;
/// Vertical gap between the cursor and the tooltip's bottom edge.
pub const TOOLTIP_OFFSET_Y: f64 = 25.0;

/// Tooltip text for a node: optional `<filename>` line, the type, then the
/// hover name (or the long name when there is none).
pub fn node_tooltip(node: &VisualNode) -> String {
	let data = &node.data;
	let name = data.hover_name.as_deref().unwrap_or(&data.long_name);
	match &data.filename {
		Some(file) => format!("<{file}>\n{}\n{name}", data.kind),
		None => format!("{}\n{name}", data.kind),
	}
}

/// Tooltip text for an edge: its description, if any.
pub fn edge_tooltip(edge: &VisualEdge) -> Option<String> {
	edge.data.description.clone()
}

/// A visible tooltip anchored in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub text: String,
	/// Anchor point: bottom center of the tooltip box.
	pub x: f64,
	pub y: f64,
	remaining: f64,
}

/// Tooltip lifetime: shown on hover, dropped after an idle delay or on the
/// next interaction.
#[derive(Clone, Debug, Default)]
pub struct TooltipState {
	current: Option<Tooltip>,
}

impl TooltipState {
	/// Shows `text` above the cursor at `(x, y)` and restarts the idle timer.
	pub fn show(&mut self, text: String, x: f64, y: f64) {
		self.current = Some(Tooltip {
			text,
			x,
			y: y - TOOLTIP_OFFSET_Y,
			remaining: TOOLTIP_IDLE_SECS,
		});
	}

	pub fn hide(&mut self) {
		self.current = None;
	}

	/// Advances the idle timer by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if let Some(tip) = &mut self.current {
			tip.remaining -= dt;
			if tip.remaining <= 0.0 {
				self.current = None;
			}
		}
	}

	pub fn current(&self) -> Option<&Tooltip> {
		self.current.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::structure_graph::elements::{EdgeRecord, NodeRecord, VisualElement};

	fn node(hover: Option<&str>, filename: Option<&str>) -> VisualNode {
		VisualElement {
			data: NodeRecord {
				id: "m".into(),
				short_name: "run".into(),
				long_name: "app::Worker::run".into(),
				kind: "method".into(),
				parent: None,
				hover_name: hover.map(Into::into),
				reference: None,
				filename: filename.map(Into::into),
			},
			classes: "method".into(),
		}
	}

	#[test]
	fn node_text_falls_back_to_long_name() {
		assert_eq!(node_tooltip(&node(None, None)), "method\napp::Worker::run");
		assert_eq!(
			node_tooltip(&node(Some("void run()"), Some("worker.h"))),
			"<worker.h>\nmethod\nvoid run()"
		);
	}

	#[test]
	fn edge_text_is_description() {
		let mut edge = VisualElement {
			data: EdgeRecord {
				source: "a".into(),
				target: "b".into(),
				kind: "member".into(),
				description: Some("private int count".into()),
			},
			classes: "member".into(),
		};
		assert_eq!(edge_tooltip(&edge).as_deref(), Some("private int count"));
		edge.data.description = None;
		assert_eq!(edge_tooltip(&edge), None);
	}

	#[test]
	fn tooltip_expires_after_idle_delay() {
		let mut state = TooltipState::default();
		state.show("x".into(), 100.0, 100.0);
		assert_eq!(state.current().unwrap().y, 100.0 - TOOLTIP_OFFSET_Y);
		state.tick(TOOLTIP_IDLE_SECS / 2.0);
		assert!(state.current().is_some());
		state.show("y".into(), 10.0, 10.0);
		state.tick(TOOLTIP_IDLE_SECS * 0.75);
		assert_eq!(state.current().unwrap().text, "y");
		state.tick(TOOLTIP_IDLE_SECS * 0.5);
		assert!(state.current().is_none());
	}

	#[test]
	fn hide_dismisses_immediately() {
		let mut state = TooltipState::default();
		state.show("x".into(), 0.0, 0.0);
		state.hide();
		assert!(state.current().is_none());
	}
}
