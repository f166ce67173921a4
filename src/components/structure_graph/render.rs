//! Canvas rendering for the structure graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Compound boxes and background-layer nodes, outermost first (world space)
//! 3. Faded edges and nodes
//! 4. Remaining edges, nodes, then the selected node on top
//! 5. Tooltip (screen space)

use std::f64::consts::{FRAC_PI_2, PI};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::graph::ElementId;
use super::selection::Selection;
use super::state::StructureGraphState;
use super::theme::{ArrowShape, LabelPlacement, NodeShape, Theme};
use super::tooltip::Tooltip;
use super::viewport::Rect;

/// Line height relative to the font size.
const LINE_SPACING: f64 = 1.25;

/// One element paint with its opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Layer {
	Node(usize, f64),
	Edge(usize, f64),
}

/// Renders the complete graph to the canvas.
pub fn render(state: &StructureGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	for layer in draw_order(state, theme) {
		match layer {
			Layer::Node(n, alpha) => draw_node(state, ctx, theme, n, alpha),
			Layer::Edge(e, alpha) => draw_edge(state, ctx, theme, e, alpha),
		}
	}

	ctx.restore();

	if let Some(tip) = state.tooltip.current() {
		draw_tooltip(ctx, theme, tip);
	}
}

/// Paint order of one frame, back to front.
fn draw_order(state: &StructureGraphState, theme: &Theme) -> Vec<Layer> {
	let graph = &state.graph;
	let selection = &state.selection;
	let in_background = |n: usize| graph.is_compound(n) || state.node_styles[n].background_layer;
	let faded = theme.faded_opacity;

	let mut background: Vec<usize> = (0..graph.node_count())
		.filter(|&n| in_background(n))
		.collect();
	background.sort_by_key(|&n| graph.depth(n));
	// Compound boxes never fade.
	let mut order: Vec<Layer> = background
		.into_iter()
		.map(|n| {
			let alpha = if !graph.is_compound(n) && selection.is_faded(ElementId::Node(n)) {
				faded
			} else {
				1.0
			};
			Layer::Node(n, alpha)
		})
		.collect();

	let selected = match selection.selection() {
		Selection::Node(n) if !in_background(n) => Some(n),
		_ => None,
	};
	let (faded_edges, edges): (Vec<usize>, Vec<usize>) = graph
		.edges()
		.map(|(e, _, _)| e)
		.partition(|&e| selection.is_faded(ElementId::Edge(e)));
	let (faded_nodes, nodes): (Vec<usize>, Vec<usize>) = (0..graph.node_count())
		.filter(|&n| !in_background(n) && Some(n) != selected)
		.partition(|&n| selection.is_faded(ElementId::Node(n)));

	order.extend(faded_edges.into_iter().map(|e| Layer::Edge(e, faded)));
	order.extend(faded_nodes.into_iter().map(|n| Layer::Node(n, faded)));
	order.extend(edges.into_iter().map(|e| Layer::Edge(e, 1.0)));
	order.extend(nodes.into_iter().map(|n| Layer::Node(n, 1.0)));
	order.extend(selected.map(|n| Layer::Node(n, 1.0)));
	order
}

fn draw_node(
	state: &StructureGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	n: usize,
	alpha: f64,
) {
	let style = &state.node_styles[n];
	let node = &state.elements.nodes[n];
	let bounds = state.node_box(n);
	let selected = state.selection.is_selected(ElementId::Node(n));

	ctx.set_global_alpha(alpha);

	trace_shape(ctx, style.shape, bounds);
	ctx.set_fill_style_str(&style.fill.to_css());
	ctx.fill();

	let border = if selected {
		theme.selected_border_width
	} else {
		style.border_width
	};
	if border > 0.0 {
		ctx.set_stroke_style_str(&theme.node_border.to_css());
		ctx.set_line_width(border);
		ctx.stroke();
	}

	let lines: Vec<&str> = if selected {
		vec![node.data.kind.as_str(), state.node_label(n)]
	} else {
		vec![state.node_label(n)]
	};
	ctx.set_font(&theme.font(selected, false));
	ctx.set_fill_style_str(&theme.node_text.to_css());

	let line_height = theme.font_size * LINE_SPACING;
	let (cx, cy) = bounds.center();
	// Compound boxes keep their label clear of the children.
	let placement = match style.label {
		LabelPlacement::Center if state.graph.is_compound(n) => LabelPlacement::Top,
		other => other,
	};
	match placement {
		LabelPlacement::Center => {
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			let top = cy - line_height * (lines.len() as f64 - 1.0) / 2.0;
			for (i, line) in lines.iter().enumerate() {
				let _ = ctx.fill_text(line, cx, top + line_height * i as f64);
			}
		}
		LabelPlacement::Top | LabelPlacement::TopRight => {
			let x = if placement == LabelPlacement::TopRight {
				ctx.set_text_align("right");
				bounds.x2
			} else {
				ctx.set_text_align("center");
				cx
			};
			ctx.set_text_baseline("bottom");
			let bottom = bounds.y1 - 2.0;
			for (i, line) in lines.iter().rev().enumerate() {
				let _ = ctx.fill_text(line, x, bottom - line_height * i as f64);
			}
		}
	}

	ctx.set_global_alpha(1.0);
}

/// Adds the outline of a node shape to a fresh path.
fn trace_shape(ctx: &CanvasRenderingContext2d, shape: NodeShape, r: Rect) {
	ctx.begin_path();
	match shape {
		NodeShape::Rectangle => ctx.rect(r.x1, r.y1, r.width(), r.height()),
		NodeShape::RoundRectangle => {
			let radius = r.width().min(r.height()) / 4.0;
			ctx.move_to(r.x1 + radius, r.y1);
			let _ = ctx.arc_to(r.x2, r.y1, r.x2, r.y2, radius);
			let _ = ctx.arc_to(r.x2, r.y2, r.x1, r.y2, radius);
			let _ = ctx.arc_to(r.x1, r.y2, r.x1, r.y1, radius);
			let _ = ctx.arc_to(r.x1, r.y1, r.x2, r.y1, radius);
			ctx.close_path();
		}
		NodeShape::Octagon => {
			let cut = r.width().min(r.height()) * 0.3;
			ctx.move_to(r.x1 + cut, r.y1);
			ctx.line_to(r.x2 - cut, r.y1);
			ctx.line_to(r.x2, r.y1 + cut);
			ctx.line_to(r.x2, r.y2 - cut);
			ctx.line_to(r.x2 - cut, r.y2);
			ctx.line_to(r.x1 + cut, r.y2);
			ctx.line_to(r.x1, r.y2 - cut);
			ctx.line_to(r.x1, r.y1 + cut);
			ctx.close_path();
		}
	}
}

/// Point where the ray from the box center towards `(tx, ty)` leaves the box.
fn box_exit(r: Rect, tx: f64, ty: f64) -> (f64, f64) {
	let (cx, cy) = r.center();
	let (dx, dy) = (tx - cx, ty - cy);
	if dx.abs() < 1e-9 && dy.abs() < 1e-9 {
		return (cx, cy);
	}
	let sx = if dx.abs() > 1e-9 {
		(r.width() / 2.0) / dx.abs()
	} else {
		f64::INFINITY
	};
	let sy = if dy.abs() > 1e-9 {
		(r.height() / 2.0) / dy.abs()
	} else {
		f64::INFINITY
	};
	let s = sx.min(sy).min(1.0);
	(cx + dx * s, cy + dy * s)
}

fn draw_edge(
	state: &StructureGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	e: usize,
	alpha: f64,
) {
	let Some((src, tgt)) = state.graph.endpoints(e) else {
		return;
	};
	let style = &state.edge_styles[e];
	let edge = &state.elements.edges[e];
	let selected = state.selection.is_selected(ElementId::Edge(e));

	let (tcx, tcy) = state.node_center(tgt);
	let (scx, scy) = state.node_center(src);
	let (x1, y1) = box_exit(state.node_box(src), tcx, tcy);
	let (x2, y2) = box_exit(state.node_box(tgt), scx, scy);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let color = style.color.to_css();

	ctx.set_global_alpha(alpha);
	ctx.set_stroke_style_str(&color);
	ctx.set_line_width(if selected {
		theme.selected_border_width
	} else {
		theme.edge_width
	});
	if style.dashed {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(6.0),
			&JsValue::from_f64(4.0),
		));
	}

	let size = theme.arrow_size;
	let start_inset = if style.source_arrow == ArrowShape::None { 0.0 } else { size };
	let end_inset = if style.target_arrow == ArrowShape::None { 0.0 } else { size };
	ctx.begin_path();
	ctx.move_to(x1 + ux * start_inset, y1 + uy * start_inset);
	ctx.line_to(x2 - ux * end_inset, y2 - uy * end_inset);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	ctx.set_fill_style_str(&color);
	draw_arrow(ctx, style.target_arrow, true, x2, y2, -ux, -uy, size);
	draw_arrow(
		ctx,
		style.source_arrow,
		style.source_arrow_filled,
		x1,
		y1,
		ux,
		uy,
		size,
	);

	let label = match (&edge.data.description, selected) {
		(Some(description), true) => format!("{}\n{}", edge.data.kind, description),
		_ => edge.data.kind.clone(),
	};
	let rotate = !(selected && edge.data.description.is_some());
	draw_edge_label(
		ctx,
		theme,
		&label,
		((x1 + x2) / 2.0, (y1 + y2) / 2.0),
		if rotate { uy.atan2(ux) } else { 0.0 },
		&color,
		selected,
		style.italic,
	);

	ctx.set_global_alpha(1.0);
}

/// Draws an arrowhead with its tip at `(x, y)`, pointing against `(ux, uy)`.
#[allow(clippy::too_many_arguments)]
fn draw_arrow(
	ctx: &CanvasRenderingContext2d,
	shape: ArrowShape,
	filled: bool,
	x: f64,
	y: f64,
	ux: f64,
	uy: f64,
	size: f64,
) {
	let (px, py) = (-uy * size * 0.5, ux * size * 0.5);
	ctx.begin_path();
	match shape {
		ArrowShape::None => return,
		ArrowShape::Triangle => {
			let (bx, by) = (x + ux * size, y + uy * size);
			ctx.move_to(x, y);
			ctx.line_to(bx + px, by + py);
			ctx.line_to(bx - px, by - py);
			ctx.close_path();
		}
		ArrowShape::Diamond => {
			let (mx, my) = (x + ux * size * 0.5, y + uy * size * 0.5);
			ctx.move_to(x, y);
			ctx.line_to(mx + px, my + py);
			ctx.line_to(x + ux * size, y + uy * size);
			ctx.line_to(mx - px, my - py);
			ctx.close_path();
		}
		ArrowShape::Circle => {
			let r = size / 2.0;
			let _ = ctx.arc(x + ux * r, y + uy * r, r, 0.0, 2.0 * PI);
		}
	}
	if filled {
		ctx.fill();
	} else {
		ctx.stroke();
	}
}

#[allow(clippy::too_many_arguments)]
fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	text: &str,
	(x, y): (f64, f64),
	angle: f64,
	background: &str,
	bold: bool,
	italic: bool,
) {
	// Keep rotated text upright.
	let angle = if angle > FRAC_PI_2 {
		angle - PI
	} else if angle < -FRAC_PI_2 {
		angle + PI
	} else {
		angle
	};

	ctx.save();
	let _ = ctx.translate(x, y);
	let _ = ctx.rotate(angle);
	ctx.set_font(&theme.font(bold, italic));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	let lines: Vec<&str> = text.lines().collect();
	let line_height = theme.font_size * LINE_SPACING;
	let width = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max);
	let height = line_height * lines.len() as f64;

	ctx.set_fill_style_str(background);
	ctx.fill_rect(-width / 2.0 - 3.0, -height / 2.0, width + 6.0, height);

	ctx.set_fill_style_str(&theme.edge_text.to_css());
	let top = -line_height * (lines.len() as f64 - 1.0) / 2.0;
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, 0.0, top + line_height * i as f64);
	}
	ctx.restore();
}

fn draw_tooltip(ctx: &CanvasRenderingContext2d, theme: &Theme, tip: &Tooltip) {
	let lines: Vec<&str> = tip.text.lines().collect();
	let line_height = theme.font_size * LINE_SPACING;
	ctx.set_font(&theme.font(false, false));
	let width = lines
		.iter()
		.filter_map(|l| ctx.measure_text(l).ok())
		.map(|m| m.width())
		.fold(0.0, f64::max)
		+ 16.0;
	let height = line_height * lines.len() as f64 + 10.0;
	let (left, top) = (tip.x - width / 2.0, tip.y - height);

	ctx.set_fill_style_str("rgba(0, 0, 0, 0.2)");
	ctx.fill_rect(left + 2.0, top + 2.0, width, height);
	ctx.set_fill_style_str("rgba(30, 30, 30, 0.92)");
	ctx.fill_rect(left, top, width, height);

	ctx.set_fill_style_str("#ffffff");
	ctx.set_text_align("left");
	ctx.set_text_baseline("top");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, left + 8.0, top + 5.0 + line_height * i as f64);
	}
}
