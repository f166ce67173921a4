//! Force-directed layout, settled once before the first frame.
//!
//! The `force_graph` simulation runs for a fixed number of steps from a
//! deterministic scattered start. Containment is modelled as extra springs
//! between each child and its parent so nested nodes cluster together. The
//! settled positions are then scaled to fill a bounding box sized from the
//! element counts, and leaf boxes still overlapping are pushed apart.

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info, warn};

use super::graph::GraphIndex;

/// A position in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Layout parameters for one document.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Bounding box the settled layout is scaled into.
	pub width: f64,
	pub height: f64,
	pub node_repulsion: f32,
	pub edge_elasticity: f32,
	pub ideal_edge_length: f32,
	/// Simulation steps before the layout is considered settled.
	pub iterations: usize,
	pub time_step: f32,
	/// Gap kept between leaf boxes.
	pub node_spacing: f64,
}

impl LayoutConfig {
	/// Parameters sized for `nodes`/`edges` counts. The class view spreads
	/// nodes further apart.
	pub fn for_counts(nodes: usize, edges: usize, class_view: bool) -> Self {
		let (n, e) = (nodes as f64, edges as f64);
		let (node_repulsion, edge_elasticity, ideal_edge_length) = if class_view {
			(400.0, 3.0, 65.0)
		} else {
			(120.0, 1.5, 15.0)
		};
		Self {
			width: 200.0 + 25.0 * n + 3.0 * e,
			height: 150.0 + 15.0 * n + 2.0 * e,
			node_repulsion,
			edge_elasticity,
			ideal_edge_length,
			iterations: 1000,
			time_step: 0.035,
			node_spacing: 10.0,
		}
	}

	pub fn simulation_parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.node_repulsion,
			// Springs have no rest length; longer ideal edges get weaker springs.
			force_spring: self.edge_elasticity / self.ideal_edge_length,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

/// Sweeps over the leaf pairs before overlap removal gives up.
const MAX_OVERLAP_SWEEPS: usize = 500;

/// Simple pseudo-random function (deterministic)
fn pseudo_random(seed: f64) -> f64 {
	let x = (seed * 12.9898 + seed * 78.233).sin() * 43758.5453;
	x - x.floor()
}

/// Runs the simulation to completion and returns one position per node.
///
/// `sizes` holds the `(width, height)` of every node box; leaf boxes end up
/// at least `config.node_spacing` apart.
pub fn settle(graph: &GraphIndex, config: &LayoutConfig, sizes: &[(f64, f64)]) -> Vec<Point> {
	let count = graph.node_count();
	if count == 0 {
		return Vec::new();
	}

	let start: Vec<Point> = (0..count)
		.map(|i| {
			let seed = i as f64 + 1.0;
			Point {
				x: pseudo_random(seed * 1.1) * config.width,
				y: pseudo_random(seed * 2.3) * config.height,
			}
		})
		.collect();

	let mut sim: ForceGraph<usize, ()> = ForceGraph::new(config.simulation_parameters());
	let idx: Vec<_> = start
		.iter()
		.enumerate()
		.map(|(i, p)| {
			sim.add_node(NodeData {
				x: p.x as f32,
				y: p.y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: i,
			})
		})
		.collect();

	for (_, src, tgt) in graph.edges() {
		if src != tgt {
			sim.add_edge(idx[src], idx[tgt], EdgeData::default());
		}
	}
	for child in 0..count {
		if let Some(parent) = graph.parent(child) {
			sim.add_edge(idx[child], idx[parent], EdgeData::default());
		}
	}

	for _ in 0..config.iterations {
		sim.update(config.time_step);
	}

	let mut settled = start.clone();
	sim.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		if x.is_finite() && y.is_finite() {
			settled[node.data.user_data] = Point { x, y };
		}
	});

	info!(
		"structure-graph: layout settled {} nodes in {} steps",
		count, config.iterations
	);
	let mut points = fit_into_box(&settled, config.width, config.height);
	let leaves: Vec<usize> = (0..count).filter(|&n| !graph.is_compound(n)).collect();
	let sweeps = remove_overlaps(&mut points, sizes, &leaves, config.node_spacing);
	debug!("structure-graph: overlap removal took {sweeps} sweeps");
	center_in_box(&mut points, config.width, config.height);
	points
}

/// `(min_x, min_y, max_x, max_y)` of `points`.
fn extent(points: &[Point]) -> Option<(f64, f64, f64, f64)> {
	let first = points.first()?;
	Some(points.iter().fold(
		(first.x, first.y, first.x, first.y),
		|(x1, y1, x2, y2), p| (x1.min(p.x), y1.min(p.y), x2.max(p.x), y2.max(p.y)),
	))
}

/// Scales `points` uniformly to fill a `width` x `height` box and centers
/// them in it.
pub fn fit_into_box(points: &[Point], width: f64, height: f64) -> Vec<Point> {
	let Some((min_x, min_y, max_x, max_y)) = extent(points) else {
		return Vec::new();
	};
	let (span_x, span_y) = (max_x - min_x, max_y - min_y);
	let scale = match (span_x > 0.0, span_y > 0.0) {
		(true, true) => (width / span_x).min(height / span_y),
		(true, false) => width / span_x,
		(false, true) => height / span_y,
		(false, false) => 1.0,
	};

	let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
	points
		.iter()
		.map(|p| Point {
			x: width / 2.0 + (p.x - cx) * scale,
			y: height / 2.0 + (p.y - cy) * scale,
		})
		.collect()
}

/// Moves `points` so their extent is centered in a `width` x `height` box.
fn center_in_box(points: &mut [Point], width: f64, height: f64) {
	let Some((min_x, min_y, max_x, max_y)) = extent(points) else {
		return;
	};
	let (dx, dy) = (
		width / 2.0 - (min_x + max_x) / 2.0,
		height / 2.0 - (min_y + max_y) / 2.0,
	);
	for p in points {
		p.x += dx;
		p.y += dy;
	}
}

/// Pushes the boxes of `movable` nodes apart until no two of them come
/// closer than `gap`. Each overlapping pair is separated along the axis
/// needing the smaller move. Returns the number of sweeps taken.
pub fn remove_overlaps(
	points: &mut [Point],
	sizes: &[(f64, f64)],
	movable: &[usize],
	gap: f64,
) -> usize {
	const EPSILON: f64 = 1e-6;
	for sweep in 0..MAX_OVERLAP_SWEEPS {
		let mut moved = false;
		for (i, &a) in movable.iter().enumerate() {
			for &b in &movable[i + 1..] {
				let (dx, dy) = (points[b].x - points[a].x, points[b].y - points[a].y);
				let over_x = (sizes[a].0 + sizes[b].0) / 2.0 + gap - dx.abs();
				let over_y = (sizes[a].1 + sizes[b].1) / 2.0 + gap - dy.abs();
				if over_x <= EPSILON || over_y <= EPSILON {
					continue;
				}
				moved = true;
				if over_x < over_y {
					let push = over_x / 2.0 * if dx < 0.0 { -1.0 } else { 1.0 };
					points[a].x -= push;
					points[b].x += push;
				} else {
					let push = over_y / 2.0 * if dy < 0.0 { -1.0 } else { 1.0 };
					points[a].y -= push;
					points[b].y += push;
				}
			}
		}
		if !moved {
			return sweep;
		}
	}
	warn!("structure-graph: node overlaps remain after {MAX_OVERLAP_SWEEPS} sweeps");
	MAX_OVERLAP_SWEEPS
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::components::structure_graph::elements::VisualElements;
	use crate::components::structure_graph::theme::{NODE_HEIGHT, node_width};
	use crate::components::structure_graph::types::GraphDocument;

	#[test]
	fn bounding_box_grows_with_counts() {
		let small = LayoutConfig::for_counts(2, 1, false);
		let large = LayoutConfig::for_counts(40, 80, false);
		assert_eq!(small.width, 200.0 + 50.0 + 3.0);
		assert_eq!(small.height, 150.0 + 30.0 + 2.0);
		assert!(large.width > small.width);
		assert!(large.height > small.height);
	}

	#[test]
	fn class_view_spreads_further() {
		let class = LayoutConfig::for_counts(10, 10, true);
		let other = LayoutConfig::for_counts(10, 10, false);
		assert!(class.node_repulsion > other.node_repulsion);
		assert!(class.ideal_edge_length > other.ideal_edge_length);
		assert_eq!(class.width, other.width);
	}

	#[test]
	fn fit_into_box_shrinks_and_centers() {
		let points = [Point { x: -500.0, y: 0.0 }, Point { x: 500.0, y: 100.0 }];
		let fitted = fit_into_box(&points, 100.0, 100.0);
		assert_eq!(fitted[0], Point { x: 0.0, y: 45.0 });
		assert_eq!(fitted[1], Point { x: 100.0, y: 55.0 });
	}

	#[test]
	fn fit_into_box_spreads_small_layouts() {
		let points = [Point { x: 0.0, y: 0.0 }, Point { x: 10.0, y: 0.0 }];
		let fitted = fit_into_box(&points, 100.0, 50.0);
		assert_eq!(fitted[0], Point { x: 0.0, y: 25.0 });
		assert_eq!(fitted[1], Point { x: 100.0, y: 25.0 });
	}

	fn overlapping_pairs(points: &[Point], sizes: &[(f64, f64)], nodes: &[usize]) -> usize {
		let mut count = 0;
		for (i, &a) in nodes.iter().enumerate() {
			for &b in &nodes[i + 1..] {
				let dx = (points[a].x - points[b].x).abs();
				let dy = (points[a].y - points[b].y).abs();
				if dx < (sizes[a].0 + sizes[b].0) / 2.0 && dy < (sizes[a].1 + sizes[b].1) / 2.0 {
					count += 1;
				}
			}
		}
		count
	}

	#[test]
	fn coincident_boxes_are_separated() {
		let mut points = vec![Point::default(); 4];
		let sizes = vec![(60.0, 30.0); 4];
		let nodes = [0, 1, 2, 3];
		remove_overlaps(&mut points, &sizes, &nodes, 10.0);
		assert_eq!(overlapping_pairs(&points, &sizes, &nodes), 0);
	}

	#[test]
	fn overlap_removal_leaves_separated_boxes_alone() {
		let mut points = vec![Point { x: 0.0, y: 0.0 }, Point { x: 200.0, y: 0.0 }];
		let before = points.clone();
		let sweeps = remove_overlaps(&mut points, &[(50.0, 30.0); 2], &[0, 1], 10.0);
		assert_eq!(sweeps, 0);
		assert_eq!(points, before);
	}

	/// Inheritance tree of `n` classes: node i derives from node (i - 1) / 3.
	fn tree(n: usize, class_view: bool) -> GraphDocument {
		let nodes: Vec<_> = (0..n)
			.map(|i| json!({"id": format!("n{i}"), "shortName": format!("Node{i}"),
				"longName": format!("app::Node{i}"), "type": "class"}))
			.collect();
		let edges: Vec<_> = (1..n)
			.map(|i| json!({"source": format!("n{i}"), "target": format!("n{}", (i - 1) / 3),
				"type": "inherits"}))
			.collect();
		serde_json::from_value(json!({"nodes": nodes, "edges": edges, "class": class_view}))
			.unwrap()
	}

	#[test]
	fn settled_leaf_boxes_do_not_overlap() {
		for (n, class_view) in [(10, true), (30, false), (80, false)] {
			let doc = tree(n, class_view);
			let elements = VisualElements::from_document(&doc);
			let graph = GraphIndex::new(&elements);
			let sizes: Vec<(f64, f64)> = elements
				.nodes
				.iter()
				.map(|node| (node_width(&node.data.short_name, false), NODE_HEIGHT))
				.collect();
			let config = LayoutConfig::for_counts(n, n - 1, class_view);
			let points = settle(&graph, &config, &sizes);
			let leaves: Vec<usize> = (0..n).collect();
			assert_eq!(overlapping_pairs(&points, &sizes, &leaves), 0, "n={n}");
		}
	}

	#[test]
	fn settle_centers_every_node_in_the_box() {
		let doc: GraphDocument = serde_json::from_value(json!({
			"nodes": [
				{"id": "ns", "shortName": "ns", "longName": "ns", "type": "namespace"},
				{"id": "A", "shortName": "A", "longName": "ns::A", "type": "class", "parent": "ns"},
				{"id": "B", "shortName": "B", "longName": "ns::B", "type": "class", "parent": "ns"},
				{"id": "C", "shortName": "C", "longName": "C", "type": "struct"}
			],
			"edges": [
				{"source": "A", "target": "B", "type": "inherits"},
				{"source": "B", "target": "C", "type": "member"}
			]
		}))
		.unwrap();
		let graph = GraphIndex::new(&VisualElements::from_document(&doc));
		let mut config = LayoutConfig::for_counts(4, 2, true);
		config.iterations = 50;

		let points = settle(&graph, &config, &[(60.0, 30.0); 4]);
		assert_eq!(points.len(), 4);
		let (x1, y1, x2, y2) = extent(&points).unwrap();
		assert!(((x1 + x2) / 2.0 - config.width / 2.0).abs() < 1e-6);
		assert!(((y1 + y2) / 2.0 - config.height / 2.0).abs() < 1e-6);
		for p in points {
			assert!(p.x.is_finite() && p.y.is_finite());
		}
	}
}
