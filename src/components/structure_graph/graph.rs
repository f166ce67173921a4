//! Resolved graph topology: edge endpoints, adjacency and containment.

use std::collections::{HashMap, HashSet};

use log::warn;

use super::elements::VisualElements;

/// Identifies a node or an edge by its position in the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
	Node(usize),
	Edge(usize),
}

/// Index over the visual elements of one document.
///
/// Edges or parents referring to unknown node ids are left out of the
/// index and reported once at construction.
#[derive(Clone, Debug, Default)]
pub struct GraphIndex {
	node_count: usize,
	/// Resolved `(source, target)` per edge; `None` for dangling edges.
	endpoints: Vec<Option<(usize, usize)>>,
	/// Edge indices touching each node.
	incident: Vec<Vec<usize>>,
	parent: Vec<Option<usize>>,
	children: Vec<Vec<usize>>,
}

impl GraphIndex {
	pub fn new(elements: &VisualElements) -> Self {
		let node_count = elements.nodes.len();
		let id_to_idx: HashMap<&str, usize> = elements
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.data.id.as_str(), i))
			.collect();

		let mut parent = vec![None; node_count];
		let mut children = vec![Vec::new(); node_count];
		for (i, node) in elements.nodes.iter().enumerate() {
			let Some(parent_id) = node.data.parent.as_deref() else {
				continue;
			};
			match id_to_idx.get(parent_id) {
				Some(&p) if p != i => {
					parent[i] = Some(p);
					children[p].push(i);
				}
				_ => warn!(
					"structure-graph: node {:?} has unknown parent {:?}",
					node.data.id, parent_id
				),
			}
		}

		let mut incident = vec![Vec::new(); node_count];
		let endpoints = elements
			.edges
			.iter()
			.enumerate()
			.map(|(e, edge)| {
				let ends = (
					id_to_idx.get(edge.data.source.as_str()),
					id_to_idx.get(edge.data.target.as_str()),
				);
				if let (Some(&src), Some(&tgt)) = ends {
					incident[src].push(e);
					if tgt != src {
						incident[tgt].push(e);
					}
					Some((src, tgt))
				} else {
					warn!(
						"structure-graph: dropping edge {:?} -> {:?} with unknown endpoint",
						edge.data.source, edge.data.target
					);
					None
				}
			})
			.collect();

		let index = Self {
			node_count,
			endpoints,
			incident,
			parent,
			children,
		};
		index.break_parent_cycles()
	}

	/// Cuts every loop in the parent chains. The link is cut at the first
	/// repeated node, which always lies on the loop itself.
	fn break_parent_cycles(mut self) -> Self {
		for start in 0..self.node_count {
			let mut seen = HashSet::from([start]);
			let mut current = self.parent[start];
			while let Some(p) = current {
				if !seen.insert(p) {
					warn!("structure-graph: containment cycle through node #{p}");
					if let Some(old) = self.parent[p].take() {
						self.children[old].retain(|&c| c != p);
					}
					break;
				}
				current = self.parent[p];
			}
		}
		self
	}

	pub fn node_count(&self) -> usize {
		self.node_count
	}

	/// Resolved endpoints of an edge.
	pub fn endpoints(&self, edge: usize) -> Option<(usize, usize)> {
		self.endpoints.get(edge).copied().flatten()
	}

	/// Iterates `(edge, source, target)` over every resolved edge.
	pub fn edges(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
		self.endpoints
			.iter()
			.enumerate()
			.filter_map(|(e, ends)| ends.map(|(s, t)| (e, s, t)))
	}

	pub fn parent(&self, node: usize) -> Option<usize> {
		self.parent.get(node).copied().flatten()
	}

	pub fn children(&self, node: usize) -> &[usize] {
		&self.children[node]
	}

	/// Number of enclosing nodes above `node`.
	pub fn depth(&self, mut node: usize) -> usize {
		let mut d = 0;
		while let Some(p) = self.parent(node) {
			d += 1;
			node = p;
		}
		d
	}

	/// Whether the node encloses other nodes (drawn as a compound box).
	pub fn is_compound(&self, node: usize) -> bool {
		!self.children[node].is_empty()
	}

	/// Nodes sharing an edge with `node`, excluding `node` itself.
	pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
		self.incident[node].iter().filter_map(move |&e| {
			let (src, tgt) = self.endpoints(e)?;
			let other = if src == node { tgt } else { src };
			(other != node).then_some(other)
		})
	}

	/// Every node below `node` in the containment hierarchy, at any depth.
	pub fn descendants(&self, node: usize) -> Vec<usize> {
		let mut out = Vec::new();
		let mut stack: Vec<usize> = self.children[node].clone();
		while let Some(n) = stack.pop() {
			out.push(n);
			stack.extend_from_slice(&self.children[n]);
		}
		out
	}

	/// Every element of the graph.
	pub fn all_elements(&self) -> HashSet<ElementId> {
		(0..self.node_count)
			.map(ElementId::Node)
			.chain((0..self.endpoints.len()).map(ElementId::Edge))
			.collect()
	}
}
