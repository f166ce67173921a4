//! UI components.

pub mod structure_graph;
