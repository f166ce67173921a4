//! Interactive code-structure graph component.
//!
//! Renders a document of namespaces, classes, members and their relations on
//! an HTML canvas with:
//! - A force-directed layout settled once before the first frame
//! - Category-driven styling (colors, shapes, arrowheads, dashed edges)
//! - Tap to select and fade everything outside the selection's neighborhood
//! - Hover tooltips, pan and zoom
//!
//! # Example
//!
//! ```ignore
//! use structure_graph::{GraphDocument, StructureGraphCanvas};
//!
//! let doc: GraphDocument = serde_json::from_str(json)?;
//! view! { <StructureGraphCanvas data=doc.into() base_dir="docs/" fullscreen=true /> }
//! ```

mod component;
mod elements;
mod graph;
mod layout;
mod navigation;
mod render;
mod selection;
mod state;
mod theme;
mod tooltip;
mod types;
mod viewport;

pub use component::StructureGraphCanvas;
pub use theme::Theme;
pub use types::{GraphDocument, GraphEdge, GraphNode};
