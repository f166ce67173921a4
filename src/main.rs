//! Client entrypoint for the CSR build.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use structure_graph::{init_logging, load_page_input, render};

fn main() {
	init_logging();

	let (document, base_dir) = load_page_input();
	render(document, base_dir);
}
