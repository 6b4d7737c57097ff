//! DOT renderer for view templates
//!
//! This module walks a view's template tree over a list of root records and
//! produces a Graphviz document of clusters, nodes, layout hints and edges.

pub mod config;
pub mod context;
pub mod dot;
mod edges;
mod engine;
pub mod grid;

pub use config::RenderOptions;
pub use context::RenderContext;
pub use dot::DotBuilder;
pub use edges::{endpoints, DeferredEdge};
pub use engine::render;
pub use grid::arrange_grid;
