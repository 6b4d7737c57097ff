//! CI Graph - template-driven rendering of configuration views to Graphviz DOT
//!
//! A view is a declarative tree of graph element templates. Rendering walks
//! it over already-queried configuration records and emits a DOT document of
//! clusters, nodes, layout hints and edges for a layout engine to draw.
//!
//! # Example
//!
//! ```rust
//! use ci_graph::{render, GraphKind, Record, TemplateNode, ViewDefinition, ViewKind};
//!
//! let view = ViewDefinition::new(
//!     ViewKind::Subgraph,
//!     TemplateNode::new(GraphKind::Subgraph)
//!         .with_label_tokens(["key_name"])
//!         .with_child(
//!             TemplateNode::new(GraphKind::Node)
//!                 .with_data_name("hosts")
//!                 .with_label_tokens(["key_name"]),
//!         ),
//! );
//! let system = Record::new()
//!     .with("guid", "sys1")
//!     .with("key_name", "billing")
//!     .with("hosts", vec![Record::new().with("guid", "h1").with("key_name", "web01")]);
//!
//! let dot = render(&view, &[system]).unwrap();
//! assert!(dot.starts_with("digraph G {"));
//! assert!(dot.contains("subgraph cluster_sys1"));
//! assert!(dot.contains("h1[id=h1;"));
//! ```

pub mod error;
pub mod input;
pub mod model;
pub mod renderer;
pub mod resolve;

pub use error::{LoadError, RenderError};
pub use model::{GraphKind, LinePosition, Record, TemplateNode, Value, ViewDefinition, ViewKind};
pub use renderer::RenderOptions;

/// Render a view with default options
pub fn render(view: &ViewDefinition, records: &[Record]) -> Result<String, RenderError> {
    render_with_options(view, records, &RenderOptions::default())
}

/// Render a view with custom options
///
/// # Example
///
/// ```rust
/// use ci_graph::{render_with_options, GraphKind, Record, RenderOptions, TemplateNode, ViewDefinition, ViewKind};
///
/// let view = ViewDefinition::new(
///     ViewKind::Group,
///     TemplateNode::new(GraphKind::Image).with_ci_type("app_system").with_node_group("apps"),
/// );
/// let options = RenderOptions::new()
///     .with_version_support(true)
///     .with_image("app_system", "app.png");
///
/// let dot = render_with_options(&view, &[Record::new().with("guid", "a1")], &options).unwrap();
/// assert!(dot.contains("image=\"app.png\""));
/// ```
pub fn render_with_options(
    view: &ViewDefinition,
    records: &[Record],
    options: &RenderOptions,
) -> Result<String, RenderError> {
    tracing::debug!(
        view = %view.name,
        kind = %view.view_kind,
        records = records.len(),
        "rendering view"
    );
    renderer::render(view, records, options)
}
