//! Declarative view templates
//!
//! A view is a tree of graph element templates. Each template says which
//! nested field of the current record holds its candidate records, how to
//! label them, and whether they become clusters, icons, nodes or edges.
//! Several fields hold small serialized documents (JSON lists or maps)
//! exactly as they are authored and stored; they are decoded lazily by the
//! resolvers so that a malformed entry only degrades its own element.

use std::fmt;

use serde::Deserialize;

/// The kind of graph element a template produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    Subgraph,
    Image,
    Node,
    Line,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Subgraph => write!(f, "subgraph"),
            GraphKind::Image => write!(f, "image"),
            GraphKind::Node => write!(f, "node"),
            GraphKind::Line => write!(f, "line"),
        }
    }
}

/// How the whole view is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Icons ranked into named rows
    Group,
    /// Nested clusters
    Subgraph,
    /// Sequence diagrams (not supported by the DOT renderer)
    Sequence,
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Group => write!(f, "group"),
            ViewKind::Subgraph => write!(f, "subgraph"),
            ViewKind::Sequence => write!(f, "sequence"),
        }
    }
}

/// Where an edge label is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePosition {
    Middle,
    Head,
    Tail,
}

/// One element of the template tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplateNode {
    pub kind: GraphKind,

    /// Field of the parent record holding this element's candidate records
    #[serde(default)]
    pub data_name: String,

    /// Serialized JSON list of label tokens
    #[serde(default)]
    pub display_expression: String,

    #[serde(default)]
    pub filter_field: String,
    /// Serialized JSON list of allowed values for `filter_field`
    #[serde(default)]
    pub filter_values: String,

    #[serde(default)]
    pub shape_field: String,
    /// Serialized JSON map from field value to shape, or a bare shape name
    #[serde(default)]
    pub shapes: String,

    #[serde(default)]
    pub style_field: String,
    /// Serialized JSON map from field value to style, or a bare style
    #[serde(default)]
    pub styles: String,
    /// Literal style used when a lookup table exists but is not selected
    #[serde(default)]
    pub fallback_style: String,

    /// Record field holding the edge head identifier(s)
    #[serde(default)]
    pub line_start_field: String,
    /// Record field holding the edge tail identifier(s)
    #[serde(default)]
    pub line_end_field: String,
    #[serde(default)]
    pub line_display_position: Option<LinePosition>,

    /// Row name used for rank alignment in group views
    #[serde(default)]
    pub node_group_name: String,

    /// CI type reference used to look up the icon image
    #[serde(default)]
    pub ci_type: String,

    #[serde(default)]
    pub children: Vec<TemplateNode>,
}

impl TemplateNode {
    /// Create an empty template of the given kind
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            data_name: String::new(),
            display_expression: String::new(),
            filter_field: String::new(),
            filter_values: String::new(),
            shape_field: String::new(),
            shapes: String::new(),
            style_field: String::new(),
            styles: String::new(),
            fallback_style: String::new(),
            line_start_field: String::new(),
            line_end_field: String::new(),
            line_display_position: None,
            node_group_name: String::new(),
            ci_type: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_data_name(mut self, field: impl Into<String>) -> Self {
        self.data_name = field.into();
        self
    }

    /// Set the label expression from its tokens
    pub fn with_label_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        self.display_expression = serde_json::to_string(&tokens).unwrap_or_default();
        self
    }

    pub fn with_filter<I, S>(mut self, field: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        self.filter_field = field.into();
        self.filter_values = serde_json::to_string(&allowed).unwrap_or_default();
        self
    }

    pub fn with_shapes(mut self, field: impl Into<String>, shapes: impl Into<String>) -> Self {
        self.shape_field = field.into();
        self.shapes = shapes.into();
        self
    }

    pub fn with_styles(mut self, field: impl Into<String>, styles: impl Into<String>) -> Self {
        self.style_field = field.into();
        self.styles = styles.into();
        self
    }

    pub fn with_fallback_style(mut self, style: impl Into<String>) -> Self {
        self.fallback_style = style.into();
        self
    }

    pub fn with_line_fields(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.line_start_field = start.into();
        self.line_end_field = end.into();
        self
    }

    pub fn with_line_position(mut self, position: LinePosition) -> Self {
        self.line_display_position = Some(position);
        self
    }

    pub fn with_node_group(mut self, name: impl Into<String>) -> Self {
        self.node_group_name = name.into();
        self
    }

    pub fn with_ci_type(mut self, ci_type: impl Into<String>) -> Self {
        self.ci_type = ci_type.into();
        self
    }

    pub fn with_child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }

    /// Whether this template names both edge endpoint fields
    pub fn declares_edge(&self) -> bool {
        !self.line_start_field.is_empty() && !self.line_end_field.is_empty()
    }

    /// Longest chain of descendants below this node (0 for a leaf)
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

fn default_direction() -> String {
    "TB".to_string()
}

/// A complete view: root template plus view-level layout settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewDefinition {
    #[serde(default)]
    pub name: String,
    pub view_kind: ViewKind,
    /// Layout direction (`rankdir`)
    #[serde(default = "default_direction")]
    pub direction: String,
    /// Plaintext rank-grouping preamble for group views
    #[serde(default)]
    pub node_groups: String,
    /// Root template; its own kind is ignored, the view kind decides the wrapper
    pub root: TemplateNode,
}

impl ViewDefinition {
    pub fn new(view_kind: ViewKind, root: TemplateNode) -> Self {
        Self {
            name: String::new(),
            view_kind,
            direction: default_direction(),
            node_groups: String::new(),
            root,
        }
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = direction.into();
        self
    }

    pub fn with_node_groups(mut self, groups: impl Into<String>) -> Self {
        self.node_groups = groups.into();
        self
    }

    /// Longest root-to-leaf chain of child templates, root excluded
    pub fn max_depth(&self) -> usize {
        self.root.depth()
    }
}
