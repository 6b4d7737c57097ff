//! Per-branch render context

use crate::model::ViewKind;
use crate::resolve::StyleScope;

/// Base font size for every root record
pub const BASE_FONT_SIZE: f64 = 14.0;

/// Font size of the outermost cluster in subgraph views
pub const CLUSTER_FONT_SIZE: f64 = 20.0;

/// Configuration threaded through the recursion
///
/// Passed by value: a child's font shrink never leaks back to its siblings.
/// The identifier registry lives in the shared builder instead.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub view_kind: ViewKind,
    /// Confirmation time of the root record, the freshness baseline
    pub baseline: String,
    pub version_support: bool,
    pub font_size: f64,
    /// Font decrement applied per template level
    pub font_step: f64,
}

impl RenderContext {
    pub fn new(view_kind: ViewKind, baseline: impl Into<String>, version_support: bool) -> Self {
        Self {
            view_kind,
            baseline: baseline.into(),
            version_support,
            font_size: BASE_FONT_SIZE,
            font_step: 0.0,
        }
    }

    /// Switch to cluster sizing for a template tree of `max_depth` levels
    ///
    /// The font starts at 20 on the root cluster and reaches 14 one level
    /// above the deepest. A tree of depth one or less keeps a constant font.
    pub fn with_cluster_fonts(mut self, max_depth: usize) -> Self {
        self.font_size = CLUSTER_FONT_SIZE;
        self.font_step = if max_depth <= 1 {
            0.0
        } else {
            (CLUSTER_FONT_SIZE - BASE_FONT_SIZE) / (max_depth - 1) as f64
        };
        self
    }

    /// Context for the next template level
    pub fn descend(&self) -> Self {
        let mut next = self.clone();
        if self.view_kind == ViewKind::Subgraph {
            next.font_size = ((self.font_size - self.font_step) * 100.0).round() / 100.0;
        }
        next
    }

    pub fn style_scope(&self) -> StyleScope<'_> {
        StyleScope {
            version_support: self.version_support,
            baseline: &self.baseline,
        }
    }

    /// Font size formatted for DOT attributes
    pub fn font_label(&self) -> String {
        format_number(self.font_size)
    }
}

/// Shortest decimal form of a number: 20.0 -> "20", 17.33 -> "17.33"
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}
