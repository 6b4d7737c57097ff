//! Template traversal
//!
//! Rendering runs in two strictly sequential phases. The first walks every
//! root record through the template tree, declaring clusters and nodes and
//! queueing edge templates. The second flushes the queued edges (see
//! `edges.rs`) once every identifier that could be referenced is known.

use std::collections::VecDeque;

use crate::error::RenderError;
use crate::model::{GraphKind, Record, TemplateNode, Value, ViewDefinition, ViewKind};
use crate::resolve::{fit_label, render_label, resolve_shape, resolve_style, DEFAULT_STYLE};

use super::config::RenderOptions;
use super::context::RenderContext;
use super::dot::{dot_id, escape, quoted, DotBuilder};
use super::edges::DeferredEdge;
use super::grid::arrange_grid;

/// Border of image nodes outside version-support mode
const IMAGE_STYLE: &str = "color=\"transparent\";penwidth=1;";
/// Border of image nodes in version-support mode
const IMAGE_VERSION_STYLE: &str = "color=\"#dddddd\";penwidth=1;";

const IMAGE_SIZE: f64 = 1.1;
const NODE_WIDTH: f64 = 4.0;

/// Render a view over a list of root records
pub fn render(
    view: &ViewDefinition,
    records: &[Record],
    options: &RenderOptions,
) -> Result<String, RenderError> {
    if view.view_kind == ViewKind::Sequence {
        return Err(RenderError::UnsupportedViewKind {
            kind: view.view_kind,
        });
    }

    let mut renderer = Renderer::new(view, options);
    for record in records {
        renderer.render_root(record);
    }
    renderer.flush_edges();
    Ok(renderer.finish())
}

/// State of one render call
pub(super) struct Renderer<'a> {
    pub(super) view: &'a ViewDefinition,
    pub(super) options: &'a RenderOptions,
    max_depth: usize,
    pub(super) dot: DotBuilder,
    pub(super) pending: VecDeque<DeferredEdge<'a>>,
}

impl<'a> Renderer<'a> {
    fn new(view: &'a ViewDefinition, options: &'a RenderOptions) -> Self {
        Self {
            view,
            options,
            max_depth: view.max_depth(),
            dot: DotBuilder::new(&view.direction, view.view_kind, &view.node_groups),
            pending: VecDeque::new(),
        }
    }

    fn finish(self) -> String {
        self.dot.finish()
    }

    fn render_root(&mut self, record: &'a Record) {
        let view = self.view;
        let root = &view.root;
        let guid = record.guid();
        if !self.dot.mark_rendered(guid) {
            tracing::debug!(guid, "root record already rendered, skipping");
            return;
        }

        let ctx = RenderContext::new(
            view.view_kind,
            record.confirm_time(),
            self.options.version_support,
        );
        let label = render_label(&root.display_expression, record);
        let tooltip = tooltip_for(record, &label);

        let ctx = if view.view_kind == ViewKind::Group {
            let mut attrs = vec![
                quoted("id", guid),
                quoted("label", &label),
                format!("fontsize={}", ctx.font_label()),
                "penwidth=1".to_string(),
                "width=2".to_string(),
                quoted("image", &self.options.image_for(&root.ci_type)),
                "labelloc=\"b\"".to_string(),
                "shape=\"box\"".to_string(),
            ];
            if ctx.version_support {
                attrs.push("color=\"#dddddd\"".to_string());
            }
            self.dot.declare(&format!(
                "{{rank=same; \"{}\"; {}[{}]}}\n",
                escape(&root.node_group_name),
                dot_id(guid),
                attrs.join(";")
            ));
            ctx
        } else {
            let ctx = ctx.with_cluster_fonts(self.max_depth);
            let style = resolve_style(root, record, ctx.style_scope(), DEFAULT_STYLE);
            self.open_cluster(guid, &ctx, &label, &tooltip, &style);
            ctx
        };

        for child in &root.children {
            if !passes_filter(child, record) {
                tracing::debug!(guid, kind = %child.kind, "root record rejected by child filter");
                continue;
            }
            self.render_child(child, record, &ctx);
        }

        if view.view_kind == ViewKind::Subgraph {
            self.dot.declare("}\n");
        }
    }

    /// Render every child template of `template` against `record`
    pub(super) fn render_children(
        &mut self,
        template: &'a TemplateNode,
        record: &'a Record,
        ctx: &RenderContext,
    ) {
        for child in &template.children {
            self.render_child(child, record, ctx);
        }
    }

    /// Dispatch one child template over the records nested in `parent`
    pub(super) fn render_child(
        &mut self,
        child: &'a TemplateNode,
        parent: &'a Record,
        ctx: &RenderContext,
    ) {
        let ctx = ctx.descend();
        let candidates = parent.children(&child.data_name);

        match child.kind {
            GraphKind::Subgraph => self.emit_subgraphs(child, &candidates, &ctx),
            GraphKind::Image | GraphKind::Node => {
                let emitted = self.emit_leaves(child, parent, &candidates, &ctx);
                if ctx.view_kind == ViewKind::Subgraph {
                    self.dot.declare(&arrange_grid(&emitted));
                }
            }
            GraphKind::Line => self
                .pending
                .push_back(DeferredEdge::new(child, candidates, ctx)),
        }
    }

    /// Filter and deduplicate a candidate, registering it when accepted
    fn claim(&mut self, template: &TemplateNode, record: &Record) -> bool {
        if !passes_filter(template, record) {
            tracing::debug!(guid = record.guid(), "record rejected by filter");
            return false;
        }
        if !self.dot.mark_rendered(record.guid()) {
            tracing::debug!(guid = record.guid(), "record already rendered, skipping");
            return false;
        }
        true
    }

    fn open_cluster(
        &mut self,
        guid: &str,
        ctx: &RenderContext,
        label: &str,
        tooltip: &str,
        style: &str,
    ) {
        let id = dot_id(guid);
        let attrs = [
            format!("id={}", id),
            format!("fontsize={}", ctx.font_label()),
            quoted("label", label),
            quoted("tooltip", tooltip),
            style.to_string(),
        ];
        self.dot.declare(&format!(
            "subgraph {} {{\n{}\n{}[penwidth=0;width=0;height=0;label=\"\"];\n",
            dot_id(&format!("cluster_{}", guid)),
            attrs.join(";"),
            id
        ));
    }

    pub(super) fn emit_subgraphs(
        &mut self,
        template: &'a TemplateNode,
        candidates: &[&'a Record],
        ctx: &RenderContext,
    ) {
        for &record in candidates {
            if !self.claim(template, record) {
                continue;
            }
            let label = render_label(&template.display_expression, record);
            let tooltip = tooltip_for(record, &label);
            let style = resolve_style(template, record, ctx.style_scope(), DEFAULT_STYLE);

            self.open_cluster(record.guid(), ctx, &label, &tooltip, &style);
            self.render_children(template, record, ctx);
            self.dot.declare("}\n");
        }
    }

    /// Declare image or node leaves; returns the identifiers declared
    pub(super) fn emit_leaves(
        &mut self,
        template: &'a TemplateNode,
        parent: &'a Record,
        candidates: &[&'a Record],
        ctx: &RenderContext,
    ) -> Vec<String> {
        let mut emitted = Vec::new();
        for &record in candidates {
            if !self.claim(template, record) {
                continue;
            }
            let statement = match template.kind {
                GraphKind::Image => self.image_statement(template, parent, record, ctx),
                _ => self.node_statement(template, record, ctx),
            };
            self.dot.declare(&statement);

            self.render_children(template, record, ctx);

            if template.declares_edge() {
                self.pending
                    .push_back(DeferredEdge::for_leaf(template, record, ctx.clone()));
            }
            emitted.push(dot_id(record.guid()));
        }
        emitted
    }

    fn image_statement(
        &self,
        template: &TemplateNode,
        parent: &Record,
        record: &Record,
        ctx: &RenderContext,
    ) -> String {
        let guid = dot_id(record.guid());
        let label = render_label(&template.display_expression, record);
        let shape = resolve_shape(&template.shape_field, &template.shapes, record, "box");
        let default_style = if ctx.version_support {
            IMAGE_VERSION_STYLE
        } else {
            IMAGE_STYLE
        };
        let style = resolve_style(template, record, ctx.style_scope(), default_style);

        let attrs = [
            format!("id={}", guid),
            format!("fontsize={}", ctx.font_label()),
            format!("width={}", IMAGE_SIZE),
            format!("height={}", IMAGE_SIZE),
            quoted("tooltip", &label),
            "fixedsize=true".to_string(),
            quoted("shape", &shape),
            "labelloc=\"b\"".to_string(),
            quoted("label", &fit_label(&shape, IMAGE_SIZE, ctx.font_size, &label)),
            quoted("image", &self.options.image_for(&template.ci_type)),
            style,
        ];
        let statement = format!("{}[{}]", guid, attrs.join(";"));

        if ctx.view_kind != ViewKind::Group {
            return format!("{}\n", statement);
        }
        let mut out = format!(
            "{{rank=same;\"{}\"; {}}}\n",
            escape(&template.node_group_name),
            statement
        );
        if self.dot.is_rendered(parent.guid()) {
            out.push_str(&format!(
                "{} -> {} [arrowsize=0;style=invis];\n",
                dot_id(parent.guid()),
                guid
            ));
        }
        out
    }

    fn node_statement(&self, template: &TemplateNode, record: &Record, ctx: &RenderContext) -> String {
        let guid = dot_id(record.guid());
        let label = render_label(&template.display_expression, record);
        let shape = resolve_shape(&template.shape_field, &template.shapes, record, "ellipse");
        let style = resolve_style(template, record, ctx.style_scope(), DEFAULT_STYLE);

        let attrs = [
            format!("id={}", guid),
            format!("fontsize={}", ctx.font_label()),
            quoted("shape", &shape),
            format!("width={:.1}", NODE_WIDTH),
            quoted("label", &fit_label(&shape, NODE_WIDTH, ctx.font_size, &label)),
            quoted("tooltip", &label),
            style,
        ];
        let statement = format!("{}[{}];", guid, attrs.join(";"));

        if ctx.view_kind == ViewKind::Group {
            format!(
                "{{rank=same;\"{}\"; {}}}\n",
                escape(&template.node_group_name),
                statement
            )
        } else {
            format!("{}\n", statement)
        }
    }
}

/// Key name, or the label when the record has none
fn tooltip_for(record: &Record, label: &str) -> String {
    match record.key_name() {
        "" => label.to_string(),
        key_name => key_name.to_string(),
    }
}

/// Whether a record's filter field holds one of the template's allowed values
///
/// Templates without a filter, or with malformed filter values, accept
/// every record.
pub(super) fn passes_filter(template: &TemplateNode, record: &Record) -> bool {
    if template.filter_field.is_empty() || template.filter_values.trim().is_empty() {
        return true;
    }
    let allowed: Vec<String> = match serde_json::from_str(&template.filter_values) {
        Ok(allowed) => allowed,
        Err(e) => {
            tracing::warn!(values = %template.filter_values, error = %e, "malformed filter values");
            return true;
        }
    };
    let value = record
        .get(&template.filter_field)
        .and_then(Value::as_text)
        .unwrap_or_default();
    allowed.contains(&value)
}
