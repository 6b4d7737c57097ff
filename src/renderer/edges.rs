//! Deferred edges
//!
//! Edge statements reference identifiers and cluster anchors that may be
//! declared anywhere in the traversal, including branches visited after the
//! edge template was reached. Edge templates are therefore queued during the
//! declaration pass and flushed once, in capture order, at the end. Edge
//! children are declared before any edge statement is written.

use crate::model::{GraphKind, LinePosition, Record, TemplateNode, Value};
use crate::resolve::{render_label, resolve_shape, resolve_style, DEFAULT_STYLE};

use super::context::RenderContext;
use super::dot::{dot_id, quoted};
use super::engine::{passes_filter, Renderer};

/// An edge template captured during the declaration pass
#[derive(Debug, Clone)]
pub struct DeferredEdge<'a> {
    pub template: &'a TemplateNode,
    pub records: Vec<&'a Record>,
    pub ctx: RenderContext,
    /// The template's child declarations were already emitted at capture
    pub children_emitted: bool,
}

impl<'a> DeferredEdge<'a> {
    /// Edge template reached through the child dispatcher
    pub fn new(template: &'a TemplateNode, records: Vec<&'a Record>, ctx: RenderContext) -> Self {
        Self {
            template,
            records,
            ctx,
            children_emitted: false,
        }
    }

    /// Decoration edge of a single image or node record
    pub fn for_leaf(template: &'a TemplateNode, record: &'a Record, ctx: RenderContext) -> Self {
        Self {
            template,
            records: vec![record],
            ctx,
            children_emitted: true,
        }
    }
}

impl<'a> Renderer<'a> {
    /// Flush every queued edge in FIFO order
    ///
    /// The flush runs in two phases. The first drains the queue and declares
    /// each edge's child templates; edge templates queued meanwhile (nested
    /// lines) are drained in the same loop. The second writes the edge
    /// statements in capture order, gated against the final registry.
    pub(super) fn flush_edges(&mut self) {
        let mut flushed = Vec::new();
        while let Some(mut edge) = self.pending.pop_front() {
            self.declare_edge_children(&mut edge);
            flushed.push(edge);
        }
        for edge in &flushed {
            let ctx = edge.ctx.descend();
            for &record in &edge.records {
                self.emit_edges(edge.template, record, &ctx);
            }
        }
    }

    /// Drop filtered records and declare the children of the rest
    fn declare_edge_children(&mut self, edge: &mut DeferredEdge<'a>) {
        let template = edge.template;
        edge.records.retain(|record| {
            let accepted = passes_filter(template, record);
            if !accepted {
                tracing::debug!(guid = record.guid(), "edge record rejected by filter");
            }
            accepted
        });
        if edge.children_emitted {
            return;
        }
        for &record in &edge.records {
            self.render_children(template, record, &edge.ctx);
        }
        edge.children_emitted = true;
    }

    /// Emit one edge statement per (head, tail) pair of a record
    fn emit_edges(&mut self, template: &TemplateNode, record: &Record, ctx: &RenderContext) {
        let heads = endpoints(record.get(&template.line_start_field));
        let tails = endpoints(record.get(&template.line_end_field));

        for head in &heads {
            for tail in &tails {
                if self.options.gate_edges
                    && !(self.dot.is_rendered(head) && self.dot.is_rendered(tail))
                {
                    tracing::debug!(%head, %tail, "edge endpoint never declared, dropping");
                    continue;
                }
                let attrs = self.edge_attributes(template, record, ctx, head, tail);
                self.dot.edge(&format!(
                    "{} -> {}[{}];\n",
                    dot_id(head),
                    dot_id(tail),
                    attrs.join(";")
                ));
            }
        }
    }

    fn edge_attributes(
        &self,
        template: &TemplateNode,
        record: &Record,
        ctx: &RenderContext,
        head: &str,
        tail: &str,
    ) -> Vec<String> {
        let is_line = template.kind == GraphKind::Line;
        let mut attrs = vec![
            quoted("id", record.guid()),
            format!("fontsize={:.2}", ctx.font_size * 0.6),
        ];

        if is_line {
            let label = render_label(&template.display_expression, record);
            match template.line_display_position {
                Some(LinePosition::Middle) => attrs.push(quoted("label", &label)),
                Some(LinePosition::Head) => attrs.push(quoted("headlabel", &label)),
                Some(LinePosition::Tail) => attrs.push(quoted("taillabel", &label)),
                None => {}
            }
            attrs.push(quoted("tooltip", record.key_name()));
        }

        attrs.push(format!("lhead={}", dot_id(&format!("cluster_{}", tail))));
        attrs.push(format!("ltail={}", dot_id(&format!("cluster_{}", head))));

        if is_line {
            let arrowhead = resolve_shape(&template.shape_field, &template.shapes, record, "normal");
            attrs.push(format!("arrowhead={}", arrowhead));
            attrs.push(resolve_style(template, record, ctx.style_scope(), DEFAULT_STYLE));
        } else {
            attrs.push("arrowhead=icurve".to_string());
        }
        attrs
    }
}

/// Identifiers named by an edge endpoint field
///
/// Accepts a guid string, nested records carrying a guid, or a list of
/// either. Empty identifiers are dropped.
pub fn endpoints(value: Option<&Value>) -> Vec<String> {
    fn collect(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.push(s.clone()),
            Value::Map(r) => out.push(r.guid().to_string()),
            Value::List(items) => items.iter().for_each(|item| collect(item, out)),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }

    let mut out = Vec::new();
    if let Some(value) = value {
        collect(value, &mut out);
    }
    out.retain(|id| !id.is_empty());
    out
}
