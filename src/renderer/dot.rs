//! DOT document assembly

use indexmap::IndexSet;

use crate::model::ViewKind;

/// Build a DOT document incrementally
///
/// Declarations (clusters, nodes, rank hints) and edges are kept in separate
/// buffers so that every edge lands after every declaration, whatever order
/// they were produced in. The builder also owns the registry of identifiers
/// declared so far; it is shared by the whole render call.
#[derive(Debug, Default)]
pub struct DotBuilder {
    header: String,
    declarations: String,
    edges: String,
    rendered: IndexSet<String>,
}

impl DotBuilder {
    /// Create a builder with the document header for a view
    pub fn new(direction: &str, view_kind: ViewKind, node_groups: &str) -> Self {
        let mut header = String::from("digraph G {\n");
        header.push_str(&format!(
            "rankdir={};edge[minlen=3];compound=true;\n",
            direction
        ));
        if view_kind == ViewKind::Group {
            header.push_str(
                "Node [color=\"transparent\";fixedsize=\"true\";width=\"1.1\";height=\"1.1\";shape=box];\n",
            );
            header.push_str(&format!("{{\nnode [shape=plaintext];\n{};\n}}\n", node_groups));
        }
        Self {
            header,
            ..Self::default()
        }
    }

    /// Whether an identifier has already been declared
    pub fn is_rendered(&self, guid: &str) -> bool {
        self.rendered.contains(guid)
    }

    /// Record an identifier as declared; false if it already was
    pub fn mark_rendered(&mut self, guid: &str) -> bool {
        self.rendered.insert(guid.to_string())
    }

    pub fn declare(&mut self, text: &str) {
        self.declarations.push_str(text);
    }

    pub fn edge(&mut self, text: &str) {
        self.edges.push_str(text);
    }

    /// Assemble the final document
    pub fn finish(self) -> String {
        let mut out = self.header;
        out.push_str(&self.declarations);
        out.push_str(&self.edges);
        out.push_str("}\n");
        out
    }
}

/// Escape text for a DOT double-quoted string
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// An identifier as a DOT ID, quoted unless it is a plain name or numeral
pub fn dot_id(id: &str) -> String {
    let mut chars = id.chars();
    let plain_name = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    let numeral = !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit());
    if plain_name || numeral {
        id.to_string()
    } else {
        format!("\"{}\"", escape(id))
    }
}

/// `name="value"` with the value escaped
pub fn quoted(name: &str, value: &str) -> String {
    format!("{}=\"{}\"", name, escape(value))
}
