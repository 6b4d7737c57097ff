//! Label expressions and field paths
//!
//! A label expression is a JSON list of tokens. Quoted tokens are literals,
//! everything else is a dotted field path into the record:
//!
//! ```text
//! ["code", "' - '", "host.ip_address"]   =>   "web01 - 10.0.0.7"
//! ```

use crate::model::{Record, Value};

/// Resolve a dotted field path to text
///
/// An unresolvable path, or one that ends on a nested record, yields the
/// path itself so that misconfigured templates stay visible in the output.
pub fn field_text(record: &Record, path: &str) -> String {
    match record.lookup(path) {
        Some(Value::Map(_)) | None => path.to_string(),
        Some(value) => value.as_text().unwrap_or_default(),
    }
}

/// Evaluate a serialized label expression against a record
///
/// Malformed expression data yields an empty label.
pub fn render_label(expression: &str, record: &Record) -> String {
    if expression.trim().is_empty() {
        return String::new();
    }
    let tokens: Vec<String> = match serde_json::from_str(expression) {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::warn!(expression, error = %e, "malformed label expression");
            return String::new();
        }
    };

    tokens
        .iter()
        .map(|token| match literal(token) {
            Some(text) => text.to_string(),
            None if token.is_empty() => String::new(),
            None => field_text(record, token),
        })
        .collect()
}

/// Strip the quotes from a literal token, or `None` for a field path
fn literal(token: &str) -> Option<&str> {
    let quote = token.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = &token[1..];
    Some(inner.strip_suffix(quote).unwrap_or(inner))
}
