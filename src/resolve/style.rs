//! Style selection with version highlighting

use std::collections::HashMap;

use crate::model::{Record, TemplateNode};

use super::expression::field_text;

/// Style used when a template configures nothing usable
pub const DEFAULT_STYLE: &str = "penwidth=1;color=black;";

/// Freshness inputs for style selection
#[derive(Debug, Clone, Copy)]
pub struct StyleScope<'a> {
    pub version_support: bool,
    /// Confirmation time of the root record being drawn
    pub baseline: &'a str,
}

/// Whether a record is unconfirmed or unchanged since the baseline confirmation
pub fn is_fresh(record: &Record, baseline: &str) -> bool {
    let confirmed = record.confirm_time();
    confirmed.is_empty() || (confirmed == baseline && confirmed == record.update_time())
}

/// Pick the style for a record
///
/// Precedence:
/// 1. version support on, record fresh, lookup table hit: the mapped style
/// 2. lookup table configured: the template's fallback style, else `default`
/// 3. bare style configured: that style
/// 4. `default`
pub fn resolve_style(
    template: &TemplateNode,
    record: &Record,
    scope: StyleScope<'_>,
    default: &str,
) -> String {
    let styles = template.styles.trim();
    let fallback = || {
        if template.fallback_style.is_empty() {
            default.to_string()
        } else {
            template.fallback_style.clone()
        }
    };

    if !template.style_field.is_empty() || styles.starts_with('{') {
        let table: HashMap<String, String> = match serde_json::from_str(styles) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(styles, error = %e, "malformed style table");
                return fallback();
            }
        };
        if scope.version_support && is_fresh(record, scope.baseline) && !template.style_field.is_empty() {
            let key = field_text(record, &template.style_field);
            if let Some(style) = table.get(&key).filter(|s| !s.is_empty()) {
                return style.clone();
            }
        }
        return fallback();
    }

    if styles.is_empty() {
        default.to_string()
    } else {
        styles.to_string()
    }
}
