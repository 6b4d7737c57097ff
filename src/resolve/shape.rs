//! Shape selection and label fitting

use std::collections::HashMap;

use crate::model::Record;

use super::expression::field_text;

/// Empirical glyph-width scale factors per shape
const SHAPE_FACTORS: &[(&str, f64)] = &[
    ("ellipse", 0.00887311),
    ("box", 0.0066548),
    ("diamond", 0.01611),
    ("hexagon", 0.01224489),
    ("circle", 0.007653061),
];

const ELLIPSIS: &str = "...";

/// Pick the shape for a record
///
/// `shapes` is either a JSON map from field value to shape or a bare shape
/// name. A lookup hit wins; otherwise a bare name is used; otherwise
/// `default`.
pub fn resolve_shape(shape_field: &str, shapes: &str, record: &Record, default: &str) -> String {
    let trimmed = shapes.trim();
    if trimmed.starts_with('{') {
        match serde_json::from_str::<HashMap<String, String>>(trimmed) {
            Ok(table) if !shape_field.is_empty() => {
                let key = field_text(record, shape_field);
                if let Some(shape) = table.get(&key) {
                    return strip_separator(shape).to_string();
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(shapes, error = %e, "malformed shape table"),
        }
        return default.to_string();
    }

    if trimmed.is_empty() {
        default.to_string()
    } else {
        strip_separator(trimmed).to_string()
    }
}

fn strip_separator(shape: &str) -> &str {
    shape.strip_suffix(';').unwrap_or(shape)
}

fn shape_factor(shape: &str) -> f64 {
    SHAPE_FACTORS
        .iter()
        .find(|(name, _)| *name == shape)
        .or_else(|| SHAPE_FACTORS.first())
        .map(|(_, factor)| *factor)
        .unwrap_or(0.00887311)
}

/// Number of characters that fit in a shape of `width` inches at `font_size`
pub fn label_capacity(shape: &str, width: f64, font_size: f64) -> usize {
    let cap = (width / (shape_factor(shape) * font_size)).floor();
    if cap.is_finite() && cap >= 1.0 {
        cap as usize
    } else {
        1
    }
}

/// Truncate a label to the shape's glyph capacity, ending it with "..."
pub fn fit_label(shape: &str, width: f64, font_size: f64, label: &str) -> String {
    let cap = label_capacity(shape, width, font_size);
    if label.chars().count() <= cap {
        return label.to_string();
    }
    let mut fitted: String = label.chars().take(cap.saturating_sub(ELLIPSIS.len())).collect();
    fitted.push_str(ELLIPSIS);
    fitted
}
