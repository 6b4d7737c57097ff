//! Label, shape and style resolution
//!
//! These resolvers never fail. Malformed template data degrades to an empty
//! label, the kind's default shape or the default style.

pub mod expression;
pub mod shape;
pub mod style;

pub use expression::{field_text, render_label};
pub use shape::{fit_label, label_capacity, resolve_shape};
pub use style::{is_fresh, resolve_style, StyleScope, DEFAULT_STYLE};
