//! Input data model: records and view templates

pub mod record;
pub mod template;

pub use record::{Record, Value};
pub use template::{GraphKind, LinePosition, TemplateNode, ViewDefinition, ViewKind};
