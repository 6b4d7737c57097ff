//! Decoding views and records from JSON

use std::path::Path;

use crate::error::LoadError;
use crate::model::{Record, ViewDefinition};

/// Read a whole input file
pub fn read_source(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))
}

/// Decode a view definition
pub fn parse_view(source: &str) -> Result<ViewDefinition, LoadError> {
    Ok(serde_json::from_str(source)?)
}

/// Decode a JSON list of root records
pub fn parse_records(source: &str) -> Result<Vec<Record>, LoadError> {
    Ok(serde_json::from_str(source)?)
}
