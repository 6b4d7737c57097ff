//! Dynamically typed attribute bags
//!
//! Records arrive already materialized from the configuration store. The
//! renderer never mutates them; every accessor here is lossy and returns an
//! empty value instead of failing.

use indexmap::IndexMap;
use serde::Deserialize;

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(Record),
}

impl Value {
    /// Render a scalar value as text
    ///
    /// Integral numbers are printed without a fractional part. Lists, maps
    /// and null have no textual form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Null | Value::List(_) | Value::Map(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Map(r) => Some(r),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Map(r)
    }
}

impl From<Vec<Record>> for Value {
    fn from(list: Vec<Record>) -> Self {
        Value::List(list.into_iter().map(Value::Map).collect())
    }
}

/// An open, string-keyed attribute bag
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String attribute, or "" when absent or not a string
    pub fn get_str(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn guid(&self) -> &str {
        self.get_str("guid")
    }

    pub fn key_name(&self) -> &str {
        self.get_str("key_name")
    }

    pub fn confirm_time(&self) -> &str {
        self.get_str("confirm_time")
    }

    pub fn update_time(&self) -> &str {
        self.get_str("update_time")
    }

    /// Descend a dotted field path through nested records
    ///
    /// Returns `None` as soon as a segment is missing or an intermediate
    /// value is not a record.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.fields.get(first)?;
        for segment in segments {
            current = current.as_record()?.fields.get(segment)?;
        }
        Some(current)
    }

    /// Coerce the attribute under `field` into a list of child records
    ///
    /// Only a list made entirely of records qualifies. Anything else, an
    /// absent field included, yields an empty list.
    pub fn children(&self, field: &str) -> Vec<&Record> {
        let Some(value) = self.fields.get(field) else {
            return Vec::new();
        };
        match value {
            Value::List(items) => {
                let records: Option<Vec<&Record>> = items.iter().map(Value::as_record).collect();
                records.unwrap_or_else(|| {
                    tracing::debug!(field, "child list contains non-record items, ignoring");
                    Vec::new()
                })
            }
            Value::Null => Vec::new(),
            _ => {
                tracing::debug!(field, "child field is not a list, ignoring");
                Vec::new()
            }
        }
    }
}
