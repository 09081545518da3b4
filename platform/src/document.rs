//! Schema-less document model shared by every [`crate::DocumentStore`].
//!
//! DESIGN
//! ======
//! Documents are flat maps of scalar fields. `BTreeMap` keeps field order
//! deterministic so update masks and test assertions are stable.

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

use std::collections::BTreeMap;

use time::OffsetDateTime;

/// A stored document: field name to scalar value.
pub type Document = BTreeMap<String, Value>;

/// Scalar field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(OffsetDateTime),
}

impl Value {
    /// String content, if this is a string field.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(value: OffsetDateTime) -> Self {
        Self::Timestamp(value)
    }
}

/// Read a string field, treating missing and non-string values alike.
#[must_use]
pub fn string_field(doc: &Document, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Merge `partial` into `target`: present fields overwrite, absent ones stay.
pub fn merge(target: &mut Document, partial: &Document) {
    for (key, value) in partial {
        target.insert(key.clone(), value.clone());
    }
}
