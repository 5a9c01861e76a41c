//! Documents stored in a collection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document in a collection: an id plus schemaless fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document id, unique within its collection.
    pub id: String,
    /// Document fields.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Create a document without fields.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Set a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Numeric field value.
    #[must_use]
    pub fn f64_field(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(Value::as_f64)
    }
}
