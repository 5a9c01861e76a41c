//! Data records bound to templates.

use std::collections::BTreeMap;

use fir_dom::Callback;

/// Named fields of a record value.
pub type Record = BTreeMap<String, Value>;

/// Dynamically shaped data bound to a template.
///
/// Records come from JSON documents plus view-supplied actions. There is no
/// schema; directive paths are resolved against whatever shape is present.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent or null value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Number.
    Number(f64),
    /// String.
    String(String),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Nested record.
    Record(Record),
    /// Zero-argument callback, bound by `data-fir-click`.
    Action(Callback),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Action(a), Self::Action(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Value {
    /// Build a record from key/value pairs.
    pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Wrap a closure as an action value.
    pub fn action(f: impl Fn() + 'static) -> Self {
        Self::Action(Callback::new(f))
    }

    /// Field of a record value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Record(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Insert a field, turning a non-record value into an empty record first.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        if !matches!(self, Self::Record(_)) {
            *self = Self::Record(Record::new());
        }
        if let Self::Record(fields) = self {
            fields.insert(key.into(), value.into());
        }
    }

    /// True for `Null` and for records without fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Record(fields) => fields.is_empty(),
            _ => false,
        }
    }

    /// Truthiness used by `data-fir-if` and `data-fir-if-not`.
    ///
    /// `Null`, `false`, `0`, `NaN` and the empty string are falsy. Lists,
    /// records and actions are truthy even when empty.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::List(_) | Self::Record(_) | Self::Action(_) => true,
        }
    }

    /// String shown for this value in text content and attributes.
    ///
    /// Returns `None` for records and actions, which have no display form.
    #[must_use]
    pub fn to_display(&self) -> Option<String> {
        Some(match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
            Self::List(items) => {
                let parts = items
                    .iter()
                    .map(Self::to_display)
                    .collect::<Option<Vec<_>>>()?;
                parts.join(",")
            }
            Self::Record(_) | Self::Action(_) => return None,
        })
    }

    /// Numeric value, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n.is_nan() {
        return "NaN".to_owned();
    }
    n.to_string()
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Record> for Value {
    fn from(fields: Record) -> Self {
        Self::Record(fields)
    }
}

impl From<Callback> for Value {
    fn from(callback: Callback) -> Self {
        Self::Action(callback)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(fields) => Self::from(fields),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Value {
    fn from(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k, Self::from(v)))
                .collect(),
        )
    }
}
