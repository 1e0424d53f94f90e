//! Runtime values bound in an evaluation context.
//!
//! `Value` is a closed set of variants. Structured data (the current user,
//! a target entity) is exposed through the [`ObjectValue`] capability so
//! callers can back it with their own types instead of a generic map.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Field lookup capability for object values.
///
/// # Example
/// ```
/// use actix_permission_core::http::security::expression::{ObjectValue, Value};
///
/// #[derive(Debug)]
/// struct Document {
///     owner_id: i64,
///     dept_id: i64,
/// }
///
/// impl ObjectValue for Document {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "ownerId" => Some(self.owner_id.into()),
///             "deptId" => Some(self.dept_id.into()),
///             _ => None,
///         }
///     }
/// }
///
/// let doc = Value::from_object(Document { owner_id: 1, dept_id: 5 });
/// assert_eq!(doc.field("deptId"), Some(Value::Number(5.0)));
/// ```
pub trait ObjectValue: Send + Sync + fmt::Debug {
    /// Returns the named field, or `None` if the object has no such field.
    fn field(&self, name: &str) -> Option<Value>;
}

/// A value an expression can read or compute.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Object(Arc<dyn ObjectValue>),
}

impl Value {
    /// Wraps any `ObjectValue` implementation.
    pub fn from_object<O: ObjectValue + 'static>(object: O) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Builds an object value from `(field, value)` pairs.
    pub fn object<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::from_object(MapObject::from_iter(fields))
    }

    /// Name of the variant, used in type mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Looks up a field on an object value. Non-objects have no fields.
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(object) => object.field(name),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Structural equality. Objects compare by identity since they only expose
/// field lookup.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::object(map),
        }
    }
}

/// Map-backed `ObjectValue`.
#[derive(Debug, Clone, Default)]
pub struct MapObject {
    fields: BTreeMap<String, Value>,
}

impl MapObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field (builder pattern).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        MapObject {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ObjectValue for MapObject {
    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }
}
