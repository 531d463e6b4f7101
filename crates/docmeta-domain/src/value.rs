//! Field values produced by metadata extraction

use std::collections::BTreeMap;
use std::fmt;

/// One chunk's extracted field-value mapping
///
/// A field may be absent from a record, which is different from being present
/// with [`Value::Null`].
pub type PartialMetadata = BTreeMap<String, Value>;

/// The reconciled field-value mapping for a whole document
pub type MergedMetadata = BTreeMap<String, Value>;

/// A single metadata field value
///
/// The four core shapes are `String`, `Number`, `List` and `Null`. `Bool` and
/// `Object` widen the union so that any JSON a model emits is representable;
/// they have no merge rule of their own and always take the fallback path.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit "no answer" marker
    Null,
    /// Free text
    String(String),
    /// Any numeric magnitude (counts, scores, pages)
    Number(f64),
    /// Ordered collection; elements may themselves be lists
    List(Vec<Value>),
    /// Boolean flag
    Bool(bool),
    /// Nested mapping
    Object(BTreeMap<String, Value>),
}

/// Shape of a [`Value`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Null`]
    Null,
    /// [`Value::String`]
    String,
    /// [`Value::Number`]
    Number,
    /// [`Value::List`]
    List,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Object`]
    Object,
}

impl Value {
    /// Get the shape of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::List(_) => ValueKind::List,
            Value::Bool(_) => ValueKind::Bool,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Check whether this is the explicit null marker
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text of a `String` value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the number of a `Number` value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the elements of a `List` value
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::List => "list",
            ValueKind::Bool => "bool",
            ValueKind::Object => "object",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{}", s),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
