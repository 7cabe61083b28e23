use crate::value::Value;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Capability contract for any value usable as a cursor position.
///
/// The `Default` value of an implementation is its zero, the "no bound"
/// marker a first/last page cursor carries.
pub trait Pointer: Clone + Default + PartialEq + Serialize + DeserializeOwned {
    /// Returns true if the value represents "no bound".
    fn is_zero(&self) -> bool;

    /// Returns the ordered bind arguments for the seek predicate,
    /// or an empty list when the pointer is zero.
    fn args(&self) -> Vec<Value>;
}

impl Pointer for i64 {
    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn args(&self) -> Vec<Value> {
        if self.is_zero() {
            return Vec::new();
        }
        vec![Value::Int(*self)]
    }
}

impl Pointer for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn args(&self) -> Vec<Value> {
        if self.is_zero() {
            return Vec::new();
        }
        vec![Value::Text(self.clone())]
    }
}

/// Scalar cursor position over either column type. Serializes as a bare
/// JSON number or string, so a `Key` cursor stays wire-compatible with the
/// matching scalar cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    Text(String),
}

impl Default for Key {
    fn default() -> Self {
        Key::Int(0)
    }
}

impl Pointer for Key {
    fn is_zero(&self) -> bool {
        match self {
            Key::Int(n) => n.is_zero(),
            Key::Text(s) => s.is_zero(),
        }
    }

    fn args(&self) -> Vec<Value> {
        match self {
            Key::Int(n) => n.args(),
            Key::Text(s) => s.args(),
        }
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Key::Int(v)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::Text(v.to_string())
    }
}

/// Ordered tuple of positions for multi-column cursors.
///
/// Zero iff every element is zero; one bind argument per element, with
/// `Value::Null` standing in for zero elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct List(pub Vec<Key>);

impl Pointer for List {
    fn is_zero(&self) -> bool {
        self.0.iter().all(Pointer::is_zero)
    }

    fn args(&self) -> Vec<Value> {
        if self.0.is_empty() {
            return Vec::new();
        }
        self.0
            .iter()
            .map(|k| match k.args().as_slice() {
                [v] => v.clone(),
                _ => Value::Null,
            })
            .collect()
    }
}
