//! Host-side values
//!
//! Values are what a host slot holds: numbers, text, booleans, quantities,
//! points, domain objects, lists, or null. A list of lists is how nested
//! (tree) data travels.

use std::fmt;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use xsec_units::Quantity;
use crate::XsecError;

/// A point in model space; geometry is only ever a coordinate container here
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}, {}}}", self.x, self.y, self.z)
    }
}

/// An opaque domain object (section, load, ...) tagged with its type name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainObject {
    pub type_name: String,
    pub data: serde_json::Value,
}

impl DomainObject {
    /// Wrap a serializable domain value
    pub fn wrap<T: Serialize>(type_name: &str, value: &T) -> Result<Self, XsecError> {
        let data = serde_json::to_value(value)
            .map_err(|e| XsecError::internal(format!("cannot serialize {}: {}", type_name, e)))?;
        Ok(Self { type_name: type_name.to_string(), data })
    }

    /// Unwrap into a domain value, checking the type tag
    pub fn unwrap_as<T: DeserializeOwned>(&self, type_name: &str) -> Result<T, XsecError> {
        if self.type_name != type_name {
            return Err(XsecError::type_error(type_name, &self.type_name));
        }
        serde_json::from_value(self.data.clone())
            .map_err(|e| XsecError::type_error(type_name, &format!("malformed {} ({})", self.type_name, e)))
    }
}

/// Runtime value in a host slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Integer(i64),
    Text(String),
    Bool(bool),
    Quantity(Quantity),
    Point(Point),
    Object(DomainObject),
    List(Vec<Value>),
    Null,
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    /// Numeric value; integers widen to f64
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound
            Value::Number(n) if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n < i64::MAX as f64 => {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Value::Quantity(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Value::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&DomainObject> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Type name for error messages
    pub fn type_name(&self) -> String {
        match self {
            Value::Number(_) => "Number".to_string(),
            Value::Integer(_) => "Integer".to_string(),
            Value::Text(_) => "Text".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::Quantity(q) => format!("Quantity ({})", q.kind()),
            Value::Point(_) => "Point".to_string(),
            Value::Object(o) => o.type_name.clone(),
            Value::List(_) => "List".to_string(),
            Value::Null => "Null".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Quantity(q) => write!(f, "{}", q),
            Value::Point(p) => write!(f, "{}", p),
            Value::Object(o) => write!(f, "[{}]", o.type_name),
            Value::List(items) => {
                // Smart list display: show values for small lists, count for large
                if items.len() <= 5 {
                    let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                    write!(f, "[{}]", contents.join(", "))
                } else {
                    write!(f, "[{}]", items.len())
                }
            }
            Value::Null => write!(f, "null"),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

// From implementations for convenience
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Quantity> for Value {
    fn from(q: Quantity) -> Self {
        Value::Quantity(q)
    }
}

impl From<Point> for Value {
    fn from(p: Point) -> Self {
        Value::Point(p)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}
