use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Key under which a configured template override is stored.
pub const TEMPLATE: &str = "template";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<String>),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

/// Options configured for one segment slot.
///
/// Read-only once handed to a segment. Lookups never fail: a missing key or a
/// value of the wrong type yields the default supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    values: HashMap<String, PropertyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(PropertyValue::String(value)) => value.clone(),
            Some(other) => mismatch(key, "string", other, default.to_string()),
            None => default.to_string(),
        }
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(PropertyValue::Int(value)) => *value,
            Some(PropertyValue::Float(value)) if value.fract() == 0.0 && value.is_finite() => {
                *value as i64
            }
            Some(other) => mismatch(key, "integer", other, default),
            None => default,
        }
    }

    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        match self.values.get(key) {
            Some(PropertyValue::Float(value)) => *value,
            Some(PropertyValue::Int(value)) => *value as f64,
            Some(other) => mismatch(key, "float", other, default),
            None => default,
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(PropertyValue::Bool(value)) => *value,
            Some(other) => mismatch(key, "boolean", other, default),
            None => default,
        }
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(PropertyValue::List(values)) => values.clone(),
            Some(PropertyValue::String(value)) => vec![value.clone()],
            Some(other) => mismatch(key, "list", other, Vec::new()),
            None => Vec::new(),
        }
    }
}

fn mismatch<T>(key: &str, expected: &str, found: &PropertyValue, default: T) -> T {
    debug!(property = key, expected, ?found, "property has unexpected type, using default");
    default
}
