use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single custom property value as authored in the map editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
}

impl PropertyValue {
    /// Booleans, non-zero numbers and the strings "true"/"1" are truthy.
    pub fn as_bool(&self) -> bool {
        match self {
            PropertyValue::Bool(b) => *b,
            PropertyValue::Int(i) => *i != 0,
            PropertyValue::Float(f) => *f != 0.0,
            PropertyValue::String(s) => {
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || s == "1"
            }
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PropertyValue::Bool(_) => None,
            PropertyValue::Int(i) => Some(*i as f32),
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::String(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            PropertyValue::Bool(_) => None,
            PropertyValue::Int(i) => Some(*i),
            PropertyValue::Float(f) => Some(*f as i32),
            PropertyValue::String(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Int(i)
    }
}

impl From<f32> for PropertyValue {
    fn from(f: f32) -> Self {
        PropertyValue::Float(f)
    }
}

/// Key/value properties attached to a map, layer, tileset, tile or object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyCollection {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// Presence check. Flags like `Collision` and `Shadows` only need to exist.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// True when any key starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.values.keys().any(|k| k.starts_with(prefix))
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).is_some_and(PropertyValue::as_bool)
    }

    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(PropertyValue::as_f32)
    }

    pub fn get_i32(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(PropertyValue::as_i32)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
