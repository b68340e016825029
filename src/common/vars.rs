//! Variable bag backed by a JSON object.
//!
//! `Vars` carries the accumulated per-record context (extraction results,
//! webhook responses, AI outputs) and node outputs as string-keyed JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed JSON value map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vars(Map<String, Value>);

#[allow(unused)]
impl Vars {
    /// create an empty variable bag
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// set a value, converting it to JSON
    pub fn set<T: Into<Value>>(
        &mut self,
        key: &str,
        value: T,
    ) {
        self.0.insert(key.to_string(), value.into());
    }

    /// builder-style set
    pub fn with<T: Into<Value>>(
        mut self,
        key: &str,
        value: T,
    ) -> Self {
        self.set(key, value);
        self
    }

    /// get a value deserialized as `T`
    pub fn get<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<T> {
        self.0.get(key).and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// get the raw JSON value
    pub fn get_value(
        &self,
        key: &str,
    ) -> Option<&Value> {
        self.0.get(key)
    }

    /// check whether a key is present
    pub fn contains(
        &self,
        key: &str,
    ) -> bool {
        self.0.contains_key(key)
    }

    /// remove a key
    pub fn remove(
        &mut self,
        key: &str,
    ) -> Option<Value> {
        self.0.remove(key)
    }

    /// number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// whether the bag is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Value> for Vars {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }
}

impl From<Vars> for Value {
    fn from(vars: Vars) -> Self {
        Value::Object(vars.0)
    }
}

impl fmt::Display for Vars {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut vars = Vars::new();
        vars.set("name", "Alice");
        vars.set("age", 30);

        assert_eq!(vars.get::<String>("name"), Some("Alice".to_string()));
        assert_eq!(vars.get::<i64>("age"), Some(30));
        assert_eq!(vars.get::<String>("missing"), None);
    }

    #[test]
    fn test_with_builder() {
        let vars = Vars::new().with("a", 1).with("b", "two");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get::<i64>("a"), Some(1));
    }

    #[test]
    fn test_from_value_roundtrip() {
        let vars = Vars::from(json!({"k": "v", "n": 7}));
        let value: Value = vars.clone().into();
        assert_eq!(value, json!({"k": "v", "n": 7}));
        assert!(vars.contains("k"));
    }

    #[test]
    fn test_from_non_object_is_empty() {
        let vars = Vars::from(json!([1, 2, 3]));
        assert!(vars.is_empty());
    }
}
