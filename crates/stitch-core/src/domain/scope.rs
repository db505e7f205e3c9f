//! Per-render data visible to placeholder expressions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::domain::error::DomainError;

/// Read-only key/value data for one render call.
///
/// Keys become bare identifiers inside `#{...}`; nested objects and arrays
/// are reachable through member and index access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(Map<String, Json>);

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scope from a JSON value, which must be an object.
    pub fn from_json(value: Json) -> Result<Self, DomainError> {
        match value {
            Json::Object(map) => Ok(Self(map)),
            Json::Null => Err(DomainError::InvalidScope { found: "null" }),
            Json::Bool(_) => Err(DomainError::InvalidScope { found: "boolean" }),
            Json::Number(_) => Err(DomainError::InvalidScope { found: "number" }),
            Json::String(_) => Err(DomainError::InvalidScope { found: "string" }),
            Json::Array(_) => Err(DomainError::InvalidScope { found: "array" }),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Json>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Json>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Json> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Json)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Json>> for Scope {
    fn from(map: Map<String, Json>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_inserts_values() {
        let scope = Scope::new().with("title", "Home").with("count", 2);
        assert_eq!(scope.get("title"), Some(&json!("Home")));
        assert_eq!(scope.len(), 2);
    }

    #[test]
    fn from_json_requires_object() {
        assert!(Scope::from_json(json!({"a": 1})).is_ok());
        assert_eq!(
            Scope::from_json(json!([1, 2])),
            Err(DomainError::InvalidScope { found: "array" })
        );
    }

    #[test]
    fn deserializes_transparently() {
        let scope: Scope = serde_json::from_str(r#"{"user":{"name":"Ada"}}"#).unwrap();
        assert_eq!(scope.get("user"), Some(&json!({"name": "Ada"})));
    }
}
