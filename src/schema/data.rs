//! Per-instance resource state
//!
//! [`ResourceData`] is what a resource operation reads its input from and
//! writes its result to: the ID, the attribute map, and (for updates) the
//! prior attribute map so that changed attributes can be detected.
//!
//! Resources do not poke at the untyped map directly. They [`decode`] it
//! into their typed model once, at the boundary, and [`apply`] a typed model
//! back after flattening the API response.
//!
//! [`decode`]: ResourceData::decode
//! [`apply`]: ResourceData::apply

use super::attribute::is_unset;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct ResourceData {
    resource_type: String,
    id: Option<String>,
    attributes: Map<String, Value>,
    prior: Option<Map<String, Value>>,
}

impl ResourceData {
    /// Fresh instance for a create or a data source read.
    pub fn new(resource_type: &str, config: Map<String, Value>) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            id: None,
            attributes: config,
            prior: None,
        }
    }

    /// Existing instance, for read and delete.
    pub fn existing(resource_type: &str, id: &str, state: Map<String, Value>) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            id: Some(id.to_string()),
            attributes: state,
            prior: None,
        }
    }

    /// Existing instance moving from `prior` to `planned`, for update.
    pub fn for_update(
        resource_type: &str,
        id: &str,
        prior: Map<String, Value>,
        planned: Map<String, Value>,
    ) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            id: Some(id.to_string()),
            attributes: planned,
            prior: Some(prior),
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The ID, or [`Error::MissingId`].
    pub fn require_id(&self) -> Result<&str> {
        self.id.as_deref().ok_or_else(|| Error::MissingId {
            resource_type: self.resource_type.clone(),
        })
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the instance as gone; the engine drops it from state.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Whether `key` differs between the prior and the planned state.
    ///
    /// Without a prior state (create, read) every attribute counts as changed.
    pub fn has_change(&self, key: &str) -> bool {
        match &self.prior {
            None => true,
            Some(prior) => {
                let before = prior.get(key).filter(|v| !is_unset(v));
                let after = self.attributes.get(key).filter(|v| !is_unset(v));
                before != after
            },
        }
    }

    /// Whether any of `keys` changed.
    pub fn has_changes(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.has_change(k))
    }

    /// Decode the attribute map into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.attributes.clone())).map_err(|source| {
            Error::Decode {
                target: self.resource_type.clone(),
                source,
            }
        })
    }

    /// Write every field of a typed model into the attribute map.
    pub fn apply<T: Serialize>(&mut self, model: &T) -> Result<()> {
        let value = serde_json::to_value(model).map_err(|source| Error::Decode {
            target: self.resource_type.clone(),
            source,
        })?;
        if let Value::Object(map) = value {
            self.attributes.extend(map);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct Model {
        name: String,
        size: i64,
        password: Option<String>,
        hosts: Vec<String>,
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_decode_tolerates_missing_fields() {
        let data = ResourceData::new("test", object(json!({"name": "a", "timeouts": {}})));
        let model: Model = data.decode().unwrap();
        assert_eq!(model.name, "a");
        assert_eq!(model.size, 0);
        assert!(model.hosts.is_empty());
    }

    #[test]
    fn test_decode_reports_type_mismatch() {
        let data = ResourceData::new("test", object(json!({"size": "big"})));
        let err = data.decode::<Model>().unwrap_err();
        assert!(err.to_string().starts_with("decoding attributes for test"));
    }

    #[test]
    fn test_apply_merges_fields() {
        let mut data = ResourceData::new("test", object(json!({"name": "a", "extra": 1})));
        data.apply(&Model {
            name: "a".to_string(),
            size: 3,
            password: None,
            hosts: vec!["h1".to_string()],
        })
        .unwrap();
        assert_eq!(data.get_i64("size"), Some(3));
        assert_eq!(data.get("extra"), Some(&json!(1)));
        assert_eq!(data.get("password"), None);
        assert_eq!(data.attributes()["hosts"], json!(["h1"]));
    }

    #[test]
    fn test_has_change() {
        let prior = object(json!({"size": 3, "tags": {"a": "b"}}));
        let planned = object(json!({"size": 4, "tags": {"a": "b"}}));
        let data = ResourceData::for_update("test", "/x", prior, planned);
        assert!(data.has_change("size"));
        assert!(!data.has_change("tags"));
        assert!(!data.has_change("missing"));
        assert!(data.has_changes(&["tags", "size"]));

        let fresh = ResourceData::new("test", Map::new());
        assert!(fresh.has_change("anything"));
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let prior = object(json!({"tags": {}, "hosts": [], "password": "", "size": 0}));
        let planned = object(json!({"password": null}));
        let data = ResourceData::for_update("test", "/x", prior, planned);
        assert!(!data.has_change("tags"));
        assert!(!data.has_change("hosts"));
        assert!(!data.has_change("password"));
        assert!(data.has_change("size"));
        assert!(!data.has_changes(&["tags", "hosts", "password"]));
    }

    #[test]
    fn test_id_lifecycle() {
        let mut data = ResourceData::new("test", Map::new());
        assert!(matches!(data.require_id(), Err(Error::MissingId { .. })));
        data.set_id("/subscriptions/s");
        assert_eq!(data.id(), Some("/subscriptions/s"));
        data.clear_id();
        assert_eq!(data.id(), None);
    }
}
