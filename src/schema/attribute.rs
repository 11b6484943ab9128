//! Attribute schema
//!
//! A [`Schema`] describes the attributes of one resource or data source.
//! It is used at the boundary where the engine hands over an untyped
//! attribute map: [`Schema::validate`] rejects bad input before any network
//! call, [`Schema::apply_defaults`] fills declared defaults, and
//! [`Schema::requires_replace`] reports force-new changes.

use super::validate::Validation;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Kind of value an attribute holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "element")]
pub enum ValueType {
    String,
    Int,
    Bool,
    /// Map of string to string.
    Map,
    List(Element),
    Set(Element),
}

/// Element type of a list or set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    String,
    Int,
    Block(Schema),
}

/// One attribute of a schema.
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub value_type: ValueType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip)]
    pub validation: Option<Validation>,
    /// Canonical form stored in state, e.g. re-serialised JSON.
    #[serde(skip)]
    pub state_func: Option<fn(&str) -> String>,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
}

impl Attribute {
    fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            default: None,
            min_items: None,
            max_items: None,
            validation: None,
            state_func: None,
            description: "",
        }
    }

    pub fn string() -> Self {
        Self::new(ValueType::String)
    }

    pub fn int() -> Self {
        Self::new(ValueType::Int)
    }

    pub fn bool() -> Self {
        Self::new(ValueType::Bool)
    }

    pub fn map() -> Self {
        Self::new(ValueType::Map)
    }

    pub fn list_of_strings() -> Self {
        Self::new(ValueType::List(Element::String))
    }

    pub fn set_of_strings() -> Self {
        Self::new(ValueType::Set(Element::String))
    }

    pub fn block(schema: Schema) -> Self {
        Self::new(ValueType::List(Element::Block(schema)))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn validate_with(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn state_func(mut self, f: fn(&str) -> String) -> Self {
        self.state_func = Some(f);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Set by the server only; the user may not configure it.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }
}

/// Attributes of a resource, data source or nested block.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Schema {
    attributes: BTreeMap<&'static str, Attribute>,
}

/// Key of the per-instance timeouts block, accepted on every resource.
pub const TIMEOUTS_KEY: &str = "timeouts";

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn attr(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Fill in declared defaults for attributes absent from `config` and
    /// bring configured strings into their canonical state form.
    pub fn apply_defaults(&self, config: &mut Map<String, Value>) {
        for (name, attribute) in &self.attributes {
            let present = config.get(*name).map_or(false, |v| !v.is_null());
            if !present {
                if let Some(default) = &attribute.default {
                    config.insert(name.to_string(), default.clone());
                }
                continue;
            }
            if let (Some(f), Some(Value::String(s))) = (attribute.state_func, config.get_mut(*name)) {
                let normalized = f(s.as_str());
                *s = normalized;
            }
            if let (ValueType::List(Element::Block(nested)), Some(Value::Array(items))) =
                (&attribute.value_type, config.get_mut(*name))
            {
                for item in items.iter_mut() {
                    if let Value::Object(map) = item {
                        nested.apply_defaults(map);
                    }
                }
            }
        }
    }

    /// Check a user configuration, collecting every problem.
    pub fn validate(&self, config: &Map<String, Value>) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        self.validate_into("", config, &mut errors, true);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_into(
        &self,
        prefix: &str,
        config: &Map<String, Value>,
        errors: &mut Vec<String>,
        top_level: bool,
    ) {
        for key in config.keys() {
            if top_level && key == TIMEOUTS_KEY {
                continue;
            }
            if !self.attributes.contains_key(key.as_str()) {
                errors.push(format!("{}{}: unsupported argument", prefix, key));
            }
        }

        for (name, attribute) in &self.attributes {
            let path = format!("{}{}", prefix, name);
            let value = config.get(*name).filter(|v| !v.is_null());

            let Some(value) = value else {
                if attribute.required {
                    errors.push(format!("{}: the argument is required", path));
                }
                continue;
            };

            if attribute.is_computed_only() {
                errors.push(format!("{}: the attribute is computed and cannot be set", path));
                continue;
            }

            check_type(&path, attribute, value, errors);
        }
    }

    /// Planned state for an update: configured values win, and attributes the
    /// user left unset keep their prior value only when they are computed.
    pub fn planned_state(
        &self,
        prior: &Map<String, Value>,
        config: &Map<String, Value>,
    ) -> Map<String, Value> {
        let mut planned = Map::new();
        for (name, attribute) in &self.attributes {
            let configured = config.get(*name).filter(|v| !v.is_null());
            match (configured, attribute) {
                (Some(value), a) if !a.is_computed_only() => {
                    let value = match (&a.value_type, value, prior.get(*name)) {
                        (
                            ValueType::List(Element::Block(nested)),
                            Value::Array(items),
                            Some(Value::Array(prior_items)),
                        ) => Value::Array(
                            items
                                .iter()
                                .enumerate()
                                .map(|(i, item)| match (item, prior_items.get(i)) {
                                    (Value::Object(c), Some(Value::Object(p))) => {
                                        Value::Object(nested.planned_state(p, c))
                                    },
                                    _ => item.clone(),
                                })
                                .collect(),
                        ),
                        _ => value.clone(),
                    };
                    planned.insert(name.to_string(), value);
                },
                _ if attribute.computed => {
                    if let Some(previous) = prior.get(*name) {
                        planned.insert(name.to_string(), previous.clone());
                    }
                },
                _ => {},
            }
        }
        if let Some(timeouts) = config.get(TIMEOUTS_KEY) {
            planned.insert(TIMEOUTS_KEY.to_string(), timeouts.clone());
        }
        planned
    }

    /// Top-level user-settable attributes whose planned value differs from `prior`.
    pub fn changed_attributes(
        &self,
        prior: &Map<String, Value>,
        planned: &Map<String, Value>,
    ) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|(_, attribute)| !attribute.is_computed_only())
            .filter(|(name, attribute)| {
                let before = prior.get(**name).filter(|v| !is_unset(v));
                let after = planned.get(**name).filter(|v| !is_unset(v));
                match (before, after) {
                    (Some(a), Some(b)) => !values_equal(&attribute.value_type, a, b),
                    (None, None) => false,
                    _ => true,
                }
            })
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Paths of force-new attributes whose configured value differs from `prior`.
    pub fn requires_replace(
        &self,
        prior: &Map<String, Value>,
        config: &Map<String, Value>,
    ) -> Vec<String> {
        let mut paths = Vec::new();
        self.requires_replace_into("", prior, config, &mut paths);
        paths
    }

    fn requires_replace_into(
        &self,
        prefix: &str,
        prior: &Map<String, Value>,
        config: &Map<String, Value>,
        paths: &mut Vec<String>,
    ) {
        for (name, attribute) in &self.attributes {
            if attribute.is_computed_only() {
                continue;
            }
            let path = format!("{}{}", prefix, name);
            let before = prior.get(*name).filter(|v| !is_unset(v));
            let after = config.get(*name).filter(|v| !is_unset(v));

            if attribute.force_new {
                let unchanged = match (before, after) {
                    (_, None) if attribute.computed => true,
                    (Some(a), Some(b)) => values_equal(&attribute.value_type, a, b),
                    (None, None) => true,
                    _ => false,
                };
                if !unchanged {
                    paths.push(path);
                }
                continue;
            }

            if let (
                ValueType::List(Element::Block(nested)),
                Some(Value::Array(before)),
                Some(Value::Array(after)),
            ) = (&attribute.value_type, before, after)
            {
                for (i, (b, a)) in before.iter().zip(after.iter()).enumerate() {
                    if let (Value::Object(b), Value::Object(a)) = (b, a) {
                        nested.requires_replace_into(&format!("{}.{}.", path, i), b, a, paths);
                    }
                }
            }
        }
    }
}

/// Null, empty strings and empty collections all read as "not set".
pub(crate) fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn values_equal(value_type: &ValueType, a: &Value, b: &Value) -> bool {
    match (value_type, a, b) {
        (ValueType::Set(_), Value::Array(x), Value::Array(y)) => {
            let mut x: Vec<String> = x.iter().map(|v| v.to_string()).collect();
            let mut y: Vec<String> = y.iter().map(|v| v.to_string()).collect();
            x.sort();
            y.sort();
            x.dedup();
            y.dedup();
            x == y
        },
        _ => a == b,
    }
}

fn check_type(path: &str, attribute: &Attribute, value: &Value, errors: &mut Vec<String>) {
    match (&attribute.value_type, value) {
        (ValueType::String, Value::String(_)) => run_validation(path, attribute, value, errors),
        (ValueType::Int, Value::Number(n)) if n.is_i64() => {
            run_validation(path, attribute, value, errors);
        },
        (ValueType::Bool, Value::Bool(_)) => {},
        (ValueType::Map, Value::Object(map)) => {
            for (key, v) in map {
                if !v.is_string() {
                    errors.push(format!("{}.{}: expected a string value", path, key));
                }
            }
            run_validation(path, attribute, value, errors);
        },
        (ValueType::List(element) | ValueType::Set(element), Value::Array(items)) => {
            if let Some(min) = attribute.min_items {
                if items.len() < min {
                    errors.push(format!("{}: at least {} item(s) required, got {}", path, min, items.len()));
                }
            }
            if let Some(max) = attribute.max_items {
                if items.len() > max {
                    errors.push(format!("{}: at most {} item(s) allowed, got {}", path, max, items.len()));
                }
            }
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{}.{}", path, i);
                match (element, item) {
                    (Element::String, Value::String(_)) | (Element::Int, Value::Number(_)) => {
                        run_validation(&item_path, attribute, item, errors);
                    },
                    (Element::Block(nested), Value::Object(map)) => {
                        nested.validate_into(&format!("{}.", item_path), map, errors, false);
                    },
                    _ => errors.push(format!("{}: unexpected element type", item_path)),
                }
            }
        },
        (expected, _) => errors.push(format!(
            "{}: expected {}",
            path,
            match expected {
                ValueType::String => "a string",
                ValueType::Int => "an integer",
                ValueType::Bool => "a boolean",
                ValueType::Map => "a map of strings",
                ValueType::List(_) => "a list",
                ValueType::Set(_) => "a set",
            }
        )),
    }
}

fn run_validation(path: &str, attribute: &Attribute, value: &Value, errors: &mut Vec<String>) {
    if let Some(validation) = &attribute.validation {
        if let Err(message) = validation.check(value) {
            errors.push(format!("{}: {}", path, message));
        }
    }
}
