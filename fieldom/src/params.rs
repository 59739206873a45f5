//! Construction parameters for field kinds.
//!
//! Every registered factory receives the remaining parameters of a field
//! specification and takes the options it recognises. Whatever is left is
//! kept verbatim on the field and re-emitted by `Field::to_dict`.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::dispatch::construct_field;
use crate::errors::{FieldError, FieldResult};
use crate::field::Field;

/// Ordered, uniquely-keyed parameter map with typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Map<String, Value>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Builder-style variant of [`Params::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn take_bool(&mut self, key: &str) -> FieldResult<Option<bool>> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(flag)),
            Some(other) => Err(FieldError::config(format!("parameter `{key}` must be a boolean, got {other}"))),
        }
    }

    pub fn take_string(&mut self, key: &str) -> FieldResult<Option<String>> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(other) => Err(FieldError::config(format!("parameter `{key}` must be a string, got {other}"))),
        }
    }

    /// Takes a numeric parameter, keeping its integer or float representation.
    pub fn take_number(&mut self, key: &str) -> FieldResult<Option<Number>> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(number)) => Ok(Some(number)),
            Some(other) => Err(FieldError::config(format!("parameter `{key}` must be a number, got {other}"))),
        }
    }

    /// Takes a mapping of name → field specification, resolving each entry.
    pub fn take_fields(&mut self, key: &str) -> FieldResult<IndexMap<String, Field>> {
        let mut resolved = IndexMap::new();
        match self.take(key) {
            None | Some(Value::Null) => {}
            Some(Value::Object(specs)) => {
                for (name, spec) in specs {
                    let field = construct_field(spec).map_err(|err| err.in_field(name.clone()))?;
                    resolved.insert(name, field);
                }
            }
            Some(other) => {
                return Err(FieldError::config(format!(
                    "parameter `{key}` must map names to field specifications, got {other}"
                )));
            }
        }
        Ok(resolved)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for Params {
    fn from(values: Map<String, Value>) -> Self {
        Self::from_map(values)
    }
}
