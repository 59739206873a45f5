//! Turning a field specification into a configured [`Field`].
//!
//! A specification is a mapping with a `"type"` key (or only `"properties"`
//! for an implicit object), a type name plus parameters, or an already
//! constructed field.

use serde_json::{Map, Value};

use crate::errors::{FieldError, FieldResult};
use crate::field::Field;
use crate::params::Params;
use crate::registry;

/// Accepted forms of a field specification.
#[derive(Debug, Clone)]
pub enum FieldSpec {
    /// `{"type": "text", "analyzer": "snowball"}`
    Mapping(Map<String, Value>),
    /// An existing field, returned as is.
    Field(Field),
    /// A registered type name, configured by the accompanying parameters.
    Name(String),
    /// Any other JSON value; always rejected.
    Other(Value),
}

impl From<Map<String, Value>> for FieldSpec {
    fn from(mapping: Map<String, Value>) -> Self {
        FieldSpec::Mapping(mapping)
    }
}

impl From<Field> for FieldSpec {
    fn from(field: Field) -> Self {
        FieldSpec::Field(field)
    }
}

impl From<&str> for FieldSpec {
    fn from(name: &str) -> Self {
        FieldSpec::Name(name.to_string())
    }
}

impl From<String> for FieldSpec {
    fn from(name: String) -> Self {
        FieldSpec::Name(name)
    }
}

impl From<Value> for FieldSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mapping) => FieldSpec::Mapping(mapping),
            Value::String(name) => FieldSpec::Name(name),
            other => FieldSpec::Other(other),
        }
    }
}

/// Resolves `spec` with extra construction `params`.
///
/// Parameters are only accepted together with a type name; a mapping or a
/// ready field must carry everything itself.
pub fn resolve(spec: impl Into<FieldSpec>, params: Params) -> FieldResult<Field> {
    match spec.into() {
        FieldSpec::Mapping(mapping) => {
            if !params.is_empty() {
                return Err(FieldError::config("cannot accept parameters when passing in a mapping"));
            }
            let mut params = Params::from_map(mapping);
            let name = match params.take("type") {
                Some(Value::String(name)) => name,
                Some(other) => return Err(FieldError::config(format!("`type` must be a string, got {other}"))),
                None if params.contains("properties") => "object".to_string(),
                None => return Err(FieldError::config("a field mapping needs a `type` key")),
            };
            build(&name, params)
        }
        FieldSpec::Field(field) => {
            if !params.is_empty() {
                return Err(FieldError::config("cannot accept parameters when passing in a field"));
            }
            Ok(field)
        }
        FieldSpec::Name(name) => build(&name, params),
        FieldSpec::Other(value) => Err(FieldError::config(format!(
            "a field specification must be a mapping, a type name or a field, got {value}"
        ))),
    }
}

/// Resolves a specification that carries no extra parameters.
pub fn construct_field(spec: impl Into<FieldSpec>) -> FieldResult<Field> {
    resolve(spec, Params::new())
}

fn build(name: &str, params: Params) -> FieldResult<Field> {
    let registration = registry::lookup(name)?;
    log::debug!("constructing `{name}` field with {} parameter(s)", params.len());
    Field::from_registration(registration, params)
}
