//! User-defined field kinds with their own value transform.
//!
//! A custom kind is described on the wire as a builtin type: either a type
//! name emitted together with the field's own parameters, or a complete
//! field whose mapping is emitted unchanged.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::Field;
use crate::errors::FieldResult;
use crate::value::FieldValue;

/// Value conversion hooks of a custom kind. Both default to identity.
pub trait CustomTransform: fmt::Debug + Send + Sync {
    fn deserialize(&self, value: FieldValue) -> FieldResult<FieldValue> {
        Ok(value)
    }

    fn serialize(&self, value: &FieldValue) -> FieldResult<Value> {
        Ok(value.to_json())
    }
}

/// How a custom kind appears in a mapping.
#[derive(Debug, Clone)]
pub enum BuiltinType {
    /// Emit this field's mapping in place of the custom one.
    Alias(Box<Field>),
    /// Emit this type name along with the custom field's parameters.
    Named(String),
}

impl BuiltinType {
    pub fn named(name: impl Into<String>) -> Self {
        BuiltinType::Named(name.into())
    }

    pub fn alias(field: Field) -> Self {
        BuiltinType::Alias(Box::new(field))
    }

    pub fn type_name(&self) -> &str {
        match self {
            BuiltinType::Alias(field) => field.name(),
            BuiltinType::Named(name) => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CustomField {
    name: String,
    builtin: BuiltinType,
    transform: Arc<dyn CustomTransform>,
}

impl CustomField {
    pub fn new(name: impl Into<String>, builtin: BuiltinType, transform: impl CustomTransform + 'static) -> Self {
        Self {
            name: name.into(),
            builtin,
            transform: Arc::new(transform),
        }
    }

    /// Name the kind is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn builtin(&self) -> &BuiltinType {
        &self.builtin
    }

    pub(super) fn deserialize(&self, value: FieldValue) -> FieldResult<FieldValue> {
        self.transform.deserialize(value)
    }

    pub(super) fn serialize(&self, value: &FieldValue) -> FieldResult<Value> {
        self.transform.serialize(value)
    }
}
