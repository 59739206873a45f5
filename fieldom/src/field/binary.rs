use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;

use super::{Field, FieldKind};
use crate::errors::{FieldError, FieldResult};
use crate::registry::FieldRegistration;
use crate::value::FieldValue;

pub(super) fn deserialize(value: FieldValue) -> FieldResult<FieldValue> {
    match value {
        FieldValue::Null | FieldValue::Bytes(_) => Ok(value),
        FieldValue::String(text) => Ok(FieldValue::Bytes(STANDARD.decode(text.trim())?)),
        other => Err(FieldError::validation(format!(
            "expected a base64 string, got {}",
            other.kind_name()
        ))),
    }
}

pub(super) fn serialize(value: &FieldValue) -> FieldResult<Value> {
    match value {
        FieldValue::Null => Ok(Value::Null),
        FieldValue::Bytes(bytes) => Ok(Value::String(STANDARD.encode(bytes))),
        other => Err(FieldError::validation(format!(
            "binary fields serialize bytes, got {}",
            other.kind_name()
        ))),
    }
}

inventory::submit! { FieldRegistration::new("binary", |_| Ok(FieldKind::Binary)) }

impl Field {
    pub fn binary() -> Self {
        Field::new(FieldKind::Binary)
    }
}
