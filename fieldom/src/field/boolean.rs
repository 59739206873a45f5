use super::{Field, FieldKind};
use crate::registry::FieldRegistration;
use crate::value::FieldValue;

/// Truthiness conversion. The literal string `"false"` is false, null stays null.
pub(super) fn deserialize(value: FieldValue) -> FieldValue {
    let flag = match value {
        FieldValue::Null => return FieldValue::Null,
        FieldValue::Bool(flag) => flag,
        FieldValue::String(text) => text != "false" && !text.is_empty(),
        FieldValue::Integer(integer) => integer != 0,
        FieldValue::Float(float) => float != 0.0,
        FieldValue::Bytes(bytes) => !bytes.is_empty(),
        FieldValue::Map(map) => !map.is_empty(),
        FieldValue::Doc(doc) => !doc.is_empty(),
        FieldValue::List(items) => !items.is_empty(),
        FieldValue::Date(_) | FieldValue::DateTime(_) | FieldValue::DateTimeTz(_) | FieldValue::Ip(_) => true,
    };
    FieldValue::Bool(flag)
}

inventory::submit! { FieldRegistration::new("boolean", |_| Ok(FieldKind::Boolean)) }

impl Field {
    pub fn boolean() -> Self {
        Field::new(FieldKind::Boolean)
    }
}
