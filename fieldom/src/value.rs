//! In-memory representation of field values.
//!
//! Raw wire input (`serde_json::Value`) converts into a [`FieldValue`] without
//! any schema knowledge; field kinds then coerce it into their declared type
//! (dates, ip interfaces, bytes, wrapped documents, ...).

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use ipnet::IpNet;
use serde_json::{Map, Number, Value};

use crate::document::InnerDoc;

/// A field value as held in memory, before serialization or after deserialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    /// Date-time without timezone information.
    DateTime(NaiveDateTime),
    /// Date-time with a fixed UTC offset attached.
    DateTimeTz(DateTime<FixedOffset>),
    Ip(IpNet),
    Bytes(Vec<u8>),
    /// Plain mapping not yet bound to a schema.
    Map(Map<String, Value>),
    /// Mapping wrapped against an object/nested field's properties.
    Doc(InnerDoc),
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Null, an empty list, or an empty mapping/document.
    ///
    /// `false`, `0` and `""` are not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Map(map) => map.is_empty(),
            FieldValue::Doc(doc) => doc.is_empty(),
            _ => false,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::Date(_) => "date",
            FieldValue::DateTime(_) | FieldValue::DateTimeTz(_) => "datetime",
            FieldValue::Ip(_) => "ip",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::Map(_) => "mapping",
            FieldValue::Doc(_) => "document",
            FieldValue::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(value) => Some(*value),
            FieldValue::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_doc(&self) -> Option<&InnerDoc> {
        match self {
            FieldValue::Doc(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_doc_mut(&mut self) -> Option<&mut InnerDoc> {
        match self {
            FieldValue::Doc(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Renders the value as JSON with no schema-specific transform.
    ///
    /// Dates use ISO-8601, ip interfaces `addr/prefix`, bytes standard base64,
    /// and wrapped documents their own `to_dict`.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(value) => Value::Bool(*value),
            FieldValue::Integer(value) => Value::Number((*value).into()),
            FieldValue::Float(value) => Number::from_f64(*value).map(Value::Number).unwrap_or(Value::Null),
            FieldValue::String(value) => Value::String(value.clone()),
            FieldValue::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            FieldValue::DateTime(datetime) => Value::String(datetime.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            FieldValue::DateTimeTz(datetime) => {
                Value::String(datetime.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            }
            FieldValue::Ip(net) => Value::String(net.to_string()),
            FieldValue::Bytes(bytes) => Value::String(STANDARD.encode(bytes)),
            FieldValue::Map(map) => Value::Object(map.clone()),
            FieldValue::Doc(doc) => doc.to_json(),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(flag) => FieldValue::Bool(flag),
            Value::Number(number) => match number.as_i64() {
                Some(integer) => FieldValue::Integer(integer),
                // u64 values past i64::MAX degrade to floats
                None => FieldValue::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(text) => FieldValue::String(text),
            Value::Array(items) => FieldValue::List(items.into_iter().map(FieldValue::from).collect()),
            Value::Object(map) => FieldValue::Map(map),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        FieldValue::from(value.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        FieldValue::DateTimeTz(value)
    }
}

impl From<IpNet> for FieldValue {
    fn from(value: IpNet) -> Self {
        FieldValue::Ip(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Bytes(value)
    }
}

impl From<InnerDoc> for FieldValue {
    fn from(value: InnerDoc) -> Self {
        FieldValue::Doc(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::List(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_conversion_keeps_structure() {
        let raw = json!({"tags": ["a", 1, 2.5, null, true]});
        let value = FieldValue::from(raw.clone());
        assert!(matches!(value, FieldValue::Map(_)));
        assert_eq!(value.to_json(), raw);

        let list = FieldValue::from(json!([1, "x"]));
        assert_eq!(
            list,
            FieldValue::List(vec![FieldValue::Integer(1), FieldValue::String("x".into())])
        );
    }

    #[test]
    fn falsy_scalars_are_not_empty() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::List(Vec::new()).is_empty());
        assert!(FieldValue::Map(Map::new()).is_empty());
        assert!(!FieldValue::Integer(0).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
        assert!(!FieldValue::String(String::new()).is_empty());
    }

    #[test]
    fn temporal_values_render_as_iso_strings() {
        let date = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        assert_eq!(FieldValue::Date(date).to_json(), json!("2016-01-01"));

        let naive = date.and_hms_opt(12, 30, 0).unwrap();
        assert_eq!(FieldValue::DateTime(naive).to_json(), json!("2016-01-01T12:30:00"));

        let aware = DateTime::parse_from_rfc3339("2016-03-06T14:31:21.500+00:00").unwrap();
        assert_eq!(FieldValue::DateTimeTz(aware).to_json(), json!("2016-03-06T14:31:21.500+00:00"));
    }

    #[test]
    fn bytes_render_as_base64() {
        assert_eq!(FieldValue::Bytes(b"hello".to_vec()).to_json(), json!("aGVsbG8="));
    }
}
