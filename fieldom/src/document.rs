//! Documents wrapped against an object field's properties.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::errors::FieldResult;
use crate::field::Properties;
use crate::value::FieldValue;

/// Attribute container bound to the properties of an `object` or `nested` field.
///
/// Values assigned to mapped names are deserialized through their field;
/// unmapped names are stored as given.
#[derive(Debug, Clone)]
pub struct InnerDoc {
    schema: Arc<Properties>,
    values: IndexMap<String, FieldValue>,
}

impl PartialEq for InnerDoc {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl InnerDoc {
    pub fn new(schema: Arc<Properties>) -> Self {
        Self {
            schema,
            values: IndexMap::new(),
        }
    }

    /// Wraps a raw mapping, deserializing every mapped key.
    pub fn from_map(schema: Arc<Properties>, map: Map<String, Value>) -> FieldResult<Self> {
        let mut doc = Self::new(schema);
        for (name, value) in map {
            doc.set(name, value)?;
        }
        Ok(doc)
    }

    pub fn schema(&self) -> &Properties {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.values.get_mut(name)
    }

    /// Returns the stored value, materialising the field's empty value for
    /// mapped names that were never assigned.
    ///
    /// `None` when the name is unmapped or its empty value is null.
    pub fn get_or_empty(&mut self, name: &str) -> Option<&mut FieldValue> {
        if !self.values.contains_key(name) {
            let empty = self.schema.get(name)?.empty();
            if empty.is_null() {
                return None;
            }
            self.values.insert(name.to_string(), empty);
        }
        self.values.get_mut(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> FieldResult<()> {
        let name = name.into();
        let value = match self.schema.get(&name) {
            Some(field) => field.deserialize(value).map_err(|err| err.in_field(name.clone()))?,
            None => value.into(),
        };
        self.values.insert(name, value);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Follows a dotted path through wrapped documents. Numeric segments index lists.
    pub fn lookup(&self, path: &str) -> Option<&FieldValue> {
        let mut segments = path.split('.');
        let mut current = self.values.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                FieldValue::Doc(doc) => doc.values.get(segment)?,
                FieldValue::List(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Wire form of the document. Coercing fields serialize their value;
    /// null, `[]` and `{}` are left out.
    pub fn to_dict(&self) -> FieldResult<Map<String, Value>> {
        let mut out = Map::new();
        for (name, value) in &self.values {
            let json = match self.schema.get(name) {
                Some(field) if field.coerces() => field.serialize(value).map_err(|err| err.in_field(name.clone()))?,
                _ => value.to_json(),
            };
            if !is_empty_json(&json) {
                out.insert(name.clone(), json);
            }
        }
        Ok(out)
    }

    /// Renders stored values without any field transform, skipping empties.
    pub fn to_json(&self) -> Value {
        let map = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .filter(|(_, json)| !is_empty_json(json))
            .collect();
        Value::Object(map)
    }

    /// Cleans every mapped field in schema order, storing the cleaned values.
    ///
    /// Stops at the first failure, which carries the field name.
    pub fn full_clean(&mut self) -> FieldResult<()> {
        let schema = Arc::clone(&self.schema);
        for (name, field) in schema.iter() {
            let current = self.values.get(name).cloned().unwrap_or_default();
            let cleaned = field.clean(current).map_err(|err| err.in_field(name.clone()))?;
            if self.values.contains_key(name) || !cleaned.is_null() {
                self.values.insert(name.clone(), cleaned);
            }
        }
        Ok(())
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldError;
    use crate::field::Field;
    use serde_json::json;

    fn schema() -> Arc<Properties> {
        let properties: Properties = [
            ("name".to_string(), Field::keyword().required(true)),
            ("age".to_string(), Field::integer()),
            ("tags".to_string(), Field::keyword().multi(true)),
            ("address".to_string(), Field::object_of([("city", Field::text().required(true))])),
        ]
        .into_iter()
        .collect();
        Arc::new(properties)
    }

    fn wrap(value: Value) -> FieldResult<InnerDoc> {
        match value {
            Value::Object(map) => InnerDoc::from_map(schema(), map),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn mapped_keys_are_deserialized() {
        let doc = wrap(json!({"name": "ada", "age": "36", "extra": 1.5})).unwrap();
        assert_eq!(doc.get("age"), Some(&FieldValue::Integer(36)));
        assert_eq!(doc.get("extra"), Some(&FieldValue::Float(1.5)));
        assert!(doc.get("tags").is_none());
    }

    #[test]
    fn deserialization_errors_carry_the_key() {
        let err = wrap(json!({"age": "old"})).unwrap_err();
        assert_eq!(err.path(), "age");
        assert!(matches!(err.root_cause(), FieldError::Coercion { .. }));
    }

    #[test]
    fn get_or_empty_materialises_multi_and_object_values() {
        let mut doc = InnerDoc::new(schema());
        assert_eq!(doc.get_or_empty("tags").cloned(), Some(FieldValue::List(Vec::new())));
        assert!(doc.contains("tags"));
        assert!(doc.get_or_empty("address").and_then(|v| v.as_doc_mut()).is_some());
        assert!(doc.get_or_empty("age").is_none());
        assert!(doc.get_or_empty("unknown").is_none());
    }

    #[test]
    fn lookup_follows_dotted_paths() {
        let doc = wrap(json!({"address": {"city": "Prague"}, "tags": ["a", "b"]})).unwrap();
        assert_eq!(doc.lookup("address.city"), Some(&FieldValue::String("Prague".into())));
        assert_eq!(doc.lookup("tags.1"), Some(&FieldValue::String("b".into())));
        assert_eq!(doc.lookup("address.zip"), None);
        assert_eq!(doc.lookup("age.x"), None);
    }

    #[test]
    fn to_dict_skips_empty_values() {
        let mut doc = wrap(json!({"name": "ada", "tags": []})).unwrap();
        doc.set("note", FieldValue::Null).unwrap();
        assert_eq!(Value::Object(doc.to_dict().unwrap()), json!({"name": "ada"}));
    }

    #[test]
    fn full_clean_reports_nested_path() {
        let mut doc = wrap(json!({"name": "ada", "address": {"zip": "11000"}})).unwrap();
        let err = doc.full_clean().unwrap_err();
        assert_eq!(err.path(), "address.city");
        assert!(err.is_required());
    }

    #[test]
    fn full_clean_stops_at_first_failure() {
        let mut doc = wrap(json!({"address": {}})).unwrap();
        let err = doc.full_clean().unwrap_err();
        assert_eq!(err.path(), "name");
    }

    #[test]
    fn remove_and_equality() {
        let mut left = wrap(json!({"name": "ada"})).unwrap();
        let right = wrap(json!({"name": "ada", "age": 1})).unwrap();
        assert_ne!(left, right);
        left.set("age", 1).unwrap();
        assert_eq!(left, right);
        assert_eq!(left.remove("age"), Some(FieldValue::Integer(1)));
        assert_eq!(left.len(), 1);
    }
}
