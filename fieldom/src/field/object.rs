//! Object and nested fields: named sub-field properties and wrapped documents.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Field, FieldKind};
use crate::dispatch::{FieldSpec, resolve};
use crate::document::InnerDoc;
use crate::errors::{FieldError, FieldResult};
use crate::params::Params;
use crate::registry::FieldRegistration;
use crate::value::FieldValue;

/// Ordered sub-field definitions of an object or nested field.
pub type Properties = IndexMap<String, Field>;

/// Shared state of `object` and `nested` fields.
///
/// Properties sit behind an `Arc` so wrapped documents can hold the schema
/// they were created with. Mutation goes through copy-on-write, which means
/// documents keep their snapshot when the field is extended afterwards.
#[derive(Debug, Clone, Default)]
pub struct ObjectField {
    properties: Arc<Properties>,
}

impl ObjectField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: Properties) -> Self {
        Self {
            properties: Arc::new(properties),
        }
    }

    /// Builder-style insertion of a property.
    pub fn property(mut self, name: impl Into<String>, field: Field) -> Self {
        self.properties_mut().insert(name.into(), field);
        self
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        Arc::make_mut(&mut self.properties)
    }

    /// Shared handle to the current properties, as bound into new documents.
    pub fn schema(&self) -> Arc<Properties> {
        Arc::clone(&self.properties)
    }

    pub(super) fn write_params(&self, out: &mut Map<String, Value>) {
        if self.properties.is_empty() {
            return;
        }
        let properties = self
            .properties
            .iter()
            .map(|(name, field)| (name.clone(), Value::Object(field.to_dict())))
            .collect();
        out.insert("properties".to_string(), Value::Object(properties));
    }

    pub(super) fn empty_element(&self) -> FieldValue {
        FieldValue::Doc(InnerDoc::new(self.schema()))
    }

    pub(super) fn deserialize_element(&self, value: FieldValue) -> FieldResult<FieldValue> {
        match value {
            FieldValue::Null | FieldValue::Doc(_) => Ok(value),
            FieldValue::Map(map) => InnerDoc::from_map(self.schema(), map).map(FieldValue::Doc),
            FieldValue::List(mut items) => {
                for item in items.iter_mut() {
                    *item = self.deserialize_element(std::mem::take(item))?;
                }
                Ok(FieldValue::List(items))
            }
            other => Err(FieldError::validation(format!(
                "expected a mapping for an object field, got {}",
                other.kind_name()
            ))),
        }
    }

    pub(super) fn serialize_element(&self, value: &FieldValue) -> FieldResult<Value> {
        match value {
            FieldValue::Doc(doc) => doc.to_dict().map(Value::Object),
            other => Ok(other.to_json()),
        }
    }

    /// Runs `full_clean` on every wrapped document inside `value`.
    pub(super) fn full_clean_value(&self, value: &mut FieldValue) -> FieldResult<()> {
        match value {
            FieldValue::Doc(doc) => doc.full_clean(),
            FieldValue::List(items) => items.iter_mut().try_for_each(|item| self.full_clean_value(item)),
            _ => Ok(()),
        }
    }
}

fn build_object(params: &mut Params) -> FieldResult<FieldKind> {
    let properties = params.take_fields("properties")?;
    Ok(FieldKind::Object(ObjectField::with_properties(properties)))
}

fn build_nested(params: &mut Params) -> FieldResult<FieldKind> {
    let properties = params.take_fields("properties")?;
    Ok(FieldKind::Nested(ObjectField::with_properties(properties)))
}

inventory::submit! { FieldRegistration::new("object", build_object) }
inventory::submit! { FieldRegistration::new("nested", build_nested) }

impl Field {
    pub fn object() -> Self {
        Field::new(FieldKind::Object(ObjectField::new()))
    }

    pub fn nested() -> Self {
        Field::new(FieldKind::Nested(ObjectField::new()))
    }

    /// An `object` field with the given properties.
    pub fn object_of<K: Into<String>>(properties: impl IntoIterator<Item = (K, Field)>) -> Self {
        Field::new(FieldKind::Object(collect_properties(properties)))
    }

    /// A `nested` field with the given properties.
    pub fn nested_of<K: Into<String>>(properties: impl IntoIterator<Item = (K, Field)>) -> Self {
        Field::new(FieldKind::Nested(collect_properties(properties)))
    }

    pub fn is_composite(&self) -> bool {
        self.kind.as_object().is_some()
    }

    /// Properties of an object or nested field, `None` for leaf fields.
    pub fn properties(&self) -> Option<&Properties> {
        self.kind.as_object().map(ObjectField::properties)
    }

    /// Looks up a direct property by name.
    pub fn property(&self, name: &str) -> Option<&Field> {
        self.properties()?.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Resolves `spec` and stores it as property `name`, replacing any previous one.
    pub fn add_field(&mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> FieldResult<&mut Self> {
        if !self.is_composite() {
            return Err(FieldError::config(format!("`{}` fields have no properties", self.name())));
        }
        let name = name.into();
        let field = resolve(spec, Params::new()).map_err(|err| err.in_field(name.clone()))?;
        if let Some(object) = self.kind.as_object_mut() {
            object.properties_mut().insert(name, field);
        }
        Ok(self)
    }

    /// Merges another field's properties into this one.
    ///
    /// Names missing here are inserted as copies. Names present on both sides
    /// merge recursively when ours is composite and are otherwise left alone.
    /// Either side being a leaf field makes this a no-op.
    pub fn merge(&mut self, other: &Field) {
        let Some(theirs) = other.properties() else {
            return;
        };
        let Some(ours) = self.kind.as_object_mut() else {
            return;
        };
        let ours = ours.properties_mut();
        for (name, field) in theirs {
            match ours.get_mut(name) {
                Some(existing) if existing.is_composite() => existing.merge(field),
                Some(_) => log::debug!("keeping existing definition of `{name}` during merge"),
                None => {
                    ours.insert(name.clone(), field.clone());
                }
            }
        }
    }

    /// Every field reachable from this one, depth first.
    ///
    /// Each property is followed by its multi-fields and then by its own
    /// properties. Multi-fields are not descended into.
    pub fn collect_fields(&self) -> impl Iterator<Item = &Field> {
        self.walk().map(|(_, field)| field)
    }

    /// Like [`Field::collect_fields`] but with the dotted path of each field.
    pub fn walk(&self) -> FieldWalk<'_> {
        let mut stack = Vec::new();
        if let Some(properties) = self.properties() {
            stack.push(Frame {
                prefix: String::new(),
                iter: properties.iter(),
                descend: true,
            });
        }
        FieldWalk { stack }
    }
}

fn collect_properties<K: Into<String>>(properties: impl IntoIterator<Item = (K, Field)>) -> ObjectField {
    ObjectField::with_properties(properties.into_iter().map(|(name, field)| (name.into(), field)).collect())
}

struct Frame<'a> {
    prefix: String,
    iter: indexmap::map::Iter<'a, String, Field>,
    descend: bool,
}

/// Depth-first iterator over nested fields, see [`Field::walk`].
pub struct FieldWalk<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for FieldWalk<'a> {
    type Item = (String, &'a Field);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some((name, field)) = frame.iter.next() else {
                self.stack.pop();
                continue;
            };

            let path = if frame.prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", frame.prefix, name)
            };

            if frame.descend {
                // pushed last so multi-fields come out before properties
                if let Some(properties) = field.properties() {
                    self.stack.push(Frame {
                        prefix: path.clone(),
                        iter: properties.iter(),
                        descend: true,
                    });
                }
                if !field.fields().is_empty() {
                    self.stack.push(Frame {
                        prefix: path.clone(),
                        iter: field.fields().iter(),
                        descend: false,
                    });
                }
            }
            return Some((path, field));
        }
    }
}
