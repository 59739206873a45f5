//! Field definitions and the shared serialize/deserialize/clean contract.
//!
//! A [`Field`] pairs a [`FieldKind`] (the per-type configuration and value
//! transform) with the options every field carries: `multi`, `required`,
//! multi-fields and verbatim extra mapping parameters.

mod binary;
mod boolean;
mod custom;
mod date;
mod ip;
mod numeric;
mod object;
mod opaque;
mod text;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::dispatch::{FieldSpec, resolve};
use crate::errors::{FieldError, FieldResult};
use crate::params::Params;
use crate::registry::FieldRegistration;
use crate::value::FieldValue;

pub use custom::{BuiltinType, CustomField, CustomTransform};
pub use date::DateOptions;
pub use numeric::{FloatKind, IntegerKind};
pub use object::{FieldWalk, ObjectField, Properties};
pub use opaque::OpaqueKind;
pub use text::{KeywordOptions, StringOptions, TextOptions};

/// The closed set of builtin field variants plus the custom extension point.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text(TextOptions),
    Keyword(KeywordOptions),
    /// Legacy pre-5.x string type.
    String(StringOptions),
    Boolean,
    Float(FloatKind),
    Integer(IntegerKind),
    Date(DateOptions),
    Ip,
    Binary,
    Object(ObjectField),
    Nested(ObjectField),
    Opaque(OpaqueKind),
    Custom(CustomField),
}

impl FieldKind {
    /// Registry name of this kind.
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Text(_) => "text",
            FieldKind::Keyword(_) => "keyword",
            FieldKind::String(_) => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Float(kind) => kind.type_name(),
            FieldKind::Integer(kind) => kind.type_name(),
            FieldKind::Date(_) => "date",
            FieldKind::Ip => "ip",
            FieldKind::Binary => "binary",
            FieldKind::Object(_) => "object",
            FieldKind::Nested(_) => "nested",
            FieldKind::Opaque(kind) => kind.type_name(),
            FieldKind::Custom(custom) => custom.name(),
        }
    }

    /// Whether element deserialization performs a real conversion.
    pub fn coerces(&self) -> bool {
        !matches!(
            self,
            FieldKind::Text(_) | FieldKind::Keyword(_) | FieldKind::String(_) | FieldKind::Opaque(_)
        )
    }

    pub fn as_object(&self) -> Option<&ObjectField> {
        match self {
            FieldKind::Object(object) | FieldKind::Nested(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectField> {
        match self {
            FieldKind::Object(object) | FieldKind::Nested(object) => Some(object),
            _ => None,
        }
    }

    fn default_multi(&self) -> bool {
        matches!(self, FieldKind::Nested(_))
    }

    fn empty_element(&self) -> FieldValue {
        match self.as_object() {
            Some(object) => object.empty_element(),
            None => FieldValue::Null,
        }
    }

    /// Whether a cleaned value counts as missing for a required field.
    fn is_missing(&self, value: &FieldValue) -> bool {
        match self {
            // `false` is a meaningful value, only null is missing
            FieldKind::Boolean => value.is_null(),
            _ => value.is_empty(),
        }
    }

    fn deserialize_element(&self, value: FieldValue) -> FieldResult<FieldValue> {
        match self {
            FieldKind::Text(_) | FieldKind::Keyword(_) | FieldKind::String(_) | FieldKind::Opaque(_) => Ok(value),
            FieldKind::Boolean => Ok(boolean::deserialize(value)),
            FieldKind::Float(_) => numeric::deserialize_float(value),
            FieldKind::Integer(kind) => numeric::deserialize_integer(*kind, value),
            FieldKind::Date(options) => options.deserialize(value),
            FieldKind::Ip => ip::deserialize(value),
            FieldKind::Binary => binary::deserialize(value),
            FieldKind::Object(object) | FieldKind::Nested(object) => object.deserialize_element(value),
            FieldKind::Custom(custom) => custom.deserialize(value),
        }
    }

    fn serialize_element(&self, value: &FieldValue) -> FieldResult<Value> {
        match self {
            FieldKind::Binary => binary::serialize(value),
            FieldKind::Float(_) => numeric::serialize_float(value),
            FieldKind::Object(object) | FieldKind::Nested(object) => object.serialize_element(value),
            FieldKind::Custom(custom) => custom.serialize(value),
            _ => Ok(value.to_json()),
        }
    }

    fn write_params(&self, out: &mut Map<String, Value>) {
        match self {
            FieldKind::Text(options) => options.write_params(out),
            FieldKind::Keyword(options) => options.write_params(out),
            FieldKind::String(options) => options.write_params(out),
            FieldKind::Float(kind) => kind.write_params(out),
            FieldKind::Object(object) | FieldKind::Nested(object) => object.write_params(out),
            _ => {}
        }
    }
}

/// A typed schema element describing how one named value looks in memory and on the wire.
#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    multi: bool,
    required: bool,
    fields: IndexMap<String, Field>,
    extra: Map<String, Value>,
}

impl Field {
    pub fn new(kind: FieldKind) -> Self {
        let multi = kind.default_multi();
        Self {
            kind,
            multi,
            required: false,
            fields: IndexMap::new(),
            extra: Map::new(),
        }
    }

    /// Builds a field from a registry entry, taking the common options first.
    pub(crate) fn from_registration(registration: &FieldRegistration, mut params: Params) -> FieldResult<Self> {
        let multi = params.take_bool("multi")?;
        let required = params.take_bool("required")?;
        let fields = params.take_fields("fields")?;
        let kind = (registration.build)(&mut params)?;

        let mut field = Field::new(kind);
        if let Some(multi) = multi {
            field.multi = multi;
        }
        field.required = required.unwrap_or(false);
        field.fields = fields;
        field.extra = params.into_map();
        Ok(field)
    }

    pub fn multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Adds a multi-field: an alternate representation of the same value.
    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Adds a plain mapping parameter emitted verbatim by `to_dict`.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Resolves `spec` and registers it as a multi-field under `name`.
    pub fn add_multi_field(&mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> FieldResult<&mut Self> {
        let field = resolve(spec, Params::new())?;
        self.fields.insert(name.into(), field);
        Ok(self)
    }

    /// Registry name of the field's type, e.g. `"text"`.
    pub fn name(&self) -> &str {
        self.kind.type_name()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn coerces(&self) -> bool {
        self.kind.coerces()
    }

    pub fn fields(&self) -> &IndexMap<String, Field> {
        &self.fields
    }

    /// Looks up a multi-field by name.
    pub fn subfield(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Extra mapping parameters the kind does not interpret.
    pub fn params(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// The value a document holds for this field before anything is assigned.
    pub fn empty(&self) -> FieldValue {
        if self.multi {
            return FieldValue::List(Vec::new());
        }
        self.kind.empty_element()
    }

    /// Converts an in-memory value to its wire form, element-wise for lists.
    pub fn serialize(&self, value: &FieldValue) -> FieldResult<Value> {
        match value {
            FieldValue::List(items) => items
                .iter()
                .map(|item| self.kind.serialize_element(item))
                .collect::<FieldResult<Vec<_>>>()
                .map(Value::Array),
            other => self.kind.serialize_element(other),
        }
    }

    /// Converts raw input to the in-memory type, element-wise for lists.
    ///
    /// A list is rewritten in place and handed back as the same list.
    pub fn deserialize(&self, value: impl Into<FieldValue>) -> FieldResult<FieldValue> {
        match value.into() {
            FieldValue::List(mut items) => {
                for item in items.iter_mut() {
                    *item = self.kind.deserialize_element(std::mem::take(item))?;
                }
                Ok(FieldValue::List(items))
            }
            other => self.kind.deserialize_element(other),
        }
    }

    /// Deserializes `value` and enforces the `required` constraint.
    ///
    /// For object and nested fields every wrapped document is validated in
    /// turn, running each sub-field's `clean`.
    pub fn clean(&self, value: impl Into<FieldValue>) -> FieldResult<FieldValue> {
        let mut value = value.into();
        if !value.is_null() {
            value = self.deserialize(value)?;
        }
        if self.required && self.kind.is_missing(&value) {
            return Err(FieldError::Required);
        }
        if let Some(object) = self.kind.as_object() {
            object.full_clean_value(&mut value)?;
        }
        Ok(value)
    }

    /// Mapping description of this field, the inverse of dispatch.
    ///
    /// `multi` and `required` are construction options and are not emitted.
    pub fn to_dict(&self) -> Map<String, Value> {
        if let FieldKind::Custom(custom) = &self.kind
            && let BuiltinType::Alias(builtin) = custom.builtin()
        {
            return builtin.to_dict();
        }

        let mut out = Map::new();
        let type_name = match &self.kind {
            FieldKind::Custom(custom) => custom.builtin().type_name().to_string(),
            kind => kind.type_name().to_string(),
        };
        out.insert("type".to_string(), Value::String(type_name));
        self.kind.write_params(&mut out);
        for (key, value) in &self.extra {
            out.insert(key.clone(), value.clone());
        }
        if !self.fields.is_empty() {
            let fields = self
                .fields
                .iter()
                .map(|(name, field)| (name.clone(), Value::Object(field.to_dict())))
                .collect();
            out.insert("fields".to_string(), Value::Object(fields));
        }
        out
    }
}
