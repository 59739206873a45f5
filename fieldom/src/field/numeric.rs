//! Integer and floating point fields.

use serde_json::{Map, Number, Value};

use super::{Field, FieldKind};
use crate::errors::{FieldError, FieldResult};
use crate::params::Params;
use crate::registry::FieldRegistration;
use crate::value::FieldValue;

/// Integer widths, each with the range accepted on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerKind {
    Byte,
    Short,
    Integer,
    Long,
}

impl IntegerKind {
    pub fn type_name(self) -> &'static str {
        match self {
            IntegerKind::Byte => "byte",
            IntegerKind::Short => "short",
            IntegerKind::Integer => "integer",
            IntegerKind::Long => "long",
        }
    }

    pub fn bounds(self) -> (i64, i64) {
        match self {
            IntegerKind::Byte => (i8::MIN.into(), i8::MAX.into()),
            IntegerKind::Short => (i16::MIN.into(), i16::MAX.into()),
            IntegerKind::Integer => (i32::MIN.into(), i32::MAX.into()),
            IntegerKind::Long => (i64::MIN, i64::MAX),
        }
    }
}

/// Floating point variants. `scaled_float` carries its mandatory factor.
#[derive(Debug, Clone, PartialEq)]
pub enum FloatKind {
    Float,
    HalfFloat,
    Double,
    Scaled { scaling_factor: Number },
}

impl FloatKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            FloatKind::Float => "float",
            FloatKind::HalfFloat => "half_float",
            FloatKind::Double => "double",
            FloatKind::Scaled { .. } => "scaled_float",
        }
    }

    pub fn scaling_factor(&self) -> Option<f64> {
        match self {
            FloatKind::Scaled { scaling_factor } => scaling_factor.as_f64(),
            _ => None,
        }
    }

    pub(super) fn write_params(&self, out: &mut Map<String, Value>) {
        if let FloatKind::Scaled { scaling_factor } = self {
            out.insert("scaling_factor".to_string(), Value::Number(scaling_factor.clone()));
        }
    }
}

pub(super) fn deserialize_integer(kind: IntegerKind, value: FieldValue) -> FieldResult<FieldValue> {
    let target = kind.type_name();
    let integer = match &value {
        FieldValue::Null => return Ok(FieldValue::Null),
        FieldValue::Integer(integer) => *integer,
        FieldValue::Bool(flag) => i64::from(*flag),
        FieldValue::Float(float) if float.is_finite() && float.fract() == 0.0 => {
            if *float < i64::MIN as f64 || *float >= i64::MAX as f64 {
                return Err(FieldError::coercion(target, value.to_json()));
            }
            *float as i64
        }
        FieldValue::String(text) => match text.trim().parse::<i64>() {
            Ok(integer) => integer,
            Err(_) => return Err(FieldError::coercion(target, value.to_json())),
        },
        other => return Err(FieldError::coercion(target, other.to_json())),
    };

    let (min, max) = kind.bounds();
    if integer < min || integer > max {
        return Err(FieldError::coercion(target, integer));
    }
    Ok(FieldValue::Integer(integer))
}

pub(super) fn deserialize_float(value: FieldValue) -> FieldResult<FieldValue> {
    let float = match &value {
        FieldValue::Null => return Ok(FieldValue::Null),
        FieldValue::Float(float) => *float,
        FieldValue::Integer(integer) => *integer as f64,
        FieldValue::Bool(flag) => f64::from(u8::from(*flag)),
        FieldValue::String(text) => match text.trim().parse::<f64>() {
            Ok(float) => float,
            Err(_) => return Err(FieldError::coercion("float", value.to_json())),
        },
        other => return Err(FieldError::coercion("float", other.to_json())),
    };
    finite(float, &value).map(FieldValue::Float)
}

/// Non-finite floats have no JSON form and are rejected on both sides.
pub(super) fn serialize_float(value: &FieldValue) -> FieldResult<Value> {
    if let FieldValue::Float(float) = value {
        finite(*float, value)?;
    }
    Ok(value.to_json())
}

fn finite(float: f64, raw: &FieldValue) -> FieldResult<f64> {
    if float.is_finite() {
        Ok(float)
    } else {
        let shown = match raw {
            FieldValue::String(text) => text.clone(),
            _ => float.to_string(),
        };
        Err(FieldError::coercion("float", format!("{shown:?}")))
    }
}

fn build_scaled_float(params: &mut Params) -> FieldResult<FieldKind> {
    let scaling_factor = params
        .take_number("scaling_factor")?
        .ok_or_else(|| FieldError::config("scaled_float requires a `scaling_factor`"))?;
    Ok(FieldKind::Float(FloatKind::Scaled { scaling_factor }))
}

inventory::submit! { FieldRegistration::new("float", |_| Ok(FieldKind::Float(FloatKind::Float))) }
inventory::submit! { FieldRegistration::new("half_float", |_| Ok(FieldKind::Float(FloatKind::HalfFloat))) }
inventory::submit! { FieldRegistration::new("double", |_| Ok(FieldKind::Float(FloatKind::Double))) }
inventory::submit! { FieldRegistration::new("scaled_float", build_scaled_float) }
inventory::submit! { FieldRegistration::new("byte", |_| Ok(FieldKind::Integer(IntegerKind::Byte))) }
inventory::submit! { FieldRegistration::new("short", |_| Ok(FieldKind::Integer(IntegerKind::Short))) }
inventory::submit! { FieldRegistration::new("integer", |_| Ok(FieldKind::Integer(IntegerKind::Integer))) }
inventory::submit! { FieldRegistration::new("long", |_| Ok(FieldKind::Integer(IntegerKind::Long))) }

impl Field {
    pub fn integer() -> Self {
        Field::new(FieldKind::Integer(IntegerKind::Integer))
    }

    pub fn long() -> Self {
        Field::new(FieldKind::Integer(IntegerKind::Long))
    }

    pub fn float() -> Self {
        Field::new(FieldKind::Float(FloatKind::Float))
    }

    pub fn double() -> Self {
        Field::new(FieldKind::Float(FloatKind::Double))
    }
}
