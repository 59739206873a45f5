//! Field types with no value conversion; they only carry a type name.

use super::{Field, FieldKind};
use crate::errors::FieldResult;
use crate::params::Params;
use crate::registry::FieldRegistration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueKind {
    GeoPoint,
    GeoShape,
    Completion,
    Percolator,
    Join,
    TokenCount,
    Murmur3,
    IntegerRange,
    FloatRange,
    LongRange,
    DoubleRange,
    /// Old spelling of `double_range`, kept so existing mappings round-trip.
    DoubleRanged,
    DateRange,
}

impl OpaqueKind {
    pub const fn type_name(self) -> &'static str {
        match self {
            OpaqueKind::GeoPoint => "geo_point",
            OpaqueKind::GeoShape => "geo_shape",
            OpaqueKind::Completion => "completion",
            OpaqueKind::Percolator => "percolator",
            OpaqueKind::Join => "join",
            OpaqueKind::TokenCount => "token_count",
            OpaqueKind::Murmur3 => "murmur3",
            OpaqueKind::IntegerRange => "integer_range",
            OpaqueKind::FloatRange => "float_range",
            OpaqueKind::LongRange => "long_range",
            OpaqueKind::DoubleRange => "double_range",
            OpaqueKind::DoubleRanged => "double_ranged",
            OpaqueKind::DateRange => "date_range",
        }
    }
}

macro_rules! register_opaque {
    ($($variant:ident),+ $(,)?) => {
        $(
            inventory::submit! {
                FieldRegistration::new(OpaqueKind::$variant.type_name(), |_| Ok(FieldKind::Opaque(OpaqueKind::$variant)))
            }
        )+
    };
}

register_opaque!(
    GeoPoint,
    GeoShape,
    Completion,
    Percolator,
    Join,
    TokenCount,
    Murmur3,
    IntegerRange,
    FloatRange,
    LongRange,
    DoubleRange,
    DateRange,
);

fn build_double_ranged(_params: &mut Params) -> FieldResult<FieldKind> {
    log::warn!("field type `double_ranged` is deprecated, use `double_range`");
    Ok(FieldKind::Opaque(OpaqueKind::DoubleRanged))
}

inventory::submit! { FieldRegistration::new("double_ranged", build_double_ranged) }

impl Field {
    pub fn opaque(kind: OpaqueKind) -> Self {
        Field::new(FieldKind::Opaque(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::construct_field;
    use crate::value::FieldValue;
    use serde_json::{Value, json};

    #[test]
    fn opaque_values_pass_through() {
        let field = Field::opaque(OpaqueKind::GeoPoint);
        let raw = json!({"lat": 41.12, "lon": -71.34});
        let value = field.deserialize(raw.clone()).unwrap();
        assert_eq!(value, FieldValue::from(raw.clone()));
        assert_eq!(field.serialize(&value).unwrap(), raw);
        assert!(!field.coerces());
    }

    #[test]
    fn murmur3_is_a_regular_field() {
        let field = construct_field(json!({"type": "murmur3", "store": true})).unwrap();
        assert_eq!(field.name(), "murmur3");
        assert_eq!(Value::Object(field.to_dict()), json!({"type": "murmur3", "store": true}));
    }

    #[test]
    fn legacy_double_ranged_keeps_its_tag() {
        let field = construct_field("double_ranged").unwrap();
        assert_eq!(field.name(), "double_ranged");
        assert_eq!(Value::Object(field.to_dict()), json!({"type": "double_ranged"}));
        assert_eq!(construct_field("double_range").unwrap().name(), "double_range");
    }
}
