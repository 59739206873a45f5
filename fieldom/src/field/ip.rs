use std::net::IpAddr;

use ipnet::IpNet;

use super::{Field, FieldKind};
use crate::errors::{FieldError, FieldResult};
use crate::registry::FieldRegistration;
use crate::value::FieldValue;

/// Parses an address with optional prefix length. Bare addresses get a host prefix.
pub fn parse_interface(text: &str) -> FieldResult<IpNet> {
    let trimmed = text.trim();
    trimmed.parse::<IpNet>().or_else(|err| {
        trimmed
            .parse::<IpAddr>()
            .map(IpNet::from)
            .map_err(|_| FieldError::AddressParse {
                value: text.to_string(),
                source: err,
            })
    })
}

pub(super) fn deserialize(value: FieldValue) -> FieldResult<FieldValue> {
    match value {
        FieldValue::Null => Ok(FieldValue::Null),
        FieldValue::Ip(_) => Ok(value),
        FieldValue::String(text) => parse_interface(&text).map(FieldValue::Ip),
        other => Err(FieldError::validation(format!(
            "expected an ip address string, got {}",
            other.kind_name()
        ))),
    }
}

inventory::submit! { FieldRegistration::new("ip", |_| Ok(FieldKind::Ip)) }

impl Field {
    pub fn ip() -> Self {
        Field::new(FieldKind::Ip)
    }
}
