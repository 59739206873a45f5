use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by field construction and value processing.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The field specification itself is malformed.
    #[error("invalid field configuration: {message}")]
    Config { message: Cow<'static, str> },

    /// Dispatch found no registered field type under this name.
    #[error("unknown field type `{name}`")]
    UnknownType { name: String },

    /// A value could not be cast to the declared scalar type.
    #[error("cannot coerce {value} into {target}")]
    Coercion { target: &'static str, value: String },

    /// A value has an unsupported raw form or failed domain parsing.
    #[error("{message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A required field resolved to an empty value.
    #[error("value required for this field")]
    Required,

    /// Malformed ip address or CIDR notation.
    #[error("invalid ip address `{value}`: {source}")]
    AddressParse {
        value: String,
        #[source]
        source: ipnet::AddrParseError,
    },

    /// Malformed base64 payload for a binary field.
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Error raised while processing a named sub-field of a document.
    #[error("field `{}`: {}", self.path(), self.root_cause())]
    InField { field: String, source: Box<FieldError> },
}

impl FieldError {
    pub fn config(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn coercion(target: &'static str, value: impl std::fmt::Display) -> Self {
        Self::Coercion {
            target,
            value: value.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Validation failure that keeps the underlying parser error as its source.
    pub fn validation_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Attributes this error to the named field, prefixing any existing path.
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::InField {
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// Dotted path of the field that failed, empty when the error is not attributed.
    pub fn path(&self) -> String {
        let mut segments = Vec::new();
        let mut current = self;
        while let Self::InField { field, source } = current {
            segments.push(field.as_str());
            current = source.as_ref();
        }
        segments.join(".")
    }

    /// The innermost error, with all field attributions stripped.
    pub fn root_cause(&self) -> &FieldError {
        let mut current = self;
        while let Self::InField { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    pub fn is_required(&self) -> bool {
        matches!(self.root_cause(), Self::Required)
    }
}

/// Convenience alias for results produced by the field layer.
pub type FieldResult<T> = Result<T, FieldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_field_errors_report_dotted_path() {
        let err = FieldError::Required.in_field("city").in_field("address");
        assert_eq!(err.path(), "address.city");
        assert!(err.is_required());
        assert_eq!(err.to_string(), "field `address.city`: value required for this field");
    }

    #[test]
    fn unattributed_error_has_empty_path() {
        let err = FieldError::coercion("integer", serde_json::json!("abc"));
        assert_eq!(err.path(), "");
        assert_eq!(err.to_string(), "cannot coerce \"abc\" into integer");
    }
}
