//! Full-text and exact-value string fields. Values pass through untouched.

use serde_json::{Map, Value};

use super::{Field, FieldKind};
use crate::errors::FieldResult;
use crate::params::Params;
use crate::registry::FieldRegistration;

/// Analysis settings of a `text` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOptions {
    pub analyzer: Option<String>,
    pub search_analyzer: Option<String>,
    pub search_quote_analyzer: Option<String>,
}

/// Analysis settings of a `keyword` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordOptions {
    pub search_analyzer: Option<String>,
    pub normalizer: Option<String>,
}

/// Analysis settings of the legacy `string` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringOptions {
    pub analyzer: Option<String>,
    pub search_analyzer: Option<String>,
}

fn write_opt(out: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        out.insert(key.to_string(), Value::String(value.clone()));
    }
}

impl TextOptions {
    pub(super) fn write_params(&self, out: &mut Map<String, Value>) {
        write_opt(out, "analyzer", &self.analyzer);
        write_opt(out, "search_analyzer", &self.search_analyzer);
        write_opt(out, "search_quote_analyzer", &self.search_quote_analyzer);
    }
}

impl KeywordOptions {
    pub(super) fn write_params(&self, out: &mut Map<String, Value>) {
        write_opt(out, "search_analyzer", &self.search_analyzer);
        write_opt(out, "normalizer", &self.normalizer);
    }
}

impl StringOptions {
    pub(super) fn write_params(&self, out: &mut Map<String, Value>) {
        write_opt(out, "analyzer", &self.analyzer);
        write_opt(out, "search_analyzer", &self.search_analyzer);
    }
}

fn build_text(params: &mut Params) -> FieldResult<FieldKind> {
    Ok(FieldKind::Text(TextOptions {
        analyzer: params.take_string("analyzer")?,
        search_analyzer: params.take_string("search_analyzer")?,
        search_quote_analyzer: params.take_string("search_quote_analyzer")?,
    }))
}

fn build_keyword(params: &mut Params) -> FieldResult<FieldKind> {
    Ok(FieldKind::Keyword(KeywordOptions {
        search_analyzer: params.take_string("search_analyzer")?,
        normalizer: params.take_string("normalizer")?,
    }))
}

fn build_string(params: &mut Params) -> FieldResult<FieldKind> {
    Ok(FieldKind::String(StringOptions {
        analyzer: params.take_string("analyzer")?,
        search_analyzer: params.take_string("search_analyzer")?,
    }))
}

inventory::submit! { FieldRegistration::new("text", build_text) }
inventory::submit! { FieldRegistration::new("keyword", build_keyword) }
inventory::submit! { FieldRegistration::new("string", build_string) }

impl Field {
    pub fn text() -> Self {
        Field::new(FieldKind::Text(TextOptions::default()))
    }

    /// A `text` field analyzed with `analyzer`.
    pub fn text_with(analyzer: impl Into<String>) -> Self {
        Field::new(FieldKind::Text(TextOptions {
            analyzer: Some(analyzer.into()),
            ..TextOptions::default()
        }))
    }

    pub fn keyword() -> Self {
        Field::new(FieldKind::Keyword(KeywordOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::construct_field;
    use crate::value::FieldValue;
    use serde_json::json;

    #[test]
    fn text_values_are_not_coerced() {
        let field = Field::text();
        assert!(!field.coerces());
        assert_eq!(field.deserialize(42).unwrap(), FieldValue::Integer(42));
        assert_eq!(field.serialize(&"hello".into()).unwrap(), json!("hello"));
    }

    #[test]
    fn analyzers_are_emitted_when_set() {
        let field = construct_field(json!({
            "type": "text",
            "analyzer": "english",
            "search_quote_analyzer": "standard"
        }))
        .unwrap();
        assert_eq!(
            Value::Object(field.to_dict()),
            json!({"type": "text", "analyzer": "english", "search_quote_analyzer": "standard"})
        );

        assert_eq!(Value::Object(Field::text_with("snowball").to_dict()), json!({"type": "text", "analyzer": "snowball"}));
    }

    #[test]
    fn keyword_keeps_normalizer() {
        let field = construct_field(json!({"type": "keyword", "normalizer": "lowercase"})).unwrap();
        match field.kind() {
            FieldKind::Keyword(options) => assert_eq!(options.normalizer.as_deref(), Some("lowercase")),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn legacy_string_type_resolves() {
        let field = construct_field("string").unwrap();
        assert_eq!(field.name(), "string");
        assert_eq!(Value::Object(field.to_dict()), json!({"type": "string"}));
    }
}
