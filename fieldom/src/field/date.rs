//! Date fields: string parsing, default timezone attachment and epoch milliseconds.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

use super::{Field, FieldKind};
use crate::errors::{FieldError, FieldResult};
use crate::params::Params;
use crate::registry::FieldRegistration;
use crate::value::FieldValue;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y%m%dT%H%M%S%.f%z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y%m%dT%H%M%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d %B %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%Y%m%d",
];

/// Zone designators accepted after a wall-clock time, all meaning UTC.
const UTC_SUFFIXES: &[&str] = &["UTC", "GMT", "Z"];

/// Options of a `date` field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateOptions {
    /// Zone attached to naive date-times on deserialization.
    pub default_timezone: Option<Tz>,
}

impl DateOptions {
    pub fn with_timezone(name: &str) -> FieldResult<Self> {
        Ok(Self {
            default_timezone: Some(parse_timezone(name)?),
        })
    }

    pub(super) fn deserialize(&self, value: FieldValue) -> FieldResult<FieldValue> {
        let value = match value {
            FieldValue::String(text) if text.trim().is_empty() => return Ok(FieldValue::Null),
            FieldValue::String(text) => parse_date(&text)?,
            other => other,
        };

        match value {
            FieldValue::Null => Ok(FieldValue::Null),
            FieldValue::DateTime(naive) => match self.default_timezone {
                Some(tz) => Ok(FieldValue::DateTimeTz(localize(tz, naive))),
                None => Ok(FieldValue::DateTime(naive)),
            },
            FieldValue::DateTimeTz(_) | FieldValue::Date(_) => Ok(value),
            FieldValue::Integer(millis) => DateTime::from_timestamp_millis(millis)
                .map(|instant| FieldValue::DateTimeTz(instant.fixed_offset()))
                .ok_or_else(|| FieldError::validation(format!("epoch milliseconds out of range ({millis})"))),
            other => Err(FieldError::validation(format!(
                "could not parse date from the value ({})",
                other.to_json()
            ))),
        }
    }
}

fn parse_timezone(name: &str) -> FieldResult<Tz> {
    name.parse::<Tz>()
        .map_err(|err| FieldError::config(format!("unknown timezone `{name}`: {err}")))
}

/// Attaches `tz` to a wall-clock time. Ambiguous times take the earlier
/// offset. Times inside a DST gap take the zone offset at that wall time read as UTC.
fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<FixedOffset> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(datetime) => datetime.fixed_offset(),
        LocalResult::Ambiguous(earliest, _) => earliest.fixed_offset(),
        LocalResult::None => {
            let offset = tz.offset_from_utc_datetime(&naive).fix();
            DateTime::from_naive_utc_and_offset(naive - offset, offset)
        }
    }
}

fn parse_date(text: &str) -> FieldResult<FieldValue> {
    let text = text.trim();

    let mut last_err = match DateTime::parse_from_rfc3339(text) {
        Ok(datetime) => return Ok(FieldValue::DateTimeTz(datetime)),
        Err(err) => err,
    };
    for format in OFFSET_FORMATS {
        match DateTime::parse_from_str(text, format) {
            Ok(datetime) => return Ok(FieldValue::DateTimeTz(datetime)),
            Err(err) => last_err = err,
        }
    }
    if let Some(wall) = UTC_SUFFIXES.iter().find_map(|suffix| text.strip_suffix(suffix)) {
        for format in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(wall.trim_end(), format) {
                return Ok(FieldValue::DateTimeTz(naive.and_utc().fixed_offset()));
            }
        }
    }
    for format in DATETIME_FORMATS {
        match NaiveDateTime::parse_from_str(text, format) {
            Ok(naive) => return Ok(FieldValue::DateTime(naive)),
            Err(err) => last_err = err,
        }
    }
    for format in DATE_FORMATS {
        match NaiveDate::parse_from_str(text, format) {
            Ok(date) => return Ok(FieldValue::DateTime(date.and_time(chrono::NaiveTime::MIN))),
            Err(err) => last_err = err,
        }
    }

    log::debug!("no date format matched {text:?}");
    Err(FieldError::validation_with(
        format!("could not parse date from the value ({text:?})"),
        last_err,
    ))
}

fn build_date(params: &mut Params) -> FieldResult<FieldKind> {
    let default_timezone = match params.take_string("default_timezone")? {
        Some(name) => Some(parse_timezone(&name)?),
        None => None,
    };
    Ok(FieldKind::Date(DateOptions { default_timezone }))
}

inventory::submit! { FieldRegistration::new("date", build_date) }

impl Field {
    pub fn date() -> Self {
        Field::new(FieldKind::Date(DateOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::construct_field;
    use serde_json::{Value, json};

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
    }

    #[test]
    fn iso_string_without_zone_stays_naive() {
        let field = Field::date();
        assert_eq!(
            field.deserialize("2016-01-01T00:00:00").unwrap(),
            FieldValue::DateTime(naive(2016, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            field.deserialize("2016-01-01").unwrap(),
            FieldValue::DateTime(naive(2016, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            field.deserialize("2016-01-01 10:20").unwrap(),
            FieldValue::DateTime(naive(2016, 1, 1, 10, 20, 0))
        );
    }

    #[test]
    fn offsets_are_preserved() {
        let value = Field::date().deserialize("2016-01-01T10:00:00+02:00").unwrap();
        match value {
            FieldValue::DateTimeTz(datetime) => {
                assert_eq!(datetime.offset().local_minus_utc(), 7200);
                assert_eq!(datetime.naive_local(), naive(2016, 1, 1, 10, 0, 0));
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn default_timezone_is_attached_to_naive_values() {
        let field = construct_field(json!({"type": "date", "default_timezone": "Europe/Prague"})).unwrap();
        let value = field.deserialize("2016-07-01T12:00:00").unwrap();
        assert_eq!(value.to_json(), json!("2016-07-01T12:00:00+02:00"));

        let aware = field.deserialize("2016-07-01T12:00:00Z").unwrap();
        assert_eq!(aware.to_json(), json!("2016-07-01T12:00:00+00:00"));
    }

    #[test]
    fn default_timezone_is_not_emitted() {
        let field = construct_field(json!({"type": "date", "default_timezone": "UTC", "format": "yyyy"})).unwrap();
        assert_eq!(Value::Object(field.to_dict()), json!({"type": "date", "format": "yyyy"}));
    }

    #[test]
    fn unknown_timezone_fails_at_construction() {
        assert!(matches!(
            construct_field(json!({"type": "date", "default_timezone": "Mars/Olympus"})),
            Err(FieldError::Config { .. })
        ));
        assert!(DateOptions::with_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn epoch_milliseconds_are_utc_instants() {
        let value = Field::date().deserialize(1_456_000_000_123_i64).unwrap();
        assert_eq!(value.to_json(), json!("2016-02-20T20:26:40.123+00:00"));
        assert_eq!(
            Field::date().deserialize(0).unwrap().to_json(),
            json!("1970-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn empty_and_null_become_null() {
        let field = Field::date();
        assert_eq!(field.deserialize("").unwrap(), FieldValue::Null);
        assert_eq!(field.deserialize(FieldValue::Null).unwrap(), FieldValue::Null);
    }

    #[test]
    fn garbage_is_a_validation_error() {
        let field = Field::date();
        let err = field.deserialize("not a date").unwrap_err();
        assert!(matches!(err, FieldError::Validation { source: Some(_), .. }));
        assert!(matches!(field.deserialize(1.5), Err(FieldError::Validation { .. })));
        assert!(matches!(field.deserialize(json!({"a": 1})), Err(FieldError::Validation { .. })));
    }

    #[test]
    fn compact_iso_forms_parse() {
        let field = Field::date();
        assert_eq!(
            field.deserialize("20160101").unwrap(),
            FieldValue::DateTime(naive(2016, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            field.deserialize("20160101T103000").unwrap(),
            FieldValue::DateTime(naive(2016, 1, 1, 10, 30, 0))
        );
        assert_eq!(
            field.deserialize("20160101T103000.250+0100").unwrap().to_json(),
            json!("2016-01-01T10:30:00.250+01:00")
        );
    }

    #[test]
    fn trailing_utc_designator_makes_value_aware() {
        let field = construct_field(json!({"type": "date", "default_timezone": "Asia/Tokyo"})).unwrap();
        for raw in ["2016-01-01 00:00:00 UTC", "2016-01-01 00:00:00 GMT", "20160101T000000Z"] {
            assert_eq!(
                field.deserialize(raw).unwrap().to_json(),
                json!("2016-01-01T00:00:00+00:00"),
                "{raw}"
            );
        }
        assert!(field.deserialize("2016-01-01 UTC UTC").is_err());
    }

    #[test]
    fn calendar_dates_pass_through() {
        let date = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(Field::date().deserialize(date).unwrap(), FieldValue::Date(date));
    }
}
