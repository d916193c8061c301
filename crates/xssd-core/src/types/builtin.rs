//! Built-in simple types copied into every registry
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::error::Result;
use crate::report::{ErrorKind, ValidateError};
use crate::types::registry::TypeRegistry;
use crate::types::simple::SimpleType;
use chrono::format::ParseErrorKind;
use chrono::{DateTime, NaiveDateTime};
use serde_json::{json, Value};

const ZONED_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// The built-in `simpleTypes` table, in definition form
pub fn definition() -> Value {
    json!({
        "simpleTypes": {
            "string": {"pattern": "(?s).*"},
            "integer": {"pattern": r"[-+]?\d+"},
            "index": {"pattern": r"\d+"},
            "double": {"pattern": r"[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?"},
            "token": {"base": "string", "pattern": r"\w+"},
            "boolean": {"pattern": "true|false|1|0"},
            "email": {"pattern": r"[^@\s]+@[^@\s]+\.[^@\s]+"},
            "date": {"pattern": r"\d{4}-\d{2}-\d{2}"},
            "time": {"pattern": r"\d{2}:\d{2}(:\d{2}(\.\d+)?)?"},
            "datetime": {
                "pattern": r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?",
                "custom": "datetime"
            },
            "percentage": {"base": "double", "minInclusive": 0, "maxInclusive": 100}
        }
    })
}

/// Register the built-in custom checks and simple types
pub fn install(registry: &mut TypeRegistry) -> Result<()> {
    registry.register_custom("datetime", check_datetime);
    registry.load(&definition(), None)
}

/// Check that a datetime string names a real instant
///
/// Out-of-range fields (month 13, February 30) are `INVALID_DATE`; text
/// chrono cannot read at all is `INVALID_DATE_FORMAT`.
pub fn check_datetime(value: &Value, _type_def: &SimpleType) -> Option<ValidateError> {
    let Some(text) = value.as_str() else {
        return Some(ValidateError::with_context(ErrorKind::InvalidDateFormat, value.clone()));
    };

    let mut normalized = text.trim().replacen(' ', "T", 1);
    if normalized.ends_with('Z') {
        normalized.pop();
        normalized.push_str("+00:00");
    }

    let mut out_of_range = false;
    for format in ZONED_FORMATS {
        match DateTime::parse_from_str(&normalized, format) {
            Ok(_) => return None,
            Err(e) => out_of_range |= is_out_of_range(e.kind()),
        }
    }
    for format in LOCAL_FORMATS {
        match NaiveDateTime::parse_from_str(&normalized, format) {
            Ok(_) => return None,
            Err(e) => out_of_range |= is_out_of_range(e.kind()),
        }
    }

    let kind = if out_of_range {
        ErrorKind::InvalidDate
    } else {
        ErrorKind::InvalidDateFormat
    };
    Some(ValidateError::with_context(kind, text))
}

fn is_out_of_range(kind: ParseErrorKind) -> bool {
    matches!(kind, ParseErrorKind::OutOfRange | ParseErrorKind::Impossible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::simple::RawFacets;

    fn datetime_type() -> SimpleType {
        SimpleType::from_facets("datetime", None, RawFacets::default()).unwrap()
    }

    #[test]
    fn test_valid_datetimes() {
        let def = datetime_type();
        for text in [
            "2021-03-04T10:20:30",
            "2021-03-04 10:20",
            "2021-03-04T10:20:30.125Z",
            "2021-03-04T10:20:30+02:00",
            "2021-03-04T10:20:30-0500",
        ] {
            assert!(check_datetime(&json!(text), &def).is_none(), "{} should be valid", text);
        }
    }

    #[test]
    fn test_impossible_date() {
        let def = datetime_type();
        let result = check_datetime(&json!("2021-02-30T10:00:00"), &def).unwrap();
        assert_eq!(result, ErrorKind::InvalidDate);
        let result = check_datetime(&json!("2021-13-01T10:00:00"), &def).unwrap();
        assert_eq!(result, ErrorKind::InvalidDate);
    }

    #[test]
    fn test_unreadable_datetime() {
        let def = datetime_type();
        let result = check_datetime(&json!("yesterday"), &def).unwrap();
        assert_eq!(result, ErrorKind::InvalidDateFormat);
        let result = check_datetime(&json!(42), &def).unwrap();
        assert_eq!(result, ErrorKind::InvalidDateFormat);
    }

    #[test]
    fn test_builtins_install() {
        let registry = TypeRegistry::with_builtins().unwrap();
        for name in [
            "string", "integer", "index", "double", "token", "boolean", "email", "date", "time",
            "datetime", "percentage",
        ] {
            assert!(registry.simple(name).is_some(), "missing built-in {}", name);
        }
        assert!(registry.simple("datetime").unwrap().custom.is_some());
        assert!(!registry.has_root());
    }
}
