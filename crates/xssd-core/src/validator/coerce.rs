//! Value coercions used by the simple-type checks
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::borrow::Cow;

/// Booleans become their canonical lowercase text before any check
pub fn canonical_bool(value: &Value) -> Cow<'_, Value> {
    match value {
        Value::Bool(flag) => Cow::Owned(Value::String(flag.to_string())),
        other => Cow::Borrowed(other),
    }
}

/// Text form of a scalar; `None` for null, lists and mappings
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text)),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Bool(flag) => Some(Cow::Owned(flag.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Length used by the length facets: characters of the text form, or the
/// size of a collection
pub fn value_length(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        other => scalar_text(other).map(|text| text.chars().count()),
    }
}

/// Numeric reading of a value, rejecting NaN and infinities
pub fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Digits after the decimal point, accounting for any exponent
///
/// `"1.50"` has two, `"1.5e-3"` has four, `"12e2"` has none. Exponents too
/// large for `i64` saturate, so the count saturates at `u32::MAX`.
pub fn fraction_digits(value: &Value) -> Option<u32> {
    let text = scalar_text(value)?;
    let text = text.trim();
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => (&text[..at], parse_exponent(&text[at + 1..])?),
        None => (text, 0),
    };
    let decimals = match mantissa.split_once('.') {
        Some((_, fraction)) => i64::try_from(fraction.len()).unwrap_or(i64::MAX),
        None => 0,
    };
    let digits = decimals.saturating_sub(exponent).max(0);
    Some(u32::try_from(digits).unwrap_or(u32::MAX))
}

fn parse_exponent(text: &str) -> Option<i64> {
    if let Ok(exponent) = text.parse::<i64>() {
        return Some(exponent);
    }
    let (negative, digits) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// JSON type name of a value, used in error contexts
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Equality for `fixed` and `match`: identical values, or scalars with the
/// same text or numeric value
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    if left == right {
        return true;
    }
    if let (Some(a), Some(b)) = (to_number(left), to_number(right)) {
        if matches!(left, Value::Number(_)) || matches!(right, Value::Number(_)) {
            return a == b;
        }
    }
    match (scalar_text(left), scalar_text(right)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_bool() {
        assert_eq!(*canonical_bool(&json!(true)), json!("true"));
        assert_eq!(*canonical_bool(&json!(false)), json!("false"));
        assert_eq!(*canonical_bool(&json!(1)), json!(1));
    }

    #[test]
    fn test_value_length() {
        assert_eq!(value_length(&json!("héllo")), Some(5));
        assert_eq!(value_length(&json!(12345)), Some(5));
        assert_eq!(value_length(&json!([1, 2])), Some(2));
        assert_eq!(value_length(&Value::Null), None);
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&json!("42")), Some(42.0));
        assert_eq!(to_number(&json!(" -1.5 ")), Some(-1.5));
        assert_eq!(to_number(&json!(7)), Some(7.0));
        assert_eq!(to_number(&json!("abc")), None);
        assert_eq!(to_number(&json!("NaN")), None);
        assert_eq!(to_number(&json!("inf")), None);
        assert_eq!(to_number(&json!(true)), None);
    }

    #[test]
    fn test_fraction_digits() {
        assert_eq!(fraction_digits(&json!("1.50")), Some(2));
        assert_eq!(fraction_digits(&json!("1.5e-3")), Some(4));
        assert_eq!(fraction_digits(&json!("12e2")), Some(0));
        assert_eq!(fraction_digits(&json!("1.25E1")), Some(1));
        assert_eq!(fraction_digits(&json!(3)), Some(0));
        assert_eq!(fraction_digits(&json!(0.125)), Some(3));
        assert_eq!(fraction_digits(&json!([1])), None);
    }

    #[test]
    fn test_fraction_digits_with_extreme_exponents() {
        assert_eq!(fraction_digits(&json!("1.5e-9223372036854775808")), Some(u32::MAX));
        assert_eq!(fraction_digits(&json!("1.5e-99999999999999999999")), Some(u32::MAX));
        assert_eq!(fraction_digits(&json!("1.5e-4294967296")), Some(u32::MAX));
        assert_eq!(fraction_digits(&json!("1.5e9223372036854775807")), Some(0));
        assert_eq!(fraction_digits(&json!("1.5e+99999999999999999999")), Some(0));
        assert_eq!(fraction_digits(&json!("1.5ex")), None);
    }

    #[test]
    fn test_loose_eq() {
        assert!(loose_eq(&json!("X"), &json!("X")));
        assert!(loose_eq(&json!("5"), &json!(5)));
        assert!(loose_eq(&json!(5), &json!(5.0)));
        assert!(loose_eq(&json!(true), &json!("true")));
        assert!(!loose_eq(&json!("5.0"), &json!("5")));
        assert!(!loose_eq(&json!({"a": 1}), &json!("a")));
        assert!(!loose_eq(&Value::Null, &json!("")));
    }
}
