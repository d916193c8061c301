//! Simple-type definitions: leaf value constraints
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::types::custom::{CustomRef, CustomValidator};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Facets shared by simple types and element declarations, as written in a
/// definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFacets {
    pub pattern: Option<String>,
    #[serde(default, deserialize_with = "de::opt_usize")]
    pub length: Option<usize>,
    #[serde(default, deserialize_with = "de::opt_usize")]
    pub min_length: Option<usize>,
    #[serde(default, deserialize_with = "de::opt_usize")]
    pub max_length: Option<usize>,
    pub enumeration: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub min_inclusive: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub max_inclusive: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub min_exclusive: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub max_exclusive: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_u32")]
    pub fraction_digits: Option<u32>,
}

impl RawFacets {
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
            && self.length.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.enumeration.is_none()
            && self.min_inclusive.is_none()
            && self.max_inclusive.is_none()
            && self.min_exclusive.is_none()
            && self.max_exclusive.is_none()
            && self.fraction_digits.is_none()
    }
}

/// A `simpleTypes` entry as written in a definition
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSimpleType {
    pub base: Option<String>,
    pub custom: Option<String>,
    #[serde(flatten)]
    pub facets: RawFacets,
}

/// A regular expression matched against the whole value
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source`, anchored at both ends
    pub fn new(type_name: &str, source: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", source)).map_err(|e| Error::InvalidPattern {
            type_name: type_name.to_string(),
            source: e,
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written, without the implicit anchors
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A compiled simple type
#[derive(Debug, Clone)]
pub struct SimpleType {
    pub name: String,
    pub base: Option<String>,
    pub pattern: Option<Pattern>,
    pub custom: Option<CustomRef>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub enumeration: Option<Vec<Value>>,
    pub min_inclusive: Option<f64>,
    pub max_inclusive: Option<f64>,
    pub min_exclusive: Option<f64>,
    pub max_exclusive: Option<f64>,
    pub fraction_digits: Option<u32>,
}

impl SimpleType {
    /// Compile a `simpleTypes` entry, binding its custom check by name
    pub fn compile(
        name: &str,
        raw: RawSimpleType,
        customs: &HashMap<String, Arc<dyn CustomValidator>>,
    ) -> Result<Self> {
        let custom = match raw.custom {
            Some(custom_name) => {
                let check = customs
                    .get(&custom_name)
                    .cloned()
                    .ok_or_else(|| Error::NoCustomFound {
                        name: custom_name.clone(),
                    })?;
                Some(CustomRef::new(custom_name, check))
            }
            None => None,
        };
        let mut simple = Self::from_facets(name, raw.base, raw.facets)?;
        simple.custom = custom;
        Ok(simple)
    }

    /// Build an anonymous type from bare facets
    pub fn from_facets(name: &str, base: Option<String>, facets: RawFacets) -> Result<Self> {
        let pattern = facets
            .pattern
            .as_deref()
            .map(|source| Pattern::new(name, source))
            .transpose()?;
        Ok(Self {
            name: name.to_string(),
            base,
            pattern,
            custom: None,
            // `length` only fills bounds that are not given explicitly
            min_length: facets.min_length.or(facets.length),
            max_length: facets.max_length.or(facets.length),
            enumeration: facets.enumeration,
            min_inclusive: facets.min_inclusive,
            max_inclusive: facets.max_inclusive,
            min_exclusive: facets.min_exclusive,
            max_exclusive: facets.max_exclusive,
            fraction_digits: facets.fraction_digits,
        })
    }

    pub fn has_length_facets(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }

    /// Whether any facet needs the value as a number
    pub fn has_numeric_facets(&self) -> bool {
        self.min_inclusive.is_some()
            || self.max_inclusive.is_some()
            || self.min_exclusive.is_some()
            || self.max_exclusive.is_some()
            || self.fraction_digits.is_some()
    }
}

/// Deserializers that accept numbers written either as JSON numbers or as
/// numeric strings
pub(crate) mod de {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use std::fmt::Display;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(crate) enum NumberOrText<N> {
        Number(N),
        Text(String),
    }

    impl<N> NumberOrText<N>
    where
        N: FromStr,
        N::Err: Display,
    {
        pub(crate) fn into_number(self) -> Result<N, String> {
            match self {
                Self::Number(n) => Ok(n),
                Self::Text(text) => text
                    .trim()
                    .parse::<N>()
                    .map_err(|e| format!("invalid number '{}': {}", text, e)),
            }
        }
    }

    fn optional<'de, D, N>(d: D) -> Result<Option<N>, D::Error>
    where
        D: Deserializer<'de>,
        N: Deserialize<'de> + FromStr,
        N::Err: Display,
    {
        Option::<NumberOrText<N>>::deserialize(d)?
            .map(NumberOrText::into_number)
            .transpose()
            .map_err(D::Error::custom)
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        optional(d)
    }

    pub fn opt_usize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        optional(d)
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        optional(d)
    }

    pub fn usize<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
        NumberOrText::<usize>::deserialize(d)?
            .into_number()
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(raw: Value) -> Result<SimpleType> {
        let raw: RawSimpleType = serde_json::from_value(raw).unwrap();
        SimpleType::compile("test", raw, &HashMap::new())
    }

    #[test]
    fn test_pattern_is_anchored() {
        let pattern = Pattern::new("digits", r"\d+").unwrap();
        assert!(pattern.is_match("123"));
        assert!(!pattern.is_match("a123"));
        assert!(!pattern.is_match("123a"));
        assert_eq!(pattern.as_str(), r"\d+");
    }

    #[test]
    fn test_invalid_pattern_is_a_schema_error() {
        let result = compile(json!({"pattern": "(unclosed"}));
        assert!(matches!(result, Err(Error::InvalidPattern { type_name, .. }) if type_name == "test"));
    }

    #[test]
    fn test_length_shorthand() {
        let simple = compile(json!({"length": 4})).unwrap();
        assert_eq!(simple.min_length, Some(4));
        assert_eq!(simple.max_length, Some(4));

        let simple = compile(json!({"length": 4, "maxLength": 8})).unwrap();
        assert_eq!(simple.min_length, Some(4));
        assert_eq!(simple.max_length, Some(8));
    }

    #[test]
    fn test_numeric_facets_accept_strings() {
        let simple = compile(json!({"minInclusive": "0", "maxExclusive": 10.5, "fractionDigits": "2"})).unwrap();
        assert_eq!(simple.min_inclusive, Some(0.0));
        assert_eq!(simple.max_exclusive, Some(10.5));
        assert_eq!(simple.fraction_digits, Some(2));
        assert!(simple.has_numeric_facets());
        assert!(!simple.has_length_facets());
    }

    #[test]
    fn test_unknown_custom_is_a_schema_error() {
        let result = compile(json!({"custom": "nope"}));
        assert!(matches!(result, Err(Error::NoCustomFound { name }) if name == "nope"));
    }

    #[test]
    fn test_raw_facets_is_empty() {
        assert!(RawFacets::default().is_empty());
        let facets: RawFacets = serde_json::from_value(json!({"maxLength": 3})).unwrap();
        assert!(!facets.is_empty());
    }
}
