//! Element declarations and definition lists
//!
//! A complex type is an ordered [`DefinitionList`]. Each item is either an
//! [`ElementDecl`] or a nested list, which validates with the inverted
//! combine mode of its parent.
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::types::simple::{de, RawFacets, SimpleType};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;

/// Upper occurrence bound of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    Bounded(usize),
    Unbounded,
}

impl Default for MaxOccurs {
    fn default() -> Self {
        Self::Bounded(1)
    }
}

impl<'de> Deserialize<'de> for MaxOccurs {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        use serde::de::Error as _;
        match de::NumberOrText::<usize>::deserialize(d)? {
            de::NumberOrText::Text(text) if text.trim() == "unbounded" => Ok(Self::Unbounded),
            other => other
                .into_number()
                .map(Self::Bounded)
                .map_err(D::Error::custom),
        }
    }
}

/// Where a `complexType` override points
#[derive(Debug, Clone)]
pub enum ComplexRef {
    /// A complex type registered under this name
    Named(String),
    /// An inline definition list
    Inline(DefinitionList),
}

fn default_type() -> String {
    "string".to_string()
}

fn one() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    name: String,
    #[serde(rename = "type", default = "default_type")]
    type_name: String,
    #[serde(default = "one", deserialize_with = "de::usize")]
    min_occurs: usize,
    #[serde(default)]
    max_occurs: MaxOccurs,
    default: Option<Value>,
    fixed: Option<Value>,
    #[serde(rename = "match")]
    match_path: Option<String>,
    not_match: Option<String>,
    complex_type: Option<Value>,
    #[serde(flatten)]
    facets: RawFacets,
}

/// One field's validation rule within a complex type
#[derive(Debug, Clone)]
pub struct ElementDecl {
    /// Key of the field in the data tree
    pub name: String,
    /// Simple or complex type name, `string` when not given
    pub type_name: String,
    pub min_occurs: usize,
    pub max_occurs: MaxOccurs,
    /// Substituted when the field is absent or null
    pub default: Option<Value>,
    /// The only value the field may hold
    pub fixed: Option<Value>,
    /// Path whose resolved value this field must equal
    pub match_path: Option<String>,
    /// Path whose resolved value this field must differ from
    pub not_match: Option<String>,
    /// Element-level facets, applied after the named simple type passes
    pub facets: Option<SimpleType>,
    /// Replaces `type_name` when present
    pub complex_type: Option<ComplexRef>,
}

impl ElementDecl {
    /// Parse one element declaration
    pub fn parse(location: &str, value: &Value) -> Result<Self> {
        let raw: RawElement = serde_json::from_value(value.clone())
            .map_err(|e| Error::invalid_definition(location, e.to_string()))?;
        let element_location = format!("{}/{}", location, raw.name);

        let facets = if raw.facets.is_empty() {
            None
        } else {
            Some(SimpleType::from_facets(&raw.type_name, None, raw.facets)?)
        };

        let complex_type = match raw.complex_type {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(ComplexRef::Named(name)),
            Some(list @ Value::Array(_)) => Some(ComplexRef::Inline(DefinitionList::parse(
                &element_location,
                &list,
            )?)),
            Some(other) => {
                return Err(Error::invalid_definition(
                    element_location,
                    format!("complexType must be a type name or a list, found {}", other),
                ))
            }
        };

        Ok(Self {
            name: raw.name,
            type_name: raw.type_name,
            min_occurs: raw.min_occurs,
            max_occurs: raw.max_occurs,
            default: raw.default,
            fixed: raw.fixed,
            match_path: raw.match_path,
            not_match: raw.not_match,
            facets,
            complex_type,
        })
    }
}

/// An item of a definition list
#[derive(Debug, Clone)]
pub enum DefinitionItem {
    Element(ElementDecl),
    /// A nested list, validated with the inverted combine mode
    Group(DefinitionList),
}

/// The ordered element declarations of a complex type
#[derive(Debug, Clone, Default)]
pub struct DefinitionList {
    items: Vec<DefinitionItem>,
}

impl DefinitionList {
    /// Parse a list of element declarations and nested lists
    pub fn parse(location: &str, value: &Value) -> Result<Self> {
        let Some(entries) = value.as_array() else {
            return Err(Error::invalid_definition(
                location,
                "definition list must be a list",
            ));
        };

        let mut items = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let item = match entry {
                Value::Array(_) => {
                    DefinitionItem::Group(Self::parse(&format!("{}[{}]", location, index), entry)?)
                }
                Value::Object(_) => DefinitionItem::Element(ElementDecl::parse(location, entry)?),
                other => {
                    return Err(Error::invalid_definition(
                        format!("{}[{}]", location, index),
                        format!("expected an element declaration or a list, found {}", other),
                    ))
                }
            };
            items.push(item);
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[DefinitionItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element names declared here or in any nested list
    pub fn declared_names(&self) -> HashSet<&str> {
        let mut names = HashSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut HashSet<&'a str>) {
        for item in &self.items {
            match item {
                DefinitionItem::Element(decl) => {
                    names.insert(decl.name.as_str());
                }
                DefinitionItem::Group(group) => group.collect_names(names),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_defaults() {
        let decl = ElementDecl::parse("root", &json!({"name": "title"})).unwrap();
        assert_eq!(decl.type_name, "string");
        assert_eq!(decl.min_occurs, 1);
        assert_eq!(decl.max_occurs, MaxOccurs::Bounded(1));
        assert!(decl.facets.is_none());
        assert!(decl.complex_type.is_none());
    }

    #[test]
    fn test_occurrence_parsing() {
        let decl = ElementDecl::parse(
            "root",
            &json!({"name": "tag", "minOccurs": "0", "maxOccurs": "unbounded"}),
        )
        .unwrap();
        assert_eq!(decl.min_occurs, 0);
        assert_eq!(decl.max_occurs, MaxOccurs::Unbounded);

        let decl = ElementDecl::parse("root", &json!({"name": "tag", "maxOccurs": 3})).unwrap();
        assert_eq!(decl.max_occurs, MaxOccurs::Bounded(3));
    }

    #[test]
    fn test_element_facets_and_paths() {
        let decl = ElementDecl::parse(
            "root",
            &json!({
                "name": "age",
                "type": "integer",
                "minInclusive": 0,
                "maxInclusive": 150,
                "match": "/other",
                "notMatch": "sibling"
            }),
        )
        .unwrap();
        let facets = decl.facets.unwrap();
        assert_eq!(facets.min_inclusive, Some(0.0));
        assert_eq!(facets.max_inclusive, Some(150.0));
        assert_eq!(decl.match_path.as_deref(), Some("/other"));
        assert_eq!(decl.not_match.as_deref(), Some("sibling"));
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let result = ElementDecl::parse("root", &json!({"type": "string"}));
        assert!(matches!(result, Err(Error::InvalidDefinition { .. })));
    }

    #[test]
    fn test_nested_lists_and_names() {
        let list = DefinitionList::parse(
            "root",
            &json!([
                {"name": "id"},
                [{"name": "email"}, {"name": "phone"}],
                {"name": "address", "complexType": [{"name": "city"}]}
            ]),
        )
        .unwrap();
        assert_eq!(list.items().len(), 3);
        assert!(matches!(list.items()[1], DefinitionItem::Group(_)));

        let names = list.declared_names();
        assert!(names.contains("id"));
        assert!(names.contains("email"));
        assert!(names.contains("phone"));
        assert!(names.contains("address"));
        assert!(!names.contains("city"));
    }

    #[test]
    fn test_definition_list_must_be_a_list() {
        let result = DefinitionList::parse("root", &json!({"name": "id"}));
        assert!(matches!(result, Err(Error::InvalidDefinition { location, .. }) if location == "root"));
    }
}
