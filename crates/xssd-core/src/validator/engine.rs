//! Recursive descent over a definition list and a data tree
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::report::{CombineMode, ElementErrors, ErrorKind, Outcome, ValidateError};
use crate::types::{ComplexRef, DefinitionItem, DefinitionList, ElementDecl, MaxOccurs, SimpleType, TypeDef, TypeRegistry};
use crate::validator::coerce::{self, canonical_bool, json_type_name, loose_eq, scalar_text, to_number, value_length};
use crate::validator::context::ValidationContext;
use crate::validator::ValidatorConfig;
use serde_json::{json, Map, Value};
use std::borrow::Cow;
use tracing::{trace, warn};

/// Borrowed view of a validator for the duration of one call
pub(crate) struct Engine<'v> {
    pub registry: &'v TypeRegistry,
    pub config: &'v ValidatorConfig,
}

impl<'v> Engine<'v> {
    /// Validate every declaration of `list` against the fields of `data`
    ///
    /// Nested lists run with the inverted mode and are merged into this
    /// level. Undeclared keys are flagged only on a primary level.
    pub fn validate_elements(
        &self,
        list: &DefinitionList,
        data: &Map<String, Value>,
        mode: CombineMode,
        primary: bool,
        ctx: &ValidationContext<'_>,
    ) -> Result<ElementErrors> {
        let mut errors = ElementErrors::new(mode);

        for item in list.items() {
            match item {
                DefinitionItem::Element(decl) => {
                    let element_ctx = ctx.child(&decl.name);
                    let outcome = self.validate_element(decl, data, &element_ctx)?;
                    trace!(path = %element_ctx.path, failed = outcome.is_error(), "element validated");
                    errors.set(decl.name.clone(), outcome);
                }
                DefinitionItem::Group(group) => {
                    let group_errors = self.validate_elements(group, data, mode.invert(), false, ctx)?;
                    errors.update(group_errors);
                }
            }
        }

        if primary && self.config.strict_exist {
            let declared = list.declared_names();
            for key in data.keys().filter(|key| !declared.contains(key.as_str())) {
                trace!(path = %ctx.child(key).path, "undeclared element");
                errors.set(
                    key.clone(),
                    ValidateError::with_context(ErrorKind::InvalidExist, key.as_str()),
                );
            }
        }

        Ok(errors)
    }

    /// Apply occurrence rules, then check each occurrence
    fn validate_element(
        &self,
        decl: &ElementDecl,
        data: &Map<String, Value>,
        ctx: &ValidationContext<'_>,
    ) -> Result<Outcome> {
        let present = data.get(&decl.name);
        let mut occurrences: Vec<&Value> = match present {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(value) => vec![value],
            None => Vec::new(),
        };

        if decl.min_occurs >= 1 {
            match (present, &decl.default) {
                (None, None) => return Ok(ErrorKind::InvalidRequired.into()),
                (None, Some(default)) => occurrences.push(default),
                (Some(_), _) if occurrences.len() < decl.min_occurs => {
                    return Ok(ValidateError::with_context(
                        ErrorKind::InvalidMinOccurs,
                        json!([decl.min_occurs, occurrences.len()]),
                    )
                    .into());
                }
                _ => {}
            }
        } else if present.is_none() {
            return Ok(ValidateError::empty_ok().into());
        }

        if let MaxOccurs::Bounded(max) = decl.max_occurs {
            let max = max.max(decl.min_occurs);
            if occurrences.len() > max {
                return Ok(ValidateError::with_context(
                    ErrorKind::InvalidMaxOccurs,
                    json!([max, occurrences.len()]),
                )
                .into());
            }
        }

        let repeated = occurrences.len() > 1;
        let mut outcomes = Vec::with_capacity(occurrences.len());
        for (index, value) in occurrences.into_iter().enumerate() {
            let occurrence_ctx = if repeated {
                ctx.child_index(index)
            } else {
                ctx.clone()
            };
            outcomes.push(self.validate_occurrence(decl, value, data, &occurrence_ctx)?);
        }

        Ok(match outcomes.len() {
            0 => ValidateError::empty_ok().into(),
            1 => outcomes.remove(0),
            _ => Outcome::Repeated(outcomes),
        })
    }

    /// `fixed`, default substitution, `match`/`notMatch`, then the type
    fn validate_occurrence(
        &self,
        decl: &ElementDecl,
        value: &Value,
        siblings: &Map<String, Value>,
        ctx: &ValidationContext<'_>,
    ) -> Result<Outcome> {
        if let Some(fixed) = &decl.fixed {
            let outcome = if loose_eq(value, fixed) {
                ValidateError::ok()
            } else {
                ValidateError::with_context(ErrorKind::InvalidValue, json!([fixed, value]))
            };
            return Ok(outcome.into());
        }

        let value = match (value, &decl.default) {
            (Value::Null, Some(default)) => default,
            (value, _) => value,
        };

        if let Some(path) = &decl.match_path {
            let resolved = ctx.resolve(path, siblings);
            if !resolved.as_ref().is_ok_and(|expected| loose_eq(expected, value)) {
                let expected = match resolved {
                    Ok(expected) => expected.clone(),
                    Err(sentinel) => Value::String(sentinel.to_string()),
                };
                return Ok(ValidateError::with_context(ErrorKind::InvalidMatch, json!([expected, value])).into());
            }
        }

        if let Some(path) = &decl.not_match {
            if let Ok(expected) = ctx.resolve(path, siblings) {
                if loose_eq(expected, value) {
                    return Ok(ValidateError::with_context(ErrorKind::InvalidMatch, json!([expected, value])).into());
                }
            }
        }

        self.validate_declared(decl, value, ctx)
    }

    /// Type validation for a declaration: `complexType` wins over `type`, and
    /// element facets refine a simple type that already passed
    fn validate_declared(
        &self,
        decl: &ElementDecl,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Outcome> {
        let value = canonical_bool(value);

        if let Some(complex) = &decl.complex_type {
            if decl.facets.is_some() {
                warn!(path = %ctx.path, "facets on a complexType element are ignored");
            }
            return match complex {
                ComplexRef::Named(name) => self.validate_named(name, &value, ctx),
                ComplexRef::Inline(list) => self.validate_complex(list, &value, ctx),
            };
        }

        match self.lookup(&decl.type_name)? {
            TypeDef::Complex(list) => {
                if decl.facets.is_some() {
                    warn!(path = %ctx.path, type_name = %decl.type_name, "facets on a complex-typed element are ignored");
                }
                self.validate_complex(list, &value, ctx)
            }
            TypeDef::Simple(simple) => {
                let outcome = self.validate_simple(simple, &value, ctx)?;
                match &decl.facets {
                    Some(facets) if !outcome.is_error() => {
                        Ok(self.validate_simple(facets, &value, ctx)?.into())
                    }
                    _ => Ok(outcome.into()),
                }
            }
        }
    }

    /// Validate a value against any registered type
    pub fn validate_named(&self, type_name: &str, value: &Value, ctx: &ValidationContext<'_>) -> Result<Outcome> {
        let value: Cow<'_, Value> = canonical_bool(value);
        match self.lookup(type_name)? {
            TypeDef::Complex(list) => self.validate_complex(list, &value, ctx),
            TypeDef::Simple(simple) => Ok(self.validate_simple(simple, &value, ctx)?.into()),
        }
    }

    /// A complex value must be a mapping; its fields form a new primary level
    pub fn validate_complex(
        &self,
        list: &DefinitionList,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<Outcome> {
        let Some(fields) = value.as_object() else {
            return Ok(ValidateError::with_context(ErrorKind::InvalidComplex, json_type_name(value)).into());
        };
        let inner = ctx.descend()?;
        let errors = self.validate_elements(list, fields, CombineMode::And, true, &inner)?;
        Ok(Outcome::Nested(errors))
    }

    /// Simple-type checks in fixed order, stopping at the first failure
    pub fn validate_simple(
        &self,
        simple: &SimpleType,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> Result<ValidateError> {
        if let Some(base_name) = &simple.base {
            let base = match self.lookup(base_name)? {
                TypeDef::Simple(base) => base,
                TypeDef::Complex(_) => {
                    return Err(Error::invalid_definition(
                        format!("simpleTypes/{}", simple.name),
                        format!("base '{}' is a complex type", base_name),
                    ))
                }
            };
            let outcome = self.validate_simple(base, value, &ctx.descend()?)?;
            if outcome.is_error() {
                return Ok(outcome);
            }
        }

        if let Some(pattern) = &simple.pattern {
            match scalar_text(value) {
                Some(text) if pattern.is_match(&text) => {}
                Some(_) => {
                    return Ok(ValidateError::with_context(
                        ErrorKind::InvalidPattern,
                        json!([pattern.as_str(), value]),
                    ))
                }
                None => {
                    return Ok(ValidateError::with_context(
                        ErrorKind::InvalidPattern,
                        json!([simple.name, json_type_name(value)]),
                    ))
                }
            }
        }

        if let Some(custom) = &simple.custom {
            if let Some(outcome) = custom.check(value, simple) {
                if outcome.is_error() {
                    return Ok(outcome);
                }
            }
        }

        if simple.has_length_facets() {
            let Some(length) = value_length(value) else {
                return Ok(ValidateError::with_context(ErrorKind::InvalidType, json_type_name(value)));
            };
            if let Some(max) = simple.max_length.filter(|max| length > *max) {
                return Ok(ValidateError::with_context(ErrorKind::InvalidMaxLength, json!([max, length])));
            }
            if let Some(min) = simple.min_length.filter(|min| length < *min) {
                return Ok(ValidateError::with_context(ErrorKind::InvalidMinLength, json!([min, length])));
            }
        }

        if let Some(allowed) = &simple.enumeration {
            if !allowed.contains(value) {
                return Ok(ValidateError::with_context(ErrorKind::InvalidEnumeration, value.clone()));
            }
        }

        if simple.has_numeric_facets() {
            let Some(number) = to_number(value) else {
                return Ok(ValidateError::with_context(ErrorKind::InvalidNumber, value.clone()));
            };
            if let Some(bound) = simple.min_inclusive.filter(|bound| number < *bound) {
                return Ok(ValidateError::with_context(ErrorKind::InvalidMinRange, json!([bound, number])));
            }
            if let Some(bound) = simple.max_inclusive.filter(|bound| number > *bound) {
                return Ok(ValidateError::with_context(ErrorKind::InvalidMaxRange, json!([bound, number])));
            }
            if let Some(bound) = simple.min_exclusive.filter(|bound| number <= *bound) {
                return Ok(ValidateError::with_context(ErrorKind::InvalidMinRange, json!([bound, number])));
            }
            if let Some(bound) = simple.max_exclusive.filter(|bound| number >= *bound) {
                return Ok(ValidateError::with_context(ErrorKind::InvalidMaxRange, json!([bound, number])));
            }
            if let Some(bound) = simple.fraction_digits {
                let digits = coerce::fraction_digits(value).unwrap_or(0);
                if digits > bound {
                    return Ok(ValidateError::with_context(ErrorKind::InvalidFraction, json!([bound, digits])));
                }
            }
        }

        Ok(ValidateError::ok())
    }

    fn lookup(&self, name: &str) -> Result<&'v TypeDef> {
        self.registry.get(name).ok_or_else(|| Error::NoTypeFound {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry(definition: Value) -> TypeRegistry {
        let mut registry = TypeRegistry::with_builtins().unwrap();
        registry.load(&definition, None).unwrap();
        registry
    }

    fn simple(registry: &TypeRegistry, type_name: &str, value: Value) -> ValidateError {
        let config = ValidatorConfig::default();
        let engine = Engine { registry, config: &config };
        let ctx = ValidationContext::new(&value, config.max_depth);
        engine
            .validate_simple(registry.simple(type_name).unwrap(), &value, &ctx)
            .unwrap()
    }

    #[test]
    fn test_base_failure_propagates() {
        let registry = registry(json!({
            "simpleTypes": {
                "small": {"base": "integer", "maxInclusive": 10}
            }
        }));
        assert_eq!(simple(&registry, "small", json!("abc")), ErrorKind::InvalidPattern);
        assert_eq!(simple(&registry, "small", json!("11")), ErrorKind::InvalidMaxRange);
        assert_eq!(simple(&registry, "small", json!("7")), ErrorKind::NoError);
    }

    #[test]
    fn test_pattern_context() {
        let registry = registry(json!({}));
        let outcome = simple(&registry, "integer", json!("4x"));
        assert_eq!(outcome.context(), Some(&json!([r"[-+]?\d+", "4x"])));

        let outcome = simple(&registry, "integer", json!({"a": 1}));
        assert_eq!(outcome, ErrorKind::InvalidPattern);
        assert_eq!(outcome.context(), Some(&json!(["integer", "object"])));
    }

    #[test]
    fn test_length_checks() {
        let registry = registry(json!({
            "simpleTypes": {"code": {"minLength": 2, "maxLength": 4}}
        }));
        assert_eq!(simple(&registry, "code", json!("a")), ErrorKind::InvalidMinLength);
        assert_eq!(simple(&registry, "code", json!("abcde")), ErrorKind::InvalidMaxLength);
        assert_eq!(simple(&registry, "code", json!("abc")), ErrorKind::NoError);
    }

    #[test]
    fn test_enumeration_is_exact() {
        let registry = registry(json!({
            "simpleTypes": {"colour": {"enumeration": ["red", "green"]}}
        }));
        assert_eq!(simple(&registry, "colour", json!("red")), ErrorKind::NoError);
        assert_eq!(simple(&registry, "colour", json!("Red")), ErrorKind::InvalidEnumeration);
    }

    #[test]
    fn test_numeric_bounds() {
        let registry = registry(json!({
            "simpleTypes": {
                "open": {"minExclusive": 0, "maxExclusive": 1},
                "money": {"fractionDigits": 2}
            }
        }));
        assert_eq!(simple(&registry, "open", json!("0")), ErrorKind::InvalidMinRange);
        assert_eq!(simple(&registry, "open", json!(1)), ErrorKind::InvalidMaxRange);
        assert_eq!(simple(&registry, "open", json!("0.5")), ErrorKind::NoError);
        assert_eq!(simple(&registry, "open", json!("half")), ErrorKind::InvalidNumber);
        assert_eq!(simple(&registry, "money", json!("1.25")), ErrorKind::NoError);
        assert_eq!(simple(&registry, "money", json!("1.255")), ErrorKind::InvalidFraction);
    }

    #[test]
    fn test_custom_after_pattern() {
        let mut registry = TypeRegistry::with_builtins().unwrap();
        registry.register_custom("even", |value: &Value, _: &SimpleType| {
            match to_number(value) {
                Some(n) if n % 2.0 == 0.0 => None,
                _ => Some(ValidateError::with_context(ErrorKind::InvalidCustom, value.clone())),
            }
        });
        registry
            .load(&json!({"simpleTypes": {"even": {"base": "integer", "custom": "even"}}}), None)
            .unwrap();
        assert_eq!(simple(&registry, "even", json!("4")), ErrorKind::NoError);
        assert_eq!(simple(&registry, "even", json!("5")), ErrorKind::InvalidCustom);
        assert_eq!(simple(&registry, "even", json!("x")), ErrorKind::InvalidPattern);
    }

    #[test]
    fn test_base_cycle_hits_depth_limit() {
        let registry = registry(json!({
            "simpleTypes": {"a": {"base": "b"}, "b": {"base": "a"}}
        }));
        let config = ValidatorConfig::default();
        let engine = Engine { registry: &registry, config: &config };
        let value = json!("x");
        let ctx = ValidationContext::new(&value, config.max_depth);
        let result = engine.validate_simple(registry.simple("a").unwrap(), &value, &ctx);
        assert!(matches!(result, Err(Error::MaxDepthExceeded { .. })));
    }

    #[test]
    fn test_complex_base_is_rejected() {
        let registry = registry(json!({
            "complexTypes": {"Person": [{"name": "id"}]},
            "simpleTypes": {"odd": {"base": "Person"}}
        }));
        let config = ValidatorConfig::default();
        let engine = Engine { registry: &registry, config: &config };
        let value = json!("x");
        let ctx = ValidationContext::new(&value, config.max_depth);
        let result = engine.validate_simple(registry.simple("odd").unwrap(), &value, &ctx);
        assert!(matches!(result, Err(Error::InvalidDefinition { .. })));
    }
}
