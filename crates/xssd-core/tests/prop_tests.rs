//! Property-based tests for the error model and the validator
//!
//! These tests check the combine-mode rules and that validation never
//! panics across a wide range of inputs.

use proptest::prelude::*;
use serde_json::{json, Value};
use xssd_core::{CombineMode, ElementErrors, ErrorKind, Validator};

/// Strategy for generating random JSON values with controlled complexity
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-zA-Z0-9@. ]{0,30}".prop_map(Value::String),
    ];

    leaf.prop_recursive(
        3,  // max depth
        10, // max size
        5,  // items per collection
        |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                proptest::collection::hash_map("[a-z_]{1,8}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        },
    )
}

fn outcome_kind_strategy() -> impl Strategy<Value = ErrorKind> {
    proptest::sample::select(ErrorKind::ALL.to_vec())
}

fn combine_mode_strategy() -> impl Strategy<Value = CombineMode> {
    prop_oneof![Just(CombineMode::And), Just(CombineMode::Or)]
}

fn sample_validator() -> Validator {
    Validator::new(&json!({
        "complexTypes": {
            "Person": [
                {"name": "email", "type": "email"},
                {"name": "age", "type": "integer", "minOccurs": 0, "maxInclusive": 150},
                [{"name": "phone", "minOccurs": 0}, {"name": "fax", "minOccurs": 0}]
            ]
        },
        "root": [
            {"name": "owner", "type": "Person"},
            {"name": "tags", "type": "token", "minOccurs": 0, "maxOccurs": "unbounded"},
            {"name": "ratio", "type": "percentage", "minOccurs": 0},
            {"name": "code", "fixed": "X", "minOccurs": 0},
            {"name": "same", "match": "/code", "minOccurs": 0}
        ]
    }))
    .unwrap()
}

proptest! {
    #[test]
    fn prop_combine_mode_truthiness(
        mode in combine_mode_strategy(),
        kinds in proptest::collection::vec(outcome_kind_strategy(), 0..8)
    ) {
        let mut errors = ElementErrors::new(mode);
        for (i, kind) in kinds.iter().enumerate() {
            errors.set(format!("e{}", i), *kind);
        }
        let expected = match mode {
            CombineMode::And => kinds.iter().any(|kind| kind.is_error()),
            CombineMode::Or => !kinds.is_empty() && kinds.iter().all(|kind| kind.is_error()),
        };
        prop_assert_eq!(errors.is_error(), expected);
    }

    #[test]
    fn prop_set_then_pop_restores_truthiness(
        mode in combine_mode_strategy(),
        kinds in proptest::collection::vec(outcome_kind_strategy(), 0..6),
        extra in outcome_kind_strategy()
    ) {
        let mut errors = ElementErrors::new(mode);
        for (i, kind) in kinds.iter().enumerate() {
            errors.set(format!("e{}", i), *kind);
        }
        let before = errors.is_error();
        errors.set("extra", extra);
        errors.pop("extra");
        prop_assert_eq!(errors.is_error(), before);
        prop_assert_eq!(errors.len(), kinds.len());
    }

    #[test]
    fn prop_validation_never_panics(data in json_value_strategy()) {
        let validator = sample_validator();
        if let Ok(report) = validator.validate(&data) {
            // a repeated entry is the only thing explain refuses
            let has_repeated = report.iter().any(|(_, outcome)| outcome.as_repeated().is_some());
            prop_assert_eq!(report.explain(true).is_ok(), !has_repeated);
        }
    }

    #[test]
    fn prop_validation_is_idempotent(data in json_value_strategy()) {
        let validator = sample_validator();
        match (validator.validate(&data), validator.validate(&data)) {
            (Ok(first), Ok(second)) => prop_assert_eq!(first, second),
            (Err(first), Err(second)) => prop_assert_eq!(first.to_string(), second.to_string()),
            _ => prop_assert!(false, "outcomes differ between calls"),
        }
    }

    #[test]
    fn prop_integers_accepted(n in any::<i64>()) {
        let validator = sample_validator();
        let outcome = validator.validate_type("integer", &json!(n.to_string())).unwrap();
        prop_assert!(outcome == ErrorKind::NoError);
    }

    #[test]
    fn prop_letters_are_not_integers(text in "[a-z]{1,8}") {
        let validator = sample_validator();
        let outcome = validator.validate_type("integer", &json!(text)).unwrap();
        prop_assert!(outcome == ErrorKind::InvalidPattern);
    }
}
