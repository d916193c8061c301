//! Composite error-report tree
//!
//! An [`ElementErrors`] maps element names to [`Outcome`]s and derives its own
//! error state from its children according to a [`CombineMode`]:
//!
//! - **And**: in error when at least one child is in error.
//! - **Or**: in error only when at least one child was added and every added
//!   child is in error ("all alternatives failed").
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::report::kind::{ErrorKind, ValidateError};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::ops::Index;

const INDENT: &str = "  ";

/// How a node combines the error state of its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CombineMode {
    /// Any failing child fails the node
    #[default]
    And,
    /// The node fails only when every child failed
    Or,
}

impl CombineMode {
    /// The mode used for a nested definition sublist
    pub const fn invert(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

/// What a single element name maps to in a report
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// One occurrence of a simple-typed element
    Single(ValidateError),
    /// Several occurrences of the same element
    Repeated(Vec<Outcome>),
    /// One occurrence of a complex-typed element
    Nested(ElementErrors),
}

impl Outcome {
    /// A repeated outcome is in error if any occurrence is
    pub fn is_error(&self) -> bool {
        match self {
            Self::Single(error) => error.is_error(),
            Self::Repeated(items) => items.iter().any(Outcome::is_error),
            Self::Nested(errors) => errors.is_error(),
        }
    }

    pub fn as_single(&self) -> Option<&ValidateError> {
        match self {
            Self::Single(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&ElementErrors> {
        match self {
            Self::Nested(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&[Outcome]> {
        match self {
            Self::Repeated(items) => Some(items),
            _ => None,
        }
    }

    /// Compare against a plain expectation value
    ///
    /// Scalars match a token name (`"INVALID_PATTERN"`), a numeric code, or
    /// `null` for "no error". Nested reports match a mapping by recursion, or
    /// the [`ElementErrors::label`] string when they contain errors.
    pub fn matches(&self, expected: &Value) -> bool {
        match (self, expected) {
            (outcome, Value::Null) => !outcome.is_error(),
            (Self::Single(error), Value::String(name)) => {
                ErrorKind::from_name(name).is_some_and(|kind| *error == kind)
            }
            (Self::Single(error), Value::Number(code)) => {
                code.as_u64() == Some(u64::from(error.code()))
            }
            (Self::Nested(errors), Value::String(label)) => {
                label == ElementErrors::label() && errors.is_error()
            }
            (Self::Nested(errors), Value::Object(_)) => errors == expected,
            (Self::Repeated(items), Value::Array(expected)) => {
                items.len() == expected.len()
                    && items.iter().zip(expected).all(|(item, e)| item.matches(e))
            }
            _ => false,
        }
    }
}

impl From<ValidateError> for Outcome {
    fn from(error: ValidateError) -> Self {
        Self::Single(error)
    }
}

impl From<ErrorKind> for Outcome {
    fn from(kind: ErrorKind) -> Self {
        Self::Single(ValidateError::new(kind))
    }
}

impl From<ElementErrors> for Outcome {
    fn from(errors: ElementErrors) -> Self {
        Self::Nested(errors)
    }
}

impl From<Vec<Outcome>> for Outcome {
    fn from(items: Vec<Outcome>) -> Self {
        Self::Repeated(items)
    }
}

impl PartialEq<ErrorKind> for Outcome {
    fn eq(&self, other: &ErrorKind) -> bool {
        matches!(self, Self::Single(error) if error == other)
    }
}

impl Index<&str> for Outcome {
    type Output = Outcome;

    /// Index into a nested report; panics for scalar or repeated outcomes
    fn index(&self, name: &str) -> &Outcome {
        match self {
            Self::Nested(errors) => &errors[name],
            other => panic!("outcome is not a nested report: {:?}", other),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Single(error) => error.serialize(serializer),
            Self::Nested(errors) => errors.serialize(serializer),
            Self::Repeated(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Ordered report of element outcomes with derived error state
#[derive(Debug, Clone, Default)]
pub struct ElementErrors {
    mode: CombineMode,
    entries: IndexMap<String, Outcome>,
    added: usize,
    failed: usize,
    merged_from: HashMap<String, usize>,
    merges: Vec<Merge>,
}

/// One `update` call, counted as a single child until all its entries leave
#[derive(Debug, Clone, Copy)]
struct Merge {
    remaining: usize,
    failed: bool,
}

impl ElementErrors {
    pub fn new(mode: CombineMode) -> Self {
        Self {
            mode,
            entries: IndexMap::new(),
            added: 0,
            failed: 0,
            merged_from: HashMap::new(),
            merges: Vec::new(),
        }
    }

    /// Identifier used when a nested report stands in for a scalar entry
    pub const fn label() -> &'static str {
        "contains_errors"
    }

    pub const fn mode(&self) -> CombineMode {
        self.mode
    }

    /// Insert or replace the outcome for `name`
    ///
    /// A replaced entry's contribution is retracted before the new one is
    /// counted, so re-setting a name never double counts.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Outcome>) {
        let outcome = value.into();
        let failed = outcome.is_error();
        self.replace(name.into(), outcome);
        self.added += 1;
        if failed {
            self.failed += 1;
        }
    }

    /// Merge a peer report's visible entries into this one
    ///
    /// `INVALID_EXIST` entries never propagate. When the peer is an Or group
    /// that succeeded, only its successful entries are kept. The whole merge
    /// counts as a single child of this node until every merged entry has
    /// been popped or replaced.
    pub fn update(&mut self, other: ElementErrors) {
        let failed = other.is_error();
        let successes_only = other.mode == CombineMode::Or && !failed;
        let index = self.merges.len();
        let mut remaining = 0;
        for (name, outcome) in other.entries {
            if outcome == ErrorKind::InvalidExist {
                continue;
            }
            if successes_only && outcome.is_error() {
                continue;
            }
            self.replace(name.clone(), outcome);
            self.merged_from.insert(name, index);
            remaining += 1;
        }
        self.merges.push(Merge { remaining, failed });
        self.added += 1;
        if failed {
            self.failed += 1;
        }
    }

    /// Remove an entry, retracting its contribution
    ///
    /// A merged entry only retracts its merge once it is the last of that
    /// merge's entries to leave.
    pub fn pop(&mut self, name: &str) -> Option<Outcome> {
        let outcome = self.entries.shift_remove(name)?;
        self.release(name, &outcome);
        Some(outcome)
    }

    fn replace(&mut self, name: String, outcome: Outcome) {
        if let Some(previous) = self.entries.insert(name.clone(), outcome) {
            self.release(&name, &previous);
        }
    }

    fn release(&mut self, name: &str, previous: &Outcome) {
        let Some(index) = self.merged_from.remove(name) else {
            self.retract(previous.is_error());
            return;
        };
        if let Some(merge) = self.merges.get_mut(index) {
            merge.remaining = merge.remaining.saturating_sub(1);
            if merge.remaining == 0 {
                let failed = merge.failed;
                self.retract(failed);
            }
        }
    }

    fn retract(&mut self, failed: bool) {
        self.added = self.added.saturating_sub(1);
        if failed {
            self.failed = self.failed.saturating_sub(1);
        }
    }

    /// Whether this node reports an error under its combine mode
    pub fn is_error(&self) -> bool {
        match self.mode {
            CombineMode::And => self.failed > 0,
            CombineMode::Or => self.added > 0 && self.failed == self.added,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Outcome> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().map(|(name, outcome)| (name.as_str(), outcome))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Render the report as indented text
    ///
    /// By default only failing entries are listed; `no_errors` lists every
    /// entry. Nested reports appear only when they contribute a line.
    /// Repeated-element entries cannot be rendered and yield
    /// [`Error::ExplainRepeated`].
    pub fn explain(&self, no_errors: bool) -> Result<String> {
        Ok(self.explain_lines(no_errors, 1)?.join("\n"))
    }

    fn explain_lines(&self, no_errors: bool, level: usize) -> Result<Vec<String>> {
        let indent = INDENT.repeat(level.saturating_sub(1));
        let mut lines = Vec::new();
        for (name, outcome) in &self.entries {
            match outcome {
                Outcome::Nested(child) => {
                    let child_lines = child.explain_lines(no_errors, level + 1)?;
                    if !child_lines.is_empty() {
                        lines.push(format!("{indent}{name}:"));
                        lines.extend(child_lines);
                    }
                }
                Outcome::Repeated(_) => {
                    return Err(Error::ExplainRepeated {
                        element: name.clone(),
                    });
                }
                Outcome::Single(error) => {
                    if no_errors || error.is_error() {
                        lines.push(format!("{indent}{name}: {error}"));
                    }
                }
            }
        }
        Ok(lines)
    }
}

impl PartialEq for ElementErrors {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.entries == other.entries
    }
}

/// Expectation matching: only keys present in the report are checked, and a
/// key missing from the expectation is read as "no error"
impl PartialEq<Value> for ElementErrors {
    fn eq(&self, expected: &Value) -> bool {
        let Some(expected) = expected.as_object() else {
            return false;
        };
        self.entries.iter().all(|(name, outcome)| match expected.get(name) {
            Some(value) => outcome.matches(value),
            None => !outcome.is_error(),
        })
    }
}

impl Index<&str> for ElementErrors {
    type Output = Outcome;

    fn index(&self, name: &str) -> &Outcome {
        self.entries
            .get(name)
            .unwrap_or_else(|| panic!("no entry named '{}' in report", name))
    }
}

impl Serialize for ElementErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, outcome) in &self.entries {
            map.serialize_entry(name, outcome)?;
        }
        map.end()
    }
}
