//! Validation outcome tokens
//!
//! Every check in the engine produces a [`ValidateError`]: an [`ErrorKind`]
//! with a stable numeric code plus an optional context payload captured at the
//! failure site. Code 0 is success; anything else is an error.
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// The closed set of validation outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoError,
    EmptyOk,
    InvalidType,
    InvalidPattern,
    InvalidMinLength,
    InvalidMaxLength,
    InvalidMatch,
    InvalidValue,
    InvalidNode,
    InvalidEnumeration,
    InvalidMinRange,
    InvalidMaxRange,
    InvalidNumber,
    InvalidComplex,
    InvalidRequired,
    InvalidExist,
    InvalidMinOccurs,
    InvalidMaxOccurs,
    InvalidXpath,
    InvalidFraction,
    Critical,
    InvalidCustom,
    InvalidDateFormat,
    InvalidDate,
}

impl ErrorKind {
    /// All kinds, in code order
    pub const ALL: [ErrorKind; 24] = [
        ErrorKind::NoError,
        ErrorKind::EmptyOk,
        ErrorKind::InvalidType,
        ErrorKind::InvalidPattern,
        ErrorKind::InvalidMinLength,
        ErrorKind::InvalidMaxLength,
        ErrorKind::InvalidMatch,
        ErrorKind::InvalidValue,
        ErrorKind::InvalidNode,
        ErrorKind::InvalidEnumeration,
        ErrorKind::InvalidMinRange,
        ErrorKind::InvalidMaxRange,
        ErrorKind::InvalidNumber,
        ErrorKind::InvalidComplex,
        ErrorKind::InvalidRequired,
        ErrorKind::InvalidExist,
        ErrorKind::InvalidMinOccurs,
        ErrorKind::InvalidMaxOccurs,
        ErrorKind::InvalidXpath,
        ErrorKind::InvalidFraction,
        ErrorKind::Critical,
        ErrorKind::InvalidCustom,
        ErrorKind::InvalidDateFormat,
        ErrorKind::InvalidDate,
    ];

    /// Stable numeric code
    pub const fn code(self) -> u8 {
        match self {
            Self::NoError | Self::EmptyOk => 0,
            Self::InvalidType => 1,
            Self::InvalidPattern => 2,
            Self::InvalidMinLength => 3,
            Self::InvalidMaxLength => 4,
            Self::InvalidMatch => 5,
            Self::InvalidValue => 6,
            Self::InvalidNode => 7,
            Self::InvalidEnumeration => 8,
            Self::InvalidMinRange => 9,
            Self::InvalidMaxRange => 10,
            Self::InvalidNumber => 11,
            Self::InvalidComplex => 12,
            Self::InvalidRequired => 13,
            Self::InvalidExist => 14,
            Self::InvalidMinOccurs => 15,
            Self::InvalidMaxOccurs => 16,
            Self::InvalidXpath => 17,
            Self::InvalidFraction => 18,
            Self::Critical => 0x30,
            Self::InvalidCustom => 0x40,
            Self::InvalidDateFormat => 0x50,
            Self::InvalidDate => 0x51,
        }
    }

    /// Display name, e.g. `INVALID_PATTERN`
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoError => "NO_ERROR",
            Self::EmptyOk => "EMPTY_OK",
            Self::InvalidType => "INVALID_TYPE",
            Self::InvalidPattern => "INVALID_PATTERN",
            Self::InvalidMinLength => "INVALID_MINLENGTH",
            Self::InvalidMaxLength => "INVALID_MAXLENGTH",
            Self::InvalidMatch => "INVALID_MATCH",
            Self::InvalidValue => "INVALID_VALUE",
            Self::InvalidNode => "INVALID_NODE",
            Self::InvalidEnumeration => "INVALID_ENUMERATION",
            Self::InvalidMinRange => "INVALID_MIN_RANGE",
            Self::InvalidMaxRange => "INVALID_MAX_RANGE",
            Self::InvalidNumber => "INVALID_NUMBER",
            Self::InvalidComplex => "INVALID_COMPLEX",
            Self::InvalidRequired => "INVALID_REQUIRED",
            Self::InvalidExist => "INVALID_EXIST",
            Self::InvalidMinOccurs => "INVALID_MIN_OCCURS",
            Self::InvalidMaxOccurs => "INVALID_MAX_OCCURS",
            Self::InvalidXpath => "INVALID_XPATH",
            Self::InvalidFraction => "INVALID_FRACTION",
            Self::Critical => "CRITICAL",
            Self::InvalidCustom => "INVALID_CUSTOM",
            Self::InvalidDateFormat => "INVALID_DATE_FORMAT",
            Self::InvalidDate => "INVALID_DATE",
        }
    }

    /// Human-readable description
    pub const fn description(self) -> &'static str {
        match self {
            Self::NoError => "No error",
            Self::EmptyOk => "Not required",
            Self::InvalidType => "Invalid type",
            Self::InvalidPattern => "Value does not match the type pattern",
            Self::InvalidMinLength => "Value is too short",
            Self::InvalidMaxLength => "Value is too long",
            Self::InvalidMatch => "Value does not match the referenced field",
            Self::InvalidValue => "Value is not the fixed value",
            Self::InvalidNode => "Invalid node",
            Self::InvalidEnumeration => "Value is not one of the allowed values",
            Self::InvalidMinRange => "Value is below the minimum",
            Self::InvalidMaxRange => "Value is above the maximum",
            Self::InvalidNumber => "Value is not a number",
            Self::InvalidComplex => "Expected a mapping for a complex type",
            Self::InvalidRequired => "Required element is missing",
            Self::InvalidExist => "Element is not declared in the schema",
            Self::InvalidMinOccurs => "Too few occurrences",
            Self::InvalidMaxOccurs => "Too many occurrences",
            Self::InvalidXpath => "Path could not be resolved",
            Self::InvalidFraction => "Too many fraction digits",
            Self::Critical => "Critical error",
            Self::InvalidCustom => "Custom check failed",
            Self::InvalidDateFormat => "Invalid date format",
            Self::InvalidDate => "Invalid date",
        }
    }

    /// Look a kind up by its display name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether this kind represents a failure
    pub const fn is_error(self) -> bool {
        self.code() != 0
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single validation outcome with optional failure context
///
/// Equality compares codes only, so `NoError == EmptyOk` and the context is
/// ignored: `outcome == ErrorKind::InvalidPattern` holds whatever pattern and
/// value were captured.
#[derive(Debug, Clone)]
pub struct ValidateError {
    kind: ErrorKind,
    context: Option<Value>,
}

impl ValidateError {
    /// Create an outcome without context
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Create an outcome carrying the value(s) that caused it
    pub fn with_context(kind: ErrorKind, context: impl Into<Value>) -> Self {
        Self {
            kind,
            context: Some(context.into()),
        }
    }

    /// The success outcome
    pub const fn ok() -> Self {
        Self::new(ErrorKind::NoError)
    }

    /// The "absent but optional" outcome
    pub const fn empty_ok() -> Self {
        Self::new(ErrorKind::EmptyOk)
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub const fn code(&self) -> u8 {
        self.kind.code()
    }

    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub const fn description(&self) -> &'static str {
        self.kind.description()
    }

    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    pub const fn is_error(&self) -> bool {
        self.kind.is_error()
    }
}

impl From<ErrorKind> for ValidateError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl PartialEq for ValidateError {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for ValidateError {}

impl PartialEq<ErrorKind> for ValidateError {
    fn eq(&self, other: &ErrorKind) -> bool {
        self.code() == other.code()
    }
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind.name(), self.kind.description())?;
        if let Some(context) = &self.context {
            write!(f, ": {}", context)?;
        }
        Ok(())
    }
}

impl Serialize for ValidateError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.context.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("ValidateError", fields)?;
        state.serialize_field("code", &self.code())?;
        state.serialize_field("name", self.name())?;
        if let Some(context) = &self.context {
            state.serialize_field("context", context)?;
        }
        state.end()
    }
}
