//! Error types for the xssd core library
//!
//! These are configuration-tier failures: schema authoring mistakes and
//! malformed calls. They abort the current operation. Data-tier outcomes are
//! never reported through this type; they are collected into
//! [`ElementErrors`](crate::report::ElementErrors) instead.
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use thiserror::Error;

/// Main error type for xssd operations
#[derive(Error, Debug)]
pub enum Error {
    /// `validate()` was called with null or empty input
    #[error("No data supplied for validation")]
    NoData,

    /// The registry has no `root` complex type, or strict-root mode is on and
    /// the data is not wrapped under a `root` key
    #[error("No root document: {reason}")]
    NoRootDocument { reason: String },

    /// The schema references a type name that was never defined
    #[error("Type '{name}' not found in the type registry")]
    NoTypeFound { name: String },

    /// The top-level input is not something the engine can walk
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A definition has the wrong shape
    #[error("Invalid definition at '{location}': {reason}")]
    InvalidDefinition { location: String, reason: String },

    /// A `pattern` facet does not compile
    #[error("Invalid pattern for type '{type_name}': {source}")]
    InvalidPattern {
        type_name: String,
        #[source]
        source: regex::Error,
    },

    /// A simple type names a custom check that was never registered
    #[error("Custom validator '{name}' is not registered")]
    NoCustomFound { name: String },

    /// A second definition tried to replace an existing `root`
    #[error("Complex type 'root' is already defined")]
    RootRedefined,

    /// An `include` reference could not be resolved
    #[error("Failed to resolve include '{reference}': {source}")]
    Include {
        reference: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An `include` chain refers back to itself, or nests too deep
    #[error("Circular include detected: {chain}")]
    CircularInclude { chain: String },

    /// The schema or data nests deeper than the configured limit
    #[error("Maximum validation depth {limit} exceeded at '{path}'")]
    MaxDepthExceeded { path: String, limit: usize },

    /// `explain()` met a repeated-element entry, which it cannot render
    #[error("Cannot explain repeated element '{element}': list outcomes are not supported")]
    ExplainRepeated { element: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid definition error
    pub fn invalid_definition<L, R>(location: L, reason: R) -> Self
    where
        L: Into<String>,
        R: Into<String>,
    {
        Self::InvalidDefinition {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Create a no-root error
    pub fn no_root<R: Into<String>>(reason: R) -> Self {
        Self::NoRootDocument {
            reason: reason.into(),
        }
    }

    /// Create an include error wrapping any underlying failure
    pub fn include<E>(reference: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Include {
            reference: reference.into(),
            source: source.into(),
        }
    }

    /// Create a circular include error from the include chain
    pub fn circular_include(chain: &[String]) -> Self {
        Self::CircularInclude {
            chain: chain.join(" -> "),
        }
    }
}
