//! Xssd Core - XSD-style structural validation for nested data
//!
//! This crate validates data trees (nested mappings, lists and scalars) against
//! a declarative definition of named complex and simple types, producing a
//! nested error report that mirrors the shape of the data.
//!
//! # Main Components
//!
//! - **Error Handling**: Configuration errors using `thiserror`
//! - **Reports**: [`ValidateError`] outcome tokens and the [`ElementErrors`] tree
//! - **Types**: The [`TypeRegistry`] of built-in and user-defined types
//! - **Validator**: The recursive engine behind [`Validator::validate`]
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use xssd_core::{ErrorKind, Result, Validator};
//!
//! fn example() -> Result<()> {
//!     let validator = Validator::new(&json!({
//!         "root": [{"name": "age", "type": "integer", "minInclusive": 0, "maxInclusive": 150}]
//!     }))?;
//!
//!     let report = validator.validate(&json!({"age": "200"}))?;
//!     assert!(report.is_error());
//!     assert!(report["age"] == ErrorKind::InvalidMaxRange);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod report;
pub mod types;
pub mod validator;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use report::{CombineMode, ElementErrors, ErrorKind, Outcome, ValidateError};
pub use types::{
    CustomValidator, DefinitionList, ElementDecl, IncludeResolver, MaxOccurs, ResolvedInclude,
    SimpleType, TypeDef, TypeRegistry, ROOT_TYPE,
};
pub use validator::{ValidationContext, Validator, ValidatorConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
