//! Validation outcome vocabulary and the nested error-report tree
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

pub mod element_errors;
pub mod kind;

pub use element_errors::{CombineMode, ElementErrors, Outcome};
pub use kind::{ErrorKind, ValidateError};
