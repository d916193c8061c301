//! Custom checks attached to simple types by name
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::report::ValidateError;
use crate::types::simple::SimpleType;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A check a simple type runs after its pattern
///
/// Returning `Some` with an error outcome fails the value; `None` or a
/// success outcome lets validation continue with the remaining facets.
/// Any `Fn(&Value, &SimpleType) -> Option<ValidateError>` closure qualifies.
pub trait CustomValidator: Send + Sync {
    fn check(&self, value: &Value, type_def: &SimpleType) -> Option<ValidateError>;
}

impl<F> CustomValidator for F
where
    F: Fn(&Value, &SimpleType) -> Option<ValidateError> + Send + Sync,
{
    fn check(&self, value: &Value, type_def: &SimpleType) -> Option<ValidateError> {
        self(value, type_def)
    }
}

/// A registered custom check, bound to a simple type
#[derive(Clone)]
pub struct CustomRef {
    name: String,
    check: Arc<dyn CustomValidator>,
}

impl CustomRef {
    pub(crate) fn new(name: impl Into<String>, check: Arc<dyn CustomValidator>) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Value, type_def: &SimpleType) -> Option<ValidateError> {
        self.check.check(value, type_def)
    }
}

impl fmt::Debug for CustomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRef").field("name", &self.name).finish()
    }
}
