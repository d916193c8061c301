//! The validation entry point
//!
//! A [`Validator`] owns a [`TypeRegistry`] and walks data trees against its
//! `root` complex type. All per-call state lives in a
//! [`ValidationContext`], so one validator can serve many threads.
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

pub mod coerce;
pub mod context;
mod engine;

pub use context::ValidationContext;

use crate::error::{Error, Result};
use crate::report::{CombineMode, ElementErrors, Outcome};
use crate::types::{TypeRegistry, ROOT_TYPE};
use engine::Engine;
use serde_json::{Map, Value};
use tracing::debug;

const DEFAULT_MAX_DEPTH: usize = 64;

/// Validator behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Require data to be wrapped under a `root` key
    pub strict_root: bool,
    /// Flag data keys no declaration covers as `INVALID_EXIST`
    pub strict_exist: bool,
    /// Deepest complex-type nesting before validation aborts
    pub max_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strict_root: false,
            strict_exist: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidatorConfig {
    pub fn with_strict_root(mut self) -> Self {
        self.strict_root = true;
        self
    }

    pub fn with_strict_exist(mut self, strict_exist: bool) -> Self {
        self.strict_exist = strict_exist;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Validates data trees against a loaded definition
#[derive(Debug, Clone)]
pub struct Validator {
    registry: TypeRegistry,
    config: ValidatorConfig,
}

impl Validator {
    /// Build a validator from a definition with the default configuration
    pub fn new(definition: &Value) -> Result<Self> {
        Self::with_config(definition, ValidatorConfig::default())
    }

    /// Build a validator from a definition
    ///
    /// String `include` entries need a resolver; use
    /// [`TypeRegistry::load`] and [`Validator::from_registry`] for those.
    pub fn with_config(definition: &Value, config: ValidatorConfig) -> Result<Self> {
        let mut registry = TypeRegistry::with_builtins()?;
        registry.load(definition, None)?;
        Ok(Self::from_registry(registry, config))
    }

    pub fn from_registry(registry: TypeRegistry, config: ValidatorConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a data tree against the `root` complex type
    ///
    /// Configuration problems (missing root, unknown types, depth overruns)
    /// are returned as `Err`. Everything wrong with the data itself is in the
    /// returned report; check it with [`ElementErrors::is_error`].
    pub fn validate(&self, data: &Value) -> Result<ElementErrors> {
        let document = match data {
            Value::Null => return Err(Error::NoData),
            Value::Object(map) if map.is_empty() => return Err(Error::NoData),
            Value::Array(items) if items.is_empty() => return Err(Error::NoData),
            Value::String(text) if text.is_empty() => return Err(Error::NoData),
            Value::Object(map) => map,
            other => {
                return Err(Error::InvalidInput {
                    reason: format!("expected a mapping, found {}", coerce::json_type_name(other)),
                })
            }
        };

        let root_list = self
            .registry
            .complex(ROOT_TYPE)
            .ok_or_else(|| Error::no_root("no 'root' complex type is defined"))?;

        let root_value = match document.get(ROOT_TYPE) {
            Some(wrapped) => wrapped,
            None if self.config.strict_root => {
                return Err(Error::no_root("data is not wrapped under a 'root' key"))
            }
            None => data,
        };

        debug!(
            strict_root = self.config.strict_root,
            strict_exist = self.config.strict_exist,
            "validation started"
        );

        let ctx = ValidationContext::new(root_value, self.config.max_depth);
        let report = match self.engine().validate_complex(root_list, root_value, &ctx)? {
            Outcome::Nested(report) => report,
            other => {
                let mut wrapper = ElementErrors::new(CombineMode::And);
                wrapper.set(ROOT_TYPE, other);
                wrapper
            }
        };

        debug!(failed = report.is_error(), entries = report.len(), "validation finished");
        Ok(report)
    }

    /// Validate and render the report as text
    pub fn explain(&self, data: &Value, no_errors: bool) -> Result<String> {
        self.validate(data)?.explain(no_errors)
    }

    /// Validate one value against any registered type
    ///
    /// Absolute paths inside the value resolve against the value itself.
    pub fn validate_type(&self, type_name: &str, value: &Value) -> Result<Outcome> {
        let empty = Value::Object(Map::new());
        let root = if value.is_object() { value } else { &empty };
        let ctx = ValidationContext::new(root, self.config.max_depth);
        self.engine().validate_named(type_name, value, &ctx)
    }

    fn engine(&self) -> Engine<'_> {
        Engine {
            registry: &self.registry,
            config: &self.config,
        }
    }
}
