//! Type registry: named simple and complex types
//!
//! A registry is built once per validator: built-ins first, then every
//! definition document, with `include` entries processed before the rest of
//! the document that names them.
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::types::builtin;
use crate::types::custom::CustomValidator;
use crate::types::element::DefinitionList;
use crate::types::simple::{RawSimpleType, SimpleType};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Name of the complex type every validation starts from
pub const ROOT_TYPE: &str = "root";

const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// A registered type
#[derive(Debug, Clone)]
pub enum TypeDef {
    Simple(SimpleType),
    Complex(DefinitionList),
}

/// A definition document returned by an [`IncludeResolver`]
#[derive(Debug, Clone)]
pub struct ResolvedInclude {
    /// Stable identity of the document, used for cycle detection and as the
    /// `parent` of its own includes
    pub id: String,
    pub definition: Value,
}

/// Turns string `include` entries into definition documents
pub trait IncludeResolver {
    /// Resolve `reference`, relative to the document `parent` when given
    fn resolve(&self, reference: &str, parent: Option<&str>) -> Result<ResolvedInclude>;
}

/// Named simple and complex types plus the custom checks they may use
#[derive(Clone)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDef>,
    customs: HashMap<String, Arc<dyn CustomValidator>>,
    max_include_depth: usize,
}

impl TypeRegistry {
    /// A registry with no types at all
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
            customs: HashMap::new(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    /// A registry seeded with the built-in simple types
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::empty();
        builtin::install(&mut registry)?;
        Ok(registry)
    }

    /// Limit how deep string includes may nest
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Register a custom check under `name`
    ///
    /// Must happen before loading any simple type that names it.
    pub fn register_custom<C>(&mut self, name: impl Into<String>, check: C) -> &mut Self
    where
        C: CustomValidator + 'static,
    {
        self.customs.insert(name.into(), Arc::new(check));
        self
    }

    /// Load a definition document
    pub fn load(&mut self, definition: &Value, resolver: Option<&dyn IncludeResolver>) -> Result<()> {
        self.load_from(definition, resolver, None)
    }

    /// Load a definition document whose own identity is `origin`, so its
    /// string includes resolve relative to it
    pub fn load_from(
        &mut self,
        definition: &Value,
        resolver: Option<&dyn IncludeResolver>,
        origin: Option<&str>,
    ) -> Result<()> {
        let mut stack: Vec<String> = origin.map(str::to_string).into_iter().collect();
        self.load_document(definition, resolver, &mut stack)?;
        debug!(
            types = self.types.len(),
            has_root = self.has_root(),
            "type registry loaded"
        );
        Ok(())
    }

    fn load_document(
        &mut self,
        definition: &Value,
        resolver: Option<&dyn IncludeResolver>,
        stack: &mut Vec<String>,
    ) -> Result<()> {
        let location = stack.last().cloned().unwrap_or_else(|| "<definition>".to_string());
        let Some(document) = definition.as_object() else {
            return Err(Error::invalid_definition(location, "definition must be a mapping"));
        };

        if let Some(includes) = document.get("include") {
            match includes {
                Value::Array(items) => {
                    for item in items {
                        self.load_include(item, resolver, stack)?;
                    }
                }
                single => self.load_include(single, resolver, stack)?,
            }
        }

        if let Some(simple_types) = document.get("simpleTypes") {
            for (name, raw) in section(&location, "simpleTypes", simple_types)? {
                let raw: RawSimpleType = serde_json::from_value(raw.clone()).map_err(|e| {
                    Error::invalid_definition(format!("{}/simpleTypes/{}", location, name), e.to_string())
                })?;
                let simple = SimpleType::compile(name, raw, &self.customs)?;
                self.insert(name, TypeDef::Simple(simple));
            }
        }

        if let Some(complex_types) = document.get("complexTypes") {
            for (name, list) in section(&location, "complexTypes", complex_types)? {
                let list = DefinitionList::parse(&format!("{}/complexTypes/{}", location, name), list)?;
                self.insert_complex(name, list)?;
            }
        }

        if let Some(root) = document.get(ROOT_TYPE) {
            let list = DefinitionList::parse(&format!("{}/root", location), root)?;
            self.insert_complex(ROOT_TYPE, list)?;
        }

        Ok(())
    }

    fn load_include(
        &mut self,
        item: &Value,
        resolver: Option<&dyn IncludeResolver>,
        stack: &mut Vec<String>,
    ) -> Result<()> {
        match item {
            Value::Object(_) => self.load_document(item, resolver, stack),
            Value::String(reference) => {
                let resolver = resolver
                    .ok_or_else(|| Error::include(reference.as_str(), "no include resolver configured"))?;
                let resolved = resolver.resolve(reference, stack.last().map(String::as_str))?;

                if stack.contains(&resolved.id) || stack.len() >= self.max_include_depth {
                    let mut chain = stack.clone();
                    chain.push(resolved.id);
                    return Err(Error::circular_include(&chain));
                }

                debug!(include = %resolved.id, depth = stack.len(), "loading include");
                stack.push(resolved.id);
                let result = self.load_document(&resolved.definition, Some(resolver), stack);
                stack.pop();
                result
            }
            other => Err(Error::invalid_definition(
                "include",
                format!("include entries must be a mapping or a reference, found {}", other),
            )),
        }
    }

    fn insert(&mut self, name: &str, def: TypeDef) {
        if self.types.insert(name.to_string(), def).is_some() {
            debug!(name, "type redefined");
        }
    }

    /// Register a complex type; `root` may only be defined once
    pub fn insert_complex(&mut self, name: &str, list: DefinitionList) -> Result<()> {
        if name == ROOT_TYPE && self.types.contains_key(ROOT_TYPE) {
            return Err(Error::RootRedefined);
        }
        self.insert(name, TypeDef::Complex(list));
        Ok(())
    }

    /// Register a simple type, replacing any type of the same name
    pub fn insert_simple(&mut self, simple: SimpleType) {
        let name = simple.name.clone();
        self.insert(&name, TypeDef::Simple(simple));
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn simple(&self, name: &str) -> Option<&SimpleType> {
        match self.types.get(name) {
            Some(TypeDef::Simple(simple)) => Some(simple),
            _ => None,
        }
    }

    pub fn complex(&self, name: &str) -> Option<&DefinitionList> {
        match self.types.get(name) {
            Some(TypeDef::Complex(list)) => Some(list),
            _ => None,
        }
    }

    pub fn has_root(&self) -> bool {
        self.complex(ROOT_TYPE).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut customs: Vec<_> = self.customs.keys().collect();
        customs.sort();
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .field("customs", &customs)
            .field("max_include_depth", &self.max_include_depth)
            .finish()
    }
}

fn section<'a>(location: &str, key: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        Error::invalid_definition(format!("{}/{}", location, key), "expected a mapping of type names")
    })
}
