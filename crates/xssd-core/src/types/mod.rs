//! Type system: simple types, element declarations and the registry
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

pub mod builtin;
pub mod custom;
pub mod element;
pub mod registry;
pub mod simple;

pub use custom::{CustomRef, CustomValidator};
pub use element::{ComplexRef, DefinitionItem, DefinitionList, ElementDecl, MaxOccurs};
pub use registry::{IncludeResolver, ResolvedInclude, TypeDef, TypeRegistry, ROOT_TYPE};
pub use simple::{Pattern, RawFacets, RawSimpleType, SimpleType};
