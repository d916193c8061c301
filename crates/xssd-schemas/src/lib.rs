//! Xssd Schemas - loading definitions and documents from files
//!
//! This crate connects the [`xssd_core`] validation engine to the file system:
//!
//! ## Features
//!
//! - **Formats**: JSON and YAML documents, chosen by extension; content
//!   starting with `<` is the XML dialect, which is reported as unsupported
//! - **Includes**: string `include` entries are read as paths relative to the
//!   including file, with cycle detection and a depth limit
//! - **Validation helpers**: build a [`xssd_core::Validator`] from a file and
//!   validate or explain data files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xssd_schemas::SchemaLoader;
//! use std::path::Path;
//!
//! let loader = SchemaLoader::new();
//! let validator = loader.load_validator(Path::new("schema/person.json")).unwrap();
//!
//! match loader.explain_file(&validator, Path::new("data/person.json"), false) {
//!     Ok(text) if text.is_empty() => println!("Valid document!"),
//!     Ok(text) => println!("Validation errors:\n{}", text),
//!     Err(e) => println!("Could not validate: {}", e),
//! }
//! ```
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

pub mod loader;

// Re-export commonly used types for convenience
pub use loader::{
    DocumentParser, FileIncludeResolver, Format, LoaderConfig, LoaderError, LoaderResult,
    SchemaLoader,
};
