//! Definition and document loading
//!
//! This module reads definitions and data documents from disk:
//! - JSON and YAML parsing, with XML content detected and rejected
//! - File-path `include` resolution relative to the including file
//! - Circular include detection
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use xssd_schemas::loader::SchemaLoader;
//! use std::path::Path;
//!
//! let loader = SchemaLoader::new();
//! let validator = loader.load_validator(Path::new("definition.yaml"))?;
//! let report = loader.validate_file(&validator, Path::new("data.json"))?;
//! println!("{}", report.explain(false)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;
pub mod resolver;
pub mod schema_loader;

pub use error::{LoaderError, LoaderResult};
pub use parser::{DocumentParser, Format};
pub use resolver::FileIncludeResolver;
pub use schema_loader::{LoaderConfig, SchemaLoader};
