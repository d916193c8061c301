//! Document parsing for JSON and YAML definitions and data
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Formats a document may be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON, the fallback for unknown extensions
    Json,
    /// YAML (.yaml, .yml)
    Yaml,
    /// The XML schema dialect, recognised but not parsed here
    Xml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Format::Yaml,
            Some("xml" | "xsd") => Format::Xml,
            _ => Format::Json,
        }
    }

    /// Detect format from content: a leading `<` is XML, anything else keeps
    /// `fallback`
    pub fn sniff(content: &str, fallback: Format) -> Self {
        if content.trim_start().starts_with('<') {
            Format::Xml
        } else {
            fallback
        }
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
            Format::Xml => &["xml", "xsd"],
        }
    }
}

/// Parser turning files and strings into `serde_json::Value` trees
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a file, detecting its format from content and extension
    pub fn parse_file(&self, path: &Path) -> LoaderResult<Value> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LoaderError::io_error(path, e))?;
        let format = Format::sniff(&content, Format::from_path(path));
        debug!(path = %path.display(), ?format, "parsing document");
        self.parse_content(&content, format, path)
    }

    /// Parse content with explicit format
    pub fn parse_content(&self, content: &str, format: Format, path: &Path) -> LoaderResult<Value> {
        match format {
            Format::Json => self.parse_json(content, path),
            Format::Yaml => self.parse_yaml(content, path),
            Format::Xml => Err(LoaderError::unsupported_format(
                path,
                "the XML schema dialect has no parser; supply JSON or YAML",
            )),
        }
    }

    /// Parse YAML content
    pub fn parse_yaml(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        // Parse as YAML first so YAML syntax errors keep their own message
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| LoaderError::yaml_parse_error(path, e))?;

        serde_json::to_value(yaml_value).map_err(|e| LoaderError::json_parse_error(path, e))
    }

    /// Parse JSON content
    pub fn parse_json(&self, content: &str, path: &Path) -> LoaderResult<Value> {
        serde_json::from_str(content).map_err(|e| LoaderError::json_parse_error(path, e))
    }
}
