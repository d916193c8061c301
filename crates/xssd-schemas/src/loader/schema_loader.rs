//! Loads definitions into validators and validates data files
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::loader::{
    error::{LoaderError, LoaderResult},
    parser::DocumentParser,
    resolver::FileIncludeResolver,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;
use xssd_core::{ElementErrors, TypeRegistry, Validator, ValidatorConfig};

const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// Configuration for loader behavior
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Configuration for validators built by this loader
    pub validator: ValidatorConfig,
    /// Maximum nesting of file includes
    pub max_include_depth: usize,
    /// Directory for includes of definitions that were not read from a file
    pub base_dir: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            validator: ValidatorConfig::default(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
            base_dir: None,
        }
    }
}

/// Reads definitions and data documents from disk
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    config: LoaderConfig,
    parser: DocumentParser,
}

impl SchemaLoader {
    /// Create a new loader with default configuration
    pub fn new() -> Self {
        Self::with_config(LoaderConfig::default())
    }

    /// Create a new loader with custom configuration
    pub fn with_config(config: LoaderConfig) -> Self {
        Self {
            config,
            parser: DocumentParser::new(),
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Read a definition file without loading it
    pub fn load_definition(&self, path: &Path) -> LoaderResult<Value> {
        let definition = self.parser.parse_file(path)?;
        if !definition.is_object() {
            return Err(xssd_core::Error::invalid_definition(
                path.display().to_string(),
                "definition must be a mapping",
            )
            .into());
        }
        Ok(definition)
    }

    /// Read a data document
    pub fn load_document(&self, path: &Path) -> LoaderResult<Value> {
        self.parser.parse_file(path)
    }

    /// Load a definition file, and everything it includes, into `registry`
    ///
    /// Pass a registry with custom checks already registered when the
    /// definition uses them.
    pub fn load_registry(&self, path: &Path, registry: TypeRegistry) -> LoaderResult<TypeRegistry> {
        let canonical = path
            .canonicalize()
            .map_err(|e| LoaderError::io_error(path, e))?;
        let definition = self.load_definition(&canonical)?;
        let resolver = FileIncludeResolver::new(self.include_base(Some(&canonical)));
        let origin = canonical.display().to_string();

        let mut registry = registry.with_max_include_depth(self.config.max_include_depth);
        registry.load_from(&definition, Some(&resolver), Some(origin.as_str()))?;
        debug!(path = %canonical.display(), types = registry.len(), "definition loaded");
        Ok(registry)
    }

    /// Load an in-memory definition, resolving file includes against the
    /// configured base directory
    pub fn registry_from_value(&self, definition: &Value, registry: TypeRegistry) -> LoaderResult<TypeRegistry> {
        let resolver = FileIncludeResolver::new(self.include_base(None));
        let mut registry = registry.with_max_include_depth(self.config.max_include_depth);
        registry.load(definition, Some(&resolver))?;
        Ok(registry)
    }

    /// Build a validator from a definition file
    pub fn load_validator(&self, path: &Path) -> LoaderResult<Validator> {
        let registry = self.load_registry(path, TypeRegistry::with_builtins()?)?;
        Ok(Validator::from_registry(registry, self.config.validator))
    }

    /// Validate a data file
    pub fn validate_file(&self, validator: &Validator, data_path: &Path) -> LoaderResult<ElementErrors> {
        let document = self.load_document(data_path)?;
        let report = validator.validate(&document)?;
        debug!(path = %data_path.display(), failed = report.is_error(), "document validated");
        Ok(report)
    }

    /// Validate a data file and render the report as text
    pub fn explain_file(&self, validator: &Validator, data_path: &Path, no_errors: bool) -> LoaderResult<String> {
        Ok(self.validate_file(validator, data_path)?.explain(no_errors)?)
    }

    fn include_base(&self, origin: Option<&Path>) -> PathBuf {
        self.config
            .base_dir
            .clone()
            .or_else(|| origin.and_then(Path::parent).map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;
    use xssd_core::ErrorKind;

    #[test]
    fn test_loader_creation() {
        let loader = SchemaLoader::new();
        assert_eq!(loader.config().max_include_depth, 16);
        assert!(loader.config().validator.strict_exist);

        let custom = SchemaLoader::with_config(LoaderConfig {
            validator: ValidatorConfig::default().with_strict_root(),
            ..Default::default()
        });
        assert!(custom.config().validator.strict_root);
    }

    #[test]
    fn test_yaml_definition_and_json_data() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let definition = dir.path().join("person.yaml");
        fs::write(
            &definition,
            r#"
complexTypes:
  Person:
    - name: email
      type: email
root:
  - name: owner
    type: Person
"#,
        )?;
        let data = dir.path().join("data.json");
        fs::write(&data, r#"{"owner": {"email": "bad"}}"#)?;

        let loader = SchemaLoader::new();
        let validator = loader.load_validator(&definition)?;
        let report = loader.validate_file(&validator, &data)?;
        assert!(report.is_error());
        assert!(report["owner"]["email"] == ErrorKind::InvalidPattern);
        Ok(())
    }

    #[test]
    fn test_non_mapping_definition() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let definition = dir.path().join("list.json");
        fs::write(&definition, "[1, 2]")?;

        let err = SchemaLoader::new().load_definition(&definition).unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Core(xssd_core::Error::InvalidDefinition { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_value_includes_use_base_dir() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("types.json"),
            r#"{"simpleTypes": {"code": {"pattern": "[A-Z]{3}"}}}"#,
        )?;

        let loader = SchemaLoader::with_config(LoaderConfig {
            base_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        });
        let registry = loader.registry_from_value(
            &json!({"include": ["types.json"], "root": [{"name": "c", "type": "code"}]}),
            TypeRegistry::with_builtins()?,
        )?;
        assert!(registry.simple("code").is_some());
        Ok(())
    }
}
