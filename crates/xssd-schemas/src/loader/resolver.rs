//! File-backed resolution of string `include` entries
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::LoaderError;
use crate::loader::parser::DocumentParser;
use std::path::{Path, PathBuf};
use tracing::debug;
use xssd_core::{Error, IncludeResolver, ResolvedInclude};

/// Resolves includes as file paths
///
/// A reference is taken relative to the directory of the including file, or
/// to `base_dir` when the including definition did not come from a file.
/// Each resolved document is identified by its canonical path.
#[derive(Debug, Clone)]
pub struct FileIncludeResolver {
    base_dir: PathBuf,
    parser: DocumentParser,
}

impl FileIncludeResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            parser: DocumentParser::new(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn directory_for(&self, parent: Option<&str>) -> PathBuf {
        parent
            .map(Path::new)
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone())
    }
}

impl IncludeResolver for FileIncludeResolver {
    fn resolve(&self, reference: &str, parent: Option<&str>) -> xssd_core::Result<ResolvedInclude> {
        let candidate = self.directory_for(parent).join(reference);
        let canonical = candidate
            .canonicalize()
            .map_err(|e| Error::include(reference, LoaderError::io_error(&candidate, e)))?;

        debug!(reference, path = %canonical.display(), "resolving include");
        let definition = self
            .parser
            .parse_file(&canonical)
            .map_err(|e| Error::include(reference, e))?;

        Ok(ResolvedInclude {
            id: canonical.display().to_string(),
            definition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resolves_relative_to_parent_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("types")).unwrap();
        fs::write(
            dir.path().join("types").join("common.json"),
            r#"{"simpleTypes": {"code": {"pattern": "[A-Z]+"}}}"#,
        )
        .unwrap();
        let parent = dir.path().join("types").join("main.json");

        let resolver = FileIncludeResolver::new("/nonexistent");
        let resolved = resolver
            .resolve("common.json", Some(&parent.display().to_string()))
            .unwrap();
        assert_eq!(resolved.definition, json!({"simpleTypes": {"code": {"pattern": "[A-Z]+"}}}));
        assert!(resolved.id.ends_with("common.json"));
    }

    #[test]
    fn test_resolves_against_base_dir_without_parent() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("extra.yaml"), "complexTypes:\n  A:\n    - name: x\n").unwrap();

        let resolver = FileIncludeResolver::new(dir.path());
        let resolved = resolver.resolve("extra.yaml", None).unwrap();
        assert_eq!(resolved.definition, json!({"complexTypes": {"A": [{"name": "x"}]}}));
    }

    #[test]
    fn test_missing_include_is_an_include_error() {
        let dir = tempdir().unwrap();
        let resolver = FileIncludeResolver::new(dir.path());
        let err = resolver.resolve("missing.json", None).unwrap_err();
        assert!(matches!(err, Error::Include { reference, .. } if reference == "missing.json"));
    }
}
