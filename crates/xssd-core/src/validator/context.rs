//! Per-call validation context
//!
//! Copyright (c) 2025 Xssd Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::report::{ErrorKind, ValidateError};
use serde_json::{Map, Value};

/// State threaded through one validation call
///
/// Holds the document that absolute `match`/`notMatch` paths resolve
/// against, so the validator itself keeps no per-call state.
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    /// Location of the current element, `$.owner.tags[1]` style
    pub path: String,
    /// Complex-type nesting depth
    pub depth: usize,
    limit: usize,
    root: &'a Value,
}

impl<'a> ValidationContext<'a> {
    pub fn new(root: &'a Value, limit: usize) -> Self {
        Self {
            path: "$".to_string(),
            depth: 0,
            limit,
            root,
        }
    }

    /// Context for a named child element
    pub fn child<P: AsRef<str>>(&self, segment: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, segment.as_ref()),
            ..self.clone()
        }
    }

    /// Context for one occurrence of a repeated element
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
            ..self.clone()
        }
    }

    /// Context one level deeper, failing once the limit is passed
    pub fn descend(&self) -> Result<Self> {
        if self.depth >= self.limit {
            return Err(Error::MaxDepthExceeded {
                path: self.path.clone(),
                limit: self.limit,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self.clone()
        })
    }

    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Resolve a `match`/`notMatch` path
    ///
    /// A leading `/` starts from the root document, anything else from the
    /// sibling fields. Only the first segment is looked up. A miss yields an
    /// `INVALID_XPATH` sentinel carrying the path.
    pub fn resolve<'s>(
        &'s self,
        path: &str,
        siblings: &'s Map<String, Value>,
    ) -> std::result::Result<&'s Value, ValidateError> {
        let (scope, rest) = match path.strip_prefix('/') {
            Some(rest) => (self.root.as_object(), rest),
            None => (Some(siblings), path),
        };
        let segment = rest.split('/').next().unwrap_or(rest);
        scope
            .and_then(|map| map.get(segment))
            .ok_or_else(|| ValidateError::with_context(ErrorKind::InvalidXpath, path))
    }
}
