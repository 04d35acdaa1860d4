//! File Resolver seam
//!
//! The parser never touches the file system itself. Cross-file work (finding the
//! target of an `@import`/`@use`, loading and parsing it, and looking up variables
//! declared there) goes through [`FileResolver`], which owns the per-session file
//! registry and is responsible for memoizing loads and rejecting import cycles.

use std::sync::Arc;

use url::Url;

use crate::sass::error::{SassError, SassResult};
use crate::sass::nodes::{FileEntry, VariableNode};
use crate::sass::options::SassAstOptions;

/// A variable found in another file
#[derive(Debug, Clone, PartialEq)]
pub struct FoundVariable {
    /// File that declares the variable
    pub uri: Url,
    pub node: VariableNode,
}

/// Collaborator the parser calls for cross-file lookups
#[tower_lsp::async_trait]
pub trait FileResolver: Send + Sync {
    /// Resolve an import path relative to the importing file
    fn resolve_uri(&self, from: &Url, relative_path: &str) -> Option<Url>;

    /// Load and parse a file, returning the cached entry when the file is unchanged
    async fn load_and_parse(&self, uri: &Url, options: &SassAstOptions) -> SassResult<Arc<FileEntry>>;

    /// Find a top-level variable declared in an already parsed file
    fn find_variable(&self, uri: &Url, name: &str) -> Option<FoundVariable>;
}

/// Resolver for parsing a single file in isolation: imports never resolve
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedResolver;

#[tower_lsp::async_trait]
impl FileResolver for DetachedResolver {
    fn resolve_uri(&self, _from: &Url, _relative_path: &str) -> Option<Url> {
        None
    }

    async fn load_and_parse(&self, uri: &Url, _options: &SassAstOptions) -> SassResult<Arc<FileEntry>> {
        Err(SassError::FileNotLoaded { uri: uri.clone() })
    }

    fn find_variable(&self, _uri: &Url, _name: &str) -> Option<FoundVariable> {
        None
    }
}
