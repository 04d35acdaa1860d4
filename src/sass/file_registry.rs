//! Sass File Registry
//!
//! Owns every parsed file of a session and implements [`FileResolver`] for the
//! parser. Documents open in the editor take precedence over the file system.
//!
//! Parse results are memoized by content and options. Every load carries the
//! chain of files whose imports led to it, and an import that leads back into its
//! own chain fails with [`SassError::ImportCycle`] instead of recursing forever.
//! Independent parses never see each other's chains: two documents loading the
//! same partial at the same time each parse it, and the last result is cached.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tower_lsp::lsp_types::TextDocumentContentChangeEvent;
use url::Url;

use crate::language::document::DocumentVersion;
use crate::language::text_utils::apply_content_change;
use crate::sass::constants::IMPORT_EXTENSIONS;
use crate::sass::error::{IoContext, SassError, SassResult};
use crate::sass::nodes::{FileEntry, Node, VariableNode};
use crate::sass::options::SassAstOptions;
use crate::sass::parser::parse_file;
use crate::sass::resolver::{FileResolver, FoundVariable};
use crate::sass::stringify::stringify_nodes;

/// A document open in the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    pub text: String,
    pub version: DocumentVersion,
}

/// Last parse of a file and the input it was produced from
#[derive(Debug, Clone)]
struct CachedFile {
    text: String,
    options: SassAstOptions,
    entry: Arc<FileEntry>,
}

/// Registry of parsed files, keyed by URI
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: Mutex<HashMap<Url, CachedFile>>,
    open_documents: Mutex<HashMap<Url, OpenDocument>>,
    /// Major document version per URI, survives closing the document
    majors: Mutex<HashMap<Url, i32>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a document opened in the client
    pub fn open_document(&self, uri: Url, text: String, version: i32) {
        let major = {
            let mut majors = lock(&self.majors);
            let major = majors.entry(uri.clone()).or_insert(0);
            *major += 1;
            *major
        };
        lock(&self.open_documents).insert(
            uri,
            OpenDocument {
                text,
                version: DocumentVersion {
                    major,
                    minor: version,
                },
            },
        );
    }

    /// Apply client changes to an open document
    pub fn change_document(&self, uri: &Url, changes: Vec<TextDocumentContentChangeEvent>, version: i32) {
        let mut documents = lock(&self.open_documents);
        match documents.get_mut(uri) {
            Some(document) => {
                for change in changes {
                    apply_content_change(&mut document.text, change);
                }
                document.version.minor = version;
            }
            None => log::warn!("Change for document that is not open: {}", uri),
        }
    }

    /// Stop tracking an open document, later loads read the file system again
    pub fn close_document(&self, uri: &Url) {
        lock(&self.open_documents).remove(uri);
    }

    pub fn document(&self, uri: &Url) -> Option<OpenDocument> {
        lock(&self.open_documents).get(uri).cloned()
    }

    pub fn document_text(&self, uri: &Url) -> Option<String> {
        lock(&self.open_documents).get(uri).map(|document| document.text.clone())
    }

    /// Last parse result for a file
    pub fn file_entry(&self, uri: &Url) -> Option<Arc<FileEntry>> {
        lock(&self.files).get(uri).map(|file| file.entry.clone())
    }

    /// Number of files parsed so far
    pub fn file_count(&self) -> usize {
        lock(&self.files).len()
    }

    /// Parse a document even if its text is unchanged, so variables from imports
    /// that changed since the last parse are resolved again
    pub async fn parse_document(&self, uri: &Url, options: &SassAstOptions) -> SassResult<Arc<FileEntry>> {
        lock(&self.files).remove(uri);
        self.load_and_parse(uri, options).await
    }

    /// Render a parsed file back to indented text
    pub fn stringify_file(&self, uri: &Url, options: &SassAstOptions) -> SassResult<String> {
        let entry = self
            .file_entry(uri)
            .ok_or_else(|| SassError::FileNotLoaded { uri: uri.clone() })?;
        let mut body = entry.body.clone();
        Ok(stringify_nodes(&mut body, options))
    }

    async fn read_text(&self, uri: &Url) -> SassResult<String> {
        if let Some(text) = self.document_text(uri) {
            return Ok(text);
        }
        let path = uri
            .to_file_path()
            .map_err(|_| SassError::NotAFileUri { uri: uri.clone() })?;
        tokio::fs::read_to_string(&path)
            .await
            .with_io_context(&format!("Failed to read {}", path.display()))
    }

    fn cached(&self, uri: &Url, text: &str, options: &SassAstOptions) -> Option<Arc<FileEntry>> {
        let files = lock(&self.files);
        let file = files.get(uri)?;
        (file.text == text && file.options == *options).then(|| file.entry.clone())
    }

    /// Load `uri` for a parse whose import chain is `ancestors`
    async fn load_in_chain(
        &self,
        uri: &Url,
        options: &SassAstOptions,
        ancestors: &[Url],
    ) -> SassResult<Arc<FileEntry>> {
        if ancestors.contains(uri) {
            log::warn!("Import cycle detected at {}", uri);
            return Err(SassError::ImportCycle { uri: uri.clone() });
        }

        let text = self.read_text(uri).await?;
        if let Some(entry) = self.cached(uri, &text, options) {
            return Ok(entry);
        }

        let mut chain = ancestors.to_vec();
        chain.push(uri.clone());
        let resolver = ImportChain {
            registry: self,
            ancestors: chain,
        };
        let entry = Arc::new(parse_file(&text, uri.clone(), *options, &resolver).await);

        lock(&self.files).insert(
            uri.clone(),
            CachedFile {
                text,
                options: *options,
                entry: entry.clone(),
            },
        );
        Ok(entry)
    }

    fn exists(&self, path: &Path) -> bool {
        if path.is_file() {
            return true;
        }
        match Url::from_file_path(path) {
            Ok(uri) => lock(&self.open_documents).contains_key(&uri),
            Err(_) => false,
        }
    }

    /// Latest top-level declaration of `name` in `uri`, then in its plain imports
    fn find_variable_in(&self, uri: &Url, name: &str, visited: &mut HashSet<Url>) -> Option<FoundVariable> {
        if !visited.insert(uri.clone()) {
            return None;
        }
        let entry = self.file_entry(uri)?;

        if let Some(node) = top_level_variable(&entry, name) {
            return Some(FoundVariable {
                uri: uri.clone(),
                node: node.clone(),
            });
        }

        entry
            .body
            .iter()
            .filter_map(|node| match node {
                Node::Import(import) => import.uri.as_ref(),
                _ => None,
            })
            .find_map(|import| self.find_variable_in(import, name, visited))
    }
}

#[tower_lsp::async_trait]
impl FileResolver for FileRegistry {
    fn resolve_uri(&self, from: &Url, relative_path: &str) -> Option<Url> {
        if relative_path.starts_with("sass:") {
            return None;
        }
        let from_path = from.to_file_path().ok()?;
        let base = from_path.parent()?;
        let target = base.join(relative_path);

        let found = import_candidates(&target)
            .into_iter()
            .find(|candidate| self.exists(candidate))?;
        Url::from_file_path(&found).ok()
    }

    async fn load_and_parse(&self, uri: &Url, options: &SassAstOptions) -> SassResult<Arc<FileEntry>> {
        self.load_in_chain(uri, options, &[]).await
    }

    fn find_variable(&self, uri: &Url, name: &str) -> Option<FoundVariable> {
        let mut visited = HashSet::new();
        self.find_variable_in(uri, name, &mut visited)
    }
}

/// Resolver handed to the parser of one file, remembering the files whose
/// imports led to it
struct ImportChain<'a> {
    registry: &'a FileRegistry,
    ancestors: Vec<Url>,
}

#[tower_lsp::async_trait]
impl<'a> FileResolver for ImportChain<'a> {
    fn resolve_uri(&self, from: &Url, relative_path: &str) -> Option<Url> {
        self.registry.resolve_uri(from, relative_path)
    }

    async fn load_and_parse(&self, uri: &Url, options: &SassAstOptions) -> SassResult<Arc<FileEntry>> {
        self.registry.load_in_chain(uri, options, &self.ancestors).await
    }

    fn find_variable(&self, uri: &Url, name: &str) -> Option<FoundVariable> {
        self.registry.find_variable(uri, name)
    }
}

/// Files an import path may refer to, in lookup order: the exact file, the
/// partial (`_name`), then each extension, then an index file in a directory
fn import_candidates(target: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    let file_name = match target.file_name().and_then(|name| name.to_str()) {
        Some(name) => name.to_string(),
        None => return candidates,
    };
    let partial = target.with_file_name(format!("_{}", file_name));

    let has_extension = target
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| IMPORT_EXTENSIONS.contains(&extension));
    if has_extension {
        candidates.push(target.to_path_buf());
        candidates.push(partial);
        return candidates;
    }

    for extension in IMPORT_EXTENSIONS {
        candidates.push(target.with_file_name(format!("{}.{}", file_name, extension)));
        candidates.push(partial.with_file_name(format!("_{}.{}", file_name, extension)));
    }
    for extension in IMPORT_EXTENSIONS {
        candidates.push(target.join(format!("_index.{}", extension)));
        candidates.push(target.join(format!("index.{}", extension)));
    }
    candidates
}

/// Variable node declared at the top level of an entry
pub fn top_level_variable<'a>(entry: &'a FileEntry, name: &str) -> Option<&'a VariableNode> {
    entry.body.iter().rev().find_map(|node| match node {
        Node::Variable(variable) if variable.value == name => Some(variable),
        _ => None,
    })
}
