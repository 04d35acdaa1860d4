//! Scope Tracker
//!
//! Lexical, block structured scoping for one parse. Three stacks are indexed by
//! nesting level: the selectors (and other blocks) currently open, the variables
//! declared at each level and the imports visible at each level. Moving back to a
//! shallower level drops everything deeper, there is no hoisting.
//!
//! Variable lookup searches local declarations innermost level first, most recent
//! declaration first, then falls back to the in-scope imports through the
//! [`FileResolver`]. Lookups are never cached: a later declaration can shadow an
//! earlier one between two lines of the same parse.

use url::Url;

use crate::sass::nodes::VariableLocation;
use crate::sass::resolver::FileResolver;

/// A block that is still open, addressed by its index path from the file's top level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSelector {
    pub level: usize,
    pub path: Vec<usize>,
}

/// A variable visible to later lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeVariable {
    pub name: String,
    pub line: usize,
}

/// An import or use visible to later lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeImport {
    /// `@import`, members are merged into the importing scope
    Import { uri: Url },
    /// `@use`, members are accessed through the namespace (`None` for `as *`)
    Use { uri: Url, namespace: Option<String> },
}

impl ScopeImport {
    pub fn uri(&self) -> &Url {
        match self {
            ScopeImport::Import { uri } => uri,
            ScopeImport::Use { uri, .. } => uri,
        }
    }

    /// Whether a reference with the given namespace may be found through this import
    fn accepts(&self, namespace: Option<&str>) -> bool {
        match self {
            ScopeImport::Import { .. } => true,
            ScopeImport::Use { namespace: own, .. } => own.as_deref() == namespace,
        }
    }
}

/// Scope state for a single parse
#[derive(Debug, Clone)]
pub struct Scope {
    uri: Url,
    selectors: Vec<OpenSelector>,
    variables: Vec<Vec<ScopeVariable>>,
    imports: Vec<Vec<ScopeImport>>,
}

impl Scope {
    pub fn new(uri: Url) -> Self {
        Self {
            uri,
            selectors: Vec::new(),
            variables: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Number of blocks currently open
    pub fn open_selector_count(&self) -> usize {
        self.selectors.len()
    }

    pub fn selector(&self, index: usize) -> Option<&OpenSelector> {
        self.selectors.get(index)
    }

    /// Innermost open block
    pub fn deepest_selector(&self) -> Option<&OpenSelector> {
        self.selectors.last()
    }

    /// Forget everything opened or declared deeper than `level`.
    ///
    /// Blocks at `level` itself are closed too, a node at `level` is their sibling.
    pub fn truncate(&mut self, level: usize) {
        self.selectors.truncate(level);
        self.variables.truncate(level + 1);
        self.imports.truncate(level + 1);
    }

    /// Open a block at `level`, closing any sibling or deeper block
    pub fn enter_selector(&mut self, level: usize, path: Vec<usize>) {
        self.truncate(level);
        self.selectors.push(OpenSelector { level, path });
    }

    /// Declare a variable at `level`
    pub fn declare_variable(&mut self, name: impl Into<String>, line: usize, level: usize) {
        self.truncate(level);
        if self.variables.len() <= level {
            self.variables.resize_with(level + 1, Vec::new);
        }
        self.variables[level].push(ScopeVariable {
            name: name.into(),
            line,
        });
    }

    /// Declare a mixin parameter, visible inside the mixin body at `level`
    /// without closing the mixin itself
    pub fn declare_parameter(&mut self, name: impl Into<String>, line: usize, level: usize) {
        self.variables.truncate(level + 1);
        if self.variables.len() <= level {
            self.variables.resize_with(level + 1, Vec::new);
        }
        self.variables[level].push(ScopeVariable {
            name: name.into(),
            line,
        });
    }

    /// Make an import or use visible at `level`
    pub fn declare_import(&mut self, import: ScopeImport, level: usize) {
        self.truncate(level);
        if self.imports.len() <= level {
            self.imports.resize_with(level + 1, Vec::new);
        }
        self.imports[level].push(import);
    }

    /// Variables visible at `level`, innermost level first and latest declaration first
    pub fn visible_variables(&self, level: usize) -> impl Iterator<Item = &ScopeVariable> {
        let depth = level.saturating_add(1).min(self.variables.len());
        self.variables[..depth]
            .iter()
            .rev()
            .flat_map(|declared| declared.iter().rev())
    }

    /// Imports visible at `level`, in source order
    pub fn visible_imports(&self, level: usize) -> impl Iterator<Item = &ScopeImport> {
        let depth = level.saturating_add(1).min(self.imports.len());
        self.imports[..depth].iter().flatten()
    }

    /// Resolve a variable reference written at `level`.
    ///
    /// A namespaced reference (`ns.$name`) only matches `@use` imports with that
    /// namespace (and plain imports), never local declarations.
    pub fn resolve_variable(
        &self,
        name: &str,
        namespace: Option<&str>,
        level: usize,
        resolver: &dyn FileResolver,
    ) -> Option<VariableLocation> {
        if namespace.is_none() {
            if let Some(variable) = self.visible_variables(level).find(|v| v.name == name) {
                return Some(VariableLocation {
                    uri: self.uri.clone(),
                    line: variable.line,
                });
            }
        }

        self.visible_imports(level)
            .filter(|import| import.accepts(namespace))
            .find_map(|import| resolver.find_variable(import.uri(), name))
            .map(|found| VariableLocation {
                uri: found.uri,
                line: found.node.line,
            })
    }
}

/// Lookup seam used by the expression parser
pub trait VariableLookup {
    fn lookup(&self, name: &str, namespace: Option<&str>, level: usize) -> Option<VariableLocation>;
}

/// Lookup through a scope and its imports
pub struct ScopedLookup<'a> {
    pub scope: &'a Scope,
    pub resolver: &'a dyn FileResolver,
}

impl VariableLookup for ScopedLookup<'_> {
    fn lookup(&self, name: &str, namespace: Option<&str>, level: usize) -> Option<VariableLocation> {
        let location = self.scope.resolve_variable(name, namespace, level, self.resolver);
        if location.is_none() {
            log::debug!(
                "Variable {}{} not found in scope of {}",
                namespace.map(|ns| format!("{}.", ns)).unwrap_or_default(),
                name,
                self.scope.uri()
            );
        }
        location
    }
}
