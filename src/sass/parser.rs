//! AST Builder
//!
//! Turns indented Sass text into a [`FileEntry`]: a tree of [`Node`]s plus the
//! diagnostics found on the way. The builder walks the text one line at a time,
//! classifies each line, measures its indentation and attaches the resulting node
//! to the block that is open at that depth.
//!
//! Open blocks are addressed by index paths into the tree (see [`Scope`]), so the
//! tree is only ever borrowed mutably for the duration of a single insert.
//! Parsing never fails: malformed lines degrade to diagnostics.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::sass::constants::{KEYWORD_EXTEND, KEYWORD_INCLUDE, KEYWORD_MIXIN, SYMBOL_INCLUDE, SYMBOL_MIXIN};
use crate::sass::diagnostics::{SassDiagnostic, create_range, line_range};
use crate::sass::expression::{ValueLocation, parse_expression};
use crate::sass::indentation;
use crate::sass::line_kind::{ClassifyContext, LineKind, classify_line, closes_block_comment, split_declaration};
use crate::sass::nodes::*;
use crate::sass::options::SassAstOptions;
use crate::sass::resolver::FileResolver;
use crate::sass::scope::{Scope, ScopeImport, ScopedLookup};

fn use_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r#"^[\t ]*@use[\t ]+(?:"([^"]*)"|'([^']*)'|(\S+))(?:[\t ]+as[\t ]+(\*|[\w-]+))?"#)
            .expect("built-in pattern must compile")
    })
}

fn import_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"^[\t ]*@import[\t ]+(.*)$").expect("built-in pattern must compile"))
}

/// Where a node ends up in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    TopLevel,
    /// Body of the block at this index path
    Into(Vec<usize>),
}

/// Block comment that is still collecting lines
#[derive(Debug, Clone)]
struct OpenBlockComment {
    path: Vec<usize>,
    distance: usize,
}

/// Indentation facts about the line being parsed
#[derive(Debug, Clone, Copy)]
struct LineInfo {
    index: usize,
    distance: usize,
    raw_level: usize,
}

/// Builds the syntax tree for a single file
pub struct SassParser {
    uri: Url,
    options: SassAstOptions,
    nodes: Vec<Node>,
    diagnostics: Vec<SassDiagnostic>,
    scope: Scope,
    classify: ClassifyContext,
    block_comment: Option<OpenBlockComment>,
    /// `@use` is only allowed before anything other than variables and comments
    can_push_top_level_use_node: bool,
    /// Empty lines waiting for the next non-empty line to decide their block
    pending_empty_lines: Vec<usize>,
}

impl SassParser {
    pub fn new(uri: Url, options: SassAstOptions) -> Self {
        Self {
            scope: Scope::new(uri.clone()),
            classify: ClassifyContext::new(options.tab_stop()),
            uri,
            options,
            nodes: Vec::new(),
            diagnostics: Vec::new(),
            block_comment: None,
            can_push_top_level_use_node: true,
            pending_empty_lines: Vec::new(),
        }
    }

    /// Parse the whole text.
    ///
    /// Imported files are loaded through the resolver as their `@import` or `@use`
    /// line is reached, so variables from them resolve for the lines that follow.
    pub async fn parse(mut self, text: &str, resolver: &dyn FileResolver) -> FileEntry {
        for (index, raw_line) in text.split('\n').enumerate() {
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
            self.parse_line(index, line, resolver).await;
        }
        self.flush_empty_lines(&Placement::TopLevel);

        log::debug!(
            "Parsed {}: {} top level nodes, {} diagnostics",
            self.uri,
            self.nodes.len(),
            self.diagnostics.len()
        );

        FileEntry {
            body: self.nodes,
            diagnostics: self.diagnostics,
        }
    }

    async fn parse_line(&mut self, index: usize, line: &str, resolver: &dyn FileResolver) {
        let tab_size = self.options.tab_stop();
        let distance = indentation::distance(line, tab_size);
        let info = LineInfo {
            index,
            distance,
            raw_level: indentation::level(distance, tab_size),
        };

        let kind = classify_line(line, &self.classify);
        if kind != LineKind::BlockCommentContent {
            self.block_comment = None;
            self.classify.open_block_comment = None;
        }

        if kind == LineKind::Empty {
            self.pending_empty_lines.push(index);
            return;
        }
        // Empty lines belong to the block of the line that follows them
        let (placement, _) = self.target(info);
        self.flush_empty_lines(&placement);

        match kind {
            LineKind::Empty => {}
            LineKind::Selector => {
                self.can_push_top_level_use_node = false;
                let level = self.node_level(info);
                let node = Node::Selector(SelectorNode::new(index, level, line.trim()));
                self.push_block(node, info, line);
            }
            LineKind::FontFace => {
                self.can_push_top_level_use_node = false;
                let level = self.node_level(info);
                self.push_block(Node::FontFace(FontFaceNode::new(index, level)), info, line);
            }
            LineKind::Mixin => {
                self.can_push_top_level_use_node = false;
                self.parse_mixin(info, line, resolver);
            }
            LineKind::Property => {
                self.can_push_top_level_use_node = false;
                self.parse_declaration(info, line, resolver, false);
            }
            LineKind::Variable => {
                self.parse_declaration(info, line, resolver, true);
            }
            LineKind::Include => {
                self.can_push_top_level_use_node = false;
                let level = self.node_level(info);
                let trimmed = line.trim();
                let node = match trimmed.strip_prefix(KEYWORD_INCLUDE) {
                    Some(rest) => IncludeNode::new(index, level, rest.trim(), IncludeType::At),
                    None => IncludeNode::new(
                        index,
                        level,
                        trimmed.trim_start_matches(SYMBOL_INCLUDE).trim(),
                        IncludeType::Symbol,
                    ),
                };
                self.push_leaf(Node::Include(node), info, line);
            }
            LineKind::Extend => {
                self.can_push_top_level_use_node = false;
                let level = self.node_level(info);
                let selector = line.trim().trim_start_matches(KEYWORD_EXTEND).trim();
                self.push_leaf(Node::Extend(ExtendNode::new(index, level, selector)), info, line);
            }
            LineKind::Import => {
                self.can_push_top_level_use_node = false;
                self.parse_import(info, line, resolver).await;
            }
            LineKind::Use => {
                self.parse_use(info, line, resolver).await;
            }
            LineKind::Comment => {
                let level = self.node_level(info);
                let placement = self.placement(info, line);
                self.insert(Node::Comment(CommentNode::new(index, level, line.trim())), &placement);
            }
            LineKind::BlockCommentStart => {
                let level = self.node_level(info);
                let placement = self.placement(info, line);
                let node = Node::BlockComment(BlockCommentNode::new(index, level, line.trim()));
                let path = self.insert(node, &placement);
                let opened = line.find("/*").map(|start| &line[start + 2..]).unwrap_or_default();
                if !closes_block_comment(opened) {
                    self.block_comment = Some(OpenBlockComment { path, distance });
                    self.classify.open_block_comment = Some(distance);
                }
            }
            LineKind::BlockCommentContent => {
                self.push_block_comment_line(index, line);
            }
            LineKind::Literal => self.push_unclassified(info, line),
        }
    }

    fn flush_empty_lines(&mut self, placement: &Placement) {
        for index in std::mem::take(&mut self.pending_empty_lines) {
            self.insert(Node::EmptyLine(EmptyLineNode::new(index)), placement);
        }
    }

    /// Keep a line nothing else understood, with a warning
    fn push_unclassified(&mut self, info: LineInfo, line: &str) {
        self.can_push_top_level_use_node = false;
        self.diagnostics
            .push(SassDiagnostic::unclassified_line(line_range(info.index, line), line));
        let level = self.node_level(info);
        self.push_leaf(
            Node::Unclassified(UnclassifiedNode::new(info.index, level, line.trim())),
            info,
            line,
        );
    }

    /// Level of a node on this line, never deeper than the open blocks allow
    fn node_level(&self, info: LineInfo) -> usize {
        info.raw_level.min(self.scope.open_selector_count())
    }

    /// Decide which body a line belongs to, reporting indentation that is too deep
    fn placement(&mut self, info: LineInfo, line: &str) -> Placement {
        let (placement, too_deep) = self.target(info);
        if too_deep {
            self.diagnostics.push(SassDiagnostic::invalid_indentation(
                create_range(info.index, 0, line.chars().count()),
                self.scope.open_selector_count(),
                self.options.tab_size,
                self.options.insert_spaces,
            ));
        }
        placement
    }

    /// Body a line belongs to and whether it is indented past the innermost block
    fn target(&self, info: LineInfo) -> (Placement, bool) {
        let open = self.scope.open_selector_count();
        if info.distance < self.options.tab_stop() || open == 0 {
            return (Placement::TopLevel, false);
        }

        let (selector, too_deep) = if info.raw_level > open {
            (self.scope.deepest_selector(), true)
        } else {
            (self.scope.selector(info.raw_level - 1), false)
        };
        let placement = selector
            .map(|selector| Placement::Into(selector.path.clone()))
            .unwrap_or(Placement::TopLevel);
        (placement, too_deep)
    }

    /// Insert a node and return its index path
    fn insert(&mut self, node: Node, placement: &Placement) -> Vec<usize> {
        let parent: &[usize] = match placement {
            Placement::TopLevel => &[],
            Placement::Into(path) => path,
        };
        let body = match body_at_mut(&mut self.nodes, parent) {
            Some(body) => body,
            None => {
                log::warn!("Open block at {:?} no longer exists in {}", parent, self.uri);
                self.nodes.push(node);
                return vec![self.nodes.len() - 1];
            }
        };
        body.push(node);
        let mut path = parent.to_vec();
        path.push(body.len() - 1);
        path
    }

    /// Insert a block node and make it the innermost open block
    fn push_block(&mut self, node: Node, info: LineInfo, line: &str) -> usize {
        let level = self.node_level(info);
        let placement = self.placement(info, line);
        let path = self.insert(node, &placement);
        self.scope.enter_selector(level, path);
        level
    }

    /// Insert a node without a body, closing any deeper block
    fn push_leaf(&mut self, node: Node, info: LineInfo, line: &str) {
        let level = self.node_level(info);
        let placement = self.placement(info, line);
        self.insert(node, &placement);
        self.scope.truncate(level);
    }

    fn parse_declaration(&mut self, info: LineInfo, line: &str, resolver: &dyn FileResolver, is_variable: bool) {
        let Some(declaration) = split_declaration(line) else {
            self.push_unclassified(info, line);
            return;
        };
        let level = self.node_level(info);
        let value_location = ValueLocation {
            line: info.index,
            start_offset: declaration.value_offset,
            level,
        };
        let body = {
            let lookup = ScopedLookup {
                scope: &self.scope,
                resolver,
            };
            parse_expression(declaration.value, value_location, &lookup, &mut self.diagnostics)
        };

        let placement = self.placement(info, line);
        if is_variable {
            self.insert(
                Node::Variable(VariableNode::new(info.index, level, declaration.name, body)),
                &placement,
            );
            self.scope.declare_variable(declaration.name, info.index, level);
        } else {
            self.insert(
                Node::Property(PropertyNode::new(info.index, level, declaration.name, body)),
                &placement,
            );
            self.scope.truncate(level);
        }
    }

    fn parse_mixin(&mut self, info: LineInfo, line: &str, resolver: &dyn FileResolver) {
        let level = self.node_level(info);
        let trimmed_start = line.len() - line.trim_start().len();
        let (mixin_type, keyword_len) = if line[trimmed_start..].starts_with(KEYWORD_MIXIN) {
            (MixinType::At, KEYWORD_MIXIN.len())
        } else {
            (MixinType::Symbol, SYMBOL_MIXIN.len())
        };
        let rest_start = trimmed_start + keyword_len;
        let rest = line[rest_start..].trim_end();

        let (name, arguments) = match rest.find('(') {
            Some(open) => {
                let close = rest.rfind(')').filter(|close| *close > open).unwrap_or(rest.len());
                let column = line[..rest_start + open + 1].chars().count();
                (rest[..open].trim(), split_arguments(&rest[open + 1..close], column))
            }
            None => (rest.trim(), Vec::new()),
        };

        let mut args = Vec::with_capacity(arguments.len());
        for (argument, column) in &arguments {
            let arg = match split_declaration(argument) {
                Some(declaration) => {
                    let location = ValueLocation {
                        line: info.index,
                        start_offset: column + declaration.value_offset,
                        level,
                    };
                    let lookup = ScopedLookup {
                        scope: &self.scope,
                        resolver,
                    };
                    let body = parse_expression(declaration.value, location, &lookup, &mut self.diagnostics);
                    MixinArg {
                        value: declaration.name.to_string(),
                        body: Some(body),
                    }
                }
                None => MixinArg {
                    value: argument.trim().to_string(),
                    body: None,
                },
            };
            args.push(arg);
        }

        let parameters: Vec<String> = args.iter().map(|arg| arg.value.clone()).collect();
        let node = Node::Mixin(MixinNode::new(info.index, level, name, mixin_type, args));
        let level = self.push_block(node, info, line);
        for parameter in parameters {
            self.scope.declare_parameter(parameter, info.index, level + 1);
        }
    }

    async fn parse_import(&mut self, info: LineInfo, line: &str, resolver: &dyn FileResolver) {
        let paths = import_regex()
            .captures(line)
            .and_then(|c| c.get(1))
            .map(|paths| split_import_paths(paths.as_str()))
            .unwrap_or_default();
        if paths.is_empty() {
            self.push_unclassified(info, line);
            return;
        }
        let level = self.node_level(info);

        for path in paths {
            let uri = if is_css_import(&path) {
                None
            } else {
                resolver.resolve_uri(&self.uri, &path)
            };
            if uri.is_none() && !is_css_import(&path) {
                log::debug!("Could not resolve import '{}' from {}", path, self.uri);
            }

            let placement = self.placement(info, line);
            self.insert(
                Node::Import(ImportNode::new(info.index, level, path, uri.clone())),
                &placement,
            );

            if let Some(uri) = uri {
                if let Err(error) = resolver.load_and_parse(&uri, &self.options).await {
                    log::warn!("Failed to load import {}: {}", uri, error);
                }
                self.scope.declare_import(ScopeImport::Import { uri }, level);
            } else {
                self.scope.truncate(level);
            }
        }
    }

    async fn parse_use(&mut self, info: LineInfo, line: &str, resolver: &dyn FileResolver) {
        if !self.can_push_top_level_use_node {
            self.diagnostics
                .push(SassDiagnostic::use_not_top_level(line_range(info.index, line)));
            let level = self.node_level(info);
            let placement = self.placement(info, line);
            let comment = format!("// {}", line.trim());
            self.insert(Node::Comment(CommentNode::new(info.index, level, comment)), &placement);
            return;
        }

        let Some(captures) = use_regex().captures(line) else {
            self.push_unclassified(info, line);
            return;
        };
        let path = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let namespace = match captures.get(4).map(|m| m.as_str()) {
            Some("*") => None,
            Some(alias) => Some(alias.to_string()),
            None => Some(default_namespace(&path)),
        };

        let uri = resolver.resolve_uri(&self.uri, &path);
        if uri.is_none() {
            log::debug!("Could not resolve module '{}' from {}", path, self.uri);
        }
        self.insert(
            Node::Use(UseNode::new(info.index, path, uri.clone(), namespace.clone())),
            &Placement::TopLevel,
        );

        if let Some(uri) = uri {
            if let Err(error) = resolver.load_and_parse(&uri, &self.options).await {
                log::warn!("Failed to load module {}: {}", uri, error);
            }
            self.scope.declare_import(ScopeImport::Use { uri, namespace }, 0);
        }
    }

    fn push_block_comment_line(&mut self, index: usize, line: &str) {
        let Some(open) = &self.block_comment else {
            return;
        };
        let value = strip_columns(line, open.distance, self.options.tab_stop())
            .trim_end()
            .to_string();
        let closes = closes_block_comment(line);
        let path = open.path.clone();

        match node_at_mut(&mut self.nodes, &path) {
            Some(Node::BlockComment(comment)) => comment.body.push(BlockCommentLine { line: index, value }),
            _ => log::warn!("Open block comment at {:?} no longer exists in {}", path, self.uri),
        }

        if closes {
            self.block_comment = None;
            self.classify.open_block_comment = None;
        }
    }
}

/// Parse a file in one call
pub async fn parse_file(text: &str, uri: Url, options: SassAstOptions, resolver: &dyn FileResolver) -> FileEntry {
    SassParser::new(uri, options).parse(text, resolver).await
}

/// Body of the block at `path`, the top level for an empty path
pub fn body_at_mut<'a>(nodes: &'a mut Vec<Node>, path: &[usize]) -> Option<&'a mut Vec<Node>> {
    let mut body = nodes;
    for &index in path {
        body = body.get_mut(index)?.children_mut()?;
    }
    Some(body)
}

/// Node at `path`
pub fn node_at_mut<'a>(nodes: &'a mut Vec<Node>, path: &[usize]) -> Option<&'a mut Node> {
    let (last, parent) = path.split_last()?;
    body_at_mut(nodes, parent)?.get_mut(*last)
}

/// Namespace of `@use 'path'` without `as`: the last path segment without a
/// leading underscore or extension
pub fn default_namespace(path: &str) -> String {
    let segment = path.rsplit(|c| c == '/' || c == ':').next().unwrap_or(path);
    let segment = segment.strip_prefix('_').unwrap_or(segment);
    match segment.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => segment.to_string(),
    }
}

/// `url(...)`, `http(s)://...` and `.css` imports are plain css and are never loaded
fn is_css_import(path: &str) -> bool {
    path.starts_with("url(")
        || path.starts_with("http://")
        || path.starts_with("https://")
        || path.ends_with(".css")
}

/// Split `'a', "b", c` into unquoted paths
fn split_import_paths(text: &str) -> Vec<String> {
    text.split(',')
        .map(|path| path.trim().trim_end_matches(';').trim())
        .map(|path| path.trim_matches(|c| c == '"' || c == '\''))
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split mixin arguments at top level commas, returning each argument with the
/// character column it starts at
fn split_arguments(text: &str, start_column: usize) -> Vec<(String, usize)> {
    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut current_start = start_column;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (offset, ch) in text.chars().enumerate() {
        let column = start_column + offset;
        if current.is_empty() && (ch == ' ' || ch == '\t') {
            continue;
        }
        if current.is_empty() {
            current_start = column;
        }
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    arguments.push((std::mem::take(&mut current).trim_end().to_string(), current_start));
                    continue;
                }
                _ => {}
            },
        }
        current.push(ch);
    }
    let last = current.trim_end();
    if !last.is_empty() {
        arguments.push((last.to_string(), current_start));
    }
    arguments
}

/// Remove up to `columns` columns of leading whitespace
fn strip_columns(line: &str, columns: usize, tab_size: usize) -> &str {
    let mut removed = 0;
    for (index, ch) in line.char_indices() {
        if removed >= columns {
            return &line[index..];
        }
        match ch {
            ' ' => removed += 1,
            '\t' => removed += tab_size,
            _ => return &line[index..],
        }
    }
    ""
}
