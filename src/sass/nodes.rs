//! Sass syntax tree
//!
//! [`Node`] is the line level tree produced by the parser, one variant per construct.
//! Declaration values are parsed into [`NodeValue`]s: literals, variable references
//! and nested function / interpolation expressions.
//!
//! Every variant has its own struct with a `new` constructor, so adding a field to a
//! kind is checked everywhere that kind is built or matched.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::sass::diagnostics::SassDiagnostic;

/// Every kind of node, with the names used in serialized trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Selector,
    Property,
    Variable,
    Import,
    Use,
    Comment,
    BlockComment,
    EmptyLine,
    Expression,
    Literal,
    VariableRef,
    Extend,
    Include,
    Mixin,
    FontFace,
    Unclassified,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Selector => "selector",
            NodeKind::Property => "property",
            NodeKind::Variable => "variable",
            NodeKind::Import => "import",
            NodeKind::Use => "use",
            NodeKind::Comment => "comment",
            NodeKind::BlockComment => "blockComment",
            NodeKind::EmptyLine => "emptyLine",
            NodeKind::Expression => "expression",
            NodeKind::Literal => "literal",
            NodeKind::VariableRef => "variableRef",
            NodeKind::Extend => "extend",
            NodeKind::Include => "include",
            NodeKind::Mixin => "mixin",
            NodeKind::FontFace => "fontFace",
            NodeKind::Unclassified => "unclassified",
        }
    }
}

/// A line level node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Selector(SelectorNode),
    Property(PropertyNode),
    Variable(VariableNode),
    Import(ImportNode),
    Use(UseNode),
    Comment(CommentNode),
    BlockComment(BlockCommentNode),
    EmptyLine(EmptyLineNode),
    Extend(ExtendNode),
    Include(IncludeNode),
    Mixin(MixinNode),
    FontFace(FontFaceNode),
    Unclassified(UnclassifiedNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Selector(_) => NodeKind::Selector,
            Node::Property(_) => NodeKind::Property,
            Node::Variable(_) => NodeKind::Variable,
            Node::Import(_) => NodeKind::Import,
            Node::Use(_) => NodeKind::Use,
            Node::Comment(_) => NodeKind::Comment,
            Node::BlockComment(_) => NodeKind::BlockComment,
            Node::EmptyLine(_) => NodeKind::EmptyLine,
            Node::Extend(_) => NodeKind::Extend,
            Node::Include(_) => NodeKind::Include,
            Node::Mixin(_) => NodeKind::Mixin,
            Node::FontFace(_) => NodeKind::FontFace,
            Node::Unclassified(_) => NodeKind::Unclassified,
        }
    }

    /// Zero based source line (renumbered by the stringifier)
    pub fn line(&self) -> usize {
        match self {
            Node::Selector(node) => node.line,
            Node::Property(node) => node.line,
            Node::Variable(node) => node.line,
            Node::Import(node) => node.line,
            Node::Use(node) => node.line,
            Node::Comment(node) => node.line,
            Node::BlockComment(node) => node.line,
            Node::EmptyLine(node) => node.line,
            Node::Extend(node) => node.line,
            Node::Include(node) => node.line,
            Node::Mixin(node) => node.line,
            Node::FontFace(node) => node.line,
            Node::Unclassified(node) => node.line,
        }
    }

    /// Nesting level, `None` for kinds that have no level (`use`, `emptyLine`)
    pub fn level(&self) -> Option<usize> {
        match self {
            Node::Selector(node) => Some(node.level),
            Node::Property(node) => Some(node.level),
            Node::Variable(node) => Some(node.level),
            Node::Import(node) => Some(node.level),
            Node::Comment(node) => Some(node.level),
            Node::BlockComment(node) => Some(node.level),
            Node::Extend(node) => Some(node.level),
            Node::Include(node) => Some(node.level),
            Node::Mixin(node) => Some(node.level),
            Node::FontFace(node) => Some(node.level),
            Node::Unclassified(node) => Some(node.level),
            Node::Use(_) | Node::EmptyLine(_) => None,
        }
    }

    /// Child nodes of block kinds (selector, mixin, font-face)
    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Selector(node) => Some(&node.body),
            Node::Mixin(node) => Some(&node.body),
            Node::FontFace(node) => Some(&node.body),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Selector(node) => Some(&mut node.body),
            Node::Mixin(node) => Some(&mut node.body),
            Node::FontFace(node) => Some(&mut node.body),
            _ => None,
        }
    }

    pub fn is_empty_line(&self) -> bool {
        matches!(self, Node::EmptyLine(_))
    }
}

/// Selector or block at-rule header, owns the nested lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorNode {
    pub line: usize,
    pub level: usize,
    pub value: String,
    pub body: Vec<Node>,
}

impl SelectorNode {
    pub fn new(line: usize, level: usize, value: impl Into<String>) -> Self {
        Self {
            line,
            level,
            value: value.into(),
            body: Vec::new(),
        }
    }
}

/// `name: value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyNode {
    pub line: usize,
    pub level: usize,
    /// Property name
    pub value: String,
    pub body: Vec<NodeValue>,
}

impl PropertyNode {
    pub fn new(line: usize, level: usize, name: impl Into<String>, body: Vec<NodeValue>) -> Self {
        Self {
            line,
            level,
            value: name.into(),
            body,
        }
    }
}

/// `$name: value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableNode {
    pub line: usize,
    pub level: usize,
    /// Variable name including the `$` (or `--`) prefix
    pub value: String,
    pub body: Vec<NodeValue>,
}

impl VariableNode {
    pub fn new(line: usize, level: usize, name: impl Into<String>, body: Vec<NodeValue>) -> Self {
        Self {
            line,
            level,
            value: name.into(),
            body,
        }
    }
}

/// `@import 'path'`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportNode {
    pub line: usize,
    pub level: usize,
    /// Import path as written, without quotes
    pub value: String,
    /// Resolved target, `None` for plain css imports or missing files
    pub uri: Option<Url>,
}

impl ImportNode {
    pub fn new(line: usize, level: usize, path: impl Into<String>, uri: Option<Url>) -> Self {
        Self {
            line,
            level,
            value: path.into(),
            uri,
        }
    }
}

/// `@use 'path' [as namespace]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseNode {
    pub line: usize,
    /// Module path as written, without quotes
    pub value: String,
    pub uri: Option<Url>,
    /// Namespace members are accessed through, `None` for `as *`
    pub namespace: Option<String>,
}

impl UseNode {
    pub fn new(
        line: usize,
        path: impl Into<String>,
        uri: Option<Url>,
        namespace: Option<String>,
    ) -> Self {
        Self {
            line,
            value: path.into(),
            uri,
            namespace,
        }
    }
}

/// `// comment`, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentNode {
    pub line: usize,
    pub level: usize,
    pub value: String,
}

impl CommentNode {
    pub fn new(line: usize, level: usize, value: impl Into<String>) -> Self {
        Self {
            line,
            level,
            value: value.into(),
        }
    }
}

/// One line of a block comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCommentLine {
    pub line: usize,
    /// Text with the comment's own indentation removed
    pub value: String,
}

/// `/* ... */`, the opening line is the first entry of `body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockCommentNode {
    pub line: usize,
    pub level: usize,
    pub body: Vec<BlockCommentLine>,
}

impl BlockCommentNode {
    pub fn new(line: usize, level: usize, first_line: impl Into<String>) -> Self {
        Self {
            line,
            level,
            body: vec![BlockCommentLine {
                line,
                value: first_line.into(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyLineNode {
    pub line: usize,
}

impl EmptyLineNode {
    pub fn new(line: usize) -> Self {
        Self { line }
    }
}

/// `@extend selector`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendNode {
    pub line: usize,
    pub level: usize,
    /// Extended selector
    pub value: String,
}

impl ExtendNode {
    pub fn new(line: usize, level: usize, selector: impl Into<String>) -> Self {
        Self {
            line,
            level,
            value: selector.into(),
        }
    }
}

/// Spelling of an include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncludeType {
    /// `@include name`
    #[serde(rename = "@include")]
    At,
    /// `+name`
    #[serde(rename = "+")]
    Symbol,
}

/// `@include name(args)` or `+name(args)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludeNode {
    pub line: usize,
    pub level: usize,
    /// Everything after the keyword
    pub value: String,
    pub include_type: IncludeType,
}

impl IncludeNode {
    pub fn new(
        line: usize,
        level: usize,
        value: impl Into<String>,
        include_type: IncludeType,
    ) -> Self {
        Self {
            line,
            level,
            value: value.into(),
            include_type,
        }
    }
}

/// Spelling of a mixin declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixinType {
    /// `@mixin name`
    #[serde(rename = "@mixin")]
    At,
    /// `=name`
    #[serde(rename = "=")]
    Symbol,
}

/// Mixin parameter, `body` holds the parsed default value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixinArg {
    /// Parameter name including `$`
    pub value: String,
    pub body: Option<Vec<NodeValue>>,
}

/// `@mixin name($arg: default)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixinNode {
    pub line: usize,
    pub level: usize,
    /// Mixin name
    pub value: String,
    pub mixin_type: MixinType,
    pub args: Vec<MixinArg>,
    pub body: Vec<Node>,
}

impl MixinNode {
    pub fn new(
        line: usize,
        level: usize,
        name: impl Into<String>,
        mixin_type: MixinType,
        args: Vec<MixinArg>,
    ) -> Self {
        Self {
            line,
            level,
            value: name.into(),
            mixin_type,
            args,
            body: Vec::new(),
        }
    }
}

/// `@font-face` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFaceNode {
    pub line: usize,
    pub level: usize,
    pub body: Vec<Node>,
}

impl FontFaceNode {
    pub fn new(line: usize, level: usize) -> Self {
        Self {
            line,
            level,
            body: Vec::new(),
        }
    }
}

/// Line that matched no known construct, kept so the text survives a round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnclassifiedNode {
    pub line: usize,
    pub level: usize,
    pub value: String,
}

impl UnclassifiedNode {
    pub fn new(line: usize, level: usize, value: impl Into<String>) -> Self {
        Self {
            line,
            level,
            value: value.into(),
        }
    }
}

/// Part of a declaration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeValue {
    Literal(LiteralNode),
    VariableRef(VariableRefNode),
    Expression(ExpressionNode),
}

impl NodeValue {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeValue::Literal(_) => NodeKind::Literal,
            NodeValue::VariableRef(_) => NodeKind::VariableRef,
            NodeValue::Expression(_) => NodeKind::Expression,
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        NodeValue::Literal(LiteralNode {
            value: value.into(),
            joined: false,
        })
    }

    /// Written directly after the previous value, with no whitespace between them
    pub fn is_joined(&self) -> bool {
        match self {
            NodeValue::Literal(literal) => literal.joined,
            NodeValue::VariableRef(reference) => reference.joined,
            NodeValue::Expression(expression) => expression.joined,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralNode {
    pub value: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub joined: bool,
}

/// Where a variable was declared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableLocation {
    pub uri: Url,
    pub line: usize,
}

/// Reference to a variable inside a value, `ns.$name` or `$name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRefNode {
    /// Token as written
    pub value: String,
    /// Variable name including `$`
    pub name: String,
    /// Module namespace before the dot
    pub namespace: Option<String>,
    /// Declaration the reference resolved to
    #[serde(rename = "ref")]
    pub reference: Option<VariableLocation>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub joined: bool,
}

/// Kind of a nested expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "expressionType", rename_all = "camelCase")]
pub enum ExpressionType {
    /// `name(...)`, the name may be empty for plain parentheses
    Func {
        #[serde(rename = "funcName")]
        name: String,
    },
    /// `#{...}`
    Interpolated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionNode {
    #[serde(flatten)]
    pub expression_type: ExpressionType,
    pub body: Vec<NodeValue>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub joined: bool,
}

impl ExpressionNode {
    pub fn func(name: impl Into<String>) -> Self {
        Self {
            expression_type: ExpressionType::Func { name: name.into() },
            body: Vec::new(),
            joined: false,
        }
    }

    pub fn interpolated() -> Self {
        Self {
            expression_type: ExpressionType::Interpolated,
            body: Vec::new(),
            joined: false,
        }
    }
}

/// Parse result for one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub body: Vec<Node>,
    pub diagnostics: Vec<SassDiagnostic>,
}
