//! Stringifier
//!
//! Writes a syntax tree back out as indented Sass. Every node is rendered at the
//! indentation of its level, lines are renumbered in output order and runs of
//! empty lines collapse to a single one (the collapsed nodes are removed from the
//! tree as well, so the line numbers stay in sync with the text).

use crate::sass::indentation::indentation_for_level;
use crate::sass::nodes::*;
use crate::sass::options::SassAstOptions;
use crate::sass::parser::default_namespace;

/// State carried across one stringify call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringifyState {
    pub current_line: usize,
    pub was_last_line_empty: bool,
    lines: Vec<String>,
}

impl StringifyState {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_line(&mut self) -> usize {
        let line = self.current_line;
        self.current_line += 1;
        self.was_last_line_empty = false;
        line
    }

    fn push_line(&mut self, text: String, level: usize, options: &SassAstOptions) {
        let mut line = indentation_for_level(level, options);
        line.push_str(&text);
        self.lines.push(line);
    }

    fn into_text(self) -> String {
        self.lines.join("\n")
    }
}

/// Render a node list, renumbering lines and dropping redundant empty lines
pub fn stringify_nodes(nodes: &mut Vec<Node>, options: &SassAstOptions) -> String {
    let mut state = StringifyState::new();
    write_nodes(nodes, options, &mut state);
    state.into_text()
}

fn write_nodes(nodes: &mut Vec<Node>, options: &SassAstOptions, state: &mut StringifyState) {
    let taken = std::mem::take(nodes);
    let mut kept = Vec::with_capacity(taken.len());
    for mut node in taken {
        if node.is_empty_line() && state.was_last_line_empty {
            continue;
        }
        write_node(&mut node, options, state);
        kept.push(node);
    }
    *nodes = kept;
}

fn write_node(node: &mut Node, options: &SassAstOptions, state: &mut StringifyState) {
    match node {
        Node::Selector(selector) => {
            selector.line = state.next_line();
            state.push_line(selector.value.clone(), selector.level, options);
            write_nodes(&mut selector.body, options, state);
        }
        Node::Property(PropertyNode { line, level, value, body })
        | Node::Variable(VariableNode { line, level, value, body }) => {
            *line = state.next_line();
            state.push_line(format!("{}:{}", value, stringify_values(body)), *level, options);
        }
        Node::Import(import) => {
            import.line = state.next_line();
            state.push_line(format!("@import '{}'", import.value), import.level, options);
        }
        Node::Use(use_node) => {
            use_node.line = state.next_line();
            state.push_line(stringify_use(use_node), 0, options);
        }
        Node::Comment(comment) => {
            comment.line = state.next_line();
            state.push_line(comment.value.clone(), comment.level, options);
        }
        Node::BlockComment(comment) => {
            comment.line = state.current_line;
            for content in &mut comment.body {
                content.line = state.next_line();
                state.push_line(content.value.clone(), comment.level, options);
            }
        }
        Node::EmptyLine(empty) => {
            empty.line = state.next_line();
            state.lines.push(String::new());
            state.was_last_line_empty = true;
        }
        Node::Extend(extend) => {
            extend.line = state.next_line();
            state.push_line(format!("@extend {}", extend.value), extend.level, options);
        }
        Node::Include(include) => {
            include.line = state.next_line();
            let text = match include.include_type {
                IncludeType::At => format!("@include {}", include.value),
                IncludeType::Symbol => format!("+{}", include.value),
            };
            state.push_line(text, include.level, options);
        }
        Node::Mixin(mixin) => {
            mixin.line = state.next_line();
            state.push_line(stringify_mixin_header(mixin), mixin.level, options);
            write_nodes(&mut mixin.body, options, state);
        }
        Node::FontFace(font_face) => {
            font_face.line = state.next_line();
            state.push_line("@font-face".to_string(), font_face.level, options);
            write_nodes(&mut font_face.body, options, state);
        }
        Node::Unclassified(unclassified) => {
            unclassified.line = state.next_line();
            state.push_line(unclassified.value.clone(), unclassified.level, options);
        }
    }
}

/// Render declaration values, each token preceded by a single space unless it
/// was written against the previous one
pub fn stringify_values(values: &[NodeValue]) -> String {
    let mut text = String::new();
    for value in values {
        if !value.is_joined() {
            text.push(' ');
        }
        match value {
            NodeValue::Literal(literal) => text.push_str(&literal.value),
            NodeValue::VariableRef(reference) => text.push_str(&reference.value),
            NodeValue::Expression(expression) => {
                let inner = stringify_values(&expression.body);
                let inner = inner.strip_prefix(' ').unwrap_or(&inner);
                match &expression.expression_type {
                    ExpressionType::Func { name } => {
                        text.push_str(&format!("{}({})", name, inner));
                    }
                    ExpressionType::Interpolated => {
                        text.push_str(&format!("#{{{}}}", inner));
                    }
                }
            }
        }
    }
    text
}

/// `@use 'path'`, with `as` only when the namespace differs from the default
fn stringify_use(node: &UseNode) -> String {
    match &node.namespace {
        None => format!("@use '{}' as *", node.value),
        Some(namespace) if *namespace == default_namespace(&node.value) => {
            format!("@use '{}'", node.value)
        }
        Some(namespace) => format!("@use '{}' as {}", node.value, namespace),
    }
}

fn stringify_mixin_header(node: &MixinNode) -> String {
    let mut text = match node.mixin_type {
        MixinType::At => format!("@mixin {}", node.value),
        MixinType::Symbol => format!("={}", node.value),
    };
    if !node.args.is_empty() {
        let args: Vec<String> = node
            .args
            .iter()
            .map(|arg| match &arg.body {
                Some(body) => format!("{}:{}", arg.value, stringify_values(body)),
                None => arg.value.clone(),
            })
            .collect();
        text.push('(');
        text.push_str(&args.join(", "));
        text.push(')');
    }
    text
}
