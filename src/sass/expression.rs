//! Expression Parser
//!
//! Splits a declaration value into a flat list of [`NodeValue`]s. Whitespace
//! separates tokens, `name(` opens a function expression, `#{` opens an
//! interpolation and `)` / `}` close the innermost open expression. Quoted strings
//! are kept as single opaque tokens. A value written against the previous one
//! (`#{$w}px`, `-#{$w}`) is marked joined so it can be written back unchanged.
//!
//! Tokens that look like variable references are resolved through a
//! [`VariableLookup`]; unresolved references get a `variableNotFound` diagnostic at
//! their exact source columns.

use std::sync::OnceLock;

use regex::Regex;

use crate::sass::diagnostics::{SassDiagnostic, create_range};
use crate::sass::nodes::{ExpressionNode, LiteralNode, NodeValue, VariableRefNode};
use crate::sass::scope::VariableLookup;

fn variable_reference_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"^(?:([A-Za-z_][\w-]*)\.)?(\$[A-Za-z_][\w-]*),?$")
            .expect("built-in pattern must compile")
    })
}

/// Where a value sits in the source, used for diagnostics and scoping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueLocation {
    /// Zero based line
    pub line: usize,
    /// Character column of the first character of the value
    pub start_offset: usize,
    /// Nesting level of the owning declaration
    pub level: usize,
}

/// Parse a declaration value into literals, variable references and expressions
pub fn parse_expression(
    raw: &str,
    location: ValueLocation,
    lookup: &dyn VariableLookup,
    diagnostics: &mut Vec<SassDiagnostic>,
) -> Vec<NodeValue> {
    let mut parser = ExpressionParser {
        location,
        lookup,
        diagnostics,
        body: Vec::new(),
        open: Vec::new(),
        token: String::new(),
        spaced: false,
    };
    parser.run(raw);
    parser.body
}

struct ExpressionParser<'a> {
    location: ValueLocation,
    lookup: &'a dyn VariableLookup,
    diagnostics: &'a mut Vec<SassDiagnostic>,
    body: Vec<NodeValue>,
    /// Expressions that have been opened but not closed yet, innermost last
    open: Vec<ExpressionNode>,
    token: String,
    /// Whitespace was seen since the last value was emitted
    spaced: bool,
}

impl ExpressionParser<'_> {
    fn run(&mut self, raw: &str) {
        let chars: Vec<char> = raw.chars().collect();
        let mut quote: Option<char> = None;
        let mut index = 0;

        while index < chars.len() {
            let ch = chars[index];

            if let Some(q) = quote {
                self.token.push(ch);
                if ch == q && !is_escaped(&chars, index) {
                    quote = None;
                }
                index += 1;
                continue;
            }

            match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    self.token.push(ch);
                }
                ' ' | '\t' => {
                    self.flush(index);
                    self.spaced = true;
                }
                '#' if chars.get(index + 1) == Some(&'{') => {
                    self.flush(index);
                    let mut expression = ExpressionNode::interpolated();
                    expression.joined = self.joined_to_previous();
                    self.open.push(expression);
                    index += 1;
                }
                '(' => {
                    let name = std::mem::take(&mut self.token);
                    let mut expression = ExpressionNode::func(name);
                    expression.joined = self.joined_to_previous();
                    self.open.push(expression);
                }
                ')' | '}' => {
                    if self.open.is_empty() {
                        // Nothing to close, keep the character as text
                        self.token.push(ch);
                    } else {
                        self.flush(index);
                        self.close();
                    }
                }
                _ => self.token.push(ch),
            }
            index += 1;
        }

        self.flush(chars.len());
        while !self.open.is_empty() {
            self.close();
        }
    }

    fn push_value(&mut self, value: NodeValue) {
        match self.open.last_mut() {
            Some(expression) => expression.body.push(value),
            None => self.body.push(value),
        }
        self.spaced = false;
    }

    /// The first value of a body is never joined
    fn joined_to_previous(&self) -> bool {
        let body = match self.open.last() {
            Some(expression) => &expression.body,
            None => &self.body,
        };
        !self.spaced && !body.is_empty()
    }

    fn close(&mut self) {
        if let Some(expression) = self.open.pop() {
            self.push_value(NodeValue::Expression(expression));
        }
    }

    /// Emit the pending token; `index` is the character index just past its end
    fn flush(&mut self, index: usize) {
        if self.token.is_empty() {
            return;
        }
        let token = std::mem::take(&mut self.token);
        let joined = self.joined_to_previous();
        let value = self.token_to_value(token, index, joined);
        self.push_value(value);
    }

    fn token_to_value(&mut self, token: String, index: usize, joined: bool) -> NodeValue {
        let Some(captures) = variable_reference_regex().captures(&token) else {
            return NodeValue::Literal(LiteralNode { value: token, joined });
        };
        let namespace = captures.get(1).map(|m| m.as_str().to_string());
        let name = captures
            .get(2)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let reference = self
            .lookup
            .lookup(&name, namespace.as_deref(), self.location.level);
        if reference.is_none() {
            let length = token.chars().count();
            let start = self.location.start_offset + index - length;
            self.diagnostics.push(SassDiagnostic::variable_not_found(
                create_range(self.location.line, start, start + length),
                &name,
            ));
        }

        NodeValue::VariableRef(VariableRefNode {
            value: token,
            name,
            namespace,
            reference,
            joined,
        })
    }
}

fn is_escaped(chars: &[char], index: usize) -> bool {
    let backslashes = chars[..index]
        .iter()
        .rev()
        .take_while(|c| **c == '\\')
        .count();
    backslashes % 2 == 1
}
