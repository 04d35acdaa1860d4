//! Formatting helpers
//!
//! Line level rewrites used by [`crate::sass::formatter`]: moving a line by a column
//! offset, normalizing its leading whitespace and converting brace syntax lines into
//! the indented syntax.

use crate::sass::indentation::{distance, render_indentation};
use crate::sass::line_kind::{find_block_open, has_property_value_space, set_property_value_space, strip_trailing_comment};
use crate::sass::options::SassAstOptions;

/// A line split out of a one line rule, `depth` levels below the rule's header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedLine {
    pub depth: usize,
    pub text: String,
}

/// Result of converting a single brace syntax line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertResult {
    /// The converted line, leading whitespace unchanged
    pub text: String,
    /// Declarations and nested rules split out of a one line rule
    /// (`.a { color: red; .b { margin: 0 } }`)
    pub lines: Vec<ConvertedLine>,
    /// Outermost selector of the current css rule chain
    pub last_selector: String,
    /// The header was nested under `last_selector` and must move one level deeper
    pub increase_tab_size: bool,
}

/// Add (positive) or remove (negative) columns of leading whitespace
pub fn replace_with_offset(text: &str, offset: isize, options: &SassAstOptions) -> String {
    let current = distance(text, options.tab_stop()) as isize;
    let columns = (current + offset).max(0) as usize;
    let mut result = render_indentation(columns, options);
    result.push_str(text.trim_start_matches([' ', '\t']));
    result
}

/// Whether the leading whitespace differs from what the options would render
pub fn needs_whitespace_replacement(text: &str, options: &SassAstOptions) -> bool {
    let body = text.trim_start_matches([' ', '\t']);
    let leading = &text[..text.len() - body.len()];
    render_indentation(distance(text, options.tab_stop()), options) != leading
}

/// Rewrite the leading whitespace with the configured tabs or spaces
pub fn replace_spaces_or_tabs(text: &str, options: &SassAstOptions) -> String {
    replace_with_offset(text, 0, options)
}

/// Convert a brace syntax line.
///
/// Braces and semicolons are dropped (except inside strings and `#{}`), a one line
/// rule is split into its header and declarations, and a selector that repeats the
/// previous rule's selector as a prefix is shortened to its nested form.
pub fn convert_scss_or_css(text: &str, last_selector: &str) -> ConvertResult {
    let code = strip_trailing_comment(text);
    let comment = text[code.len()..].trim();
    let code = code.trim_end();
    let body = code.trim_start_matches([' ', '\t']);
    let indentation = &code[..code.len() - body.len()];

    let mut result = ConvertResult {
        last_selector: last_selector.to_string(),
        ..Default::default()
    };

    let converted = match find_block_open(body) {
        Some(open) => {
            let mut header = body[..open].trim().to_string();
            split_rule_body(&body[open + 1..], 1, &mut result.lines);

            let prefix = format!("{} ", last_selector);
            if !last_selector.is_empty() && header.starts_with(&prefix) {
                header = header[prefix.len()..].trim_start().to_string();
                result.increase_tab_size = true;
            } else {
                result.last_selector = header.clone();
            }
            header
        }
        None => strip_syntax(body).trim_end().to_string(),
    };

    let mut text = String::with_capacity(code.len() + comment.len() + 1);
    if !converted.is_empty() {
        text.push_str(indentation);
        text.push_str(&converted);
    }
    if !comment.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        } else {
            text.push_str(indentation);
        }
        text.push_str(comment);
    }
    result.text = text;
    result
}

/// Remove `{`, `}` and `;` that are not inside a string, parentheses or `#{}`
/// interpolation
fn strip_syntax(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut interpolation_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut previous = None;

    for ch in text.chars() {
        match quote {
            Some(q) => {
                if ch == q && previous != Some('\\') {
                    quote = None;
                }
                result.push(ch);
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    result.push(ch);
                }
                '{' if previous == Some('#') => {
                    interpolation_depth += 1;
                    result.push(ch);
                }
                '}' if interpolation_depth > 0 => {
                    interpolation_depth -= 1;
                    result.push(ch);
                }
                '(' => {
                    paren_depth += 1;
                    result.push(ch);
                }
                ')' => {
                    paren_depth = paren_depth.saturating_sub(1);
                    result.push(ch);
                }
                ';' if paren_depth > 0 => result.push(ch),
                '{' | '}' | ';' => {}
                _ => result.push(ch),
            },
        }
        previous = Some(ch);
    }
    result
}

/// Split the inside of a one line rule into declarations and nested rules, with
/// a space after each declaration's colon
fn split_rule_body(text: &str, depth: usize, lines: &mut Vec<ConvertedLine>) {
    let chars: Vec<char> = text.chars().collect();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut paren_depth = 0usize;
    let mut interpolation_depth = 0usize;
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];
        if let Some(q) = quote {
            if ch == q && !is_escaped(&chars, index) {
                quote = None;
            }
            current.push(ch);
            index += 1;
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '#' if chars.get(index + 1) == Some(&'{') => {
                interpolation_depth += 1;
                current.push_str("#{");
                index += 1;
            }
            '}' if interpolation_depth > 0 => {
                interpolation_depth -= 1;
                current.push(ch);
            }
            '(' => {
                paren_depth += 1;
                current.push(ch);
            }
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                current.push(ch);
            }
            ';' if paren_depth == 0 => push_declaration(&std::mem::take(&mut current), depth, lines),
            '{' => {
                let header = std::mem::take(&mut current);
                let header = header.trim();
                if !header.is_empty() {
                    lines.push(ConvertedLine {
                        depth,
                        text: header.to_string(),
                    });
                }
                let close = matching_close(&chars, index);
                let inner: String = chars[index + 1..close].iter().collect();
                split_rule_body(&inner, depth + 1, lines);
                index = close;
            }
            // Closer of the rule itself
            '}' => {}
            _ => current.push(ch),
        }
        index += 1;
    }
    push_declaration(&current, depth, lines);
}

fn push_declaration(text: &str, depth: usize, lines: &mut Vec<ConvertedLine>) {
    let declaration = text.trim();
    if declaration.is_empty() {
        return;
    }
    let text = if has_property_value_space(declaration) {
        declaration.to_string()
    } else {
        set_property_value_space(declaration)
    };
    lines.push(ConvertedLine { depth, text });
}

/// Index of the `}` closing the block opened at `open`, the end of the text when
/// it is never closed
fn matching_close(chars: &[char], open: usize) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (index, &ch) in chars.iter().enumerate().skip(open + 1) {
        match quote {
            Some(q) => {
                if ch == q && !is_escaped(chars, index) {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '{' => depth += 1,
                '}' if depth == 0 => return index,
                '}' => depth -= 1,
                _ => {}
            },
        }
    }
    chars.len()
}

fn is_escaped(chars: &[char], index: usize) -> bool {
    let backslashes = chars[..index].iter().rev().take_while(|c| **c == '\\').count();
    backslashes % 2 == 1
}
