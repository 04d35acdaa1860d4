//! Line Classifier
//!
//! The indented syntax is line oriented: a line is a selector header, a declaration,
//! an at-rule, a comment or blank, told apart by its leading sigil or keyword and by
//! an unquoted colon. [`classify_line`] applies the checks in a fixed order and
//! returns the first match.
//!
//! The regex backed predicates below are shared with the formatter, which works on
//! raw lines without building a tree.

use std::sync::OnceLock;

use regex::Regex;

use crate::sass::constants::{HTML_TAGS, PSEUDO_SELECTORS};
use crate::sass::indentation;

/// Classification of a single source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Blank or whitespace only
    Empty,
    /// `name: value`
    Property,
    /// `$name: value` or `--name: value`
    Variable,
    /// Block header: selectors, block at-rules and keyframe points
    Selector,
    /// `@use 'module'`
    Use,
    /// `@import 'file'`
    Import,
    /// `// comment`
    Comment,
    /// `/* comment`
    BlockCommentStart,
    /// Continuation line of an open block comment
    BlockCommentContent,
    /// `@mixin name` or `=name`
    Mixin,
    /// `@include name` or `+name`
    Include,
    /// `@extend selector`
    Extend,
    /// `@font-face`
    FontFace,
    /// Anything else
    Literal,
}

/// Context from previous lines that affects classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyContext {
    /// Indentation (in columns) of the `/*` line of a block comment that is still open
    pub open_block_comment: Option<usize>,
    /// Tab size used to measure indentation
    pub tab_size: usize,
}

impl ClassifyContext {
    pub fn new(tab_size: usize) -> Self {
        Self {
            open_block_comment: None,
            tab_size,
        }
    }
}

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static CELL: OnceLock<Regex> = OnceLock::new();
            CELL.get_or_init(|| Regex::new($pattern).expect("built-in pattern must compile"))
        }
    };
}

static_regex!(line_comment_regex, r"^[\t ]*/?//");
static_regex!(block_comment_start_regex, r"^[\t ]*/\*");
static_regex!(declaration_regex, r"^[\t ]*([\w-]+)[\t ]*:");
static_regex!(variable_regex, r"^[\t ]*(\$[\w-]+|--[\w-]+)[\t ]*:");
static_regex!(use_regex, r"^[\t ]*@use\b");
static_regex!(import_regex, r"^[\t ]*@import\b");
static_regex!(mixin_regex, r"^[\t ]*(@mixin\b|=)");
static_regex!(include_regex, r"^[\t ]*(@include\b|\+[\w-])");
static_regex!(extend_regex, r"^[\t ]*@extend\b");
static_regex!(font_face_regex, r"^[\t ]*@font-face\b");
static_regex!(at_rule_regex, r"^[\t ]*@");
static_regex!(selector_marker_regex, r"^[\t ]*([.#%&\[*:>~]|\+[\t ])");
static_regex!(class_or_id_regex, r"^[\t ]*[#.%]");
static_regex!(star_regex, r"^[\t ]*\*");
static_regex!(and_regex, r"^[\t ]*&");
static_regex!(pseudo_regex, r"^[\t ]*::?[\w-]");
static_regex!(bracket_selector_regex, r#"^[\t ]*\[[\w=\-*"'^$|~ ]*\]"#);
static_regex!(keyframes_regex, r"^[\t ]*@(-[\w]+-)?keyframes\b");
static_regex!(keyframe_point_regex, r"^[\t ]*(\d+(\.\d+)?%|from\b|to\b)");
static_regex!(
    block_at_rule_regex,
    r"^[\t ]*@(each|for|while|media|supports|function|at-root|page|document|font-face)\b"
);
static_regex!(statement_at_rule_regex, r"^[\t ]*@(content|return|debug|warn|error)\b");
static_regex!(if_or_else_regex, r"^[\t ]*@(if|else)\b");
static_regex!(else_regex, r"^[\t ]*@else\b");
static_regex!(reset_regex, r"^[\t ]*/?//[\t ]*R[\t ]*$");
static_regex!(ignore_regex, r"^[\t ]*/?//[\t ]*I[\t ]*$");
static_regex!(sass_space_regex, r"^[\t ]*/?//[\t ]*S[\t ]*$");
static_regex!(missing_property_space_regex, r"^([\t ]*[$\w-]+:)(\S)");

fn html_tag_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        let pattern = format!(r"^[\t ]*({})([\t ,.#:\[>+~)]|$)", HTML_TAGS.join("|"));
        Regex::new(&pattern).expect("built-in pattern must compile")
    })
}

/// Classify a line of indented Sass
pub fn classify_line(line: &str, context: &ClassifyContext) -> LineKind {
    if let Some(start_distance) = context.open_block_comment {
        if is_block_comment_continuation(line, start_distance, context.tab_size) {
            return LineKind::BlockCommentContent;
        }
    }

    if is_empty(line) {
        LineKind::Empty
    } else if is_line_comment(line) {
        LineKind::Comment
    } else if is_block_comment_start(line) {
        LineKind::BlockCommentStart
    } else if is_variable(line) {
        LineKind::Variable
    } else if is_property(line) {
        LineKind::Property
    } else if is_use(line) {
        LineKind::Use
    } else if is_import(line) {
        LineKind::Import
    } else if is_mixin(line) {
        LineKind::Mixin
    } else if is_include(line) {
        LineKind::Include
    } else if is_extend(line) {
        LineKind::Extend
    } else if is_font_face(line) {
        LineKind::FontFace
    } else if is_selector(line) {
        LineKind::Selector
    } else {
        LineKind::Literal
    }
}

/// A line belongs to an open block comment when it is indented deeper than the
/// opening `/*` or starts with `*` (including the closing `*/`).
fn is_block_comment_continuation(line: &str, start_distance: usize, tab_size: usize) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.starts_with('*') || indentation::distance(line, tab_size) > start_distance
}

pub fn is_empty(line: &str) -> bool {
    line.trim().is_empty()
}

/// `//` comment, also matches the `///` doc comment form
pub fn is_line_comment(line: &str) -> bool {
    line_comment_regex().is_match(line)
}

pub fn is_block_comment_start(line: &str) -> bool {
    block_comment_start_regex().is_match(line)
}

/// Either comment form
pub fn is_comment(line: &str) -> bool {
    is_line_comment(line) || is_block_comment_start(line)
}

/// Whether the text closes a block comment
pub fn closes_block_comment(text: &str) -> bool {
    text.contains("*/")
}

/// `$name:` or `--name:`
pub fn is_variable(line: &str) -> bool {
    variable_regex().is_match(line)
}

/// `name:` where the colon is not a pseudo class of a type selector (`a:hover`)
pub fn is_property(line: &str) -> bool {
    let Some(captures) = declaration_regex().captures(line) else {
        return false;
    };
    let Some(whole) = captures.get(0) else {
        return false;
    };
    let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    if name.starts_with("--") {
        return false;
    }
    !is_tag_with_pseudo(name, &line[whole.end()..])
}

/// `div:hover`, `a::before`, `li:nth-child(2)` are selectors even though they look
/// like `name:value`
fn is_tag_with_pseudo(name: &str, after_colon: &str) -> bool {
    if !HTML_TAGS.contains(&name) {
        return false;
    }
    if after_colon.starts_with(':') {
        return true;
    }
    let pseudo: String = after_colon
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    PSEUDO_SELECTORS.contains(&pseudo.as_str())
}

pub fn is_use(line: &str) -> bool {
    use_regex().is_match(line)
}

pub fn is_import(line: &str) -> bool {
    import_regex().is_match(line)
}

/// `@mixin name` or the legacy `=name`
pub fn is_mixin(line: &str) -> bool {
    mixin_regex().is_match(line)
}

/// `@include name` or the legacy `+name`
pub fn is_include(line: &str) -> bool {
    include_regex().is_match(line)
}

pub fn is_extend(line: &str) -> bool {
    extend_regex().is_match(line)
}

pub fn is_font_face(line: &str) -> bool {
    font_face_regex().is_match(line)
}

pub fn is_at_rule(line: &str) -> bool {
    at_rule_regex().is_match(line)
}

/// Block header: class, id, placeholder, `&`, attribute, interpolation, `*`, pseudo,
/// combinator, html tag, keyframe point or any remaining at-rule.
pub fn is_selector(line: &str) -> bool {
    selector_marker_regex().is_match(line)
        || is_html_tag(line)
        || keyframe_point_regex().is_match(line)
        || is_at_rule(line)
}

/// Class, id or placeholder selector (also catches `#{}` interpolation)
pub fn is_class_or_id(line: &str) -> bool {
    class_or_id_regex().is_match(line)
}

pub fn is_star(line: &str) -> bool {
    star_regex().is_match(line)
}

/// Parent selector reference `&`
pub fn is_and(line: &str) -> bool {
    and_regex().is_match(line)
}

/// `:hover` or `::before` at the start of the line
pub fn is_pseudo(line: &str) -> bool {
    pseudo_regex().is_match(line)
}

/// `[type=text]` attribute selector
pub fn is_bracket_selector(line: &str) -> bool {
    bracket_selector_regex().is_match(line)
}

/// Type selector such as `div`, `a:hover` or `ul li`
pub fn is_html_tag(line: &str) -> bool {
    html_tag_regex().is_match(line)
}

pub fn is_keyframes(line: &str) -> bool {
    keyframes_regex().is_match(line)
}

/// `from`, `to` or `50%`, only meaningful inside a keyframes block
pub fn is_keyframe_point(line: &str, in_keyframes: bool) -> bool {
    in_keyframes && keyframe_point_regex().is_match(line)
}

/// At-rule that opens a nested block (`@each`, `@media`, `@function`, ...)
pub fn is_block_at_rule(line: &str) -> bool {
    block_at_rule_regex().is_match(line)
}

/// At-rule statement that lives inside a block (`@content`, `@return`, ...)
pub fn is_statement_at_rule(line: &str) -> bool {
    statement_at_rule_regex().is_match(line)
}

pub fn is_if_or_else(line: &str) -> bool {
    if_or_else_regex().is_match(line)
}

pub fn is_else(line: &str) -> bool {
    else_regex().is_match(line)
}

/// `// R` marker: take the current indentation as the new baseline
pub fn is_reset(line: &str) -> bool {
    reset_regex().is_match(line)
}

/// `// I` marker: leave the next line alone
pub fn is_ignore(line: &str) -> bool {
    ignore_regex().is_match(line)
}

/// `// S` marker: keep the following empty lines
pub fn is_sass_space(line: &str) -> bool {
    sass_space_regex().is_match(line)
}

/// Whether a property line already has whitespace (or nothing) after its colon
pub fn has_property_value_space(line: &str) -> bool {
    !missing_property_space_regex().is_match(line)
}

/// Insert a single space after the colon of a property (`color:red` → `color: red`)
pub fn set_property_value_space(line: &str) -> String {
    missing_property_space_regex()
        .replace(line, "$1 $2")
        .into_owned()
}

/// Whether a line uses the brace syntax: it ends with `{`, `}` or `;` (ignoring a
/// trailing `//` comment), or continues a comma separated css selector list.
///
/// A trailing `}` that only closes `#{...}` interpolation does not count.
pub fn is_scss_or_css(line: &str, was_last_line_css: bool) -> bool {
    let code = strip_trailing_comment(line).trim_end();
    if was_last_line_css && code.ends_with(',') && is_class_or_id(code) {
        return true;
    }
    match code.chars().last() {
        Some(';') | Some('{') => true,
        Some('}') => !is_interpolation_only(code),
        _ => false,
    }
}

/// Byte index of the first `{` that opens a css block, ignoring `#{` interpolation
pub fn find_block_open(text: &str) -> Option<usize> {
    let mut previous = None;
    let mut quote: Option<char> = None;
    for (index, ch) in text.char_indices() {
        match quote {
            Some(q) if ch == q && previous != Some('\\') => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '{' if previous != Some('#') => return Some(index),
                _ => {}
            },
        }
        previous = Some(ch);
    }
    None
}

/// Every `{` in the text belongs to a `#{` interpolation
fn is_interpolation_only(text: &str) -> bool {
    let opens = text.matches('{').count();
    let interpolations = text.matches("#{").count();
    let closes = text.matches('}').count();
    opens == interpolations && opens == closes
}

/// Remove a trailing `//` comment that is not inside quotes or a url
pub fn strip_trailing_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut previous = None;
    let mut paren_depth = 0usize;
    for (index, ch) in line.char_indices() {
        match quote {
            Some(q) if ch == q && previous != Some('\\') => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' => paren_depth += 1,
                ')' => paren_depth = paren_depth.saturating_sub(1),
                '/' if previous == Some('/') && paren_depth == 0 => {
                    return &line[..index - 1];
                }
                _ => {}
            },
        }
        previous = Some(ch);
    }
    line
}

/// A declaration split at its first unquoted, unescaped colon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    /// Name before the colon, without surrounding whitespace
    pub name: &'a str,
    /// Everything after the colon
    pub value: &'a str,
    /// Character column of the first character after the colon
    pub value_offset: usize,
}

/// Split `name: value` at the first colon that is outside quotes and not escaped
pub fn split_declaration(line: &str) -> Option<Declaration<'_>> {
    let mut quote: Option<char> = None;
    let mut previous = None;
    for (column, (index, ch)) in line.char_indices().enumerate() {
        match quote {
            Some(q) if ch == q && previous != Some('\\') => quote = None,
            Some(_) => {}
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                ':' if previous != Some('\\') => {
                    return Some(Declaration {
                        name: line[..index].trim(),
                        value: &line[index + 1..],
                        value_offset: column + 1,
                    });
                }
                _ => {}
            },
        }
        previous = Some(ch);
    }
    None
}
