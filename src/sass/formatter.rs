//! Sass Formatter Implementation
//!
//! A single forward pass over the raw lines, no syntax tree involved. Each line is
//! sorted into one of a few shapes (block header, property-like, empty, other) and
//! produces at most one [`TextEdit`]:
//!
//! * block headers snap to the nearest tab stop, never deeper than one level below
//!   the previous header (`// R` lifts that limit for one header),
//! * property-like lines move to the column the last header opened,
//! * empty lines are deleted unless they separate blocks (`// S` keeps them),
//! * everything else only loses trailing whitespace.
//!
//! Brace syntax lines are converted on the way when `convert` is enabled.
//! Formatting already formatted text produces no edits.

use tower_lsp::lsp_types::{Position, Range, TextEdit};

use crate::language::text_utils::full_line_range;
use crate::sass::format_utils::{
    convert_scss_or_css, needs_whitespace_replacement, replace_spaces_or_tabs, replace_with_offset,
};
use crate::sass::indentation::{distance, distance_reversed, indentation_offset, offset_to_normalize, render_indentation};
use crate::sass::line_kind::*;
use crate::sass::options::{SassAstOptions, SassFormatConfig};

/// Keyframes block state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyframesContext {
    /// Inside an `@keyframes` block
    pub is: bool,
    /// Column of the keyframe points
    pub tabs: usize,
}

/// Brace syntax conversion state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertContext {
    pub was_last_line_css: bool,
    pub last_selector: String,
}

/// State carried from line to line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatContext {
    /// Column property-like lines are expected at
    pub tabs: usize,
    /// Column set by the last block header, the deepest a following header may go
    pub current_tabs: usize,
    pub keyframes: KeyframesContext,
    pub convert: ConvertContext,
    pub in_block_comment: bool,
    /// Set by `// I`
    pub ignore_next_line: bool,
    /// Set by `// S`, cleared by the next block header
    pub allow_space: bool,
}

/// Facts about one line that depend on the context
#[derive(Debug, Clone, Copy)]
struct LocalContext {
    is_keyframes: bool,
    is_keyframe_point: bool,
    is_if_or_else: bool,
    is_if_or_else_a_prop: bool,
    is_reset: bool,
    is_prop: bool,
}

/// Formatter for indented Sass documents
#[derive(Debug, Clone, Default)]
pub struct SassFormatter {
    config: SassFormatConfig,
}

impl SassFormatter {
    pub fn new(config: SassFormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SassFormatConfig {
        &self.config
    }

    /// Compute the edits that format the whole document
    pub fn format(&self, text: &str, options: &SassAstOptions) -> Vec<TextEdit> {
        if !self.config.enabled {
            return Vec::new();
        }
        if self.config.debug {
            log::info!("FORMAT");
        }

        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        let mut context = FormatContext::default();
        let mut edits = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let next_line = lines.get(index + 1).copied();
            if let Some(edit) = self.format_line(index, line, next_line, &mut context, options) {
                edits.push(edit);
            }
        }
        edits
    }

    /// Format and apply the edits in one go
    pub fn format_text(&self, text: &str, options: &SassAstOptions) -> String {
        let edits = self.format(text, options);
        crate::language::text_utils::apply_edits(text, &edits)
    }

    fn format_line(
        &self,
        index: usize,
        line: &str,
        next_line: Option<&str>,
        context: &mut FormatContext,
        options: &SassAstOptions,
    ) -> Option<TextEdit> {
        if context.ignore_next_line {
            context.ignore_next_line = false;
            return None;
        }

        if context.in_block_comment {
            if closes_block_comment(line) {
                context.in_block_comment = false;
            }
            return self.trim_trailing(index, line);
        }
        if is_block_comment_start(line) {
            let opened = line.find("/*").map(|start| &line[start + 2..]).unwrap_or_default();
            context.in_block_comment = !closes_block_comment(opened);
            return self.trim_trailing(index, line);
        }
        if is_ignore(line) {
            context.ignore_next_line = true;
            return self.trim_trailing(index, line);
        }

        let tab_size = options.tab_stop();
        let local = local_context(line, context, tab_size);
        if is_sass_space(line) {
            context.allow_space = true;
        }

        if is_block_header(line, &local) {
            self.format_block_header(index, line, &local, context, options)
        } else if local.is_prop
            || is_include(line)
            || is_extend(line)
            || is_statement_at_rule(line)
            || local.is_keyframe_point
            || local.is_if_or_else_a_prop
        {
            self.format_property(index, line, &local, context, options)
        } else if is_empty(line) {
            self.format_empty_line(index, line, next_line, context)
        } else if self.config.convert && is_scss_or_css(line, context.convert.was_last_line_css) && !is_comment(line) {
            self.format_legacy_line(index, line, next_line, context)
        } else {
            self.trim_trailing(index, line)
        }
    }

    fn format_block_header(
        &self,
        index: usize,
        line: &str,
        local: &LocalContext,
        context: &mut FormatContext,
        options: &SassAstOptions,
    ) -> Option<TextEdit> {
        let tab_size = options.tab_stop();
        let line_distance = distance(line, tab_size);
        let offset = offset_to_normalize(line_distance, tab_size, context.current_tabs, local.is_reset);

        context.keyframes.is = local.is_keyframes || local.is_keyframe_point;
        context.allow_space = false;

        let mut text = line.to_string();
        let mut nested = Vec::new();
        let mut additional_tabs = 0;
        let mut converted = false;
        if self.config.convert && is_scss_or_css(line, context.convert.was_last_line_css) && !is_comment(line) {
            let result = convert_scss_or_css(line, &context.convert.last_selector);
            context.convert.last_selector = result.last_selector;
            if result.increase_tab_size {
                additional_tabs = tab_size;
            }
            text = result.text;
            nested = result.lines;
            converted = true;
        }
        if !converted && is_class_or_id(line) {
            context.convert.last_selector.clear();
        }
        context.convert.was_last_line_css = converted;

        let mut replaced = false;
        if self.config.replace_spaces_or_tabs && needs_whitespace_replacement(&text, options) {
            text = replace_spaces_or_tabs(&text, options);
            replaced = true;
        }

        let shift = offset + additional_tabs as isize;
        let header_column = (line_distance as isize + shift).max(0) as usize;
        let new_text = if shift != 0 {
            self.log_edit(index, "SET NEW TAB", converted, false, replaced);
            Some(replace_with_offset(&text, shift, options).trim_end().to_string())
        } else if distance_reversed(line, tab_size) > 0 && self.config.delete_whitespace {
            self.log_edit(index, "TRAIL", converted, false, replaced);
            Some(text.trim_end().to_string())
        } else if converted || replaced {
            self.log_edit(index, "CHANGE", converted, false, replaced);
            Some(text)
        } else {
            None
        };

        if local.is_keyframes {
            context.keyframes.tabs = header_column + tab_size;
        }
        if local.is_reset {
            context.tabs = (line_distance as isize + offset).max(0) as usize;
        } else {
            context.tabs = header_column + tab_size;
        }
        context.current_tabs = context.tabs;

        let mut new_text = new_text?;
        for converted_line in &nested {
            new_text.push('\n');
            new_text.push_str(&render_indentation(header_column + tab_size * converted_line.depth, options));
            new_text.push_str(&converted_line.text);
        }
        self.line_edit(index, line, new_text)
    }

    fn format_property(
        &self,
        index: usize,
        line: &str,
        local: &LocalContext,
        context: &mut FormatContext,
        options: &SassAstOptions,
    ) -> Option<TextEdit> {
        let tab_size = options.tab_stop();

        // A variable at column zero is a global declaration, not part of the last block
        if is_variable(line) && distance(line, tab_size) == 0 {
            context.tabs = 0;
            context.current_tabs = 0;
        }

        let comment = is_comment(line);
        let indentation = indentation_offset(line, context.tabs, tab_size);
        let mut text = line.to_string();

        let mut set_space = false;
        if local.is_prop && !has_property_value_space(line) && self.config.set_property_space {
            text = set_property_value_space(&text);
            set_space = true;
        }

        let mut converted = false;
        if self.config.convert && is_scss_or_css(line, context.convert.was_last_line_css) && !comment {
            text = convert_scss_or_css(&text, &context.convert.last_selector).text;
            converted = true;
        }
        context.convert.was_last_line_css = converted;

        let moving = indentation.offset != 0 && !comment;
        let mut replaced = false;
        if self.config.replace_spaces_or_tabs && !moving && needs_whitespace_replacement(&text, options) {
            text = replace_spaces_or_tabs(&text, options);
            replaced = true;
        }

        let new_text = if moving {
            if self.config.debug {
                log::info!("MOVE line {} offset {}", index + 1, indentation.offset);
            }
            Some(replace_with_offset(&text, indentation.offset, options).trim_end().to_string())
        } else if distance_reversed(line, tab_size) > 0 && self.config.delete_whitespace {
            self.log_edit(index, "TRAIL", converted, set_space, replaced);
            Some(text.trim_end().to_string())
        } else if set_space || converted || replaced {
            self.log_edit(index, "CHANGE", converted, set_space, replaced);
            Some(text)
        } else {
            None
        };

        if context.keyframes.is && local.is_keyframe_point {
            context.tabs = context.keyframes.tabs + tab_size;
        }
        if local.is_if_or_else_a_prop && context.keyframes.is {
            context.tabs = context.keyframes.tabs + tab_size * 2;
        } else if local.is_if_or_else_a_prop {
            context.tabs = context.current_tabs;
        }

        new_text.and_then(|new_text| self.line_edit(index, line, new_text))
    }

    fn format_empty_line(
        &self,
        index: usize,
        line: &str,
        next_line: Option<&str>,
        context: &FormatContext,
    ) -> Option<TextEdit> {
        if let Some(next) = next_line {
            if self.is_redundant_empty_line(next, context) {
                if self.config.debug {
                    log::info!("DEL line {}", index + 1);
                }
                return Some(delete_line_edit(index));
            }
        }
        if !line.is_empty() && self.config.delete_whitespace {
            if self.config.debug {
                log::info!("WHITESPACE line {}", index + 1);
            }
            return self.line_edit(index, line, String::new());
        }
        None
    }

    /// Line made of brace syntax only, such as a closing `}`
    fn format_legacy_line(
        &self,
        index: usize,
        line: &str,
        next_line: Option<&str>,
        context: &mut FormatContext,
    ) -> Option<TextEdit> {
        let result = convert_scss_or_css(line, &context.convert.last_selector);
        context.convert.was_last_line_css = true;
        if result.text.trim().is_empty() {
            if let Some(next) = next_line {
                if self.is_redundant_empty_line(next, context) {
                    self.log_edit(index, "DEL", true, false, false);
                    return Some(delete_line_edit(index));
                }
            }
            self.log_edit(index, "CHANGE", true, false, false);
            return self.line_edit(index, line, String::new());
        }
        self.log_edit(index, "CHANGE", true, false, false);
        self.line_edit(index, line, result.text.trim_end().to_string())
    }

    /// An empty line before `next` can go unless `next` opens a block
    fn is_redundant_empty_line(&self, next: &str, context: &FormatContext) -> bool {
        let compact = self.config.delete_compact || !is_property(next);
        self.config.delete_empty_rows
            && compact
            && !context.allow_space
            && !is_class_or_id(next)
            && !is_at_rule(next)
            && !is_and(next)
            && !is_html_tag(next.trim())
            && !is_star(next)
            && !is_pseudo(next)
    }

    fn trim_trailing(&self, index: usize, line: &str) -> Option<TextEdit> {
        if self.config.delete_whitespace && line.trim_end() != line {
            self.log_edit(index, "TRAIL", false, false, false);
            return self.line_edit(index, line, line.trim_end().to_string());
        }
        None
    }

    /// Replace a whole line, skipping edits that change nothing
    fn line_edit(&self, index: usize, line: &str, new_text: String) -> Option<TextEdit> {
        if new_text == line {
            return None;
        }
        Some(TextEdit {
            range: full_line_range(index, line),
            new_text,
        })
    }

    fn log_edit(&self, index: usize, title: &str, converted: bool, set_space: bool, replaced: bool) {
        if self.config.debug {
            log::info!(
                "{} line {} convert: {} set space: {} replace spaces or tabs: {}",
                title,
                index + 1,
                converted,
                set_space,
                replaced
            );
        }
    }
}

/// Classify a line against the keyframes and `@if`/`@else` state, adjusting the
/// expected column where those constructs require it
fn local_context(line: &str, context: &mut FormatContext, tab_size: usize) -> LocalContext {
    let is_point = is_keyframe_point(line, context.keyframes.is);
    if context.keyframes.is && is_point {
        context.tabs = context.keyframes.tabs;
    }

    let mut if_or_else = is_if_or_else(line);
    let mut if_or_else_a_prop = false;
    if context.keyframes.is && if_or_else {
        if_or_else = false;
        if_or_else_a_prop = true;
        context.tabs = context.keyframes.tabs + tab_size;
    }
    if if_or_else && !context.keyframes.is && is_else(line) {
        if_or_else = false;
        if_or_else_a_prop = true;
        context.tabs = context.current_tabs.saturating_sub(tab_size);
    }

    LocalContext {
        is_keyframes: is_keyframes(line),
        is_keyframe_point: is_point,
        is_if_or_else: if_or_else,
        is_if_or_else_a_prop: if_or_else_a_prop,
        is_reset: is_reset(line),
        is_prop: is_property(line) || is_variable(line),
    }
}

fn is_block_header(line: &str, local: &LocalContext) -> bool {
    if local.is_prop || local.is_keyframe_point || local.is_if_or_else_a_prop {
        return false;
    }
    is_class_or_id(line)
        || is_mixin(line)
        || is_html_tag(line.trim())
        || is_star(line)
        || local.is_if_or_else
        || local.is_reset
        || is_and(line)
        || is_pseudo(line)
        || local.is_keyframes
        || is_bracket_selector(line)
        || is_block_at_rule(line)
}

/// Remove a line including its line break
fn delete_line_edit(index: usize) -> TextEdit {
    TextEdit {
        range: Range {
            start: Position {
                line: index as u32,
                character: 0,
            },
            end: Position {
                line: index as u32 + 1,
                character: 0,
            },
        },
        new_text: String::new(),
    }
}
