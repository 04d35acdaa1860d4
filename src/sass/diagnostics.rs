//! Sass Diagnostics
//!
//! Diagnostics produced while building the syntax tree. Each one records whether
//! running the formatter is expected to fix it (indentation, `@use` order) or whether
//! the source needs a real edit (an unknown variable).

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use crate::sass::constants::*;

/// Known diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    #[serde(rename = "@useNotTopLevel")]
    UseNotTopLevel,
    #[serde(rename = "invalidIndentation")]
    InvalidIndentation,
    #[serde(rename = "variableNotFound")]
    VariableNotFound,
    #[serde(rename = "unclassifiedLine")]
    UnclassifiedLine,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::UseNotTopLevel => CODE_USE_NOT_TOP_LEVEL,
            DiagnosticCode::InvalidIndentation => CODE_INVALID_INDENTATION,
            DiagnosticCode::VariableNotFound => CODE_VARIABLE_NOT_FOUND,
            DiagnosticCode::UnclassifiedLine => CODE_UNCLASSIFIED_LINE,
        }
    }
}

/// A diagnostic attached to a parsed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SassDiagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub range: Range,
    /// Whether formatting the document is expected to make this go away
    pub is_resolved_by_formatting: bool,
}

impl SassDiagnostic {
    /// `@use` after other rules
    pub fn use_not_top_level(range: Range) -> Self {
        Self {
            code: DiagnosticCode::UseNotTopLevel,
            message: "@use rules must come before any rules other than @forward, including style rules. However, you can declare variables before @use rules to use when configuring modules.".to_string(),
            severity: DiagnosticSeverity::ERROR,
            range,
            is_resolved_by_formatting: true,
        }
    }

    /// Line indented deeper than the open blocks allow.
    ///
    /// `level` is the deepest valid nesting level for the line.
    pub fn invalid_indentation(range: Range, level: usize, tab_size: usize, insert_spaces: bool) -> Self {
        let (expected, unit) = if insert_spaces {
            (level * tab_size, "space")
        } else {
            (level, "tab")
        };
        Self {
            code: DiagnosticCode::InvalidIndentation,
            message: format!(
                "Invalid Indentation Expected {} {}",
                expected,
                pluralize(unit, expected)
            ),
            severity: DiagnosticSeverity::ERROR,
            range,
            is_resolved_by_formatting: true,
        }
    }

    /// Reference to a variable that is not declared in scope or in any import
    pub fn variable_not_found(range: Range, name: &str) -> Self {
        Self {
            code: DiagnosticCode::VariableNotFound,
            message: format!("Variable declaration for {} not found.", name),
            severity: DiagnosticSeverity::ERROR,
            range,
            is_resolved_by_formatting: false,
        }
    }

    /// Line that is not a selector, declaration, at-rule or comment
    pub fn unclassified_line(range: Range, text: &str) -> Self {
        Self {
            code: DiagnosticCode::UnclassifiedLine,
            message: format!("Unrecognized line: {}", text.trim()),
            severity: DiagnosticSeverity::WARNING,
            range,
            is_resolved_by_formatting: false,
        }
    }

    /// Convert to the LSP representation
    pub fn to_lsp(&self) -> Diagnostic {
        Diagnostic {
            range: self.range,
            severity: Some(self.severity),
            code: Some(NumberOrString::String(self.code.as_str().to_string())),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: self.message.clone(),
            ..Default::default()
        }
    }
}

/// Range on a single line between two character columns
pub fn create_range(line: usize, start_character: usize, end_character: usize) -> Range {
    Range {
        start: Position {
            line: line as u32,
            character: start_character as u32,
        },
        end: Position {
            line: line as u32,
            character: end_character as u32,
        },
    }
}

/// Range covering the visible text of a line
pub fn line_range(line: usize, text: &str) -> Range {
    let start = text.chars().take_while(|c| *c == ' ' || *c == '\t').count();
    let end = text.trim_end().chars().count().max(start);
    create_range(line, start, end)
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
