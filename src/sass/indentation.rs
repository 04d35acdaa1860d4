//! Indentation Analyzer
//!
//! Indentation is the only structural signal in the indented syntax, so everything
//! here works in columns: a tab counts as `tab_size` columns and a space as one.
//! The normalization offset is biased to snap down on half tab stops, which keeps
//! repeated formatting from oscillating between two depths.

use crate::sass::options::SassAstOptions;

/// Leading whitespace of a line measured in columns
pub fn distance(line: &str, tab_size: usize) -> usize {
    let mut count = 0;
    for ch in line.chars() {
        match ch {
            ' ' => count += 1,
            '\t' => count += tab_size,
            _ => break,
        }
    }
    count
}

/// Trailing whitespace of a line measured in columns
pub fn distance_reversed(line: &str, tab_size: usize) -> usize {
    let mut count = 0;
    for ch in line.chars().rev() {
        match ch {
            ' ' => count += 1,
            '\t' => count += tab_size,
            _ => break,
        }
    }
    count
}

/// Nesting level for a column count, `round(columns / tab_size)`
pub fn level(columns: usize, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    (columns as f64 / tab_size as f64).round() as usize
}

/// Offset (in columns) that moves a block header to a valid tab stop.
///
/// A header is never pushed deeper than `current_baseline` unless `reset` is set,
/// so a single malformed line cannot drag the rest of the file to the right.
pub fn offset_to_normalize(
    distance: usize,
    tab_size: usize,
    current_baseline: usize,
    reset: bool,
) -> isize {
    if distance == 0 {
        return 0;
    }
    let tab_size = tab_size.max(1);
    let snapped = (distance as f64 / tab_size as f64 - 0.1).round().max(0.0) as usize;
    let target = tab_size * snapped;

    if target > current_baseline && !reset {
        current_baseline as isize - distance as isize
    } else {
        target as isize - distance as isize
    }
}

/// Difference between an expected column and the actual indentation of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentationOffset {
    /// Columns to add (positive) or remove (negative)
    pub offset: isize,
    /// Current indentation in columns
    pub distance: usize,
}

/// Compute how far a line has to move to start at `expected` columns
pub fn indentation_offset(line: &str, expected: usize, tab_size: usize) -> IndentationOffset {
    let distance = distance(line, tab_size);
    IndentationOffset {
        offset: expected as isize - distance as isize,
        distance,
    }
}

/// Leading whitespace for a column count.
///
/// With tabs, whole tab stops become tab characters and the remainder is padded
/// with spaces so the column count is preserved.
pub fn render_indentation(columns: usize, options: &SassAstOptions) -> String {
    if options.insert_spaces {
        " ".repeat(columns)
    } else {
        let tab_size = options.tab_stop();
        let mut indentation = "\t".repeat(columns / tab_size);
        indentation.push_str(&" ".repeat(columns % tab_size));
        indentation
    }
}

/// Leading whitespace for a nesting level
pub fn indentation_for_level(level: usize, options: &SassAstOptions) -> String {
    if options.insert_spaces {
        " ".repeat(level * options.tab_size)
    } else {
        "\t".repeat(level)
    }
}
