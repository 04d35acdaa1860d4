use tower_lsp::lsp_types::{Position, Range};

use crate::sass::formatter::SassFormatter;
use crate::sass::options::{SassAstOptions, SassFormatConfig};

fn format(text: &str) -> String {
    SassFormatter::default().format_text(text, &SassAstOptions::default())
}

fn format_with(config: SassFormatConfig, text: &str) -> String {
    SassFormatter::new(config).format_text(text, &SassAstOptions::default())
}

#[test]
fn test_formatted_text_has_no_edits() {
    let text = ".a\n  color: red\n  .b\n    margin: 0\n\n.c\n  padding: 0\n";
    let edits = SassFormatter::default().format(text, &SassAstOptions::default());
    assert!(edits.is_empty(), "Unexpected edits: {:?}", edits);
}

#[test]
fn test_properties_move_under_their_header() {
    assert_eq!(format(".a\n    color: red\ncolor: blue"), ".a\n  color: red\n  color: blue");
}

#[test]
fn test_headers_snap_to_tab_stops() {
    // Never deeper than one level below the previous header
    assert_eq!(format(".a\n      .b\n        color: red"), ".a\n  .b\n    color: red");
    // Half a tab stop snaps down
    assert_eq!(format(".a\n  .b\n     .c"), ".a\n  .b\n    .c");
}

#[test]
fn test_property_space_and_trailing_whitespace() {
    assert_eq!(format(".a  \n  color:red\n  margin: 0   "), ".a\n  color: red\n  margin: 0");

    let config = SassFormatConfig {
        set_property_space: false,
        delete_whitespace: false,
        ..Default::default()
    };
    assert_eq!(format_with(config, ".a  \n  color:red"), ".a  \n  color:red");
}

#[test]
fn test_empty_rows() {
    // Empty lines before properties go, empty lines before blocks stay
    let text = ".a\n  color: red\n\n  margin: 0\n\n.b\n  color: blue";
    assert_eq!(format(text), ".a\n  color: red\n  margin: 0\n\n.b\n  color: blue");

    let config = SassFormatConfig {
        delete_empty_rows: false,
        ..Default::default()
    };
    assert_eq!(format_with(config, text), text);
}

#[test]
fn test_delete_empty_row_edit_range() {
    let edits = SassFormatter::default().format(".a\n\n  color: red", &SassAstOptions::default());
    assert_eq!(edits.len(), 1);
    assert_eq!(
        edits[0].range,
        Range {
            start: Position { line: 1, character: 0 },
            end: Position { line: 2, character: 0 },
        }
    );
    assert_eq!(edits[0].new_text, "");
}

#[test]
fn test_sass_space_marker_keeps_empty_lines() {
    let text = ".a\n  color: red\n  // S\n\n  margin: 0";
    assert_eq!(format(text), text);
}

#[test]
fn test_ignore_marker_skips_next_line() {
    let text = ".a\n// I\n      .b\n  color: red";
    assert_eq!(format(text), text);
    assert_eq!(format(".a\n      .b\n  color: red"), ".a\n  .b\n    color: red");
}

#[test]
fn test_reset_marker_takes_current_indentation() {
    let text = ".a\n  color: red\n      // R\n      .b\n        color: blue";
    assert_eq!(format(text), text);
}

#[test]
fn test_global_variable_resets_column() {
    let text = ".a\n  color: red\n$size: 1px\n.b\n  width: $size";
    assert_eq!(format(text), text);
}

#[test]
fn test_keyframes() {
    let text = "@keyframes spin\n    from\n      transform: rotate(0)\n  to\n    transform: rotate(360deg)";
    let expected = "@keyframes spin\n  from\n    transform: rotate(0)\n  to\n    transform: rotate(360deg)";
    assert_eq!(format(text), expected);
    assert_eq!(format(expected), expected);
}

#[test]
fn test_convert_braces() {
    let text = ".a {\n  color: red;\n}\n";
    assert_eq!(format(text), ".a\n  color: red\n");
}

#[test]
fn test_convert_one_liner() {
    assert_eq!(
        format(".a { color:red; margin: 0; }"),
        ".a\n  color: red\n  margin: 0"
    );
}

#[test]
fn test_convert_one_liner_with_nested_rule() {
    let expected = ".a\n  color: red\n  .b\n    margin: 0";
    assert_eq!(format(".a { color: red; .b { margin: 0; } }"), expected);
    assert_eq!(format(expected), expected);
}

#[test]
fn test_convert_disabled() {
    let config = SassFormatConfig {
        convert: false,
        ..Default::default()
    };
    let text = ".a {\n  color: red;\n}";
    assert_eq!(format_with(config, text), text);
}

#[test]
fn test_interpolation_is_not_brace_syntax() {
    let text = "#{$body}\n  color: red";
    assert_eq!(format(text), text);
}

#[test]
fn test_block_comments_are_left_alone() {
    let text = ".a\n  /* keep\n        this */\n  color: red";
    assert_eq!(format(text), text);
}

#[test]
fn test_replace_spaces_with_tabs() {
    let config = SassFormatConfig {
        replace_spaces_or_tabs: true,
        ..Default::default()
    };
    let options = SassAstOptions::new(2, false);
    let formatted = SassFormatter::new(config).format_text(".a\n  color: red\n  .b\n    color: blue", &options);
    assert_eq!(formatted, ".a\n\tcolor: red\n\t.b\n\t\tcolor: blue");
}

#[test]
fn test_disabled_formatter() {
    let config = SassFormatConfig {
        enabled: false,
        ..Default::default()
    };
    let edits = SassFormatter::new(config).format(".a\n      color:red  ", &SassAstOptions::default());
    assert!(edits.is_empty());
}

#[test]
fn test_formatting_is_idempotent() {
    let text = ".a {\n    color:red;\n}\n\n\n.b\n      width: 1px  \n\n   height: 2px\n@keyframes x\n  from\n      top: 0\n";
    let once = format(text);
    assert_eq!(format(&once), once);
}
