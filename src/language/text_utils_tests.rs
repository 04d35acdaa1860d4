use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent, TextEdit};

use crate::language::text_utils::*;

fn range(start_line: u32, start_character: u32, end_line: u32, end_character: u32) -> Range {
    Range {
        start: Position {
            line: start_line,
            character: start_character,
        },
        end: Position {
            line: end_line,
            character: end_character,
        },
    }
}

#[test]
fn test_position_counts_characters() {
    let content = ".a\n  color: rüd\n";
    let offset = position_to_byte_offset(content, Position { line: 1, character: 10 }).unwrap();
    assert_eq!(&content[offset..], "üd\n");
}

#[test]
fn test_position_clamps_to_line_end() {
    let content = "ab\r\ncd";
    assert_eq!(position_to_byte_offset(content, Position { line: 0, character: 10 }), Some(2));
    assert_eq!(position_to_byte_offset(content, Position { line: 5, character: 0 }), None);
}

#[test]
fn test_apply_edits_in_reverse_order() {
    let content = ".a\n\n\n  color:red  \n";
    let edits = vec![
        TextEdit {
            range: range(1, 0, 2, 0),
            new_text: String::new(),
        },
        TextEdit {
            range: range(3, 0, 3, 13),
            new_text: "  color: red".to_string(),
        },
    ];
    assert_eq!(apply_edits(content, &edits), ".a\n\n  color: red\n");
}

#[test]
fn test_apply_content_change() {
    let mut content = ".a\n  color: red".to_string();
    apply_content_change(
        &mut content,
        TextDocumentContentChangeEvent {
            range: Some(range(1, 9, 1, 12)),
            range_length: None,
            text: "blue".to_string(),
        },
    );
    assert_eq!(content, ".a\n  color: blue");

    apply_content_change(
        &mut content,
        TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new".to_string(),
        },
    );
    assert_eq!(content, "new");
}

#[test]
fn test_full_line_range() {
    assert_eq!(full_line_range(3, "  ab\r"), range(3, 0, 3, 4));
    assert_eq!(full_line_range(0, "aü"), range(0, 0, 0, 2));
}
