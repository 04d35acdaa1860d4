use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent, TextEdit};

/// Convert LSP position to byte offset.
///
/// A character past the end of a line clamps to the line end (before `\r\n`),
/// a line past the end of the content returns `None`.
pub fn position_to_byte_offset(content: &str, position: Position) -> Option<usize> {
    let mut line_start = 0;
    for _ in 0..position.line {
        let newline = content[line_start..].find('\n')?;
        line_start += newline + 1;
    }

    let line_end = content[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(content.len());
    let line_text = &content[line_start..line_end];
    let line_text = line_text.strip_suffix('\r').unwrap_or(line_text);

    let offset = line_text
        .char_indices()
        .nth(position.character as usize)
        .map(|(i, _)| i)
        .unwrap_or(line_text.len());
    Some(line_start + offset)
}

/// Range covering a whole line of text, excluding the line break
pub fn full_line_range(line: usize, text: &str) -> Range {
    let text = text.strip_suffix('\r').unwrap_or(text);
    Range {
        start: Position {
            line: line as u32,
            character: 0,
        },
        end: Position {
            line: line as u32,
            character: text.chars().count() as u32,
        },
    }
}

/// Apply non overlapping edits that all refer to positions in the unedited content
pub fn apply_edits(content: &str, edits: &[TextEdit]) -> String {
    let mut resolved: Vec<(usize, usize, &str)> = edits
        .iter()
        .filter_map(|edit| {
            let start = position_to_byte_offset(content, edit.range.start)?;
            let end = position_to_byte_offset(content, edit.range.end)?;
            Some((start, end.max(start), edit.new_text.as_str()))
        })
        .collect();
    resolved.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let mut result = content.to_string();
    for (start, end, new_text) in resolved {
        result.replace_range(start..end, new_text);
    }
    result
}

/// Apply a document change notification, either a ranged or a full replacement
pub fn apply_content_change(content: &mut String, change: TextDocumentContentChangeEvent) {
    match change.range {
        Some(range) => {
            let start = position_to_byte_offset(content, range.start).unwrap_or(content.len());
            let end = position_to_byte_offset(content, range.end)
                .unwrap_or(content.len())
                .max(start);
            content.replace_range(start..end, &change.text);
        }
        None => *content = change.text,
    }
}
