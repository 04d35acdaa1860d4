use crate::sass::format_utils::*;
use crate::sass::options::SassAstOptions;

fn line(depth: usize, text: &str) -> ConvertedLine {
    ConvertedLine {
        depth,
        text: text.to_string(),
    }
}

#[test]
fn test_replace_with_offset() {
    let spaces = SassAstOptions::default();
    assert_eq!(replace_with_offset("  color: red", 2, &spaces), "    color: red");
    assert_eq!(replace_with_offset(" color: red", -4, &spaces), "color: red");

    let tabs = SassAstOptions::new(4, false);
    assert_eq!(replace_with_offset("color: red", 6, &tabs), "\t  color: red");
    assert_eq!(replace_with_offset("\t\tcolor: red", -4, &tabs), "\tcolor: red");
}

#[test]
fn test_whitespace_replacement() {
    let spaces = SassAstOptions::new(2, true);
    assert!(needs_whitespace_replacement("\tcolor: red", &spaces));
    assert!(!needs_whitespace_replacement("  color: red", &spaces));
    assert_eq!(replace_spaces_or_tabs("\tcolor: red", &spaces), "  color: red");

    let tabs = SassAstOptions::new(2, false);
    assert_eq!(replace_spaces_or_tabs("    color: red", &tabs), "\t\tcolor: red");
    assert!(!needs_whitespace_replacement(".a", &tabs));
}

#[test]
fn test_convert_header() {
    let result = convert_scss_or_css(".a {", "");
    assert_eq!(result.text, ".a");
    assert_eq!(result.last_selector, ".a");
    assert!(!result.increase_tab_size);
    assert!(result.lines.is_empty());
}

#[test]
fn test_convert_nested_prefix() {
    let result = convert_scss_or_css(".a .b {", ".a");
    assert_eq!(result.text, ".b");
    assert!(result.increase_tab_size);
    assert_eq!(result.last_selector, ".a");

    // A different root starts a new chain
    let result = convert_scss_or_css(".c .b {", ".a");
    assert_eq!(result.text, ".c .b");
    assert!(!result.increase_tab_size);
    assert_eq!(result.last_selector, ".c .b");
}

#[test]
fn test_convert_declarations() {
    let result = convert_scss_or_css("  color: red; // note", ".a");
    assert_eq!(result.text, "  color: red // note");

    let result = convert_scss_or_css("  content: '{x};';", "");
    assert_eq!(result.text, "  content: '{x};'");

    let result = convert_scss_or_css("}", ".a");
    assert_eq!(result.text, "");
    assert_eq!(result.last_selector, ".a");
}

#[test]
fn test_convert_one_liner() {
    let result = convert_scss_or_css(".c { color:red; background: url(a;b.png) }", "");
    assert_eq!(result.text, ".c");
    assert_eq!(
        result.lines,
        vec![line(1, "color: red"), line(1, "background: url(a;b.png)")]
    );
}

#[test]
fn test_convert_one_liner_with_nested_rule() {
    let result = convert_scss_or_css(".a { color: red; .b { margin:0; #{$c} { top: 0 } } left: #{$x} }", "");
    assert_eq!(result.text, ".a");
    assert_eq!(
        result.lines,
        vec![
            line(1, "color: red"),
            line(1, ".b"),
            line(2, "margin: 0"),
            line(2, "#{$c}"),
            line(3, "top: 0"),
            line(1, "left: #{$x}"),
        ]
    );
}

#[test]
fn test_convert_keeps_interpolation() {
    let result = convert_scss_or_css("#{$a} .b {", "");
    assert_eq!(result.text, "#{$a} .b");

    let result = convert_scss_or_css("  width: #{$w};", "");
    assert_eq!(result.text, "  width: #{$w}");
}
