use crate::sass::nodes::Node;
use crate::sass::options::SassAstOptions;
use crate::sass::stringify::{stringify_nodes, stringify_values};
use crate::test_utils::parse_text;

async fn round_trip(text: &str, options: SassAstOptions) -> String {
    let mut entry = parse_text(text, options).await;
    stringify_nodes(&mut entry.body, &options)
}

#[tokio::test]
async fn test_interpolated_selectors() {
    let text = "#{$body}\n  color: red\n\n#{$main}\n  color: red";
    assert_eq!(round_trip(text, SassAstOptions::default()).await, text);
}

#[tokio::test]
async fn test_empty_line_runs_collapse() {
    let options = SassAstOptions::default();
    let mut entry = parse_text(".a\n  color: red\n\n\n\n.b\n  color: blue", options).await;

    let text = stringify_nodes(&mut entry.body, &options);

    assert_eq!(text, ".a\n  color: red\n\n.b\n  color: blue");
    // The tree is renumbered to match the emitted text
    assert_eq!(entry.body.len(), 3);
    assert!(entry.body[1].is_empty_line());
    assert_eq!(entry.body[1].line(), 2);
    assert_eq!(entry.body[2].line(), 3);
    assert_eq!(entry.body[2].children().map(|body| body[0].line()), Some(4));
}

#[tokio::test]
async fn test_expressions_render_with_single_spaces() {
    let text = "$a: 1px\n.a\n  width: calc(calc(20px - $a) + $a)\n  margin:0  auto";
    let expected = "$a: 1px\n.a\n  width: calc(calc(20px - $a) + $a)\n  margin: 0 auto";
    assert_eq!(round_trip(text, SassAstOptions::default()).await, expected);
}

#[tokio::test]
async fn test_empty_line_inside_a_block_stays_in_place() {
    let text = ".a\n  color: red\n\n  width: 1px\n\n.b\n  color: blue";
    assert_eq!(round_trip(text, SassAstOptions::default()).await, text);
}

#[tokio::test]
async fn test_joined_values_stay_joined() {
    let text = "$w: 1\n$x: 2px\n.a\n  width: #{$w}px\n  margin: -#{$w}\n  height: calc(100% - #{$x})\n  left: #{$w}#{$x} fn($w)px";
    let options = SassAstOptions::default();
    let entry = parse_text(text, options).await;
    assert!(entry.diagnostics.is_empty(), "{:?}", entry.diagnostics);

    assert_eq!(round_trip(text, options).await, text);
}

#[tokio::test]
async fn test_use_rendering() {
    let text = "@use 'colors'\n@use 'src/theme' as t\n@use 'mixins' as *\n@use \"src/grid\" as grid";
    let expected = "@use 'colors'\n@use 'src/theme' as t\n@use 'mixins' as *\n@use 'src/grid'";
    assert_eq!(round_trip(text, SassAstOptions::default()).await, expected);
}

#[tokio::test]
async fn test_mixins_and_includes() {
    let text = "@mixin m($a, $b: 2px)\n  width: $a\n.x\n  @include m(1px)\n=n\n  +m";
    assert_eq!(round_trip(text, SassAstOptions::default()).await, text);
}

#[tokio::test]
async fn test_comments() {
    let text = "// note\n.a\n  /* multi\n     line */\n  color: red\n  @extend %base";
    assert_eq!(round_trip(text, SassAstOptions::default()).await, text);
}

#[tokio::test]
async fn test_imports_split_one_per_line() {
    let text = "@import 'a', 'b'\n@font-face\n  font-family: Icons";
    let expected = "@import 'a'\n@import 'b'\n@font-face\n  font-family: Icons";
    assert_eq!(round_trip(text, SassAstOptions::default()).await, expected);
}

#[tokio::test]
async fn test_tab_indentation() {
    let options = SassAstOptions::new(4, false);
    let text = ".a\n\tcolor: red\n\t.b\n\t\tcolor: blue";
    assert_eq!(round_trip(text, options).await, text);

    // Spaces are rewritten as tabs
    assert_eq!(round_trip(".a\n    color: red", options).await, ".a\n\tcolor: red");
}

#[tokio::test]
async fn test_stringify_values() {
    let entry = parse_text(".a\n  background: url(a.png) #{$x} 'a b'", SassAstOptions::default()).await;
    let Some(body) = entry.body[0].children() else {
        panic!("Expected a selector with a body");
    };
    let Node::Property(property) = &body[0] else {
        panic!("Expected property, got {:?}", body[0]);
    };
    assert_eq!(stringify_values(&property.body), " url(a.png) #{$x} 'a b'");
}

#[test]
fn test_stringify_nothing() {
    let mut nodes = Vec::new();
    assert_eq!(stringify_nodes(&mut nodes, &SassAstOptions::default()), "");
}
