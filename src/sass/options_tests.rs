use serde_json::json;
use tower_lsp::lsp_types::FormattingOptions;

use crate::sass::error::SassError;
use crate::sass::options::{SassAstOptions, SassFormatConfig};

#[test]
fn test_defaults() {
    let options = SassAstOptions::default();
    assert_eq!(options.tab_size, 2);
    assert!(options.insert_spaces);

    let config = SassFormatConfig::default();
    assert!(config.enabled);
    assert!(config.convert);
    assert!(config.delete_empty_rows);
    assert!(!config.replace_spaces_or_tabs);
    assert!(!config.debug);
}

#[test]
fn test_tab_stop_is_never_zero() {
    assert_eq!(SassAstOptions::new(0, true).tab_stop(), 1);
    assert_eq!(SassAstOptions::new(4, false).tab_stop(), 4);
}

#[test]
fn test_from_formatting_options() {
    let formatting = FormattingOptions {
        tab_size: 4,
        insert_spaces: false,
        ..Default::default()
    };
    assert_eq!(SassAstOptions::from(&formatting), SassAstOptions::new(4, false));
}

#[test]
fn test_config_from_nested_settings() {
    let config = SassFormatConfig::from_settings(&json!({
        "sass": { "format": { "convert": false, "deleteEmptyRows": false } }
    }))
    .unwrap();

    assert!(!config.convert);
    assert!(!config.delete_empty_rows);
    // Everything else keeps its default
    assert!(config.enabled);
    assert!(config.set_property_space);
}

#[test]
fn test_config_from_section() {
    let config = SassFormatConfig::from_settings(&json!({ "format": { "debug": true } })).unwrap();
    assert!(config.debug);

    let config = SassFormatConfig::from_settings(&json!({ "deleteCompact": false })).unwrap();
    assert!(!config.delete_compact);
}

#[test]
fn test_invalid_config() {
    let result = SassFormatConfig::from_settings(&json!({ "sass": { "format": { "enabled": "yes" } } }));
    assert!(matches!(result, Err(SassError::Json { .. })));
}
