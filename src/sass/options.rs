//! Parser and formatter options
//!
//! [`SassAstOptions`] carries the editor indentation settings every component needs.
//! [`SassFormatConfig`] holds the user facing formatter toggles, deserialized from the
//! `sass.format` configuration section sent by the client.

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::FormattingOptions;

use crate::sass::error::SassResult;

/// Indentation settings shared by the parser, stringifier and formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SassAstOptions {
    /// Number of columns a tab stop spans
    pub tab_size: usize,
    /// Whether indentation is written with spaces instead of tabs
    pub insert_spaces: bool,
}

impl SassAstOptions {
    pub fn new(tab_size: usize, insert_spaces: bool) -> Self {
        Self { tab_size, insert_spaces }
    }

    /// Tab size that is safe to divide by
    pub fn tab_stop(&self) -> usize {
        self.tab_size.max(1)
    }
}

impl Default for SassAstOptions {
    fn default() -> Self {
        Self {
            tab_size: 2,
            insert_spaces: true,
        }
    }
}

impl From<&FormattingOptions> for SassAstOptions {
    fn from(options: &FormattingOptions) -> Self {
        Self {
            tab_size: options.tab_size as usize,
            insert_spaces: options.insert_spaces,
        }
    }
}

/// Formatter configuration, every behavior can be switched off on its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SassFormatConfig {
    /// Master switch, when false formatting returns no edits
    pub enabled: bool,
    /// Convert scss/css lines (braces and semicolons) into the indented syntax
    pub convert: bool,
    /// Remove trailing whitespace
    pub delete_whitespace: bool,
    /// Remove empty lines that are not followed by a block header
    pub delete_empty_rows: bool,
    /// Also remove empty lines directly before properties
    pub delete_compact: bool,
    /// Insert a single space after the colon of a property
    pub set_property_space: bool,
    /// Rewrite the leading whitespace to the configured tabs or spaces
    pub replace_spaces_or_tabs: bool,
    /// Log every edit the formatter makes
    pub debug: bool,
}

impl Default for SassFormatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            convert: true,
            delete_whitespace: true,
            delete_empty_rows: true,
            delete_compact: true,
            set_property_space: true,
            replace_spaces_or_tabs: false,
            debug: false,
        }
    }
}

impl SassFormatConfig {
    /// Read the formatter section out of a client settings payload.
    ///
    /// Accepts either the full settings object (`{"sass": {"format": {...}}}`), the
    /// `sass` section or the `format` section itself. Missing fields keep their defaults.
    pub fn from_settings(settings: &serde_json::Value) -> SassResult<Self> {
        let section = settings
            .get("sass")
            .map(|sass| sass.get("format").unwrap_or(sass))
            .or_else(|| settings.get("format"))
            .unwrap_or(settings);

        let config = serde_json::from_value(section.clone())?;
        Ok(config)
    }
}
