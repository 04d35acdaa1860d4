//! Indented Sass language support
//!
//! Parsing into a scoped syntax tree, writing the tree back out, line based
//! formatting and the language server that exposes them.

pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod expression;
pub mod file_registry;
pub mod format_utils;
pub mod formatter;
pub mod indentation;
pub mod line_kind;
pub mod nodes;
pub mod options;
pub mod parser;
pub mod resolver;
pub mod scope;
pub mod server;
pub mod stringify;

#[cfg(test)]
mod expression_tests;
#[cfg(test)]
mod format_utils_tests;
#[cfg(test)]
mod formatter_tests;
#[cfg(test)]
mod indentation_tests;
#[cfg(test)]
mod options_tests;
#[cfg(test)]
mod stringify_tests;
