//! Sass Code Native Library
//!
//! Language tooling for the indented Sass syntax: an indentation driven parser
//! that builds a scoped syntax tree with diagnostics, a stringifier that turns the
//! tree back into canonical text, and a line based formatter.

pub mod language;
pub mod logging;
pub mod sass;
#[cfg(test)]
pub mod test_utils;
