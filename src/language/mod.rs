///! This module includes common things we can reuse across different languages

pub mod document;
pub mod text_utils;

#[cfg(test)]
mod text_utils_tests;
