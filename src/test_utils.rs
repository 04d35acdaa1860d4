//! Test utilities shared across the codebase

use std::fs;
use std::path::Path;

use url::Url;

use crate::sass::nodes::FileEntry;
use crate::sass::options::SassAstOptions;
use crate::sass::parser::parse_file;
use crate::sass::resolver::DetachedResolver;

/// URI of an in-memory test document
pub fn test_uri(name: &str) -> Url {
    Url::parse(&format!("file:///test/{}", name)).expect("test URI must be valid")
}

/// Parse text in isolation, imports never resolve
pub async fn parse_text(text: &str, options: SassAstOptions) -> FileEntry {
    parse_file(text, test_uri("main.sass"), options, &DetachedResolver).await
}

/// Write a file below `dir` (creating parent directories) and return its URI
pub fn write_file(dir: &Path, relative_path: &str, contents: &str) -> Url {
    let path = dir.join(relative_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create test directory");
    }
    fs::write(&path, contents).expect("Failed to write test file");
    Url::from_file_path(&path).expect("test path must be absolute")
}
