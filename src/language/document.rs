/// Version of a document as seen by the server
///
/// Different versions don't mean the content actually changed, only that it might have.
///
/// While a document is open in the client its content is the editor buffer, not the file
/// on disk. Once closed, the server reads the file system again.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DocumentVersion {
    /// Incremented every time the client opens the document, kept after it is closed
    pub major: i32,
    /// Version of the content as reported by the client
    ///
    /// Diagnostics are published against this version so the client can drop stale ones.
    pub minor: i32,
}
