//! Data produced by the archive extractor

use serde::Serialize;

/// Decrypted document bytes and the entry name they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePayload {
    /// Entry name as stored in the archive
    pub name: String,

    /// Decompressed, decrypted document content
    pub content: Vec<u8>,
}

impl ArchivePayload {
    /// Size of the decrypted document in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the document is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Metadata for one archive entry, as listed in the central directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
    pub encrypted: bool,
    pub is_directory: bool,
}
