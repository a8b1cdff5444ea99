//! Share-code protected ZIP handling for offline e-KYC downloads
//!
//! The archive is expected to hold a single XML document encrypted with the
//! user's share code. [`ArchiveExtractor`] locates that document, decrypts it
//! and hands back the raw bytes; parsing happens in [`crate::xml`].

pub mod extractor;
pub mod types;

pub use extractor::ArchiveExtractor;
pub use types::*;

use crate::error::Result;

/// Extract the e-KYC document using the default [`ExtractorConfig`](crate::config::ExtractorConfig).
pub fn extract(archive_bytes: &[u8], credential: &str) -> Result<ArchivePayload> {
    ArchiveExtractor::default().extract(archive_bytes, credential)
}

/// List the archive's entries without decrypting anything.
pub fn inspect(archive_bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
    ArchiveExtractor::default().inspect(archive_bytes)
}
