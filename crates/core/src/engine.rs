//! Archive extraction and document parsing composed into one call

use crate::archive::{ArchiveEntry, ArchiveExtractor};
use crate::config::ExtractorConfig;
use crate::error::Result;
use crate::xml::{parse_payload, IdentityRecord};

/// Turns an uploaded e-KYC ZIP and its share code into an [`IdentityRecord`].
///
/// Stateless apart from configuration; safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct IdentityExtractor {
    archive: ArchiveExtractor,
}

impl IdentityExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            archive: ArchiveExtractor::new(config),
        }
    }

    /// Decrypt the archive's document and extract its identity fields.
    ///
    /// A failure in either stage is returned as-is; nothing is combined
    /// from a partially successful run.
    pub fn extract_identity(&self, archive_bytes: &[u8], credential: &str) -> Result<IdentityRecord> {
        let result = self
            .archive
            .extract(archive_bytes, credential)
            .and_then(|payload| parse_payload(&payload));

        match &result {
            Ok(record) => log::info!(
                "Extracted e-KYC record, photo present: {}",
                record.has_photograph()
            ),
            Err(e) => log::warn!(
                "e-KYC extraction failed: {} ({})",
                e.kind(),
                e.detail().unwrap_or_default()
            ),
        }

        result
    }

    /// List the archive's entries without a share code.
    pub fn inspect(&self, archive_bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
        self.archive.inspect(archive_bytes)
    }
}

/// [`IdentityExtractor::extract_identity`] with the default configuration.
pub fn extract_identity(archive_bytes: &[u8], credential: &str) -> Result<IdentityRecord> {
    IdentityExtractor::default().extract_identity(archive_bytes, credential)
}
