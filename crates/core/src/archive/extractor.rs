//! Credential-gated document extraction

use std::io::{Cursor, Read};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::config::ExtractorConfig;
use crate::error::{ExtractionError, Result};

use super::types::{ArchiveEntry, ArchivePayload};

type InMemoryArchive<'a> = ZipArchive<Cursor<&'a [u8]>>;

/// Locates and decrypts the e-KYC document inside an uploaded ZIP.
///
/// Holds only configuration, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ArchiveExtractor {
    config: ExtractorConfig,
}

impl ArchiveExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// List every entry in the archive's central directory order.
    pub fn inspect(&self, archive_bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
        let mut archive = open_archive(archive_bytes)?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive
                .by_index_raw(index)
                .map_err(|e| ExtractionError::MalformedArchive(e.to_string()))?;

            entries.push(ArchiveEntry {
                name: file.name().to_string(),
                size: file.size(),
                compressed_size: file.compressed_size(),
                encrypted: file.encrypted(),
                is_directory: file.is_dir(),
            });
        }

        Ok(entries)
    }

    /// Decrypt the first document entry with `credential`.
    ///
    /// The credential is used as the ZIP password verbatim, as UTF-8 bytes.
    pub fn extract(&self, archive_bytes: &[u8], credential: &str) -> Result<ArchivePayload> {
        log::info!(
            "Extracting e-KYC document from archive, size: {} bytes",
            archive_bytes.len()
        );

        let mut archive = open_archive(archive_bytes)?;
        let index = self.select_document(&archive)?;

        if credential.is_empty() {
            return Err(ExtractionError::InvalidCredential(Some(
                "empty share code".to_string(),
            )));
        }

        let mut entry = archive
            .by_index_decrypt(index, credential.as_bytes())
            .map_err(classify_open_error)?;

        let name = entry.name().to_string();
        let encrypted = entry.encrypted();
        let limit = self.config.max_document_size;

        if entry.size() > limit {
            return Err(ExtractionError::MalformedArchive(format!(
                "{} declares {} bytes, limit is {} bytes",
                name,
                entry.size(),
                limit
            )));
        }

        // Declared sizes can lie; cap the read as well
        let mut content = Vec::with_capacity(entry.size() as usize);
        if let Err(e) = entry.by_ref().take(limit.saturating_add(1)).read_to_end(&mut content) {
            // A ZipCrypto header check passes for 1 in 256 wrong passwords; the
            // CRC or deflate failure that follows looks exactly like corruption.
            return Err(if encrypted {
                ExtractionError::InvalidCredential(Some(e.to_string()))
            } else {
                ExtractionError::MalformedArchive(format!("{}: {}", name, e))
            });
        }

        if content.len() as u64 > limit {
            return Err(ExtractionError::MalformedArchive(format!(
                "{} exceeds the {} byte limit",
                name, limit
            )));
        }

        log::debug!("Extracted {} ({} bytes)", name, content.len());

        Ok(ArchivePayload { name, content })
    }

    /// Index of the first entry whose name carries the document extension.
    fn select_document(&self, archive: &InMemoryArchive<'_>) -> Result<usize> {
        let candidates: Vec<usize> = (0..archive.len())
            .filter(|&index| {
                archive
                    .name_for_index(index)
                    .map(|name| self.config.is_document_name(name))
                    .unwrap_or(false)
            })
            .collect();

        let Some(&first) = candidates.first() else {
            log::warn!(
                "No {} entry among {} archive entries",
                self.config.document_extension,
                archive.len()
            );
            return Err(ExtractionError::NoDocumentFound {
                entries: archive.len(),
            });
        };

        if candidates.len() > 1 {
            log::warn!(
                "Archive holds {} {} entries, using the first listed",
                candidates.len(),
                self.config.document_extension
            );
        }

        Ok(first)
    }
}

fn open_archive(archive_bytes: &[u8]) -> Result<InMemoryArchive<'_>> {
    ZipArchive::new(Cursor::new(archive_bytes)).map_err(|e| {
        log::warn!("Rejected archive: {}", e);
        ExtractionError::MalformedArchive(e.to_string())
    })
}

fn classify_open_error(err: ZipError) -> ExtractionError {
    match err {
        ZipError::InvalidPassword => ExtractionError::InvalidCredential(None),
        ZipError::InvalidArchive(_) | ZipError::UnsupportedArchive(_) | ZipError::Io(_) => {
            ExtractionError::MalformedArchive(err.to_string())
        }
        // The index was taken from the archive itself
        other => ExtractionError::Internal(other.to_string()),
    }
}
