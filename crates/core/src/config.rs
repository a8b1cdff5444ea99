//! Extraction limits and document selection settings

use serde::Deserialize;

/// Extension (suffix) of the e-KYC document inside the archive
pub const DEFAULT_DOCUMENT_EXTENSION: &str = ".xml";

/// ZIP bomb protection: real offline e-KYC XMLs are ~5-15 KB, we allow up to 10 MB
pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// Settings for [`ArchiveExtractor`](crate::archive::ArchiveExtractor).
///
/// Missing keys fall back to the defaults when deserialized, so a transport
/// can embed this in its own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Entry names must end with this suffix (case-sensitive)
    pub document_extension: String,

    /// Upper bound on the decompressed document size in bytes
    pub max_document_size: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            document_extension: DEFAULT_DOCUMENT_EXTENSION.to_string(),
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }
}

impl ExtractorConfig {
    /// Override the document extension
    pub fn with_document_extension(mut self, extension: impl Into<String>) -> Self {
        self.document_extension = extension.into();
        self
    }

    /// Override the decompressed size limit
    pub fn with_max_document_size(mut self, max_document_size: u64) -> Self {
        self.max_document_size = max_document_size;
        self
    }

    /// Whether an archive entry name is a candidate document
    pub fn is_document_name(&self, name: &str) -> bool {
        name.ends_with(self.document_extension.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.document_extension, ".xml");
        assert_eq!(config.max_document_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_document_name_matching() {
        let config = ExtractorConfig::default();
        assert!(config.is_document_name("offlineaadhaar20251123074351915.xml"));
        assert!(config.is_document_name("nested/dir/doc.xml"));
        assert!(!config.is_document_name("doc.XML"));
        assert!(!config.is_document_name("doc.xml.sig"));
        assert!(!config.is_document_name("readme.txt"));
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ExtractorConfig =
            serde_json::from_str(r#"{ "max_document_size": 2048 }"#).unwrap();
        assert_eq!(config.max_document_size, 2048);
        assert_eq!(config.document_extension, DEFAULT_DOCUMENT_EXTENSION);
    }

    #[test]
    fn test_builders() {
        let config = ExtractorConfig::default()
            .with_document_extension(".kyc")
            .with_max_document_size(64);
        assert!(config.is_document_name("a.kyc"));
        assert_eq!(config.max_document_size, 64);
    }
}
