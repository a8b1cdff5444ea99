//! Error types for the e-KYC extraction engine

use serde::Serialize;
use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Closed classification of every failure the engine can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Archive container is structurally invalid or corrupt
    MalformedArchive,
    /// Archive has no entry with the document extension
    NoDocumentFound,
    /// Decryption rejected the share code
    InvalidCredential,
    /// Document bytes are not a well-formed XML tree
    MalformedDocument,
    /// Document parsed but has no `UidData` section
    MissingDataSection,
    /// Anything else; indicates a defect
    Internal,
}

impl ErrorKind {
    /// Message that is safe to show to the person who uploaded the file.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::MalformedArchive => {
                "Invalid or corrupted ZIP archive. Please upload the offline e-KYC ZIP file as downloaded."
            }
            ErrorKind::NoDocumentFound => {
                "The uploaded ZIP does not contain an e-KYC XML document."
            }
            ErrorKind::InvalidCredential => {
                "Incorrect share code for the ZIP file. Please double-check and try again."
            }
            ErrorKind::MalformedDocument => {
                "The e-KYC XML document is invalid or malformed."
            }
            ErrorKind::MissingDataSection => {
                "The e-KYC XML document is missing its 'UidData' section. The file might be of an unexpected format."
            }
            ErrorKind::Internal => {
                "An unexpected error occurred while processing the file. Please try again later."
            }
        }
    }

    /// Stable machine-readable code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedArchive => "malformed_archive",
            ErrorKind::NoDocumentFound => "no_document_found",
            ErrorKind::InvalidCredential => "invalid_credential",
            ErrorKind::MalformedDocument => "malformed_document",
            ErrorKind::MissingDataSection => "missing_data_section",
            ErrorKind::Internal => "internal",
        }
    }

    /// Whether the failure is caused by the uploaded input rather than a defect.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::Internal)
    }

    /// Extraction is deterministic in its inputs, so nothing is worth retrying
    /// without changing the file or the share code.
    pub fn is_retriable(&self) -> bool {
        false
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by the archive extractor and the document parser.
///
/// `Display` yields the user-facing message only. Diagnostic text from the
/// underlying zip/xml libraries is kept apart in [`ExtractionError::detail`].
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Archive container could not be read
    #[error("{}", ErrorKind::MalformedArchive.user_message())]
    MalformedArchive(String),

    /// No entry ends with the expected document extension
    #[error("{}", ErrorKind::NoDocumentFound.user_message())]
    NoDocumentFound {
        /// Number of entries that were inspected
        entries: usize,
    },

    /// Share code rejected, or decrypted content failed its integrity check
    #[error("{}", ErrorKind::InvalidCredential.user_message())]
    InvalidCredential(Option<String>),

    /// XML syntax, nesting or encoding error
    #[error("{}", ErrorKind::MalformedDocument.user_message())]
    MalformedDocument(String),

    /// Root element has no `UidData` child
    #[error("{}", ErrorKind::MissingDataSection.user_message())]
    MissingDataSection {
        /// Tag of the root element that was found instead
        root: String,
        /// Tags of the root's direct children
        children: Vec<String>,
    },

    /// Unexpected failure
    #[error("{}", ErrorKind::Internal.user_message())]
    Internal(String),
}

impl ExtractionError {
    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::MalformedArchive(_) => ErrorKind::MalformedArchive,
            ExtractionError::NoDocumentFound { .. } => ErrorKind::NoDocumentFound,
            ExtractionError::InvalidCredential(_) => ErrorKind::InvalidCredential,
            ExtractionError::MalformedDocument(_) => ErrorKind::MalformedDocument,
            ExtractionError::MissingDataSection { .. } => ErrorKind::MissingDataSection,
            ExtractionError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Diagnostic detail for logs. Never shown to end users.
    pub fn detail(&self) -> Option<String> {
        match self {
            ExtractionError::MalformedArchive(detail)
            | ExtractionError::MalformedDocument(detail)
            | ExtractionError::Internal(detail) => Some(detail.clone()),
            ExtractionError::InvalidCredential(detail) => detail.clone(),
            ExtractionError::NoDocumentFound { entries } => {
                Some(format!("{} entries inspected", entries))
            }
            ExtractionError::MissingDataSection { root, children } => Some(format!(
                "root <{}> has children [{}]",
                root,
                children.join(", ")
            )),
        }
    }
}
