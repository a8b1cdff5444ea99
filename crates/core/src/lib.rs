//! Offline e-KYC Core Library
//!
//! This library extracts identity data from the share-code protected ZIP
//! files issued for offline e-KYC verification: it decrypts the single XML
//! document inside the archive and reads the reference ID, demographic
//! fields, postal address and photograph from it.
//!
//! ```no_run
//! let bytes = std::fs::read("offlineaadhaar.zip")?;
//! match ekyc_core::extract_identity(&bytes, "1234") {
//!     Ok(record) => println!("{} ({})", record.name, record.reference_id),
//!     Err(e) => eprintln!("{} [{}]", e, e.kind()),
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

pub mod archive;
pub mod boundary;
pub mod config;
pub mod engine;
pub mod error;
pub mod xml;

pub use archive::{ArchiveEntry, ArchiveExtractor, ArchivePayload};
pub use config::ExtractorConfig;
pub use engine::{extract_identity, IdentityExtractor};
pub use error::{ErrorKind, ExtractionError, Result};
pub use xml::{parse_identity_document, IdentityRecord, NOT_AVAILABLE};
