//! XML parsing module for offline e-KYC documents

pub mod parser;
pub mod tree;
pub mod types;

pub use parser::{parse_identity_document, parse_payload};
pub use tree::{parse_tree, Element};
pub use types::*;
