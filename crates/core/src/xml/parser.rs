//! Field extraction for offline e-KYC XML documents
//!
//! Only the `UidData` section is mandatory. Every field inside it is
//! optional and falls back to [`NOT_AVAILABLE`].

use crate::archive::ArchivePayload;
use crate::error::{ExtractionError, Result};
use crate::xml::tree::{parse_tree, Element};
use crate::xml::types::*;

/// Parse a decrypted e-KYC document into an [`IdentityRecord`].
pub fn parse_identity_document(payload: &[u8]) -> Result<IdentityRecord> {
    let root = parse_tree(payload)?;

    let reference_id = attribute_or_default(Some(&root), REFERENCE_ID_ATTRIBUTE);

    let uid_data = root.child(DATA_SECTION).ok_or_else(|| {
        log::warn!(
            "{} element not found, root <{}> has children {:?}",
            DATA_SECTION,
            root.name,
            root.child_names()
        );
        ExtractionError::MissingDataSection {
            root: root.name.clone(),
            children: root.child_names(),
        }
    })?;

    let poi = uid_data.child(IDENTITY_SECTION);
    let name = attribute_or_default(poi, "name");
    let date_of_birth = attribute_or_default(poi, "dob");
    let gender = attribute_or_default(poi, "gender");

    let address_components = read_address(uid_data.child(ADDRESS_SECTION));
    let address = join_address(&address_components);

    let photograph = uid_data
        .child(PHOTO_SECTION)
        .map(|pht| pht.text.as_str())
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    log::debug!(
        "Extracted field lengths: reference_id={} name={} dob={} gender={} address={}",
        reference_id.len(),
        name.len(),
        date_of_birth.len(),
        gender.len(),
        address.len()
    );
    log::debug!(
        "Photo base64 length: {}",
        photograph.as_ref().map(String::len).unwrap_or(0)
    );

    Ok(IdentityRecord {
        reference_id,
        name,
        date_of_birth,
        gender,
        address,
        address_components,
        photograph,
    })
}

/// Parse the document carried by an [`ArchivePayload`].
pub fn parse_payload(payload: &ArchivePayload) -> Result<IdentityRecord> {
    log::debug!("Parsing {} ({} bytes)", payload.name, payload.len());
    parse_identity_document(&payload.content)
}

/// Attribute value, or [`NOT_AVAILABLE`] when the element or attribute is absent.
///
/// A present but empty attribute is returned as-is.
fn attribute_or_default(element: Option<&Element>, key: &str) -> String {
    element
        .and_then(|e| e.attribute(key))
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn read_address(poa: Option<&Element>) -> Vec<(AddressComponent, String)> {
    let Some(poa) = poa else {
        return Vec::new();
    };

    AddressComponent::ORDERED
        .iter()
        .filter_map(|component| {
            let value = poa.attribute(component.attribute())?.trim();
            (!value.is_empty()).then(|| (*component, value.to_string()))
        })
        .collect()
}
