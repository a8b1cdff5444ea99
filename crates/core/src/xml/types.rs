//! Data structures for offline e-KYC identity records

use serde::Serialize;

/// Placeholder for any field the document does not carry
pub const NOT_AVAILABLE: &str = "N/A";

/// Root attribute holding the reference identifier
pub const REFERENCE_ID_ATTRIBUTE: &str = "referenceId";

/// Data section, direct child of the root
pub const DATA_SECTION: &str = "UidData";

/// Proof of identity sub-section
pub const IDENTITY_SECTION: &str = "Poi";

/// Proof of address sub-section
pub const ADDRESS_SECTION: &str = "Poa";

/// Photograph sub-section
pub const PHOTO_SECTION: &str = "Pht";

/// Postal address attributes of the `Poa` element.
///
/// [`AddressComponent::ORDERED`] is the order in which components are
/// joined into the address string, regardless of their order in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressComponent {
    CareOf,
    House,
    Street,
    Locality,
    /// Village/Town/City
    Vtc,
    PostOffice,
    District,
    SubDistrict,
    State,
    /// PIN code
    PostalCode,
    Country,
    Landmark,
}

impl AddressComponent {
    pub const ORDERED: [AddressComponent; 12] = [
        AddressComponent::CareOf,
        AddressComponent::House,
        AddressComponent::Street,
        AddressComponent::Locality,
        AddressComponent::Vtc,
        AddressComponent::PostOffice,
        AddressComponent::District,
        AddressComponent::SubDistrict,
        AddressComponent::State,
        AddressComponent::PostalCode,
        AddressComponent::Country,
        AddressComponent::Landmark,
    ];

    /// Attribute name on the `Poa` element
    pub fn attribute(&self) -> &'static str {
        match self {
            AddressComponent::CareOf => "careof",
            AddressComponent::House => "house",
            AddressComponent::Street => "street",
            AddressComponent::Locality => "loc",
            AddressComponent::Vtc => "vtc",
            AddressComponent::PostOffice => "po",
            AddressComponent::District => "dist",
            AddressComponent::SubDistrict => "subdist",
            AddressComponent::State => "state",
            AddressComponent::PostalCode => "pc",
            AddressComponent::Country => "country",
            AddressComponent::Landmark => "landmark",
        }
    }
}

/// Normalized identity fields extracted from one e-KYC document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    /// Reference ID (last 4 digits of the identity number + timestamp)
    pub reference_id: String,

    /// Full name
    pub name: String,

    /// Date of birth as written in the document (usually DD-MM-YYYY)
    pub date_of_birth: String,

    /// Gender: M/F/T
    pub gender: String,

    /// Non-blank address components joined with ", "
    pub address: String,

    /// Trimmed, non-blank address components in [`AddressComponent::ORDERED`] order
    #[serde(skip)]
    pub address_components: Vec<(AddressComponent, String)>,

    /// Photograph, base64 encoded JPEG as issued
    pub photograph: Option<String>,
}

impl IdentityRecord {
    pub fn has_photograph(&self) -> bool {
        self.photograph.is_some()
    }

    /// Value of a single address component, if it was present and non-blank
    pub fn address_component(&self, component: AddressComponent) -> Option<&str> {
        self.address_components
            .iter()
            .find(|(c, _)| *c == component)
            .map(|(_, v)| v.as_str())
    }
}

/// Join address components with `", "`, or [`NOT_AVAILABLE`] when there are none.
pub fn join_address(components: &[(AddressComponent, String)]) -> String {
    if components.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    components
        .iter()
        .map(|(_, value)| value.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
