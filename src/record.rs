use serde::{Deserialize, Serialize};

/// Auto-fill length of the document discriminator.
pub const DOCUMENT_DISCRIMINATOR_LEN: usize = 12;

/// Auto-fill length of the inventory control number.
pub const INVENTORY_CONTROL_NUMBER_LEN: usize = 15;

/// Cardholder and document attributes, as entered by the caller.
///
/// Every field is optional so that a missing value can be reported instead of
/// encoded. The state of the address is the jurisdiction passed to the
/// encoder.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonRecord {
    pub license_number: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[serde(alias = "zipCode")]
    pub postal_code: Option<String>,

    /// `MMDDCCYY`.
    pub birth_date: Option<String>,
    /// `MMDDCCYY`.
    pub issue_date: Option<String>,
    /// `MMDDCCYY`.
    pub expiry_date: Option<String>,

    #[serde(alias = "dlClass")]
    pub class: Option<String>,
    pub restrictions: Option<String>,
    #[serde(alias = "endorsement")]
    pub endorsements: Option<String>,

    /// Label (`Female`) or code (`2`).
    pub sex: Option<String>,
    /// `YES` or `NO`.
    pub donor: Option<String>,

    #[serde(alias = "dd")]
    pub document_discriminator: Option<String>,
    #[serde(alias = "icn")]
    pub inventory_control_number: Option<String>,

    /// Inches.
    pub height: Option<String>,
    /// Pounds.
    pub weight: Option<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
}
