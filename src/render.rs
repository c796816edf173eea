//! Documents built around an encoded payload.
//!
//! Drawing the PDF417 symbol itself is left to an external renderer
//! implementing [`Renderer`].
use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::{
    aamva::{dlid::pdf_417, EncodedPayload},
    attribute::{EyeColor, HairColor},
    jurisdiction::JurisdictionProfile,
    record::PersonRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("renderer failed: {0}")]
    Backend(String),
}

/// Rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,

    /// SHA-256 of the embedded payload.
    pub payload_digest: [u8; 32],
}

pub trait Renderer {
    /// Renders `payload`, which must be the encoding of `record` for
    /// `jurisdiction`.
    fn render(
        &self,
        payload: &EncodedPayload,
        record: &PersonRecord,
        jurisdiction: &JurisdictionProfile,
    ) -> Result<DocumentHandle, RenderError>;
}

pub fn payload_digest(payload: &EncodedPayload) -> [u8; 32] {
    Sha256::digest(payload.as_bytes()).into()
}

/// Plain text sheet listing the record and the raw payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSheetRenderer;

impl TextSheetRenderer {
    fn write_sheet(
        out: &mut String,
        payload: &EncodedPayload,
        record: &PersonRecord,
        jurisdiction: &JurisdictionProfile,
        digest: &[u8; 32],
    ) -> std::fmt::Result {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        writeln!(
            out,
            "{} driver license ({}, IIN {})",
            jurisdiction.name(),
            jurisdiction.code(),
            jurisdiction.iin()
        )?;
        writeln!(out)?;

        let rows = [
            ("License number", field(&record.license_number)),
            ("Last name", field(&record.last_name)),
            ("First name", field(&record.first_name)),
            ("Middle name", field(&record.middle_name)),
            ("Address", field(&record.address)),
            ("City", field(&record.city)),
            ("Postal code", field(&record.postal_code)),
            ("Date of birth", field(&record.birth_date)),
            ("Issued", field(&record.issue_date)),
            ("Expires", field(&record.expiry_date)),
            ("Class", field(&record.class)),
            ("Restrictions", field(&record.restrictions)),
            ("Endorsements", field(&record.endorsements)),
            ("Sex", field(&record.sex)),
            ("Height", field(&record.height)),
            ("Weight", field(&record.weight)),
            (
                "Eyes",
                field(&record.eye_color.as_deref().map(|c| {
                    EyeColor::parse(c).map_or(c, |v| v.label()).to_owned()
                })),
            ),
            (
                "Hair",
                field(&record.hair_color.as_deref().map(|c| {
                    HairColor::parse(c).map_or(c, |v| v.label()).to_owned()
                })),
            ),
            ("Organ donor", field(&record.donor)),
            ("Document discriminator", field(&record.document_discriminator)),
            ("Inventory control number", field(&record.inventory_control_number)),
        ];

        for (name, value) in rows {
            writeln!(out, "{name:<26}{value}")?;
        }

        writeln!(out)?;
        writeln!(out, "PDF417 data ({} bytes):", payload.len())?;
        for c in payload.chars() {
            match c as u8 {
                pdf_417::DATA_ELEMENT_SEPARATOR => out.push_str("<LF>\n"),
                pdf_417::RECORD_SEPARATOR => out.push_str("<RS>"),
                pdf_417::SEGMENT_TERMINATOR => out.push_str("<CR>"),
                _ => out.push(c),
            }
        }
        writeln!(out)?;
        writeln!(out)?;

        write!(out, "SHA-256 ")?;
        for b in digest {
            write!(out, "{b:02x}")?;
        }
        writeln!(out)
    }
}

impl Renderer for TextSheetRenderer {
    fn render(
        &self,
        payload: &EncodedPayload,
        record: &PersonRecord,
        jurisdiction: &JurisdictionProfile,
    ) -> Result<DocumentHandle, RenderError> {
        let payload_digest = payload_digest(payload);

        let mut sheet = String::new();
        Self::write_sheet(&mut sheet, payload, record, jurisdiction, &payload_digest)
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        let license_number = record.license_number.as_deref().unwrap_or("unnumbered");

        Ok(DocumentHandle {
            file_name: format!("{}-{}.txt", jurisdiction.code(), license_number),
            media_type: "text/plain; charset=us-ascii",
            bytes: sheet.into_bytes(),
            payload_digest,
        })
    }
}
