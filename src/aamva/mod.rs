use std::{borrow::Cow, fmt, io, ops::Deref};

use chrono::NaiveDate;
use dlid::{
    pdf_417::{FileBuilder, Header, SubfileDesignator},
    types::InvalidFieldValue,
    DlElement, DlElements, DlSubfile, File, DL_SUBFILE_TYPE,
};
use serde::{Deserialize, Serialize};

use crate::{
    attribute::{EyeColor, HairColor, Sex},
    error::{EncodingError, WidthRule},
    format::{self, MeasureError},
    jurisdiction::{self, Iin, JurisdictionProfile},
    record::PersonRecord,
};

pub mod dlid;

/// Elements that must be present in the input, in canonical order.
pub const MANDATORY_ELEMENTS: [DlElement; 11] = [
    DlElement::CustomerIdNumber,
    DlElement::CustomerFamilyName,
    DlElement::CustomerFirstName,
    DlElement::AddressStreet1,
    DlElement::AddressCity,
    DlElement::AddressPostalCode,
    DlElement::DateOfBirth,
    DlElement::DocumentExpirationDate,
    DlElement::DocumentIssueDate,
    DlElement::Sex,
    DlElement::VehicleClass,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncoderConfig {
    /// AAMVA standard version number written in the header.
    pub aamva_version: u8,

    /// Jurisdiction version number written in the header.
    pub jurisdiction_version: u8,

    /// Country identification (DCG).
    pub country: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            aamva_version: 10,
            jurisdiction_version: 0,
            country: "USA".to_owned(),
        }
    }
}

impl EncoderConfig {
    /// Header version numbers are written on two digits.
    fn check_versions(&self) -> Result<(), EncodingError> {
        for (field, value) in [
            ("aamva_version", self.aamva_version),
            ("jurisdiction_version", self.jurisdiction_version),
        ] {
            if value > 99 {
                return Err(EncodingError::InvalidVersion { field, value });
            }
        }

        Ok(())
    }
}

/// Encodes `record` for the jurisdiction named `jurisdiction_name`.
///
/// `iin` must be the IIN of that jurisdiction.
pub fn encode(
    jurisdiction_name: &str,
    record: &PersonRecord,
    iin: &str,
) -> Result<EncodedPayload, EncodingError> {
    encode_with(&EncoderConfig::default(), jurisdiction_name, record, iin)
}

pub fn encode_with(
    config: &EncoderConfig,
    jurisdiction_name: &str,
    record: &PersonRecord,
    iin: &str,
) -> Result<EncodedPayload, EncodingError> {
    let jurisdiction = jurisdiction::lookup(jurisdiction_name)?;

    if iin.parse::<Iin>().ok() != Some(jurisdiction.iin()) {
        return Err(EncodingError::InconsistentInput {
            jurisdiction: jurisdiction.name().to_owned(),
            expected: jurisdiction.iin(),
            found: iin.to_owned(),
        });
    }

    Encoder::new(config.clone()).encode(jurisdiction, record)
}

#[derive(Debug, Default, Clone)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn encode(
        &self,
        jurisdiction: &JurisdictionProfile,
        record: &PersonRecord,
    ) -> Result<EncodedPayload, EncodingError> {
        self.config.check_versions()?;

        for element in MANDATORY_ELEMENTS {
            if input_of(record, element).map_or(true, |v| v.trim().is_empty()) {
                return Err(EncodingError::MissingMandatoryField(element));
            }
        }

        // Body first: the designator needs its length.
        let mut values: Vec<Vec<u8>> = Vec::with_capacity(DlElement::COUNT);
        let mut truncated = [false; 3];
        let mut dates = Dates::default();

        for element in DlElement::LIST {
            let raw: Cow<str> = match element {
                DlElement::FamilyNameTruncation => truncation_flag(truncated[0]).into(),
                DlElement::FirstNameTruncation => truncation_flag(truncated[1]).into(),
                DlElement::MiddleNameTruncation => truncation_flag(truncated[2]).into(),
                _ => self.value_of(element, jurisdiction, record, &mut dates)?,
            };

            let normalized = element
                .normalize(raw.as_bytes())
                .map_err(|e| width_error(element, &raw, e))?;

            match element {
                DlElement::CustomerFamilyName => truncated[0] = normalized.truncated,
                DlElement::CustomerFirstName => truncated[1] = normalized.truncated,
                DlElement::CustomerMiddleName => truncated[2] = normalized.truncated,
                _ => (),
            }

            if normalized.truncated {
                tracing::debug!(%element, width = element.width(), "truncated value");
            }

            values.push(normalized.bytes);
        }

        let license_number = input_of(record, DlElement::CustomerIdNumber).unwrap_or_default();
        if !jurisdiction.is_valid_license_number(license_number) {
            tracing::warn!(
                jurisdiction = jurisdiction.name(),
                grammar = %jurisdiction.grammar(),
                "license number does not follow the jurisdiction format"
            );
        }

        if let (Some(issue), Some(expiry)) = (dates.issue, dates.expiry) {
            if expiry < issue {
                tracing::warn!(%issue, %expiry, "document expires before its issue date");
            }
        }

        let elements =
            DlElements::new_with(|e| Cow::Owned(std::mem::take(&mut values[e.position()])));
        let file = FileBuilder::new(
            jurisdiction.iin().into_u32(),
            self.config.aamva_version,
            self.config.jurisdiction_version,
            DlSubfile::new(elements).into(),
        );

        let payload = EncodedPayload(file.into_bytes());
        tracing::debug!(
            jurisdiction = jurisdiction.name(),
            iin = %jurisdiction.iin(),
            len = payload.len(),
            "encoded DL/ID payload"
        );

        Ok(payload)
    }

    fn value_of<'a>(
        &'a self,
        element: DlElement,
        jurisdiction: &'a JurisdictionProfile,
        record: &'a PersonRecord,
        dates: &mut Dates,
    ) -> Result<Cow<'a, str>, EncodingError> {
        let input = input_of(record, element).unwrap_or_default();

        let value: Cow<'a, str> = match element {
            DlElement::AddressJurisdictionCode => jurisdiction.code().into(),
            DlElement::CountryIdentification => self.config.country.as_str().into(),
            DlElement::AddressPostalCode => format::format_postal_code(input).into(),
            DlElement::DateOfBirth
            | DlElement::DocumentExpirationDate
            | DlElement::DocumentIssueDate => {
                let date = format::parse_date(input).map_err(|reason| {
                    EncodingError::InvalidDate {
                        element,
                        value: input.to_owned(),
                        reason,
                    }
                })?;

                match element {
                    DlElement::DocumentIssueDate => dates.issue = Some(date),
                    DlElement::DocumentExpirationDate => dates.expiry = Some(date),
                    _ => (),
                }

                format::format_date(date).into()
            }
            DlElement::Sex => Sex::parse(input)
                .map_err(|source| EncodingError::UnknownAttributeCode { element, source })?
                .code()
                .into(),
            _ if input.is_empty() => "".into(),
            DlElement::EyeColor => EyeColor::parse(input)
                .map_err(|source| EncodingError::UnknownAttributeCode { element, source })?
                .code()
                .into(),
            DlElement::HairColor => HairColor::parse(input)
                .map_err(|source| EncodingError::UnknownAttributeCode { element, source })?
                .code()
                .into(),
            DlElement::Height => format::format_height(input)
                .map_err(|e| measure_error(element, input, e))?
                .into(),
            DlElement::WeightInPounds => format::format_weight(input)
                .map_err(|e| measure_error(element, input, e))?
                .into(),
            DlElement::OrganDonorIndicator => format::format_donor(input)
                .ok_or_else(|| EncodingError::InvalidFieldValue {
                    element,
                    value: input.to_owned(),
                })?
                .into(),
            _ => input.into(),
        };

        Ok(value)
    }
}

#[derive(Default)]
struct Dates {
    issue: Option<NaiveDate>,
    expiry: Option<NaiveDate>,
}

/// Caller value feeding `element`, if the element comes from the record.
fn input_of(record: &PersonRecord, element: DlElement) -> Option<&str> {
    let field = match element {
        DlElement::CustomerIdNumber => &record.license_number,
        DlElement::CustomerFamilyName => &record.last_name,
        DlElement::CustomerFirstName => &record.first_name,
        DlElement::CustomerMiddleName => &record.middle_name,
        DlElement::AddressStreet1 => &record.address,
        DlElement::AddressCity => &record.city,
        DlElement::AddressPostalCode => &record.postal_code,
        DlElement::DateOfBirth => &record.birth_date,
        DlElement::DocumentExpirationDate => &record.expiry_date,
        DlElement::DocumentIssueDate => &record.issue_date,
        DlElement::Sex => &record.sex,
        DlElement::EyeColor => &record.eye_color,
        DlElement::Height => &record.height,
        DlElement::WeightInPounds => &record.weight,
        DlElement::HairColor => &record.hair_color,
        DlElement::VehicleClass => &record.class,
        DlElement::RestrictionCodes => &record.restrictions,
        DlElement::EndorsementCodes => &record.endorsements,
        DlElement::DocumentDiscriminator => &record.document_discriminator,
        DlElement::InventoryControlNumber => &record.inventory_control_number,
        DlElement::OrganDonorIndicator => &record.donor,
        DlElement::AddressJurisdictionCode
        | DlElement::CountryIdentification
        | DlElement::FamilyNameTruncation
        | DlElement::FirstNameTruncation
        | DlElement::MiddleNameTruncation => return None,
    };

    field.as_deref()
}

fn truncation_flag(truncated: bool) -> &'static str {
    if truncated {
        "T"
    } else {
        "N"
    }
}

fn width_error(element: DlElement, value: &str, e: InvalidFieldValue) -> EncodingError {
    match e {
        InvalidFieldValue::TooLong { len, max } => EncodingError::FieldTooLong {
            element,
            len,
            max,
            rule: WidthRule::AtMost,
        },
        InvalidFieldValue::WrongLength { len, expected } if len > expected => {
            EncodingError::FieldTooLong {
                element,
                len,
                max: expected,
                rule: WidthRule::Exactly,
            }
        }
        _ => EncodingError::InvalidFieldValue {
            element,
            value: value.to_owned(),
        },
    }
}

fn measure_error(element: DlElement, value: &str, e: MeasureError) -> EncodingError {
    match e {
        MeasureError::TooLong => EncodingError::FieldTooLong {
            element,
            len: value.trim().trim_start_matches('0').len(),
            max: 3,
            rule: WidthRule::AtMost,
        },
        MeasureError::NotANumber => EncodingError::InvalidFieldValue {
            element,
            value: value.to_owned(),
        },
    }
}

/// Encoded DL/ID file, ready to be put in a PDF417 symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedPayload(Vec<u8>);

impl EncodedPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        unsafe {
            // SAFETY: the header and designator are ASCII, and every element
            //         value went through an ASCII character class.
            std::str::from_utf8_unchecked(&self.0)
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Splits the payload back into its header, designator and elements.
    pub fn decode(&self) -> io::Result<DecodedPayload> {
        DecodedPayload::from_bytes(&self.0)
    }
}

impl Deref for EncodedPayload {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<[u8]> for EncodedPayload {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub header: Header,
    pub designator: SubfileDesignator,
    pub subfile: DlSubfile,
}

impl DecodedPayload {
    /// Decodes a single-subfile DL/ID file.
    ///
    /// Anything this crate would not have produced is rejected with
    /// [`io::ErrorKind::InvalidData`]: more than one subfile, a designator not
    /// covering exactly the rest of the file, or elements out of order.
    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let mut cursor = io::Cursor::new(bytes);
        let mut file = File::new(&mut cursor)?;
        let header = file.header();

        let designator = match file.designators() {
            [d] if d.subfile_type == DL_SUBFILE_TYPE => *d,
            _ => return Err(io::ErrorKind::InvalidData.into()),
        };

        if designator.offset + designator.length != bytes.len() as u64 {
            return Err(io::ErrorKind::InvalidData.into());
        }

        let subfile = file
            .read_subfile::<DlSubfile>(&DL_SUBFILE_TYPE)?
            .ok_or(io::ErrorKind::InvalidData)?;

        Ok(Self {
            header,
            designator,
            subfile,
        })
    }

    pub fn iin(&self) -> Option<Iin> {
        Iin::new(self.header.issuer_id)
    }

    pub fn get(&self, element: DlElement) -> &str {
        std::str::from_utf8(self.subfile.get(element)).unwrap_or_default()
    }

    /// Elements in payload order.
    pub fn fields(&self) -> impl Iterator<Item = (DlElement, &str)> {
        self.subfile
            .iter()
            .map(|(e, v)| (e, std::str::from_utf8(v).unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PersonRecord {
        PersonRecord {
            license_number: Some("1234567".to_owned()),
            last_name: Some("SMITH".to_owned()),
            first_name: Some("JOHN".to_owned()),
            address: Some("123 MAIN ST".to_owned()),
            city: Some("ANYVILLE".to_owned()),
            postal_code: Some("99501".to_owned()),
            birth_date: Some("04191988".to_owned()),
            issue_date: Some("01012024".to_owned()),
            expiry_date: Some("04192030".to_owned()),
            sex: Some("Male".to_owned()),
            class: Some("D".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn optional_elements_are_written_empty() {
        let alaska = jurisdiction::lookup("Alaska").unwrap();
        let payload = Encoder::default().encode(alaska, &sample_record()).unwrap();
        let decoded = payload.decode().unwrap();

        assert_eq!(decoded.get(DlElement::CustomerMiddleName), "");
        assert_eq!(decoded.get(DlElement::EyeColor), "");
        assert_eq!(decoded.get(DlElement::OrganDonorIndicator), "");
        assert_eq!(decoded.get(DlElement::AddressJurisdictionCode), "AK");
        assert_eq!(decoded.get(DlElement::CountryIdentification), "USA");
        assert_eq!(decoded.fields().count(), DlElement::COUNT);
        assert!(payload.contains("\nDAD\n"));
    }

    #[test]
    fn blank_mandatory_value_is_missing() {
        let alaska = jurisdiction::lookup("Alaska").unwrap();
        let record = PersonRecord {
            city: Some("   ".to_owned()),
            ..sample_record()
        };

        assert_eq!(
            Encoder::default().encode(alaska, &record),
            Err(EncodingError::MissingMandatoryField(DlElement::AddressCity))
        );
    }

    #[test]
    fn header_uses_configured_versions() {
        let config = EncoderConfig {
            aamva_version: 9,
            jurisdiction_version: 2,
            country: "USA".to_owned(),
        };
        let alaska = jurisdiction::lookup("Alaska").unwrap();
        let payload = Encoder::new(config).encode(alaska, &sample_record()).unwrap();
        assert!(payload.starts_with("@\n\x1e\rANSI 636001090201DL0031"));
    }

    #[test]
    fn versions_must_fit_two_digits() {
        let alaska = jurisdiction::lookup("Alaska").unwrap();
        let config = EncoderConfig {
            aamva_version: 100,
            ..Default::default()
        };
        assert_eq!(
            Encoder::new(config).encode(alaska, &sample_record()),
            Err(EncodingError::InvalidVersion {
                field: "aamva_version",
                value: 100
            })
        );

        let config = EncoderConfig {
            jurisdiction_version: 255,
            ..Default::default()
        };
        assert!(matches!(
            Encoder::new(config).encode(alaska, &sample_record()),
            Err(EncodingError::InvalidVersion {
                field: "jurisdiction_version",
                ..
            })
        ));

        let config = EncoderConfig {
            aamva_version: 99,
            jurisdiction_version: 99,
            ..Default::default()
        };
        let payload = Encoder::new(config).encode(alaska, &sample_record()).unwrap();
        assert!(payload.starts_with("@\n\x1e\rANSI 636001999901"));
    }

    #[test]
    fn config_from_json() {
        let config: EncoderConfig =
            serde_json::from_str(r#"{"aamvaVersion": 9, "country": "CAN"}"#).unwrap();
        assert_eq!(
            config,
            EncoderConfig {
                aamva_version: 9,
                jurisdiction_version: 0,
                country: "CAN".to_owned(),
            }
        );

        let json = serde_json::to_value(&EncoderConfig::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "aamvaVersion": 10,
                "jurisdictionVersion": 0,
                "country": "USA"
            })
        );
    }

    #[test]
    fn short_country_is_rejected() {
        let config = EncoderConfig {
            country: "US".to_owned(),
            ..Default::default()
        };
        let alaska = jurisdiction::lookup("Alaska").unwrap();
        assert_eq!(
            Encoder::new(config).encode(alaska, &sample_record()),
            Err(EncodingError::InvalidFieldValue {
                element: DlElement::CountryIdentification,
                value: "US".to_owned()
            })
        );
    }

    #[test]
    fn measures_are_checked() {
        let alaska = jurisdiction::lookup("Alaska").unwrap();
        let record = PersonRecord {
            weight: Some("1300".to_owned()),
            ..sample_record()
        };
        assert!(matches!(
            Encoder::default().encode(alaska, &record),
            Err(EncodingError::FieldTooLong {
                element: DlElement::WeightInPounds,
                len: 4,
                max: 3,
                ..
            })
        ));

        let record = PersonRecord {
            height: Some("5ft".to_owned()),
            ..sample_record()
        };
        assert!(matches!(
            Encoder::default().encode(alaska, &record),
            Err(EncodingError::InvalidFieldValue {
                element: DlElement::Height,
                ..
            })
        ));
    }

    #[test]
    fn decoder_rejects_wrong_length() {
        let alaska = jurisdiction::lookup("Alaska").unwrap();
        let mut bytes = Encoder::default()
            .encode(alaska, &sample_record())
            .unwrap()
            .into_bytes();
        bytes.pop();
        assert!(DecodedPayload::from_bytes(&bytes).is_err());
    }
}
