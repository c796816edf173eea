use std::io;

use super::{
    data_elements,
    pdf_417::{read_array, DecodeSubfile, RecordEntry, Subfile},
    types::*,
};

/// Subfile type of the driver license subfile.
pub const DL_SUBFILE_TYPE: [u8; 2] = *b"DL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlSubfile {
    pub elements: DlElements,
}

impl DlSubfile {
    pub fn new(elements: DlElements) -> Self {
        Self { elements }
    }

    pub fn get(&self, element: DlElement) -> &[u8] {
        self.elements.get(element)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DlElement, &[u8])> {
        self.elements.iter()
    }
}

/// Reads the elements back, requiring each of them exactly once and in
/// canonical order.
impl DecodeSubfile for DlSubfile {
    fn decode_subfile(reader: &mut impl io::BufRead) -> io::Result<Self> {
        if read_array(reader)? != DL_SUBFILE_TYPE {
            return Err(io::ErrorKind::InvalidData.into());
        }

        let mut builder = DlElementsBuilder::new();

        for (i, expected) in DlElement::LIST.into_iter().enumerate() {
            let (entry, last) = RecordEntry::decode(reader)?;
            if entry.field != *expected.id() {
                return Err(io::ErrorKind::InvalidData.into());
            }

            let normalized = expected.normalize(&entry.value)?;
            if normalized.bytes != entry.value {
                return Err(io::ErrorKind::InvalidData.into());
            }

            builder.set(expected, entry.value);

            if last != (i == DlElement::COUNT - 1) {
                return Err(io::ErrorKind::InvalidData.into());
            }
        }

        Ok(Self::new(builder.build()?))
    }
}

impl From<DlSubfile> for Subfile {
    fn from(value: DlSubfile) -> Self {
        let last = DlElement::COUNT - 1;
        let mut data = Vec::new();
        for (i, (e, v)) in value.iter().enumerate() {
            // Writing into a `Vec` cannot fail.
            let _ = RecordEntry::encode_ref(&mut data, e.id(), v, i == last);
        }

        Self::new(DL_SUBFILE_TYPE, data)
    }
}

data_elements! {
    pub enum DlElement, struct DlElements (DlElementsBuilder) {
        /// Customer ID Number (DAQ).
        customer_id_number: V25Ans => CustomerIdNumber: b"DAQ",

        /// Customer Family Name (DCS).
        customer_family_name: T40Ans => CustomerFamilyName: b"DCS",

        /// Customer First Name (DAC).
        customer_first_name: T40Ans => CustomerFirstName: b"DAC",

        /// Customer Middle Name(s) (DAD).
        customer_middle_name: T40Ans => CustomerMiddleName: b"DAD",

        /// Address – Street 1 (DAG).
        address_street_1: T35Ans => AddressStreet1: b"DAG",

        /// Address – City (DAI).
        address_city: T20Ans => AddressCity: b"DAI",

        /// Address – Jurisdiction Code (DAJ).
        address_jurisdiction_code: F2A => AddressJurisdictionCode: b"DAJ",

        /// Address – Postal Code (DAK).
        address_postal_code: F11Ans => AddressPostalCode: b"DAK",

        /// Date of Birth (DBB).
        date_of_birth: F8N => DateOfBirth: b"DBB",

        /// Document Expiration Date (DBA).
        document_expiration_date: F8N => DocumentExpirationDate: b"DBA",

        /// Document Issue Date (DBD).
        document_issue_date: F8N => DocumentIssueDate: b"DBD",

        /// Physical Description – Sex (DBC).
        sex: F1N => Sex: b"DBC",

        /// Physical Description – Eye Color (DAY).
        eye_color: F3A => EyeColor: b"DAY",

        /// Physical Description – Height (DAU).
        height: F6Ans => Height: b"DAU",

        /// Cardholder weight in pounds (DAW).
        weight_in_pounds: F3N => WeightInPounds: b"DAW",

        /// Hair color (DAZ).
        hair_color: V12A => HairColor: b"DAZ",

        /// Jurisdiction-specific vehicle class (DCA).
        vehicle_class: V6Ans => VehicleClass: b"DCA",

        /// Jurisdiction-specific restriction codes (DCB).
        restriction_codes: V12Ans => RestrictionCodes: b"DCB",

        /// Jurisdiction-specific endorsement codes (DCD).
        endorsement_codes: V5Ans => EndorsementCodes: b"DCD",

        /// Document Discriminator (DCF).
        document_discriminator: V25Ans => DocumentDiscriminator: b"DCF",

        /// String of letters and/or numbers that is affixed to the raw
        /// materials (card stock, laminate, etc.) used in producing driver
        /// licenses and ID cards (DCK).
        inventory_control_number: V25Ans => InventoryControlNumber: b"DCK",

        /// Field that indicates that the cardholder is an organ donor = "1"
        /// (DDK).
        organ_donor_indicator: F1N => OrganDonorIndicator: b"DDK",

        /// Country Identification (DCG).
        country_identification: F3A => CountryIdentification: b"DCG",

        /// Family name truncation (DDE).
        family_name_truncation: F1A => FamilyNameTruncation: b"DDE",

        /// First name truncation (DDF).
        first_name_truncation: F1A => FirstNameTruncation: b"DDF",

        /// Middle name truncation (DDG).
        middle_name_truncation: F1A => MiddleNameTruncation: b"DDG"
    }
}
