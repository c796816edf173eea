mod common;
use std::io::Cursor;

use aamva_dlid::{
    aamva::dlid::{
        pdf_417::{DecodeSubfile, Record},
        DlElement, File, DL_SUBFILE_TYPE,
    },
    attribute::{AttributeKind, UnknownAttributeCode},
    encode, encode_with,
    error::WidthRule,
    format::DateError,
    jurisdiction,
    render::{Renderer, TextSheetRenderer},
    DecodedPayload, EncoderConfig, EncodingError, PersonRecord, UnknownJurisdiction,
};
use common::*;
use proptest::prelude::*;
use sha2::{Digest, Sha256};

const SCENARIO_PAYLOAD: &str = concat!(
    "@\n\x1e\rANSI 636004100001",
    "DL00310226",
    "DL",
    "DAQA1234567\n",
    "DCSDoe\n",
    "DACJane\n",
    "DAD\n",
    "DAG1 Main St\n",
    "DAILos Angeles\n",
    "DAJCA\n",
    "DAK900010000  \n",
    "DBB01011990\n",
    "DBA01012026\n",
    "DBD01012022\n",
    "DBC2\n",
    "DAYBRO\n",
    "DAU065 IN\n",
    "DAW130\n",
    "DAZBLK\n",
    "DCAC\n",
    "DCB\n",
    "DCD\n",
    "DCFABC123456789\n",
    "DCKXYZ987654321\n",
    "DDK0\n",
    "DCGUSA\n",
    "DDEN\n",
    "DDFN\n",
    "DDGN\r"
);

fn encode_ca(record: &PersonRecord) -> Result<aamva_dlid::EncodedPayload, EncodingError> {
    encode("California", record, CALIFORNIA_IIN)
}

#[test]
fn california_scenario() {
    init_tracing();
    let payload = encode_ca(&scenario()).unwrap();

    assert!(!payload.is_empty());
    assert_eq!(payload.as_str(), SCENARIO_PAYLOAD);
    assert_eq!(payload.len(), 257);

    let decoded = payload.decode().unwrap();
    assert_eq!(decoded.header.issuer_id, 636004);
    assert_eq!(decoded.iin().unwrap().to_string(), CALIFORNIA_IIN);
    assert_eq!(decoded.get(DlElement::CustomerIdNumber), "A1234567");
    assert_eq!(decoded.get(DlElement::Sex), "2");
}

#[test]
fn deterministic() {
    let record = scenario();
    assert_eq!(encode_ca(&record).unwrap(), encode_ca(&record).unwrap());
}

#[test]
fn fields_in_canonical_order() {
    let payload = encode_ca(&scenario()).unwrap();
    let mut cursor = Cursor::new(payload.as_bytes());
    let mut file = File::new(&mut cursor).unwrap();

    let designator = file.designators()[0];
    assert_eq!(designator.offset, 31);
    assert_eq!(designator.offset + designator.length, payload.len() as u64);

    let record: Record = file.read_subfile(&DL_SUBFILE_TYPE).unwrap().unwrap();
    let tags: Vec<_> = record.entries.iter().map(|e| e.field).collect();
    let expected: Vec<_> = DlElement::LIST.iter().map(|e| *e.id()).collect();
    assert_eq!(tags, expected);
}

#[test]
fn round_trip() {
    let payload = encode_ca(&scenario()).unwrap();
    let decoded = DecodedPayload::from_bytes(payload.as_bytes()).unwrap();

    let fields: Vec<_> = decoded.fields().collect();
    assert_eq!(fields.len(), DlElement::COUNT);
    assert_eq!(fields[0], (DlElement::CustomerIdNumber, "A1234567"));
    assert_eq!(decoded.get(DlElement::AddressPostalCode), "900010000  ");
    assert_eq!(decoded.get(DlElement::Height), "065 IN");
    assert_eq!(decoded.get(DlElement::OrganDonorIndicator), "0");
    assert_eq!(decoded.get(DlElement::InventoryControlNumber), "XYZ987654321");

    // Rebuilding the body from the decoded values gives back the same bytes.
    let body_start = 31;
    let mut body = b"DL".to_vec();
    for (i, (element, value)) in fields.iter().enumerate() {
        body.extend_from_slice(element.id());
        body.extend_from_slice(value.as_bytes());
        body.push(if i + 1 == fields.len() { b'\r' } else { b'\n' });
    }
    assert_eq!(&payload.as_bytes()[body_start..], body.as_slice());
}

#[test]
fn reordered_payload_is_rejected() {
    let swapped = SCENARIO_PAYLOAD.replace("DCSDoe\nDACJane\n", "DACJane\nDCSDoe\n");
    assert_eq!(swapped.len(), SCENARIO_PAYLOAD.len());
    assert!(DecodedPayload::from_bytes(swapped.as_bytes()).is_err());

    // Still a well-formed file, only out of order.
    let mut cursor = Cursor::new(swapped.as_bytes());
    let mut file = File::new(&mut cursor).unwrap();
    let record: Record = file.read_subfile(&DL_SUBFILE_TYPE).unwrap().unwrap();
    assert_eq!(record.entries.len(), DlElement::COUNT);
}

#[test]
fn decoded_body_matches_record_decoder() {
    let payload = encode_ca(&scenario()).unwrap();
    let record = Record::decode_subfile_from_bytes(&payload.as_bytes()[31..]).unwrap();
    assert_eq!(record.subfile_type, DL_SUBFILE_TYPE);
    assert_eq!(record.entries[1].value, b"Doe");
}

#[test]
fn date_boundaries() {
    let with_birth_date = |date: &str| PersonRecord {
        birth_date: Some(date.to_owned()),
        ..scenario()
    };

    assert_eq!(
        encode_ca(&with_birth_date("02302023")),
        Err(EncodingError::InvalidDate {
            element: DlElement::DateOfBirth,
            value: "02302023".to_owned(),
            reason: DateError::NoSuchDate
        })
    );
    assert!(encode_ca(&with_birth_date("02292023")).is_err());

    let payload = encode_ca(&with_birth_date("02292024")).unwrap();
    assert_eq!(payload.decode().unwrap().get(DlElement::DateOfBirth), "02292024");

    let payload = encode_ca(&with_birth_date("02/29/2024")).unwrap();
    assert_eq!(payload.decode().unwrap().get(DlElement::DateOfBirth), "02292024");

    assert!(matches!(
        encode_ca(&with_birth_date("2024")),
        Err(EncodingError::InvalidDate {
            reason: DateError::DigitCount(4),
            ..
        })
    ));
}

#[test]
fn missing_first_name() {
    let record = PersonRecord {
        first_name: None,
        ..scenario()
    };
    let error = encode_ca(&record).unwrap_err();
    assert_eq!(
        error,
        EncodingError::MissingMandatoryField(DlElement::CustomerFirstName)
    );
    assert!(error.to_string().contains("DAC"));
}

#[test]
fn unknown_attribute_codes() {
    let record = PersonRecord {
        sex: Some("X".to_owned()),
        ..scenario()
    };
    assert_eq!(
        encode_ca(&record),
        Err(EncodingError::UnknownAttributeCode {
            element: DlElement::Sex,
            source: UnknownAttributeCode {
                kind: AttributeKind::Sex,
                value: "X".to_owned()
            }
        })
    );

    let record = PersonRecord {
        eye_color: Some("PUR".to_owned()),
        ..scenario()
    };
    assert!(matches!(
        encode_ca(&record),
        Err(EncodingError::UnknownAttributeCode {
            element: DlElement::EyeColor,
            ..
        })
    ));
}

#[test]
fn attribute_labels_are_accepted() {
    let record = PersonRecord {
        sex: Some("2".to_owned()),
        eye_color: Some("brown".to_owned()),
        hair_color: Some("Black".to_owned()),
        ..scenario()
    };
    assert_eq!(encode_ca(&record).unwrap().as_str(), SCENARIO_PAYLOAD);
}

#[test]
fn long_address_is_truncated() {
    let address = "1234 SOMEWHERE OVER THE RAINBOW BOULEVARD APT 5";
    let record = PersonRecord {
        address: Some(address.to_owned()),
        ..scenario()
    };
    let payload = encode_ca(&record).unwrap();
    let decoded = payload.decode().unwrap();
    assert_eq!(decoded.get(DlElement::AddressStreet1), &address[..35]);
}

#[test]
fn long_first_name_sets_truncation_flag() {
    let first_name = "J".repeat(45);
    let record = PersonRecord {
        first_name: Some(first_name.clone()),
        ..scenario()
    };
    let decoded = encode_ca(&record).unwrap().decode().unwrap();
    assert_eq!(decoded.get(DlElement::CustomerFirstName), &first_name[..40]);
    assert_eq!(decoded.get(DlElement::FamilyNameTruncation), "N");
    assert_eq!(decoded.get(DlElement::FirstNameTruncation), "T");
    assert_eq!(decoded.get(DlElement::MiddleNameTruncation), "N");
}

#[test]
fn long_class_is_rejected() {
    let record = PersonRecord {
        class: Some("ABCDEFG".to_owned()),
        ..scenario()
    };
    assert_eq!(
        encode_ca(&record),
        Err(EncodingError::FieldTooLong {
            element: DlElement::VehicleClass,
            len: 7,
            max: 6,
            rule: WidthRule::AtMost
        })
    );
}

#[test]
fn long_postal_code_is_rejected() {
    let record = PersonRecord {
        postal_code: Some("900011234567".to_owned()),
        ..scenario()
    };
    assert_eq!(
        encode_ca(&record),
        Err(EncodingError::FieldTooLong {
            element: DlElement::AddressPostalCode,
            len: 12,
            max: 11,
            rule: WidthRule::Exactly
        })
    );
}

#[test]
fn non_ascii_postal_code_is_invalid() {
    for postal_code in ["9000é", "9000é1234567"] {
        let record = PersonRecord {
            postal_code: Some(postal_code.to_owned()),
            ..scenario()
        };
        assert_eq!(
            encode_ca(&record),
            Err(EncodingError::InvalidFieldValue {
                element: DlElement::AddressPostalCode,
                value: postal_code.to_owned()
            })
        );
    }
}

#[test]
fn out_of_range_version_is_rejected() {
    let config = EncoderConfig {
        aamva_version: 100,
        ..Default::default()
    };
    assert_eq!(
        encode_with(&config, "California", &scenario(), CALIFORNIA_IIN),
        Err(EncodingError::InvalidVersion {
            field: "aamva_version",
            value: 100
        })
    );
}

#[test]
fn non_ascii_is_rejected() {
    let record = PersonRecord {
        last_name: Some("Doé".to_owned()),
        ..scenario()
    };
    assert!(matches!(
        encode_ca(&record),
        Err(EncodingError::InvalidFieldValue {
            element: DlElement::CustomerFamilyName,
            ..
        })
    ));
}

#[test]
fn iin_must_match_jurisdiction() {
    let error = encode("California", &scenario(), "636001").unwrap_err();
    assert!(matches!(error, EncodingError::InconsistentInput { .. }));

    let error = encode("California", &scenario(), "63600").unwrap_err();
    assert!(matches!(error, EncodingError::InconsistentInput { .. }));
}

#[test]
fn unknown_jurisdiction() {
    assert_eq!(
        encode("Atlantis", &scenario(), CALIFORNIA_IIN),
        Err(EncodingError::UnknownJurisdiction(UnknownJurisdiction(
            "Atlantis".to_owned()
        )))
    );
}

#[test]
fn registry_completeness() {
    let all = jurisdiction::all();
    assert_eq!(all.len(), 51);

    let mut iins: Vec<_> = all.iter().map(|j| j.iin()).collect();
    iins.sort();
    iins.dedup();
    assert_eq!(iins.len(), 51);

    for j in all {
        assert_eq!(aamva_dlid::lookup(j.name()).unwrap().iin(), j.iin());
    }

    assert!(aamva_dlid::lookup("Guam").is_err());
}

#[test]
fn every_jurisdiction_encodes() {
    for j in jurisdiction::all() {
        let record = PersonRecord {
            license_number: Some(aamva_dlid::generate_sample_license_number(j.name()).unwrap()),
            ..scenario()
        };
        let payload = encode(j.name(), &record, &j.iin().to_string()).unwrap();
        let decoded = payload.decode().unwrap();
        assert_eq!(decoded.iin(), Some(j.iin()));
        assert_eq!(decoded.get(DlElement::AddressJurisdictionCode), j.code());
    }
}

#[test]
fn text_sheet_digest() {
    let record = scenario();
    let california = jurisdiction::lookup("California").unwrap();
    let payload = encode_ca(&record).unwrap();
    let document = TextSheetRenderer
        .render(&payload, &record, california)
        .unwrap();

    let digest = Sha256::digest(SCENARIO_PAYLOAD.as_bytes());
    assert_eq!(document.payload_digest.as_slice(), digest.as_slice());

    let sheet = String::from_utf8(document.bytes).unwrap();
    assert!(sheet.contains(&format!("SHA-256 {}", hex::encode(digest))));
    assert_eq!(document.file_name, "CA-A1234567.txt");
}

fn valid_record() -> impl Strategy<Value = PersonRecord> {
    (
        "[A-Z]{1,50}",
        "[A-Z]{1,50}",
        "[A-Z ]{0,45}",
        "[0-9]{1,5} [A-Z]{1,40}",
        prop::sample::select(vec!["Male", "Female", "Not specified", "1", "2", "9"]),
        1u32..=300,
    )
        .prop_map(|(last, first, middle, address, sex, height)| PersonRecord {
            last_name: Some(last),
            first_name: Some(first),
            middle_name: Some(middle),
            address: Some(address),
            sex: Some(sex.to_owned()),
            height: Some(height.to_string()),
            ..scenario()
        })
}

proptest! {
    #[test]
    fn encoding_is_deterministic_and_decodable(record in valid_record()) {
        let a = encode_ca(&record).unwrap();
        let b = encode_ca(&record).unwrap();
        prop_assert_eq!(&a, &b);

        let decoded = a.decode().unwrap();
        let tags: Vec<_> = decoded.fields().map(|(e, _)| e).collect();
        prop_assert_eq!(tags, DlElement::LIST.to_vec());

        let last = record.last_name.unwrap();
        let flag = if last.len() > 40 { "T" } else { "N" };
        prop_assert_eq!(decoded.get(DlElement::FamilyNameTruncation), flag);
    }
}
