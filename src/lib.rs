//! This library encodes driver license data into the AAMVA DL/ID card design
//! standard payload carried by the PDF417 barcode on the back of a card.
//!
//! ```
//! use aamva_dlid::PersonRecord;
//!
//! let record = PersonRecord {
//!     license_number: Some("A1234567".to_owned()),
//!     last_name: Some("DOE".to_owned()),
//!     first_name: Some("JANE".to_owned()),
//!     address: Some("1 MAIN ST".to_owned()),
//!     city: Some("SACRAMENTO".to_owned()),
//!     postal_code: Some("95814".to_owned()),
//!     birth_date: Some("01011990".to_owned()),
//!     issue_date: Some("01012024".to_owned()),
//!     expiry_date: Some("01012029".to_owned()),
//!     sex: Some("Female".to_owned()),
//!     class: Some("C".to_owned()),
//!     ..Default::default()
//! };
//!
//! let payload = aamva_dlid::encode("California", &record, "636004").unwrap();
//! assert!(payload.starts_with("@\n\x1e\rANSI 636004100001DL"));
//! ```
//!
//! Only the data payload is produced here. Drawing the barcode symbol is the
//! job of a [`render::Renderer`].
pub use chrono::NaiveDate;

pub mod aamva;
pub mod attribute;
pub mod error;
pub mod format;
pub mod jurisdiction;
pub mod record;
pub mod render;
pub mod sample;

pub use aamva::{encode, encode_with, DecodedPayload, EncodedPayload, Encoder, EncoderConfig};
pub use error::EncodingError;
pub use jurisdiction::{lookup, Iin, JurisdictionProfile, UnknownJurisdiction};
pub use record::PersonRecord;
pub use sample::{generate_random_alphanumeric, generate_sample_license_number};
