//! Auto-fill values.
//!
//! Nothing here is unique or authoritative. Callers are free to replace any
//! generated value.
use rand::Rng;

use crate::jurisdiction::{self, CharSet, Segment, UnknownJurisdiction};

/// Random license number following the format of the jurisdiction.
pub fn generate_sample_license_number(
    jurisdiction_name: &str,
) -> Result<String, UnknownJurisdiction> {
    generate_sample_license_number_with(&mut rand::thread_rng(), jurisdiction_name)
}

pub fn generate_sample_license_number_with(
    rng: &mut impl Rng,
    jurisdiction_name: &str,
) -> Result<String, UnknownJurisdiction> {
    let jurisdiction = jurisdiction::lookup(jurisdiction_name)?;
    Ok(jurisdiction.grammar().generate(rng))
}

/// Uppercase letters and digits, each drawn uniformly among the 36.
///
/// Used for document discriminators and inventory control numbers.
pub fn generate_random_alphanumeric(len: usize) -> String {
    generate_random_alphanumeric_with(&mut rand::thread_rng(), len)
}

pub fn generate_random_alphanumeric_with(rng: &mut impl Rng, len: usize) -> String {
    let mut result = String::with_capacity(len);
    if len > 0 {
        Segment::exactly(CharSet::AlphaNumeric, len).generate_to(rng, &mut result);
    }
    result
}
