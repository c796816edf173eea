//! Registry of the 50 states and the District of Columbia.
use std::{collections::HashMap, fmt, io::Cursor, str::FromStr};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

mod grammar;
pub use grammar::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown jurisdiction {0:?}")]
pub struct UnknownJurisdiction(pub String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid IIN {0:?}, expected 6 digits")]
pub struct InvalidIin(pub String);

/// Issuer Identification Number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iin(u32);

impl Iin {
    pub fn new(value: u32) -> Option<Self> {
        (value <= 999_999).then_some(Self(value))
    }

    pub fn into_u32(self) -> u32 {
        self.0
    }
}

impl FromStr for Iin {
    type Err = InvalidIin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit()) {
            s.parse().map(Self).map_err(|_| InvalidIin(s.to_owned()))
        } else {
            Err(InvalidIin(s.to_owned()))
        }
    }
}

impl TryFrom<String> for Iin {
    type Error = InvalidIin;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Iin> for String {
    fn from(value: Iin) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Iin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JurisdictionProfile {
    name: String,
    code: String,
    iin: Iin,
    grammar: LicenseNumberGrammar,
}

impl JurisdictionProfile {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Two-letter postal abbreviation.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn iin(&self) -> Iin {
        self.iin
    }

    pub fn grammar(&self) -> &LicenseNumberGrammar {
        &self.grammar
    }

    pub fn is_valid_license_number(&self, value: &str) -> bool {
        self.grammar.matches(value)
    }
}

#[derive(Deserialize)]
struct RegistryRow {
    name: String,
    code: String,
    iin: Iin,
    grammar: String,
}

lazy_static! {
    pub static ref JURISDICTIONS: Vec<JurisdictionProfile> = {
        let cursor = Cursor::new(include_str!("registry.csv"));
        let mut reader = csv::Reader::from_reader(cursor);
        reader
            .deserialize::<RegistryRow>()
            .map(|row| {
                let row = row.expect("malformed jurisdiction registry row");
                JurisdictionProfile {
                    grammar: row.grammar.parse().expect("malformed license number grammar"),
                    name: row.name,
                    code: row.code,
                    iin: row.iin,
                }
            })
            .collect()
    };
    static ref BY_NAME: HashMap<&'static str, usize> = JURISDICTIONS
        .iter()
        .enumerate()
        .map(|(i, j)| (j.name(), i))
        .collect();
    static ref BY_CODE: HashMap<&'static str, usize> = JURISDICTIONS
        .iter()
        .enumerate()
        .map(|(i, j)| (j.code(), i))
        .collect();
    static ref BY_IIN: HashMap<Iin, usize> = JURISDICTIONS
        .iter()
        .enumerate()
        .map(|(i, j)| (j.iin(), i))
        .collect();
}

/// Finds a jurisdiction by its full name, e.g. `"New York"`.
pub fn lookup(name: &str) -> Result<&'static JurisdictionProfile, UnknownJurisdiction> {
    BY_NAME
        .get(name)
        .map(|i| &JURISDICTIONS[*i])
        .ok_or_else(|| UnknownJurisdiction(name.to_owned()))
}

/// Finds a jurisdiction by its postal abbreviation, e.g. `"NY"`.
pub fn lookup_by_code(code: &str) -> Option<&'static JurisdictionProfile> {
    BY_CODE.get(code).map(|i| &JURISDICTIONS[*i])
}

pub fn lookup_by_iin(iin: Iin) -> Option<&'static JurisdictionProfile> {
    BY_IIN.get(&iin).map(|i| &JURISDICTIONS[*i])
}

pub fn all() -> &'static [JurisdictionProfile] {
    &JURISDICTIONS
}
