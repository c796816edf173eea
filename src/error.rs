use crate::{
    aamva::dlid::DlElement,
    attribute::UnknownAttributeCode,
    format::DateError,
    jurisdiction::{Iin, UnknownJurisdiction},
};

/// Reason an input could not be encoded.
///
/// Every variant is a validation failure of the caller input: the same input
/// always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error(transparent)]
    UnknownJurisdiction(#[from] UnknownJurisdiction),

    #[error("invalid date in {element}: {value:?} ({reason})")]
    InvalidDate {
        element: DlElement,
        value: String,
        reason: DateError,
    },

    #[error("missing mandatory field {0}")]
    MissingMandatoryField(DlElement),

    #[error("{element} is {len} characters long, {rule} {max}")]
    FieldTooLong {
        element: DlElement,
        len: usize,
        max: usize,
        rule: WidthRule,
    },

    #[error("invalid {element}: {source}")]
    UnknownAttributeCode {
        element: DlElement,
        source: UnknownAttributeCode,
    },

    #[error("invalid value for {element}: {value:?}")]
    InvalidFieldValue { element: DlElement, value: String },

    #[error("{field} {value} does not fit the 2-digit header field")]
    InvalidVersion { field: &'static str, value: u8 },

    #[error("IIN {found:?} does not match {jurisdiction} ({expected})")]
    InconsistentInput {
        jurisdiction: String,
        expected: Iin,
        found: String,
    },
}

/// Which width constraint a value broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthRule {
    Exactly,
    AtMost,
}

impl std::fmt::Display for WidthRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exactly => f.write_str("expected exactly"),
            Self::AtMost => f.write_str("allowed at most"),
        }
    }
}
