//! Physical description codes.
//!
//! Only the codes ever reach the payload. Labels are for display.
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code or label {value:?}")]
pub struct UnknownAttributeCode {
    pub kind: AttributeKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    EyeColor,
    HairColor,
    Sex,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EyeColor => f.write_str("eye color"),
            Self::HairColor => f.write_str("hair color"),
            Self::Sex => f.write_str("sex"),
        }
    }
}

macro_rules! attribute_codes {
	($(#[$enum_meta:meta])* $vis:vis enum $enum_id:ident ($kind:ident) { $($id:ident : $code:literal => $label:literal),* }) => {
		$(#[$enum_meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis enum $enum_id {
			$($id),*
		}

		impl $enum_id {
			pub const KIND: AttributeKind = AttributeKind::$kind;

			pub const LIST: &'static [Self] = &[$(Self::$id),*];

			pub fn code(&self) -> &'static str {
				match self {
					$(Self::$id => $code),*
				}
			}

			pub fn label(&self) -> &'static str {
				match self {
					$(Self::$id => $label),*
				}
			}

			pub fn from_code(code: &str) -> Option<Self> {
				match code {
					$($code => Some(Self::$id),)*
					_ => None
				}
			}

			pub fn from_label(label: &str) -> Option<Self> {
				Self::LIST.iter().copied().find(|v| v.label().eq_ignore_ascii_case(label))
			}

			/// Accepts either the exact code or the label, in any case.
			pub fn parse(value: &str) -> Result<Self, UnknownAttributeCode> {
				Self::from_code(value)
					.or_else(|| Self::from_label(value))
					.ok_or_else(|| UnknownAttributeCode {
						kind: Self::KIND,
						value: value.to_owned(),
					})
			}
		}

		impl fmt::Display for $enum_id {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.label())
			}
		}
	};
}

attribute_codes! {
    /// Eye color (AAMVA D20).
    pub enum EyeColor (EyeColor) {
        Black: "BLK" => "Black",
        Blue: "BLU" => "Blue",
        Brown: "BRO" => "Brown",
        Gray: "GRY" => "Gray",
        Green: "GRN" => "Green",
        Hazel: "HAZ" => "Hazel",
        Maroon: "MAR" => "Maroon",
        Pink: "PNK" => "Pink",
        Dichromatic: "DIC" => "Dichromatic",
        Unknown: "UNK" => "Unknown"
    }
}

attribute_codes! {
    /// Hair color (AAMVA D20).
    pub enum HairColor (HairColor) {
        Bald: "BAL" => "Bald",
        Black: "BLK" => "Black",
        Blonde: "BLN" => "Blonde",
        Brown: "BRO" => "Brown",
        Gray: "GRY" => "Gray",
        RedAuburn: "RED" => "Red/Auburn",
        Sandy: "SDY" => "Sandy",
        White: "WHI" => "White",
        Unknown: "UNK" => "Unknown"
    }
}

attribute_codes! {
    /// Sex (DBC).
    pub enum Sex (Sex) {
        Male: "1" => "Male",
        Female: "2" => "Female",
        NotSpecified: "9" => "Not specified"
    }
}

fn codes_of(kind: AttributeKind) -> Box<dyn Iterator<Item = (&'static str, &'static str)>> {
    match kind {
        AttributeKind::EyeColor => Box::new(EyeColor::LIST.iter().map(|v| (v.code(), v.label()))),
        AttributeKind::HairColor => {
            Box::new(HairColor::LIST.iter().map(|v| (v.code(), v.label())))
        }
        AttributeKind::Sex => Box::new(Sex::LIST.iter().map(|v| (v.code(), v.label()))),
    }
}

/// Code of the value displayed as `label`.
pub fn code_for(kind: AttributeKind, label: &str) -> Result<&'static str, UnknownAttributeCode> {
    codes_of(kind)
        .find(|(_, l)| l.eq_ignore_ascii_case(label))
        .map(|(code, _)| code)
        .ok_or_else(|| UnknownAttributeCode {
            kind,
            value: label.to_owned(),
        })
}

/// Display label of `code`.
pub fn label_for(kind: AttributeKind, code: &str) -> Result<&'static str, UnknownAttributeCode> {
    codes_of(kind)
        .find(|(c, _)| *c == code)
        .map(|(_, label)| label)
        .ok_or_else(|| UnknownAttributeCode {
            kind,
            value: code.to_owned(),
        })
}
