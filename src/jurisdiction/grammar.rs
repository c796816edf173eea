//! License number grammars.
//!
//! A grammar is a sequence of segments, each a character set with a length
//! range:
//!
//! - `N` a digit, `A` a letter, `X` a letter or digit,
//! - `[HAZ]` one of the listed characters,
//!
//! optionally followed by `{n}` or `{min,max}`. Whitespace is ignored, so
//! `[MTR] N{5,9}` is "M, T or R followed by 5 to 9 digits".
use std::{fmt, str::FromStr};

use rand::Rng;

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid license number grammar {pattern:?} at offset {offset}")]
pub struct InvalidGrammar {
    pub pattern: String,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharSet {
    Digit,
    Letter,
    AlphaNumeric,
    OneOf(Vec<u8>),
}

impl CharSet {
    pub fn contains(&self, c: u8) -> bool {
        match self {
            Self::Digit => c.is_ascii_digit(),
            Self::Letter => c.is_ascii_uppercase(),
            Self::AlphaNumeric => c.is_ascii_uppercase() || c.is_ascii_digit(),
            Self::OneOf(set) => set.contains(&c),
        }
    }

    fn symbols(&self) -> &[u8] {
        match self {
            Self::Digit => DIGITS,
            Self::Letter => LETTERS,
            Self::AlphaNumeric => ALPHANUMERIC,
            Self::OneOf(set) => set,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub set: CharSet,
    pub min: usize,
    pub max: usize,
}

impl Segment {
    pub fn exactly(set: CharSet, len: usize) -> Self {
        Self {
            set,
            min: len,
            max: len,
        }
    }

    /// Draws a value of this segment, each character uniformly.
    ///
    /// Digit runs never start with `0`.
    pub fn generate_to(&self, rng: &mut impl Rng, buffer: &mut String) {
        let len = rng.gen_range(self.min..=self.max);
        let symbols = self.set.symbols();
        for i in 0..len {
            let c = if i == 0 && self.set == CharSet::Digit {
                symbols[rng.gen_range(1..symbols.len())]
            } else {
                symbols[rng.gen_range(0..symbols.len())]
            };
            buffer.push(c as char);
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)?;
        } else {
            write!(f, "{}-{}", self.min, self.max)?;
        }

        let plural = self.max > 1;
        match &self.set {
            CharSet::Digit => f.write_str(if plural { " digits" } else { " digit" }),
            CharSet::Letter => f.write_str(if plural { " letters" } else { " letter" }),
            CharSet::AlphaNumeric => f.write_str(if plural {
                " letters or digits"
            } else {
                " letter or digit"
            }),
            CharSet::OneOf(set) => {
                let set = std::str::from_utf8(set).map_err(|_| fmt::Error)?;
                write!(f, " of {set}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseNumberGrammar {
    pattern: String,
    segments: Vec<Segment>,
}

impl LicenseNumberGrammar {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn min_len(&self) -> usize {
        self.segments.iter().map(|s| s.min).sum()
    }

    pub fn max_len(&self) -> usize {
        self.segments.iter().map(|s| s.max).sum()
    }

    pub fn matches(&self, value: &str) -> bool {
        matches_from(&self.segments, value.as_bytes())
    }

    pub fn generate(&self, rng: &mut impl Rng) -> String {
        let mut result = String::with_capacity(self.max_len());
        for segment in &self.segments {
            segment.generate_to(rng, &mut result);
        }
        result
    }
}

fn matches_from(segments: &[Segment], input: &[u8]) -> bool {
    match segments.split_first() {
        None => input.is_empty(),
        Some((segment, rest)) => {
            let run = input
                .iter()
                .take(segment.max)
                .take_while(|c| segment.set.contains(**c))
                .count();

            (segment.min..=run)
                .rev()
                .any(|len| matches_from(rest, &input[len..]))
        }
    }
}

impl fmt::Display for LicenseNumberGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for LicenseNumberGrammar {
    type Err = InvalidGrammar;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        let invalid = |offset| InvalidGrammar {
            pattern: pattern.to_owned(),
            offset,
        };

        let bytes = pattern.as_bytes();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            let set = match bytes[i] {
                c if c.is_ascii_whitespace() => {
                    i += 1;
                    continue;
                }
                b'N' => CharSet::Digit,
                b'A' => CharSet::Letter,
                b'X' => CharSet::AlphaNumeric,
                b'[' => {
                    let end = bytes[i..]
                        .iter()
                        .position(|c| *c == b']')
                        .ok_or_else(|| invalid(i))?;
                    let set = bytes[i + 1..i + end].to_vec();
                    if set.is_empty()
                        || !set
                            .iter()
                            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                    {
                        return Err(invalid(i));
                    }
                    i += end;
                    CharSet::OneOf(set)
                }
                _ => return Err(invalid(i)),
            };
            i += 1;

            let (min, max) = if bytes.get(i) == Some(&b'{') {
                let end = bytes[i..]
                    .iter()
                    .position(|c| *c == b'}')
                    .ok_or_else(|| invalid(i))?;
                let quantifier = std::str::from_utf8(&bytes[i + 1..i + end])
                    .map_err(|_| invalid(i))?;
                let parse = |s: &str| s.trim().parse::<usize>().map_err(|_| invalid(i));
                let bounds = match quantifier.split_once(',') {
                    Some((min, max)) => (parse(min)?, parse(max)?),
                    None => {
                        let n = parse(quantifier)?;
                        (n, n)
                    }
                };
                if bounds.0 == 0 || bounds.0 > bounds.1 {
                    return Err(invalid(i));
                }
                i += end + 1;
                bounds
            } else {
                (1, 1)
            };

            segments.push(Segment { set, min, max });
        }

        if segments.is_empty() {
            return Err(invalid(0));
        }

        Ok(Self {
            pattern: pattern.to_owned(),
            segments,
        })
    }
}
